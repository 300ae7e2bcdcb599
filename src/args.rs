use clap::Parser;

/// This is a party aggregation program for Spanish election results.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, repeatable) A processed election file in JSON format. The history scope accepts
    /// several files, the other scopes read the first one.
    #[clap(short, long, value_parser)]
    pub input: Vec<String>,

    /// (default national) What to compute: national, regions, history, coalition or party-config.
    #[clap(short, long, value_parser)]
    pub scope: Option<String>,

    /// (election id, optional) The id of the election, such as municipales_2023_05. By default it is
    /// taken from the name of the input file.
    #[clap(long, value_parser)]
    pub election_id: Option<String>,

    /// (year, optional) The year of the election. Overrides the metadata of the input file.
    #[clap(short, long, value_parser)]
    pub year: Option<u32>,

    /// (file path, 'stdout' or empty) If specified, the output will be written in JSON format to the given
    /// location. By default it is printed on the standard output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing the expected output in JSON format. If provided, escrutinio
    /// will check that the computed output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (party, repeatable) For the coalition scope: a party voting yes, by display label or
    /// canonical id. The parties not listed vote no.
    #[clap(long, value_parser)]
    pub yes: Vec<String>,

    /// (party, repeatable) For the coalition scope: a party abstaining.
    #[clap(long, value_parser)]
    pub abstain: Vec<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
