use log::{debug, info, warn};

use party_resolution::coalition::{evaluate, Stance};
use party_resolution::history::{available_parties, build_history};
use party_resolution::regions::{aggregate_by_region, aggregate_municipalities_by_region};
use party_resolution::*;
use snafu::{prelude::*, Snafu};

use std::collections::HashMap;
use std::fs;

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::report::io_common::election_id_from_path;
use crate::report::io_payload::*;

mod io_common;
mod io_payload;

/// Parties below this many votes over the whole series are not offered in trend pickers.
const MIN_HISTORY_VOTES: u64 = 10_000;

#[derive(Debug, Snafu)]
pub enum ReportError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON in {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the output"))]
    WritingJson { source: serde_json::Error },
    #[snafu(display("Error writing output file {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("No input file given"))]
    MissingInput {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type ReportResult<T> = Result<T, ReportError>;

/// An input file with the election it describes.
pub struct LoadedElection {
    /// The id, kind and date of the election, after the command line overrides.
    pub descriptor: ElectionDescriptor,
    pub payload: ElectionPayload,
}

impl LoadedElection {
    pub fn context(&self) -> ResolutionContext {
        self.descriptor.context()
    }

    pub fn is_municipal(&self) -> bool {
        self.descriptor.is_municipal()
    }
}

pub fn load_election(
    path: &str,
    election_id: Option<&str>,
    year: Option<u32>,
) -> ReportResult<LoadedElection> {
    info!("Attempting to read election file {:?}", path);
    let payload = read_payload(path)?;
    let election_id = election_id
        .map(|s| s.to_string())
        .or_else(|| election_id_from_path(path))
        .unwrap_or_default();
    let parsed = ElectionDescriptor::parse(&election_id);
    let year = year
        .or_else(|| payload.year())
        .or_else(|| parsed.as_ref().map(|d| d.year))
        .unwrap_or(0);
    if year == 0 {
        warn!("load_election: no year known for {:?}", path);
    }
    let kind = match &parsed {
        _ if payload.is_municipal() => "municipales".to_string(),
        Some(d) => d.kind.clone(),
        None => "congreso".to_string(),
    };
    let descriptor = ElectionDescriptor {
        id: election_id,
        kind,
        year,
        month: parsed.and_then(|d| d.month),
    };
    debug!("load_election: {:?}", descriptor);
    Ok(LoadedElection {
        descriptor,
        payload,
    })
}

pub fn national_summary_js(election: &LoadedElection) -> ReportResult<JSValue> {
    let (votes, seats) = election.payload.national_tally();
    let results = aggregate_results_in_context(
        &votes,
        &seats,
        &election.payload.candidacy_map(),
        &election.context(),
    );
    Ok(json!({
        "election": election.descriptor.id,
        "year": election.descriptor.year,
        "results": serde_json::to_value(&results).context(WritingJsonSnafu {})?,
    }))
}

pub fn regions_summary_js(election: &LoadedElection) -> ReportResult<JSValue> {
    let candidacies = election.payload.candidacy_map();
    let ctx = election.context();
    let regions = if election.is_municipal() {
        aggregate_municipalities_by_region(
            &election.payload.municipality_tallies(),
            &candidacies,
            &ctx,
        )
    } else {
        aggregate_by_region(&election.payload.province_tallies(), &candidacies, &ctx)
    };
    Ok(json!({
        "election": election.descriptor.id,
        "year": election.descriptor.year,
        "regions": serde_json::to_value(&regions).context(WritingJsonSnafu {})?,
    }))
}

pub fn history_summary_js(elections: &[LoadedElection]) -> ReportResult<JSValue> {
    let mut records: Vec<HistoryRecord> = Vec::new();
    for e in elections.iter() {
        let d = &e.descriptor;
        let mut recs = e.payload.history_records(d.year, d.month_or_default(), &d.kind);
        records.append(&mut recs);
    }
    let points = build_history(&records);
    let parties = available_parties(&points, MIN_HISTORY_VOTES);
    let (priority, others) = split_priority(&parties);
    Ok(json!({
        "history": serde_json::to_value(&points).context(WritingJsonSnafu {})?,
        "priority": priority,
        "others": others,
    }))
}

/// The outcome of a vote in which the listed parties vote yes or abstain.
pub fn coalition_summary_js(
    election: &LoadedElection,
    yes: &[String],
    abstain: &[String],
) -> ReportResult<JSValue> {
    let (votes, seats) = election.payload.national_tally();
    let results = aggregate_results_in_context(
        &votes,
        &seats,
        &election.payload.candidacy_map(),
        &election.context(),
    );
    let mut stances: HashMap<String, Stance> = HashMap::new();
    for p in abstain.iter() {
        stances.insert(p.clone(), Stance::Abstain);
    }
    for p in yes.iter() {
        stances.insert(p.clone(), Stance::Yes);
    }
    let outcome = evaluate(&results, &stances);
    Ok(json!({
        "election": election.descriptor.id,
        "year": election.descriptor.year,
        "coalition": serde_json::to_value(&outcome).context(WritingJsonSnafu {})?,
    }))
}

pub fn party_config_js() -> ReportResult<JSValue> {
    serde_json::to_value(PartyConfig::current()).context(WritingJsonSnafu {})
}

/// Computes the output selected by the arguments.
pub fn build_output(args: &Args) -> ReportResult<JSValue> {
    let scope = args.scope.clone().unwrap_or_else(|| "national".to_string());
    if scope == "party-config" {
        return party_config_js();
    }
    if args.input.is_empty() {
        return MissingInputSnafu {}.fail();
    }
    let mut elections: Vec<LoadedElection> = Vec::new();
    for path in args.input.iter() {
        // An explicit id or year only makes sense for a single file.
        let (id, year) = if args.input.len() == 1 {
            (args.election_id.as_deref(), args.year)
        } else {
            (None, None)
        };
        elections.push(load_election(path, id, year)?);
    }
    match scope.as_str() {
        "national" => national_summary_js(&elections[0]),
        "regions" => regions_summary_js(&elections[0]),
        "history" => history_summary_js(&elections),
        "coalition" => coalition_summary_js(&elections[0], &args.yes, &args.abstain),
        x => {
            whatever!(
                "Unknown scope {:?}: expected national, regions, history, coalition or party-config",
                x
            )
        }
    }
}

fn write_output(out: &Option<String>, content: &str) -> ReportResult<()> {
    match out.as_deref() {
        None | Some("stdout") => {
            println!("{}", content);
            Ok(())
        }
        Some(path) => {
            info!("Writing output to {:?}", path);
            fs::write(path, content).context(WritingOutputSnafu { path })
        }
    }
}

/// Compares the output against a reference file. The differences are printed.
pub fn check_reference(result_js: &JSValue, reference_path: &str) -> ReportResult<()> {
    let pretty_js_stats = serde_json::to_string_pretty(result_js).context(WritingJsonSnafu {})?;
    let reference = read_json(reference_path)?;
    let pretty_js_reference =
        serde_json::to_string_pretty(&reference).context(WritingJsonSnafu {})?;
    if pretty_js_reference != pretty_js_stats {
        warn!("Found differences with the reference string");
        print_diff(
            pretty_js_reference.as_str(),
            pretty_js_stats.as_ref(),
            "\n",
        );
        whatever!("Difference detected between computed output and reference output")
    }
    Ok(())
}

pub fn run(args: &Args) -> ReportResult<()> {
    let result_js = build_output(args)?;
    let pretty_js = serde_json::to_string_pretty(&result_js).context(WritingJsonSnafu {})?;
    write_output(&args.out, &pretty_js)?;

    if let Some(reference_path) = &args.reference {
        check_reference(&result_js, reference_path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_path(name: &str) -> String {
        format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), name)
    }

    fn args(scope: &str, inputs: &[&str]) -> Args {
        Args {
            input: inputs.iter().map(|i| data_path(i)).collect(),
            scope: Some(scope.to_string()),
            election_id: None,
            year: None,
            out: None,
            reference: None,
            yes: vec![],
            abstain: vec![],
            verbose: false,
        }
    }

    #[test]
    fn national_matches_reference() {
        let result_js = build_output(&args("national", &["congreso_2019_11.json"])).unwrap();
        check_reference(&result_js, &data_path("congreso_2019_11_expected.json")).unwrap();
    }

    #[test]
    fn national_detects_differences() {
        let result_js = build_output(&args("national", &["congreso_1982_10.json"])).unwrap();
        let res = check_reference(&result_js, &data_path("congreso_2019_11_expected.json"));
        assert!(res.is_err());
    }

    #[test]
    fn pre_merger_labels() {
        let election = load_election(&data_path("congreso_1982_10.json"), None, None).unwrap();
        assert_eq!(election.descriptor.id, "congreso_1982_10");
        assert_eq!(election.descriptor.year, 1982);
        assert_eq!(election.descriptor.month_or_default(), 10);
        assert!(!election.is_municipal());
        let js = national_summary_js(&election).unwrap();
        let results = js["results"].as_array().unwrap();
        assert_eq!(results[0]["canonicalId"], "PSOE");
        assert_eq!(results[1]["canonicalId"], "AP");
        assert_eq!(results[1]["votes"], 5_643_107);
        assert_eq!(results[1]["seats"], 107);
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn municipal_kind_from_metadata() {
        let election =
            load_election(&data_path("municipales_2023_05.json"), Some("locales"), None).unwrap();
        assert_eq!(election.descriptor.kind, "municipales");
        assert_eq!(election.descriptor.year, 2023);
        assert_eq!(election.descriptor.month_or_default(), 6);
        assert!(election.is_municipal());
        assert_eq!(election.context(), ResolutionContext::for_election("locales", 2023));
    }

    #[test]
    fn year_override() {
        // The same AP label read as a 2000 election is quarantined.
        let election = load_election(
            &data_path("congreso_1982_10.json"),
            Some("congreso_2000_03"),
            Some(2000),
        )
        .unwrap();
        let js = national_summary_js(&election).unwrap();
        let ids: Vec<&str> = js["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["canonicalId"].as_str().unwrap())
            .collect();
        assert!(ids.contains(&"AP-OTHER"));
        assert!(ids.contains(&"PP"));
        assert!(!ids.contains(&"AP"));
    }

    #[test]
    fn congress_regions() {
        let js = build_output(&args("regions", &["congreso_2019_11.json"])).unwrap();
        let regions = js["regions"].as_array().unwrap();
        let codes: Vec<&str> = regions.iter().map(|r| r["code"].as_str().unwrap()).collect();
        assert_eq!(codes, vec!["03", "09", "12", "13"]);

        let asturias = &regions[0];
        assert_eq!(asturias["parties"].as_array().unwrap().len(), 1);
        assert_eq!(asturias["parties"][0]["canonicalId"], "PP");
        assert_eq!(asturias["parties"][0]["votes"], 180);
        assert_eq!(asturias["parties"][0]["seats"], 1);

        let catalonia = &regions[1];
        assert_eq!(catalonia["name"], "Cataluña");
        assert_eq!(catalonia["parties"][0]["canonicalId"], "ERC");
        assert_eq!(catalonia["parties"][1]["canonicalId"], "PSOE");
        assert_eq!(catalonia["totalVotes"], 550);
        assert_eq!(catalonia["totalSeats"], 5);
    }

    #[test]
    fn municipal_regions() {
        let js = build_output(&args("regions", &["municipales_2023_05.json"])).unwrap();
        let regions = js["regions"].as_array().unwrap();
        assert_eq!(regions.len(), 1);
        let parties = regions[0]["parties"].as_array().unwrap();
        assert_eq!(parties[0]["canonicalId"], "ERC");
        assert_eq!(parties[0]["votes"], 550);
        assert_eq!(parties[0]["seats"], 0);
        // The AP ballot line of this election is socialist.
        assert_eq!(parties[1]["canonicalId"], "PSOE");
        assert_eq!(parties[1]["seats"], 1);
        assert_eq!(parties[2]["canonicalId"], "JUNTS");
        assert_eq!(parties[2]["seats"], 1);
    }

    #[test]
    fn history_across_files() {
        let js = build_output(&args(
            "history",
            &["congreso_1982_10.json", "congreso_2019_11.json"],
        ))
        .unwrap();
        let history = js["history"].as_array().unwrap();
        let first = &history[0];
        assert_eq!(first["year"], 1982);
        assert_eq!(first["party"], "PSOE");
        let pp_2019 = history
            .iter()
            .find(|p| p["year"] == 2019 && p["party"] == "PP")
            .unwrap();
        // PP-FORO joins PP in the series.
        assert_eq!(pp_2019["votes"], 940);
        assert_eq!(pp_2019["seats"], 9);
        assert!(history.iter().all(|p| p["party"] != "AP-OTHER"));

        let priority: Vec<&str> = js["priority"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p.as_str().unwrap())
            .collect();
        assert_eq!(priority, vec!["PSOE", "AP", "UCD"]);
    }

    #[test]
    fn coalition_vote() {
        let mut a = args("coalition", &["congreso_2019_11.json"]);
        a.yes = vec!["PSOE".to_string(), "ERC".to_string(), "En Marea".to_string()];
        a.abstain = vec!["PP".to_string()];
        let js = build_output(&a).unwrap();
        let c = &js["coalition"];
        // 30 seats: 16 needed.
        assert_eq!(c["totalSeats"], 30);
        assert_eq!(c["majority"], 16);
        assert_eq!(c["yes"], 16);
        // PP-FORO follows PP through its canonical id.
        assert_eq!(c["abstain"], 9);
        assert_eq!(c["no"], 5);
        assert_eq!(c["absoluteMajority"], true);
        assert_eq!(c["simpleMajority"], true);
        assert_eq!(c["blocs"][0]["display"], "PSOE");
        assert_eq!(c["blocs"][0]["stance"], "yes");

        a.yes.pop();
        let js = build_output(&a).unwrap();
        assert_eq!(js["coalition"]["yes"], 15);
        assert_eq!(js["coalition"]["absoluteMajority"], false);
    }

    #[test]
    fn party_config() {
        let js = build_output(&args("party-config", &[])).unwrap();
        assert_eq!(js["colors"]["PSOE"], "#DB1A15");
        assert_eq!(js["groups"]["PP-FORO"], "PP");
    }

    #[test]
    fn errors() {
        assert!(matches!(
            build_output(&args("national", &[])),
            Err(ReportError::MissingInput {})
        ));
        assert!(matches!(
            build_output(&args("national", &["does_not_exist.json"])),
            Err(ReportError::OpeningJson { .. })
        ));
        assert!(matches!(
            build_output(&args("bogus", &["congreso_2019_11.json"])),
            Err(ReportError::Whatever { .. })
        ));
    }
}
