/*!
Canonical party resolution and result aggregation for Spanish election data.

The same party shows up under many ballot labels: `P.P.` and `PP`, `PSOE-A`
in Andalusia, `PSC` in Catalonia, coalition names that change from one
election to the next. This crate maps every label to a stable identity
([`CanonicalParty`]) and sums vote and seat tallies under that identity.

```
use party_resolution::*;
use std::collections::HashMap;

let votes: Tally = vec![("001".to_string(), 1000), ("002".to_string(), 500)];
let candidacies: HashMap<String, Candidacy> = [
    ("001".to_string(), Candidacy::new("PP")),
    ("002".to_string(), Candidacy::new("P.P.")),
]
.into_iter()
.collect();

let results = aggregate_results(&votes, &HashMap::new(), &candidacies);
assert_eq!(results.len(), 1);
assert_eq!(results[0].display, "PP");
assert_eq!(results[0].votes, 1500);
```

All the functions are pure. The configuration tables are built once and
never change, so they can be read from any number of threads.
*/

pub mod builder;
pub mod coalition;
mod config;
pub mod history;
pub mod manual;
pub mod regions;
mod resolve;
pub mod tables;

use log::info;
use std::collections::HashMap;

use crate::builder::AggregationBuilder;
pub use crate::config::*;
pub use crate::resolve::{clean_label, party_info, resolve_party};
pub use crate::tables::{party_color, split_priority, PartyConfig};

/// Votes per candidacy code, in the order of the source data.
pub type Tally = Vec<(String, u64)>;

/// Aggregates the tallies of one contest, with no temporal context.
///
/// Arguments:
/// * `votes` the votes of each candidacy code
/// * `seats` the seats of each candidacy code. Codes missing here have no seats.
/// * `candidacies` the ballot label of each code. A code without metadata is its own label.
///
/// The codes whose labels display identically are merged into one row. The rows are
/// sorted by descending votes.
pub fn aggregate_results(
    votes: &[(String, u64)],
    seats: &HashMap<String, u32>,
    candidacies: &HashMap<String, Candidacy>,
) -> Vec<AggregatedResult> {
    aggregate_results_in_context(votes, seats, candidacies, &ResolutionContext::default())
}

/// Same as [`aggregate_results`], resolving the labels in the given context.
pub fn aggregate_results_in_context(
    votes: &[(String, u64)],
    seats: &HashMap<String, u32>,
    candidacies: &HashMap<String, Candidacy>,
    context: &ResolutionContext,
) -> Vec<AggregatedResult> {
    let mut builder = AggregationBuilder::new(context).candidacies(candidacies);
    for (code, v) in votes.iter() {
        builder.add_votes(code, *v);
    }
    // Seat-only codes go after the voted ones, in a stable order.
    let mut seat_codes: Vec<(&String, &u32)> = seats.iter().collect();
    seat_codes.sort();
    for (code, s) in seat_codes {
        builder.add_seats(code, *s);
    }
    let res = builder.build();
    info!(
        "aggregate_results: {} codes -> {} parties",
        votes.len(),
        res.len()
    );
    res
}
