use log::{debug, info};
use std::collections::{HashMap, HashSet};

pub use crate::config::*;
use crate::resolve::resolve_party;

/// A builder for aggregating tallies one candidacy at a time.
///
/// Useful when the tallies come from a stream of rows rather than from ready-made maps.
///
/// ```
/// use party_resolution::builder::AggregationBuilder;
/// use party_resolution::ResolutionContext;
///
/// let mut builder = AggregationBuilder::new(&ResolutionContext::for_year(2019))
///     .candidacy("001", "PP")
///     .candidacy("002", "P.P.");
///
/// builder.add_votes("001", 1000);
/// builder.add_votes("002", 500);
/// builder.add_seats("001", 3);
///
/// let results = builder.build();
/// assert_eq!(results.len(), 1);
/// assert_eq!(results[0].votes, 1500);
/// assert_eq!(results[0].seats, 3);
/// ```
pub struct AggregationBuilder {
    pub(crate) _context: ResolutionContext,
    pub(crate) _candidacies: HashMap<String, Candidacy>,
    // In order of first appearance.
    pub(crate) _votes: Vec<(String, u64)>,
    pub(crate) _seats: Vec<(String, u32)>,
    // Position of each code in the vectors above.
    _vote_index: HashMap<String, usize>,
    _seat_index: HashMap<String, usize>,
}

impl AggregationBuilder {
    pub fn new(context: &ResolutionContext) -> AggregationBuilder {
        AggregationBuilder {
            _context: context.clone(),
            _candidacies: HashMap::new(),
            _votes: Vec::new(),
            _seats: Vec::new(),
            _vote_index: HashMap::new(),
            _seat_index: HashMap::new(),
        }
    }

    /// Registers the ballot label of a candidacy code.
    pub fn candidacy(mut self, code: &str, siglas: &str) -> AggregationBuilder {
        self._candidacies
            .insert(code.to_string(), Candidacy::new(siglas));
        self
    }

    /// Registers the metadata of many candidacy codes at once.
    pub fn candidacies(mut self, candidacies: &HashMap<String, Candidacy>) -> AggregationBuilder {
        for (code, c) in candidacies.iter() {
            self._candidacies.insert(code.clone(), c.clone());
        }
        self
    }

    /// Adds votes to a code. Repeated calls accumulate.
    pub fn add_votes(&mut self, code: &str, votes: u64) {
        match self._vote_index.get(code).copied() {
            Some(idx) => self._votes[idx].1 += votes,
            None => {
                self._vote_index.insert(code.to_string(), self._votes.len());
                self._votes.push((code.to_string(), votes));
            }
        }
    }

    /// Adds seats to a code. Repeated calls accumulate.
    pub fn add_seats(&mut self, code: &str, seats: u32) {
        match self._seat_index.get(code).copied() {
            Some(idx) => self._seats[idx].1 += seats,
            None => {
                self._seat_index.insert(code.to_string(), self._seats.len());
                self._seats.push((code.to_string(), seats));
            }
        }
    }

    /// Merges the codes that display under the same label, sorted by descending votes.
    ///
    /// Codes are visited in the order they were first given votes, then the codes
    /// that only hold seats. Among rows with the same number of votes, this order
    /// is kept; callers should not rely on it.
    pub fn build(&self) -> Vec<AggregatedResult> {
        info!(
            "Aggregating {} vote entries and {} seat entries, context: {:?}",
            self._votes.len(),
            self._seats.len(),
            self._context
        );
        let seats_by_code: HashMap<&str, u32> = self
            ._seats
            .iter()
            .map(|(c, s)| (c.as_str(), *s))
            .collect();

        let mut codes: Vec<(&str, u64)> = self
            ._votes
            .iter()
            .map(|(c, v)| (c.as_str(), *v))
            .collect();
        let voted: HashSet<&str> = self._votes.iter().map(|(c, _)| c.as_str()).collect();
        for (code, seats) in self._seats.iter() {
            if *seats > 0 && !voted.contains(code.as_str()) {
                debug!("build: code {} holds {} seats but no votes", code, seats);
                codes.push((code.as_str(), 0));
            }
        }

        let mut rows: Vec<AggregatedResult> = Vec::new();
        let mut row_by_display: HashMap<String, usize> = HashMap::new();
        for (code, votes) in codes {
            // Without metadata or label, the code itself is the ballot label.
            let siglas = self
                ._candidacies
                .get(code)
                .map(|c| c.label_or(code))
                .unwrap_or(code);
            let party = resolve_party(siglas, &self._context);
            let seats = seats_by_code.get(code).cloned().unwrap_or(0);
            let idx = match row_by_display.get(&party.display) {
                Some(idx) => *idx,
                None => {
                    rows.push(AggregatedResult {
                        canonical_id: party.id.clone(),
                        display: party.display.clone(),
                        color: party.color.clone(),
                        votes: 0,
                        seats: 0,
                        source_codes: Vec::new(),
                    });
                    row_by_display.insert(party.display.clone(), rows.len() - 1);
                    rows.len() - 1
                }
            };
            debug!(
                "build: code {} ({:?}) -> {:?}: {} votes, {} seats",
                code, siglas, party.display, votes, seats
            );
            let row = &mut rows[idx];
            row.votes += votes;
            row.seats += seats;
            row.source_codes.push(code.to_string());
        }

        // Stable: ties keep their order of appearance.
        rows.sort_by(|a, b| b.votes.cmp(&a.votes));
        rows
    }
}
