//! Majorities and coalition votes over aggregated seat rows.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::*;

/// Seats of the Congress of Deputies.
pub const CONGRESS_SEATS: u32 = 350;

/// Number of municipalities, the "seats" of a municipal map.
pub const MUNICIPALITIES: u32 = 8131;

/// The position of a party in an investiture or any yes/no vote.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    Yes,
    Abstain,
    No,
}

impl Default for Stance {
    fn default() -> Stance {
        Stance::No
    }
}

impl Stance {
    /// No, then yes, then abstain, then no again.
    pub fn next(self) -> Stance {
        match self {
            Stance::No => Stance::Yes,
            Stance::Yes => Stance::Abstain,
            Stance::Abstain => Stance::No,
        }
    }
}

/// The absolute majority of a chamber of `total_seats`: half plus one, rounded down.
pub fn majority_threshold(total_seats: u32) -> u32 {
    total_seats / 2 + 1
}

/// The majority of a full chamber: 176 deputies, or half of the municipalities.
pub fn chamber_majority(is_municipal: bool) -> u32 {
    if is_municipal {
        (MUNICIPALITIES + 1) / 2
    } else {
        majority_threshold(CONGRESS_SEATS)
    }
}

/// The seats of the parties that hold any, merged by display label.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SeatBloc {
    #[serde(rename = "canonicalId")]
    pub canonical_id: String,
    pub display: String,
    pub color: String,
    pub seats: u32,
    pub stance: Stance,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CoalitionOutcome {
    #[serde(rename = "totalSeats")]
    pub total_seats: u32,
    pub majority: u32,
    pub yes: u32,
    pub abstain: u32,
    pub no: u32,
    /// At least `majority` seats in favor.
    #[serde(rename = "absoluteMajority")]
    pub absolute_majority: bool,
    /// More seats in favor than against.
    #[serde(rename = "simpleMajority")]
    pub simple_majority: bool,
    pub blocs: Vec<SeatBloc>,
}

fn stance_of(row: &AggregatedResult, stances: &HashMap<String, Stance>) -> Stance {
    stances
        .get(&row.display)
        .or_else(|| stances.get(&row.canonical_id))
        .cloned()
        .unwrap_or_default()
}

/// Counts a vote in which the majority is taken over the seats of `results`.
///
/// Stances are looked up by display label, then by canonical id. Parties
/// without a stance vote no.
pub fn evaluate(
    results: &[AggregatedResult],
    stances: &HashMap<String, Stance>,
) -> CoalitionOutcome {
    let total: u32 = results.iter().map(|r| r.seats).sum();
    evaluate_against(results, stances, majority_threshold(total))
}

/// Same as [`evaluate`], with a fixed majority (see [`chamber_majority`]).
pub fn evaluate_against(
    results: &[AggregatedResult],
    stances: &HashMap<String, Stance>,
    majority: u32,
) -> CoalitionOutcome {
    let mut blocs: Vec<SeatBloc> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for row in results.iter().filter(|r| r.seats > 0) {
        match index.get(row.display.as_str()).copied() {
            Some(idx) => blocs[idx].seats += row.seats,
            None => {
                index.insert(row.display.as_str(), blocs.len());
                blocs.push(SeatBloc {
                    canonical_id: row.canonical_id.clone(),
                    display: row.display.clone(),
                    color: row.color.clone(),
                    seats: row.seats,
                    stance: stance_of(row, stances),
                });
            }
        }
    }
    blocs.sort_by(|a, b| b.seats.cmp(&a.seats));

    let (mut yes, mut abstain, mut no) = (0, 0, 0);
    for b in blocs.iter() {
        match b.stance {
            Stance::Yes => yes += b.seats,
            Stance::Abstain => abstain += b.seats,
            Stance::No => no += b.seats,
        }
        debug!("evaluate: {} ({} seats) votes {:?}", b.display, b.seats, b.stance);
    }
    let outcome = CoalitionOutcome {
        total_seats: yes + abstain + no,
        majority,
        yes,
        abstain,
        no,
        absolute_majority: yes >= majority,
        simple_majority: yes > no,
        blocs,
    };
    info!(
        "Coalition vote: {} yes, {} abstain, {} no, majority {}",
        outcome.yes, outcome.abstain, outcome.no, outcome.majority
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, display: &str, seats: u32) -> AggregatedResult {
        AggregatedResult {
            canonical_id: id.to_string(),
            display: display.to_string(),
            color: "#000000".to_string(),
            votes: seats as u64 * 1000,
            seats,
            source_codes: vec![],
        }
    }

    fn stances(entries: &[(&str, Stance)]) -> HashMap<String, Stance> {
        entries.iter().map(|(k, s)| (k.to_string(), *s)).collect()
    }

    #[test]
    fn thresholds() {
        assert_eq!(majority_threshold(350), 176);
        assert_eq!(majority_threshold(351), 176);
        assert_eq!(majority_threshold(30), 16);
        assert_eq!(majority_threshold(1), 1);
        assert_eq!(majority_threshold(0), 1);
        assert_eq!(chamber_majority(false), 176);
        assert_eq!(chamber_majority(true), 4066);
    }

    #[test]
    fn stance_cycle() {
        let s = Stance::default();
        assert_eq!(s, Stance::No);
        assert_eq!(s.next(), Stance::Yes);
        assert_eq!(s.next().next(), Stance::Abstain);
        assert_eq!(s.next().next().next(), Stance::No);
    }

    #[test]
    fn absolute_majority_on_even_total() {
        let results = vec![row("PSOE", "PSOE", 10), row("PP", "PP", 8), row("VOX", "Vox", 2)];
        // 20 seats: 11 needed.
        let out = evaluate(&results, &stances(&[("PSOE", Stance::Yes)]));
        assert_eq!(out.majority, 11);
        assert_eq!(out.yes, 10);
        assert!(!out.absolute_majority);
        assert!(!out.simple_majority);

        let out = evaluate(
            &results,
            &stances(&[("PSOE", Stance::Yes), ("Vox", Stance::Yes)]),
        );
        assert_eq!(out.yes, 12);
        assert!(out.absolute_majority);
        assert!(out.simple_majority);
    }

    #[test]
    fn odd_total_and_abstentions() {
        let results = vec![row("PSOE", "PSOE", 10), row("PP", "PP", 9), row("ERC", "ERC", 2)];
        // 21 seats: 11 needed.
        let out = evaluate(
            &results,
            &stances(&[("PSOE", Stance::Yes), ("ERC", Stance::Abstain)]),
        );
        assert_eq!(out.total_seats, 21);
        assert_eq!(out.majority, 11);
        assert_eq!((out.yes, out.abstain, out.no), (10, 2, 9));
        assert!(!out.absolute_majority);
        assert!(out.simple_majority);
    }

    #[test]
    fn tie_is_not_a_simple_majority() {
        let results = vec![row("PSOE", "PSOE", 5), row("PP", "PP", 5), row("BNG", "BNG", 1)];
        let out = evaluate(
            &results,
            &stances(&[("PSOE", Stance::Yes), ("BNG", Stance::Abstain)]),
        );
        assert_eq!(out.yes, out.no);
        assert!(!out.simple_majority);
        assert!(!out.absolute_majority);
    }

    #[test]
    fn blocs_merge_by_display() {
        let results = vec![
            row("PP", "PP", 8),
            row("PP", "PP-FORO", 1),
            row("PP", "PP", 2),
            row("PACMA", "PACMA", 0),
        ];
        let out = evaluate(&results, &stances(&[("PP", Stance::Yes)]));
        assert_eq!(out.blocs.len(), 2);
        assert_eq!(out.blocs[0].seats, 10);
        // The alliance follows its parent's id when it has no stance of its own.
        assert_eq!(out.blocs[1].stance, Stance::Yes);
        assert_eq!(out.yes, 11);

        let out = evaluate(
            &results,
            &stances(&[("PP", Stance::Yes), ("PP-FORO", Stance::No)]),
        );
        assert_eq!(out.yes, 10);
        assert_eq!(out.no, 1);
    }

    #[test]
    fn fixed_chamber_majority() {
        let results = vec![row("PSOE", "PSOE", 120), row("SUMAR", "Sumar", 31)];
        let out = evaluate_against(
            &results,
            &stances(&[("PSOE", Stance::Yes), ("SUMAR", Stance::Yes)]),
            chamber_majority(false),
        );
        assert_eq!(out.yes, 151);
        assert_eq!(out.majority, 176);
        assert!(!out.absolute_majority);
        assert!(out.simple_majority);
    }

    #[test]
    fn no_seats() {
        let out = evaluate(&[], &HashMap::new());
        assert_eq!(out.total_seats, 0);
        assert_eq!(out.majority, 1);
        assert!(!out.absolute_majority);
        assert!(!out.simple_majority);
    }
}
