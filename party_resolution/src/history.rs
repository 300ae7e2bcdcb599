//! Party series across elections.

use log::{debug, info};
use std::collections::HashMap;

use crate::config::*;
use crate::resolve::resolve_party;
use crate::tables::AP_OTHER;

/// AP rows strictly between these years are not the historic AP and are left out of the series.
const AP_GAP: (u32, u32) = (1989, 2023);

/// Records without a month (0) are placed in June.
fn month_of(record: &HistoryRecord) -> u32 {
    if record.month == 0 {
        DEFAULT_MONTH
    } else {
        record.month
    }
}

fn time_of(year: u32, month: u32) -> f64 {
    year as f64 + (month - 1) as f64 / 12.0
}

/// Builds the per-party series of a list of historical records.
///
/// Each record is resolved in the context of its own year. Rows of the same
/// canonical party, election type and date are merged, and each point gets its
/// share of all the votes retained at that date.
pub fn build_history(records: &[HistoryRecord]) -> Vec<HistoryPoint> {
    info!("build_history: {} records", records.len());
    let mut points: Vec<HistoryPoint> = Vec::new();
    let mut index: HashMap<(u32, u32, String, String), usize> = HashMap::new();
    let mut totals: HashMap<(u32, u32), u64> = HashMap::new();

    for r in records.iter() {
        let month = month_of(r);
        let party = resolve_party(&r.party, &ResolutionContext::for_year(r.year));
        if party.id == AP_OTHER || (party.id == "AP" && r.year > AP_GAP.0 && r.year < AP_GAP.1) {
            debug!("build_history: dropping {:?} ({}) as {}", r.party, r.year, party.id);
            continue;
        }
        *totals.entry((r.year, month)).or_insert(0) += r.votes;

        let key = (r.year, month, party.id.clone(), r.election_type.clone());
        let idx = match index.get(&key) {
            Some(idx) => *idx,
            None => {
                points.push(HistoryPoint {
                    time: time_of(r.year, month),
                    year: r.year,
                    month,
                    election_type: r.election_type.clone(),
                    display: if party.is_group_child {
                        party.id.clone()
                    } else {
                        party.display.clone()
                    },
                    party: party.id.clone(),
                    color: party.color.clone(),
                    votes: 0,
                    seats: 0,
                    pct: 0.0,
                });
                index.insert(key, points.len() - 1);
                points.len() - 1
            }
        };
        points[idx].votes += r.votes;
        points[idx].seats += r.seats;
    }

    for p in points.iter_mut() {
        let total = totals.get(&(p.year, p.month)).cloned().unwrap_or(0);
        p.pct = if total > 0 {
            p.votes as f64 * 100.0 / total as f64
        } else {
            0.0
        };
    }

    points.sort_by(|a, b| {
        a.time
            .partial_cmp(&b.time)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.election_type.cmp(&b.election_type))
            .then_with(|| b.votes.cmp(&a.votes))
    });
    points
}

/// The parties whose total votes over the series exceed `min_votes`, most voted first.
pub fn available_parties(points: &[HistoryPoint], min_votes: u64) -> Vec<String> {
    let mut totals: Vec<(String, u64)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for p in points.iter() {
        match index.get(p.party.as_str()).copied() {
            Some(idx) => totals[idx].1 += p.votes,
            None => {
                index.insert(p.party.as_str(), totals.len());
                totals.push((p.party.clone(), p.votes));
            }
        }
    }
    totals.retain(|(_, v)| *v > min_votes);
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals.into_iter().map(|(id, _)| id).collect()
}
