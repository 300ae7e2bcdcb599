use log::{debug, warn};
use party_resolution::regions::{MunicipalityTally, ProvinceTally};
use party_resolution::{Candidacy, HistoryRecord, Tally};
use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use snafu::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::fs;

use crate::report::io_common::{read_js_code, read_js_u32};
use crate::report::*;

pub fn read_json(path: &str) -> ReportResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })
}

/// Reads a processed election file.
pub fn read_payload(path: &str) -> ReportResult<ElectionPayload> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let payload: ElectionPayload =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    debug!(
        "read_payload: {:?}: {} candidacies, {} provinces, {} municipalities",
        path,
        payload.candidacies.len(),
        payload.provinces.len(),
        payload.municipalities.len()
    );
    Ok(payload)
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub year: Option<JSValue>,
    #[serde(rename = "type", default)]
    pub election_type: Option<String>,
    #[serde(rename = "isMunicipales", default)]
    pub is_municipales: Option<bool>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryEntry {
    #[serde(default)]
    pub votes: u64,
    #[serde(default)]
    pub seats: u32,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitRecord {
    #[serde(default)]
    pub votes: BTreeMap<String, u64>,
    #[serde(default)]
    pub seats: BTreeMap<String, u32>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct MunicipalityRecord {
    #[serde(default)]
    pub prov: JSValue,
    #[serde(default)]
    pub votes: BTreeMap<String, u64>,
}

/// The content of a processed election file.
#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElectionPayload {
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub candidacies: BTreeMap<String, Candidacy>,
    #[serde(default)]
    pub summary: BTreeMap<String, SummaryEntry>,
    #[serde(default)]
    pub provinces: BTreeMap<String, UnitRecord>,
    #[serde(default)]
    pub municipalities: BTreeMap<String, MunicipalityRecord>,
}

impl ElectionPayload {
    /// The year of the metadata. A zero year counts as missing.
    pub fn year(&self) -> Option<u32> {
        self.metadata
            .year
            .as_ref()
            .and_then(read_js_u32)
            .filter(|y| *y > 0)
    }

    pub fn is_municipal(&self) -> bool {
        self.metadata.is_municipales.unwrap_or(false)
            || self.metadata.election_type.as_deref() == Some("04")
    }

    /// The national votes and seats per candidacy code.
    pub fn national_tally(&self) -> (Tally, HashMap<String, u32>) {
        let votes: Tally = self
            .summary
            .iter()
            .map(|(code, e)| (code.clone(), e.votes))
            .collect();
        let seats: HashMap<String, u32> = self
            .summary
            .iter()
            .filter(|(_, e)| e.seats > 0)
            .map(|(code, e)| (code.clone(), e.seats))
            .collect();
        (votes, seats)
    }

    pub fn candidacy_map(&self) -> HashMap<String, Candidacy> {
        self.candidacies
            .iter()
            .map(|(code, c)| (code.clone(), c.clone()))
            .collect()
    }

    pub fn province_tallies(&self) -> BTreeMap<String, ProvinceTally> {
        self.provinces
            .iter()
            .map(|(code, unit)| {
                (
                    code.clone(),
                    ProvinceTally {
                        votes: unit.votes.iter().map(|(c, v)| (c.clone(), *v)).collect(),
                        seats: unit.seats.iter().map(|(c, s)| (c.clone(), *s)).collect(),
                    },
                )
            })
            .collect()
    }

    /// The municipal tallies. Municipalities without a readable province are skipped.
    pub fn municipality_tallies(&self) -> BTreeMap<String, MunicipalityTally> {
        let mut res: BTreeMap<String, MunicipalityTally> = BTreeMap::new();
        for (code, m) in self.municipalities.iter() {
            match read_js_code(&m.prov) {
                Some(province) => {
                    res.insert(
                        code.clone(),
                        MunicipalityTally {
                            province,
                            votes: m.votes.iter().map(|(c, v)| (c.clone(), *v)).collect(),
                        },
                    );
                }
                None => {
                    warn!("municipality_tallies: no province for {:?}", code);
                }
            }
        }
        res
    }

    /// One historical record per candidacy of the national summary.
    pub fn history_records(&self, year: u32, month: u32, kind: &str) -> Vec<HistoryRecord> {
        self.summary
            .iter()
            .map(|(code, e)| HistoryRecord {
                year,
                month,
                election_type: kind.to_string(),
                party: self
                    .candidacies
                    .get(code)
                    .map(|c| c.label_or(code).to_string())
                    .unwrap_or_else(|| code.clone()),
                votes: e.votes,
                seats: e.seats,
            })
            .collect()
    }
}
