// ********* Input data structures ***********

use serde::{Deserialize, Serialize};

/// Elections and records without a known month are placed in June.
pub const DEFAULT_MONTH: u32 = 6;

/// The temporal context in which a ballot label is read.
///
/// Some historic acronyms changed meaning over time, and one code means
/// something unrelated in a single municipal election. When nothing is known,
/// use `ResolutionContext::default()`: the year is then treated as unknown.
#[derive(Eq, PartialEq, Debug, Clone, Default, Hash)]
pub struct ResolutionContext {
    /// 0 when unknown.
    pub year: u32,
    pub election_id: Option<String>,
}

impl ResolutionContext {
    pub fn for_year(year: u32) -> ResolutionContext {
        ResolutionContext {
            year,
            election_id: None,
        }
    }

    pub fn for_election(election_id: &str, year: u32) -> ResolutionContext {
        ResolutionContext {
            year,
            election_id: Some(election_id.to_string()),
        }
    }
}

/// Metadata attached to a candidacy code in the source data.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Candidacy {
    /// The label printed on the ballot (e.g. "P.P.", "PSOE-A"). May be missing.
    #[serde(default)]
    pub siglas: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl Candidacy {
    pub fn new(siglas: &str) -> Candidacy {
        Candidacy {
            siglas: siglas.to_string(),
            name: None,
        }
    }

    /// The ballot label, or `code` when the source data has none.
    pub fn label_or<'a>(&'a self, code: &'a str) -> &'a str {
        if self.siglas.trim().is_empty() {
            code
        } else {
            self.siglas.as_str()
        }
    }
}

/// One row of the historical feed: the result of one ballot label in one election.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub year: u32,
    pub month: u32,
    #[serde(rename = "electionType")]
    pub election_type: String,
    pub party: String,
    pub votes: u64,
    pub seats: u32,
}

/// The identity of an election, as encoded in the processed data file names
/// (`congreso_2019_11`, `municipales_2023_05`, `congreso_1982`).
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ElectionDescriptor {
    pub id: String,
    pub kind: String,
    pub year: u32,
    pub month: Option<u32>,
}

impl ElectionDescriptor {
    /// Parses an election id. Returns None if the year is missing or not a number.
    pub fn parse(id: &str) -> Option<ElectionDescriptor> {
        let mut parts = id.split('_');
        let kind = parts.next().filter(|k| !k.is_empty())?;
        let year = parts.next()?.parse::<u32>().ok()?;
        let month = parts
            .next()
            .and_then(|m| m.parse::<u32>().ok())
            .filter(|m| (1..=12).contains(m));
        Some(ElectionDescriptor {
            id: id.to_string(),
            kind: kind.to_string(),
            year,
            month,
        })
    }

    pub fn is_municipal(&self) -> bool {
        self.kind == "municipales"
    }

    /// The month used to place the election on a time axis.
    pub fn month_or_default(&self) -> u32 {
        self.month.unwrap_or(DEFAULT_MONTH)
    }

    pub fn context(&self) -> ResolutionContext {
        ResolutionContext::for_election(&self.id, self.year)
    }
}

// ******** Output data structures *********

/// The stable identity a ballot label resolves to.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalParty {
    /// The aggregation key, stable across regions and years (e.g. "PSOE").
    pub id: String,
    /// The label shown to users.
    pub display: String,
    /// Hex color, `#RRGGBB`.
    pub color: String,
    /// True for coalitions that borrow a parent's color but keep their own name.
    #[serde(rename = "isGroupChild")]
    pub is_group_child: bool,
}

/// Lightweight color-and-label view of a resolved party.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PartyInfo {
    pub id: String,
    pub siglas: String,
    pub color: String,
}

/// One merged row of an aggregation.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedResult {
    #[serde(rename = "canonicalId")]
    pub canonical_id: String,
    pub display: String,
    pub color: String,
    pub votes: u64,
    pub seats: u32,
    /// The raw candidacy codes merged into this row, in input order.
    #[serde(rename = "sourceCodes")]
    pub source_codes: Vec<String>,
}

/// The totals of one autonomous community.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RegionResult {
    /// CCAA code, "01" to "19".
    pub code: String,
    pub name: String,
    #[serde(rename = "totalVotes")]
    pub total_votes: u64,
    #[serde(rename = "totalSeats")]
    pub total_seats: u32,
    /// Keyed by canonical id, sorted by descending votes.
    pub parties: Vec<AggregatedResult>,
}

/// One point of a party's historical series.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// Fractional year: `year + (month - 1) / 12`.
    pub time: f64,
    pub year: u32,
    pub month: u32,
    #[serde(rename = "electionType")]
    pub election_type: String,
    pub party: String,
    pub display: String,
    pub color: String,
    pub votes: u64,
    pub seats: u32,
    /// Share of all the votes counted at this time, in percent.
    pub pct: f64,
}
