/*!
Autonomous communities (CCAA) and provinces, with INE numbering, and the
aggregation of province and municipality tallies into communities.

Rows are keyed by canonical id here, not by display label: a regional view
groups `PP` and its regional alliances together.
*/

use log::{debug, info, warn};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::config::*;
use crate::resolve::resolve_party;
use crate::Tally;

pub const COMMUNITIES: &[(&str, &str)] = &[
    ("01", "Andalucía"),
    ("02", "Aragón"),
    ("03", "Asturias"),
    ("04", "Baleares"),
    ("05", "Canarias"),
    ("06", "Cantabria"),
    ("07", "Castilla y León"),
    ("08", "Castilla-La Mancha"),
    ("09", "Cataluña"),
    ("10", "C. Valenciana"),
    ("11", "Extremadura"),
    ("12", "Galicia"),
    ("13", "Madrid"),
    ("14", "Murcia"),
    ("15", "Navarra"),
    ("16", "País Vasco"),
    ("17", "La Rioja"),
    ("18", "Ceuta"),
    ("19", "Melilla"),
];

/// (province code, name, community code)
pub const PROVINCES: &[(&str, &str, &str)] = &[
    ("01", "Álava", "16"),
    ("02", "Albacete", "08"),
    ("03", "Alicante", "10"),
    ("04", "Almería", "01"),
    ("05", "Ávila", "07"),
    ("06", "Badajoz", "11"),
    ("07", "Baleares", "04"),
    ("08", "Barcelona", "09"),
    ("09", "Burgos", "07"),
    ("10", "Cáceres", "11"),
    ("11", "Cádiz", "01"),
    ("12", "Castellón", "10"),
    ("13", "Ciudad Real", "08"),
    ("14", "Córdoba", "01"),
    ("15", "Coruña", "12"),
    ("16", "Cuenca", "08"),
    ("17", "Gerona", "09"),
    ("18", "Granada", "01"),
    ("19", "Guadalajara", "08"),
    ("20", "Guipúzcoa", "16"),
    ("21", "Huelva", "01"),
    ("22", "Huesca", "02"),
    ("23", "Jaén", "01"),
    ("24", "León", "07"),
    ("25", "Lérida", "09"),
    ("26", "La Rioja", "17"),
    ("27", "Lugo", "12"),
    ("28", "Madrid", "13"),
    ("29", "Málaga", "01"),
    ("30", "Murcia", "14"),
    ("31", "Navarra", "15"),
    ("32", "Orense", "12"),
    ("33", "Asturias", "03"),
    ("34", "Palencia", "07"),
    ("35", "Las Palmas", "05"),
    ("36", "Pontevedra", "12"),
    ("37", "Salamanca", "07"),
    ("38", "S.C. Tenerife", "05"),
    ("39", "Cantabria", "06"),
    ("40", "Segovia", "07"),
    ("41", "Sevilla", "01"),
    ("42", "Soria", "07"),
    ("43", "Tarragona", "09"),
    ("44", "Teruel", "02"),
    ("45", "Toledo", "08"),
    ("46", "Valencia", "10"),
    ("47", "Valladolid", "07"),
    ("48", "Vizcaya", "16"),
    ("49", "Zamora", "07"),
    ("50", "Zaragoza", "02"),
    ("51", "Ceuta", "18"),
    ("52", "Melilla", "19"),
];

/// The tallies of one province.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ProvinceTally {
    pub votes: Tally,
    pub seats: HashMap<String, u32>,
}

/// The tallies of one municipality.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct MunicipalityTally {
    /// Province code, possibly without its leading zero ("8" for Barcelona).
    pub province: String,
    pub votes: Tally,
}

/// Pads numeric codes to two digits.
pub fn normalize_code(code: &str) -> String {
    let code = code.trim();
    if code.len() == 1 {
        format!("0{}", code)
    } else {
        code.to_string()
    }
}

pub fn community_name(code: &str) -> Option<&'static str> {
    let code = normalize_code(code);
    COMMUNITIES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

pub fn province_name(code: &str) -> Option<&'static str> {
    let code = normalize_code(code);
    PROVINCES
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|(_, name, _)| *name)
}

/// The community a province belongs to.
pub fn community_of_province(code: &str) -> Option<&'static str> {
    let code = normalize_code(code);
    PROVINCES
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|(_, _, ccaa)| *ccaa)
}

/// Running totals of one community, keyed by canonical id.
struct RegionAccumulator {
    rows: Vec<AggregatedResult>,
    index: HashMap<String, usize>,
    // (row, code) pairs already listed in `source_codes`.
    sources: HashSet<(usize, String)>,
}

impl RegionAccumulator {
    fn new() -> RegionAccumulator {
        RegionAccumulator {
            rows: Vec::new(),
            index: HashMap::new(),
            sources: HashSet::new(),
        }
    }

    fn row_index(&mut self, party: &CanonicalParty) -> usize {
        match self.index.get(&party.id) {
            Some(idx) => *idx,
            None => {
                // Alliances are shown under their parent's key.
                let display = if party.is_group_child {
                    party.id.clone()
                } else {
                    party.display.clone()
                };
                self.rows.push(AggregatedResult {
                    canonical_id: party.id.clone(),
                    display,
                    color: party.color.clone(),
                    votes: 0,
                    seats: 0,
                    source_codes: Vec::new(),
                });
                self.index.insert(party.id.clone(), self.rows.len() - 1);
                self.rows.len() - 1
            }
        }
    }

    fn add(&mut self, party: &CanonicalParty, code: &str, votes: u64, seats: u32) {
        let idx = self.row_index(party);
        let row = &mut self.rows[idx];
        row.votes += votes;
        row.seats += seats;
        if self.sources.insert((idx, code.to_string())) {
            row.source_codes.push(code.to_string());
        }
    }

    fn finish(mut self, code: &str) -> RegionResult {
        self.rows.sort_by(|a, b| b.votes.cmp(&a.votes));
        RegionResult {
            code: code.to_string(),
            name: community_name(code).unwrap_or(code).to_string(),
            total_votes: self.rows.iter().map(|r| r.votes).sum(),
            total_seats: self.rows.iter().map(|r| r.seats).sum(),
            parties: self.rows,
        }
    }
}

fn resolve_code(
    code: &str,
    candidacies: &HashMap<String, Candidacy>,
    context: &ResolutionContext,
) -> CanonicalParty {
    let siglas = candidacies
        .get(code)
        .map(|c| c.label_or(code))
        .unwrap_or(code);
    resolve_party(siglas, context)
}

/// Sums province tallies into their communities.
///
/// Provinces with an unknown code are skipped. The regions are sorted by code.
pub fn aggregate_by_region(
    provinces: &BTreeMap<String, ProvinceTally>,
    candidacies: &HashMap<String, Candidacy>,
    context: &ResolutionContext,
) -> Vec<RegionResult> {
    info!("Aggregating {} provinces by community", provinces.len());
    let mut regions: BTreeMap<&'static str, RegionAccumulator> = BTreeMap::new();
    for (prov_code, tally) in provinces.iter() {
        let ccaa = match community_of_province(prov_code) {
            Some(x) => x,
            None => {
                warn!("aggregate_by_region: unknown province {:?}, skipping", prov_code);
                continue;
            }
        };
        let acc = regions.entry(ccaa).or_insert_with(RegionAccumulator::new);
        for (code, votes) in tally.votes.iter() {
            let party = resolve_code(code, candidacies, context);
            let seats = tally.seats.get(code).cloned().unwrap_or(0);
            acc.add(&party, code, *votes, seats);
        }
        let voted: HashSet<&str> = tally.votes.iter().map(|(c, _)| c.as_str()).collect();
        let mut seat_only: Vec<(&String, &u32)> = tally
            .seats
            .iter()
            .filter(|(code, seats)| **seats > 0 && !voted.contains(code.as_str()))
            .collect();
        seat_only.sort();
        for (code, seats) in seat_only {
            let party = resolve_code(code, candidacies, context);
            acc.add(&party, code, 0, *seats);
        }
    }
    regions
        .into_iter()
        .map(|(code, acc)| acc.finish(code))
        .collect()
}

/// Sums municipality tallies into their communities.
///
/// Every municipality adds its votes, and its most voted candidacy is counted as
/// one seat (the mayoralty) for the region. Municipalities without votes or with
/// an unknown province are skipped.
pub fn aggregate_municipalities_by_region(
    municipalities: &BTreeMap<String, MunicipalityTally>,
    candidacies: &HashMap<String, Candidacy>,
    context: &ResolutionContext,
) -> Vec<RegionResult> {
    info!(
        "Aggregating {} municipalities by community",
        municipalities.len()
    );
    let mut regions: BTreeMap<&'static str, RegionAccumulator> = BTreeMap::new();
    for (mun_id, mun) in municipalities.iter() {
        if mun.votes.is_empty() {
            debug!("aggregate_municipalities_by_region: {} has no votes", mun_id);
            continue;
        }
        let ccaa = match community_of_province(&mun.province) {
            Some(x) => x,
            None => {
                warn!(
                    "aggregate_municipalities_by_region: {} has unknown province {:?}, skipping",
                    mun_id, mun.province
                );
                continue;
            }
        };
        // First one wins among ties.
        let mut winner: &(String, u64) = &mun.votes[0];
        for entry in mun.votes.iter() {
            if entry.1 > winner.1 {
                winner = entry;
            }
        }
        let acc = regions.entry(ccaa).or_insert_with(RegionAccumulator::new);
        for (code, votes) in mun.votes.iter() {
            let party = resolve_code(code, candidacies, context);
            let seats = if *code == winner.0 { 1 } else { 0 };
            acc.add(&party, code, *votes, seats);
        }
    }
    regions
        .into_iter()
        .map(|(code, acc)| acc.finish(code))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(entries: &[(&str, u64)]) -> Tally {
        entries.iter().map(|(c, v)| (c.to_string(), *v)).collect()
    }

    fn meta() -> HashMap<String, Candidacy> {
        [
            ("1", "PSOE"),
            ("2", "PSC"),
            ("3", "PP"),
            ("4", "PP-FORO"),
            ("5", "ERC"),
        ]
        .iter()
        .map(|(c, s)| (c.to_string(), Candidacy::new(s)))
        .collect()
    }

    #[test]
    fn lookups() {
        assert_eq!(community_name("9"), Some("Cataluña"));
        assert_eq!(province_name("08"), Some("Barcelona"));
        assert_eq!(community_of_province("8"), Some("09"));
        assert_eq!(community_of_province("33"), Some("03"));
        assert_eq!(community_of_province("99"), None);
        assert_eq!(PROVINCES.len(), 52);
        assert_eq!(COMMUNITIES.len(), 19);
        for (_, _, ccaa) in PROVINCES.iter() {
            assert!(community_name(ccaa).is_some());
        }
    }

    #[test]
    fn provinces_sum_into_communities() {
        let mut provinces: BTreeMap<String, ProvinceTally> = BTreeMap::new();
        provinces.insert(
            "08".to_string(),
            ProvinceTally {
                votes: tally(&[("2", 500), ("5", 400), ("3", 100)]),
                seats: [("2", 3), ("5", 2)]
                    .iter()
                    .map(|(c, s)| (c.to_string(), *s))
                    .collect(),
            },
        );
        provinces.insert(
            "17".to_string(),
            ProvinceTally {
                votes: tally(&[("2", 50), ("5", 200)]),
                seats: [("5", 1)].iter().map(|(c, s)| (c.to_string(), *s)).collect(),
            },
        );
        provinces.insert(
            "33".to_string(),
            ProvinceTally {
                votes: tally(&[("4", 300), ("1", 250)]),
                seats: [("4", 2), ("1", 1), ("3", 1)]
                    .iter()
                    .map(|(c, s)| (c.to_string(), *s))
                    .collect(),
            },
        );
        provinces.insert("77".to_string(), ProvinceTally::default());

        let res = aggregate_by_region(&provinces, &meta(), &ResolutionContext::default());
        assert_eq!(res.len(), 2);

        let asturias = &res[0];
        assert_eq!(asturias.code, "03");
        assert_eq!(asturias.name, "Asturias");
        // PP-FORO and PP share the PP key here.
        assert_eq!(asturias.parties[0].canonical_id, "PP");
        assert_eq!(asturias.parties[0].display, "PP");
        assert_eq!(asturias.parties[0].votes, 300);
        assert_eq!(asturias.parties[0].seats, 3);
        assert_eq!(asturias.total_seats, 4);

        let catalonia = &res[1];
        assert_eq!(catalonia.code, "09");
        assert_eq!(catalonia.total_votes, 1250);
        assert_eq!(catalonia.total_seats, 6);
        assert_eq!(catalonia.parties[0].canonical_id, "ERC");
        assert_eq!(catalonia.parties[0].votes, 600);
        assert_eq!(catalonia.parties[1].canonical_id, "PSOE");
        assert_eq!(catalonia.parties[1].votes, 550);
        assert_eq!(catalonia.parties[1].seats, 3);
    }

    #[test]
    fn mayoralties_by_community() {
        let mut municipalities: BTreeMap<String, MunicipalityTally> = BTreeMap::new();
        municipalities.insert(
            "08001".to_string(),
            MunicipalityTally {
                province: "8".to_string(),
                votes: tally(&[("2", 10), ("5", 30)]),
            },
        );
        municipalities.insert(
            "08002".to_string(),
            MunicipalityTally {
                province: "08".to_string(),
                votes: tally(&[("2", 20), ("5", 20)]),
            },
        );
        municipalities.insert(
            "08003".to_string(),
            MunicipalityTally {
                province: "08".to_string(),
                votes: Vec::new(),
            },
        );
        let res = aggregate_municipalities_by_region(
            &municipalities,
            &meta(),
            &ResolutionContext::for_election("municipales_2019_05", 2019),
        );
        assert_eq!(res.len(), 1);
        let catalonia = &res[0];
        assert_eq!(catalonia.total_seats, 2);
        assert_eq!(catalonia.total_votes, 80);
        let erc = catalonia
            .parties
            .iter()
            .find(|p| p.canonical_id == "ERC")
            .unwrap();
        assert_eq!(erc.seats, 1);
        assert_eq!(erc.votes, 50);
        let psoe = catalonia
            .parties
            .iter()
            .find(|p| p.canonical_id == "PSOE")
            .unwrap();
        assert_eq!(psoe.seats, 1);
    }
}
