use log::debug;

use crate::config::*;
use crate::tables::*;

/// Upper-cases, trims and strips the dots of a ballot label (`"p.r.c. "` becomes `"PRC"`).
pub fn clean_label(raw: &str) -> String {
    raw.trim().to_uppercase().replace('.', "")
}

fn canonical(id: &str, display: &str) -> CanonicalParty {
    CanonicalParty {
        id: id.to_string(),
        display: display.to_string(),
        color: party_color(id).to_string(),
        is_group_child: false,
    }
}

/// Resolves a ballot label to its canonical party.
///
/// This function never fails: a label that no rule knows about resolves to
/// itself (cleaned) with the default color. The result only depends on the
/// arguments.
pub fn resolve_party(raw: &str, context: &ResolutionContext) -> CanonicalParty {
    let up = raw.trim().to_uppercase();
    let cleaned = clean_label(raw);
    if cleaned.is_empty() {
        return canonical("OTHER", "?");
    }
    let year = context.year;

    // AP and the coalitions around it changed meaning over time.
    if is_ap_label(&cleaned) {
        let election_id = context.election_id.as_deref().unwrap_or("");
        let socialist_ballot = election_id == AP_SOCIALIST_ELECTION
            || (election_id.contains("municipales") && year == 2023);
        let res = if socialist_ballot {
            canonical("PSOE", "PSOE")
        } else if year == 0 || year < PP_FOUNDING_YEAR {
            canonical("AP", "AP")
        } else {
            // Not the historic AP: keep it away from the AP and PP series.
            CanonicalParty {
                id: AP_OTHER.to_string(),
                display: cleaned.clone(),
                color: DEFAULT_COLOR.to_string(),
                is_group_child: false,
            }
        };
        debug!("resolve_party: {:?} year {} -> {:?} (AP rule)", raw, year, res.id);
        return res;
    }

    // The PP did not exist before 1989. Earlier records under that name are AP.
    if (cleaned == "PP" || cleaned == "PARTIDO POPULAR") && year > 0 && year < PP_FOUNDING_YEAR {
        debug!("resolve_party: {:?} year {} -> AP (pre-1989 PP)", raw, year);
        return canonical("AP", "AP");
    }

    for rule in PARTY_RULES.iter() {
        let res = match rule {
            PartyRule::Pattern { regex, id, display } if regex.is_match(&cleaned) => {
                match group_parent(&up).or_else(|| group_parent(&cleaned)) {
                    // A listed alliance that also matches its parent's pattern keeps its name.
                    Some(parent) if parent == *id => group_child(parent, &cleaned),
                    _ => canonical(id, display),
                }
            }
            PartyRule::Alias { spelling, id } if *spelling == cleaned || *spelling == up => {
                canonical(id, id)
            }
            PartyRule::Group {
                ballot_name,
                parent,
            } if *ballot_name == cleaned || *ballot_name == up => group_child(parent, &cleaned),
            _ => continue,
        };
        debug!("resolve_party: {:?} -> {:?} via {:?}", raw, res.id, rule_tag(rule));
        return res;
    }

    debug!("resolve_party: {:?} unmatched", raw);
    canonical(&cleaned, &cleaned)
}

fn group_child(parent: &str, cleaned: &str) -> CanonicalParty {
    CanonicalParty {
        id: parent.to_string(),
        display: cleaned.to_string(),
        color: party_color(parent).to_string(),
        is_group_child: true,
    }
}

fn rule_tag(rule: &PartyRule) -> &'static str {
    match rule {
        PartyRule::Pattern { .. } => "pattern",
        PartyRule::Alias { .. } => "alias",
        PartyRule::Group { .. } => "group",
    }
}

/// Color and label of a ballot label, resolved without context.
pub fn party_info(raw: &str) -> PartyInfo {
    let party = resolve_party(raw, &ResolutionContext::default());
    let siglas = if party.display.is_empty() {
        raw.to_string()
    } else {
        party.display
    };
    PartyInfo {
        id: party.id,
        siglas,
        color: party.color,
    }
}
