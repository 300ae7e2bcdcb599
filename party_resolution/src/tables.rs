/*!
Static party configuration.

All the tables are read-only and built once, the first time they are used.
The resolution order lives in [`PARTY_RULES`]: one list, evaluated top to bottom,
first match wins. Coalition patterns sit above the general pattern of their
parent party; moving them down would fold the coalition into the parent.
*/

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_COLOR: &str = "#64748B";

/// The bucket for AP-like labels seen after the 1989 merger. Never merged with AP.
pub const AP_OTHER: &str = "AP-OTHER";

/// In the May 2023 municipal elections the "AP" ballot line in Catalonia
/// belonged to the socialist lists.
pub const AP_SOCIALIST_ELECTION: &str = "municipales_2023_05";

/// Alianza Popular became the Partido Popular in 1989.
pub const PP_FOUNDING_YEAR: u32 = 1989;

pub const COLORS: &[(&str, &str)] = &[
    ("PSOE", "#DB1A15"),
    ("PP", "#0055A7"),
    ("VOX", "#63BE21"),
    ("SUMAR", "#E14E86"),
    ("PODEMOS", "#6B2E68"),
    ("IU", "#9F1E1A"),
    ("ERC", "#FFB232"),
    ("JUNTS", "#00C3B2"),
    ("BILDU", "#B4D435"),
    ("PNV", "#008000"),
    ("BNG", "#76B8E6"),
    ("CC", "#FFD700"),
    ("CCA", "#E6C200"),
    ("UPN", "#003366"),
    ("NA+", "#1A4D80"),
    ("CS", "#EB6109"),
    ("ADELANTE", "#34E081"),
    ("PACMA", "#C6E52D"),
    ("UCD", "#007A33"),
    ("CDS", "#2E8B57"),
    ("AP", "#0066CC"),
    ("PCE", "#9F1E1A"),
    // Podemos coalitions share the purple
    ("ECP", "#6B2E68"),
    ("EN COMÚ PODEM", "#6B2E68"),
    ("EN MAREA", "#6B2E68"),
    ("CIU", "#003057"),
    ("CDC", "#003057"),
    ("DIL", "#003057"),
    ("COMPROMIS", "#FF6600"),
    ("PRC", "#1A5C1A"),
    ("TERUEL EXISTE", "#2D4A2D"),
    ("UPYD", "#E556A1"),
    ("CUP", "#FFCC00"),
    ("MAS PAIS", "#00A95C"),
];

/// Parties listed first in trend pickers, in this order.
pub const PRIORITY_PARTIES: &[&str] = &[
    "PP", "PSOE", "VOX", "PODEMOS", "SUMAR", "IU", "AP", "UCD", "CS", "ERC", "JUNTS", "PNV",
    "BILDU",
];

/// Labels of Alianza Popular and the 1980s right-of-center coalitions built around it.
/// Hyphenated compounds with an "AP" segment (AP-PDP, PDP-AP) count as well.
pub const AP_LABELS: &[&str] = &[
    "AP",
    "ALIANZA POPULAR",
    "CP",
    "CD",
    "COALICIÓN POPULAR",
    "COALICION POPULAR",
    "COALICIÓN DEMOCRÁTICA",
    "COALICION DEMOCRATICA",
];

/// (pattern, id, display). A plain list of alternatives is matched as a whole
/// token; see [`token_pattern`].
const PATTERNS: &[(PatternKind, &str, &str, &str)] = &[
    (PatternKind::Token, "PSOE|PSE|PSC", "PSOE", "PSOE"),
    (PatternKind::Token, "PP", "PP", "PP"),
    // Sumar only. Compromís and Más País stay apart.
    (PatternKind::Token, "SUMAR|SUMAR-MÉS", "SUMAR", "Sumar"),
    // Podemos coalitions, above the general Podemos rule.
    (
        PatternKind::Raw,
        r"PODEMOS-EN MAREA|EN MAREA|PODEMOS-EN(?:\s|$)",
        "EN MAREA",
        "En Marea",
    ),
    (
        PatternKind::Raw,
        r"EN COMÚ PODEM|EN COMÚ|ECP-GUANYEM|^ECP$",
        "ECP",
        "En Comú Podem",
    ),
    (
        PatternKind::Raw,
        r"A LA VALENCIANA|COMPROMÍS-PODEMOS-EUPV",
        "PODEMOS",
        "Podemos",
    ),
    (
        PatternKind::Raw,
        r"ÉS EL MOMENT|ES EL MOMENT|COMPROMÍS-PODEMOS|PODEMOS-COM|PODEMOS - C",
        "PODEMOS",
        "Podemos",
    ),
    (PatternKind::Token, "PODEMOS|UNIDAS PODEMOS", "PODEMOS", "Podemos"),
    (PatternKind::Token, "ERC|ESQUERRA", "ERC", "ERC"),
    // Junts proper (2019 on). CiU and CDC are distinct parties.
    (PatternKind::Token, "JUNTS|JXCAT|JUNTS PER CATALUNYA", "JUNTS", "Junts"),
    (
        PatternKind::Token,
        "CIU|CONVERGÈNCIA I UNIÓ|CONVERGENCIA I UNIO",
        "CIU",
        "CiU",
    ),
    (PatternKind::Token, "CDC|CONVERGÈNCIA", "CDC", "CDC"),
    (PatternKind::Token, "EH BILDU|BILDU", "BILDU", "EH Bildu"),
    (PatternKind::Token, "EAJ|PNV", "PNV", "PNV"),
    (PatternKind::Token, "BNG", "BNG", "BNG"),
    (PatternKind::Token, "VOX", "VOX", "Vox"),
    (PatternKind::Token, "CS|CIUDADANOS|C'S", "CS", "Cs"),
    (PatternKind::Token, "IU|IZQUIERDA UNIDA|IU-UPEC", "IU", "IU"),
    (PatternKind::Token, "COMPROMÍS|COMPROMIS", "COMPROMIS", "Compromís"),
    (PatternKind::Token, "MÁS PAÍS|MAS PAIS", "MAS PAIS", "Más País"),
    (PatternKind::Token, "UPYD", "UPYD", "UPyD"),
    (PatternKind::Token, "CUP", "CUP", "CUP"),
    // Navarra Suma is not PP.
    (PatternKind::Token, r"NA\+|NAVARRA SUMA", "NA+", "NA+"),
    (
        PatternKind::Token,
        "PRC|PARTIDO REGIONALISTA DE CANTABRIA",
        "PRC",
        "PRC",
    ),
    (PatternKind::Token, "TERUEL EXISTE", "TERUEL EXISTE", "Teruel Existe"),
    (PatternKind::Token, "CCA|CC|COALICIÓN CANARIA", "CCA", "CC"),
    (
        PatternKind::Token,
        "UCD|UNIÓN DE CENTRO DEMOCRÁTICO",
        "UCD",
        "UCD",
    ),
];

/// Exact spellings, checked after the patterns. Only spellings that no pattern
/// catches belong here. Alliances that ran as their own list must stay distinct.
pub const ALIASES: &[(&str, &str)] = &[
    ("PARTIDO POPULAR", "PP"),
    ("PARTIDO SOCIALISTA OBRERO ESPAÑOL", "PSOE"),
    ("IULV-CA", "IU"),
    ("EUPV", "IU"),
    ("EU-EG", "IU"),
    ("IC-EV", "IU"),
    ("EV-IB", "IU"),
    ("IUCL", "IU"),
    ("IUCLM-IV", "IU"),
    ("EU-V", "IU"),
    ("IUC", "IU"),
    ("ICV-EUIA", "IU"),
    ("ICV", "IU"),
    ("EUIA", "IU"),
    ("AM", "ERC"),
    ("ADELANTE ANDALUCÍA", "ADELANTE"),
    ("UNION DEL PUEBLO NAVARRO", "UPN"),
    ("UNIÓN DEL PUEBLO NAVARRO", "UPN"),
    ("U.P.N.", "UPN"),
    ("DL", "DIL"),
    ("UNIÓN PROGRESO Y DEMOCRACIA", "UPYD"),
];

/// Regional ballot alliances colored like their parent. They keep their own name.
pub const GROUPS: &[(&str, &str)] = &[("PP-FORO", "PP"), ("PP-PAR", "PP"), ("PP-EU", "PP")];

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum PatternKind {
    /// Alternatives matched as a whole token.
    Token,
    /// Used as is.
    Raw,
}

/// Wraps a list of alternatives so that it only matches a whole token: bounded by
/// the ends of the label, whitespace, a hyphen or a word boundary.
/// `PSOE-A` matches `PSOE`, `PSOEX` does not.
pub fn token_pattern(alternatives: &str) -> String {
    format!(r"(?i)(?:^|\b|[\s\-])({})(?:$|\b|[\s\-])", alternatives)
}

/// One entry of the resolution dispatch list.
#[derive(Debug, Clone)]
pub enum PartyRule {
    /// Regular expression tested against the cleaned label.
    Pattern {
        regex: Regex,
        id: &'static str,
        display: &'static str,
    },
    /// Exact spelling. The display label is the canonical id.
    Alias {
        spelling: &'static str,
        id: &'static str,
    },
    /// Exact ballot name that borrows the color of `parent`.
    Group {
        ballot_name: &'static str,
        parent: &'static str,
    },
}

lazy_static! {
    /// Patterns first, then aliases, then groups.
    pub static ref PARTY_RULES: Vec<PartyRule> = {
        let mut rules: Vec<PartyRule> = Vec::new();
        for &(kind, pattern, id, display) in PATTERNS.iter() {
            let source = match kind {
                PatternKind::Token => token_pattern(pattern),
                PatternKind::Raw => format!("(?i){}", pattern),
            };
            rules.push(PartyRule::Pattern {
                regex: Regex::new(&source).unwrap(),
                id,
                display,
            });
        }
        for &(spelling, id) in ALIASES.iter() {
            rules.push(PartyRule::Alias { spelling, id });
        }
        for &(ballot_name, parent) in GROUPS.iter() {
            rules.push(PartyRule::Group { ballot_name, parent });
        }
        rules
    };

    static ref COLOR_TABLE: BTreeMap<&'static str, &'static str> =
        COLORS.iter().cloned().collect();
}

/// The color of a canonical id, or the neutral default.
pub fn party_color(id: &str) -> &'static str {
    COLOR_TABLE.get(id).cloned().unwrap_or(DEFAULT_COLOR)
}

/// The parent of a group ballot name, if listed.
pub fn group_parent(ballot_name: &str) -> Option<&'static str> {
    GROUPS
        .iter()
        .find(|(name, _)| *name == ballot_name)
        .map(|(_, parent)| *parent)
}

/// True for Alianza Popular and its coalition labels, including hyphenated
/// compounds with an "AP" segment.
pub fn is_ap_label(cleaned: &str) -> bool {
    AP_LABELS.contains(&cleaned)
        || (cleaned.contains('-') && cleaned.split('-').any(|part| part.trim() == "AP"))
}

/// Splits a list of canonical ids into the priority parties present, in priority
/// order, and the rest, in input order.
pub fn split_priority(parties: &[String]) -> (Vec<String>, Vec<String>) {
    let priority: Vec<String> = PRIORITY_PARTIES
        .iter()
        .filter(|p| parties.iter().any(|x| x.as_str() == **p))
        .map(|p| p.to_string())
        .collect();
    let others: Vec<String> = parties
        .iter()
        .filter(|p| !PRIORITY_PARTIES.contains(&p.as_str()))
        .cloned()
        .collect();
    (priority, others)
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PatternRule {
    pub pattern: String,
    pub id: String,
    pub display: String,
}

/// The configuration as shipped to front ends.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PartyConfig {
    pub colors: BTreeMap<String, String>,
    pub priority: Vec<String>,
    pub rules: Vec<PatternRule>,
    pub aliases: BTreeMap<String, String>,
    pub groups: BTreeMap<String, String>,
}

impl PartyConfig {
    pub fn current() -> PartyConfig {
        let mut colors: BTreeMap<String, String> = COLORS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        colors.insert("DEFAULT".to_string(), DEFAULT_COLOR.to_string());
        let rules = PARTY_RULES
            .iter()
            .filter_map(|r| match r {
                PartyRule::Pattern { regex, id, display } => Some(PatternRule {
                    pattern: regex.as_str().to_string(),
                    id: id.to_string(),
                    display: display.to_string(),
                }),
                _ => None,
            })
            .collect();
        PartyConfig {
            colors,
            priority: PRIORITY_PARTIES.iter().map(|p| p.to_string()).collect(),
            rules,
            aliases: ALIASES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            groups: GROUPS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}
