use std::path::Path;

/// The election id encoded in a processed file name: `data/congreso_2019_11.json` is `congreso_2019_11`.
pub fn election_id_from_path(path: &str) -> Option<String> {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
        .filter(|s| !s.is_empty())
}

/// Reads a number that may have been written as a JSON number or as a string.
pub fn read_js_u32(js: &serde_json::Value) -> Option<u32> {
    match js {
        serde_json::Value::Number(n) => n.as_u64().and_then(|x| u32::try_from(x).ok()),
        serde_json::Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

/// Reads a code that may have been written as a JSON number or as a string.
pub fn read_js_code(js: &serde_json::Value) -> Option<String> {
    match js {
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_from_paths() {
        assert_eq!(
            election_id_from_path("data/processed/congreso_2019_11.json"),
            Some("congreso_2019_11".to_string())
        );
        assert_eq!(
            election_id_from_path("municipales_2023_05.json"),
            Some("municipales_2023_05".to_string())
        );
        assert_eq!(election_id_from_path(""), None);
    }

    #[test]
    fn loose_numbers() {
        assert_eq!(read_js_u32(&json!(2019)), Some(2019));
        assert_eq!(read_js_u32(&json!("1982")), Some(1982));
        assert_eq!(read_js_u32(&json!("x")), None);
        assert_eq!(read_js_u32(&json!(-3)), None);
        assert_eq!(read_js_code(&json!(8)), Some("8".to_string()));
        assert_eq!(read_js_code(&json!("08")), Some("08".to_string()));
        assert_eq!(read_js_code(&json!(null)), None);
    }
}
