//! Extraction des codes EPSG

use std::sync::OnceLock;

use regex::Regex;

fn epsg_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // EPSG:4527 / EPSG 4527 / AUTHORITY["EPSG","4527"] / ID["EPSG",4527]
        Regex::new(
            r#"(?i)EPSG\s*[:\s]\s*(\d+)|AUTHORITY\[\s*"EPSG"\s*,\s*"?(\d+)"?\s*\]|\bID\[\s*"EPSG"\s*,\s*"?(\d+)"?"#,
        )
        .expect("valid EPSG regex")
    })
}

fn projected_root_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s*(?:PROJCS|PROJCRS)\s*\[").expect("valid root node regex"))
}

/// Le nœud racine du WKT est-il un système projeté ?
pub fn is_projected_root(normalized: &str) -> bool {
    projected_root_pattern().is_match(normalized)
}

/// Tous les codes EPSG du texte, dans l'ordre d'apparition
pub fn extract_codes(text: &str) -> Vec<u32> {
    epsg_pattern()
        .captures_iter(text)
        .filter_map(|caps| {
            caps.iter()
                .skip(1)
                .flatten()
                .next()
                .and_then(|m| m.as_str().parse::<u32>().ok())
        })
        .collect()
}
