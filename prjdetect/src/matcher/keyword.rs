//! Correspondance par mot-clé à forte spécificité
//!
//! Un mot-clé n'est retenu que s'il désigne une seule entrée du catalogue.

use std::sync::OnceLock;

use tracing::debug;

use crate::catalog::{Catalog, CatalogEntry};
use crate::gauss_kruger::standard_central_meridians;

/// Mots-clés dans l'ordre de priorité
pub fn keywords() -> &'static [String] {
    static KEYWORDS: OnceLock<Vec<String>> = OnceLock::new();
    KEYWORDS.get_or_init(|| {
        let mut keywords: Vec<String> = [
            "CGCS2000",
            "XIAN_1980",
            "BEIJING_1954",
            "3_DEGREE_GK",
            "6_DEGREE_GK",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        keywords.extend(standard_central_meridians().map(|cm| format!("CM_{}E", cm)));
        keywords.push("WEB_MERCATOR".to_string());
        keywords.extend((43..=53).map(|zone| format!("UTM_ZONE_{}N", zone)));
        keywords
    })
}

/// Premier mot-clé présent dans le texte et désignant une entrée unique
pub fn find<'a>(catalog: &'a Catalog, normalized: &str) -> Option<(&'static str, &'a CatalogEntry)> {
    for keyword in keywords() {
        if !normalized.contains(keyword.as_str()) {
            continue;
        }

        let mut candidates = catalog
            .normalized_entries()
            .filter(|(name, _)| name.contains(keyword.as_str()))
            .map(|(_, entry)| entry);

        match (candidates.next(), candidates.next()) {
            (Some(entry), None) => return Some((keyword.as_str(), entry)),
            (Some(_), Some(_)) => {
                debug!(keyword = %keyword, "Ambiguous keyword, ignored");
            }
            _ => {}
        }
    }
    None
}
