//! Correspondance exacte sur le nom canonique

use std::sync::OnceLock;

use regex::Regex;

use crate::catalog::{Catalog, CatalogEntry};

fn root_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"^(?:PROJCS|PROJCRS|GEOGCS|GEOGCRS|GEODCRS)\s*\[\s*"([^"]*)""#)
            .expect("valid root name regex")
    })
}

/// Nom du nœud racine d'un WKT normalisé (`PROJCS["..."`)
pub fn root_name(normalized: &str) -> Option<&str> {
    root_name_pattern()
        .captures(normalized)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|name| !name.is_empty())
}

/// Cherche une entrée dont le nom normalisé est identique au texte entier,
/// puis au nom du nœud racine.
pub fn find<'a>(catalog: &'a Catalog, normalized: &str) -> Option<&'a CatalogEntry> {
    catalog
        .get_by_normalized(normalized)
        .or_else(|| root_name(normalized).and_then(|name| catalog.get_by_normalized(name)))
}
