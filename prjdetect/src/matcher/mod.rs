//! Détection multi-stratégie de la projection d'un texte PRJ
//!
//! Stratégies, dans l'ordre (la première qui aboutit l'emporte) :
//! 1. code EPSG connu du catalogue
//! 2. nom canonique exact
//! 3. mot-clé désignant une seule entrée
//! 4. motif structurel (fuseau / méridien central)
//! 5. paramètres WKT bruts
//!
//! Le détecteur ne renvoie jamais d'erreur : une entrée illisible se dégrade
//! vers une stratégie plus faible, puis `None`.

pub mod epsg;
pub mod exact;
pub mod keyword;
pub mod params;
pub mod pattern;

use std::sync::Arc;

use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::normalize::normalize_prj;
use crate::proj_string::ProjectionKind;
use crate::types::{DetectionResult, ProjectionDefinition, SourceMethod};

/// Détecteur de projection, construit autour d'un catalogue injecté
#[derive(Debug, Clone)]
pub struct Matcher {
    catalog: Arc<Catalog>,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(Catalog::shared())
    }
}

impl Matcher {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Détecte la projection décrite par un texte PRJ (ou son absence)
    pub fn detect(&self, prj_text: Option<&str>) -> Option<DetectionResult> {
        let raw = prj_text?;
        let normalized = normalize_prj(raw);
        if normalized.is_empty() {
            return None;
        }
        debug!(chars = raw.len(), "Detecting projection from PRJ text");

        let result = self
            .by_epsg(&normalized)
            .or_else(|| self.by_exact_name(&normalized))
            .or_else(|| self.by_keyword(&normalized))
            .or_else(|| self.by_structure(&normalized))
            .or_else(|| self.by_parameters(&normalized));

        match &result {
            Some(found) => info!(
                method = %found.match_type,
                id = found.definition.id(),
                "Projection detected"
            ),
            None => debug!("No projection could be inferred"),
        }
        result
    }

    fn by_epsg(&self, normalized: &str) -> Option<DetectionResult> {
        // Sous un PROJCS, le code du GEOGCS imbriqué ne décrit pas les données
        let projected = epsg::is_projected_root(normalized);

        // Le dernier code connu correspond au nœud WKT le plus externe
        let (code, entry) = epsg::extract_codes(normalized)
            .into_iter()
            .filter_map(|code| self.catalog.get_by_epsg(code).map(|entry| (code, entry)))
            .filter(|(_, entry)| !(projected && entry.is_geographic()))
            .last()?;

        Some(
            DetectionResult::new(entry.definition(SourceMethod::Epsg))
                .with_epsg(Some(code))
                .with_central_meridian(entry.central_meridian),
        )
    }

    fn by_exact_name(&self, normalized: &str) -> Option<DetectionResult> {
        let entry = exact::find(&self.catalog, normalized)?;
        Some(
            DetectionResult::new(entry.definition(SourceMethod::Exact))
                .with_epsg(entry.epsg)
                .with_central_meridian(entry.central_meridian),
        )
    }

    fn by_keyword(&self, normalized: &str) -> Option<DetectionResult> {
        let (keyword, entry) = keyword::find(&self.catalog, normalized)?;
        Some(
            DetectionResult::new(entry.definition(SourceMethod::Keyword))
                .with_keyword(keyword)
                .with_epsg(entry.epsg)
                .with_central_meridian(entry.central_meridian),
        )
    }

    fn by_structure(&self, normalized: &str) -> Option<DetectionResult> {
        let false_easting = params::extract(normalized).false_easting;
        let found = pattern::find(normalized, false_easting)?;
        Some(
            DetectionResult::new(ProjectionDefinition::new(
                found.id,
                found.spec,
                SourceMethod::Regex,
            ))
            .with_pattern(found.pattern)
            .with_central_meridian(Some(found.central_meridian)),
        )
    }

    fn by_parameters(&self, normalized: &str) -> Option<DetectionResult> {
        let parameters = params::extract(normalized);
        let spec = parameters.synthesize()?;
        let central_meridian = parameters.central_meridian?;
        let kind = match parameters.projection_kind() {
            Some(ProjectionKind::Mercator) => "MERC",
            _ => "TM",
        };
        let id = format!("Parameters_{}_CM{}", kind, central_meridian);
        Some(
            DetectionResult::new(ProjectionDefinition::new(
                id,
                spec,
                SourceMethod::ParameterParsed,
            ))
            .with_central_meridian(Some(central_meridian)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;

    #[test]
    fn test_none_and_blank() {
        let matcher = Matcher::default();
        assert!(matcher.detect(None).is_none());
        assert!(matcher.detect(Some("   \n")).is_none());
        assert!(matcher.detect(Some("garbage ][ \"")).is_none());
    }

    #[test]
    fn test_epsg_outermost_code_wins() {
        let matcher = Matcher::default();
        let wkt = r#"PROJCS["whatever",GEOGCS["GCS",AUTHORITY["EPSG","4490"]],AUTHORITY["EPSG","4527"]]"#;
        let result = matcher.detect(Some(wkt)).unwrap();
        assert_eq!(result.match_type, SourceMethod::Epsg);
        assert_eq!(result.epsg, Some(4527));
    }

    #[test]
    fn test_geographic_code_under_projcs_falls_through() {
        let matcher = Matcher::default();
        let wkt = r#"PROJCS["CGCS2000_3_Degree_GK_Zone_39",GEOGCS["GCS_China_Geodetic_Coordinate_System_2000",AUTHORITY["EPSG","4490"]],PROJECTION["Gauss_Kruger"]]"#;
        let result = matcher.detect(Some(wkt)).unwrap();
        assert_eq!(result.match_type, SourceMethod::Exact);
        assert_eq!(result.definition.id(), "CGCS2000_3_Degree_GK_Zone_39");
        assert!(result.definition.transform_spec().starts_with("+proj=tmerc "));
    }

    #[test]
    fn test_geographic_root_keeps_its_code() {
        let matcher = Matcher::default();
        let wkt = r#"GEOGCS["GCS_China_Geodetic_Coordinate_System_2000",AUTHORITY["EPSG","4490"]]"#;
        let result = matcher.detect(Some(wkt)).unwrap();
        assert_eq!(result.match_type, SourceMethod::Epsg);
        assert_eq!(result.epsg, Some(4490));
    }

    #[test]
    fn test_unknown_epsg_falls_through() {
        let matcher = Matcher::default();
        let result = matcher
            .detect(Some("EPSG:99999 CGCS2000_3_Degree_GK_CM_117E"))
            .unwrap();
        assert_eq!(result.match_type, SourceMethod::Regex);
        assert_eq!(result.central_meridian, Some(117.0));
    }

    #[test]
    fn test_minimal_injected_catalog() {
        let catalog = Catalog::from_entries([
            CatalogEntry::new("SITE_A_GRID", Some(900001), "+proj=tmerc +lon_0=117 +x_0=0"),
            CatalogEntry::new("SITE_B_GRID", None, "+proj=tmerc +lon_0=120 +x_0=0"),
        ])
        .unwrap();
        let matcher = Matcher::new(Arc::new(catalog));

        let result = matcher.detect(Some("site_b_grid")).unwrap();
        assert_eq!(result.match_type, SourceMethod::Exact);
        assert_eq!(result.definition.id(), "SITE_B_GRID");

        let result = matcher.detect(Some("EPSG:900001")).unwrap();
        assert_eq!(result.definition.id(), "SITE_A_GRID");

        // Les codes du catalogue embarqué sont inconnus ici
        assert!(matcher.detect(Some("EPSG:4527")).is_none());
    }

    #[test]
    fn test_keyword_with_test_double() {
        let catalog = Catalog::from_entries([
            CatalogEntry::new("CGCS2000_6_DEGREE_GK_CM_117E", None, "+proj=tmerc +lon_0=117"),
            CatalogEntry::new("CGCS2000_3_DEGREE_GK_CM_117E", None, "+proj=tmerc +lon_0=117 +k=1"),
        ])
        .unwrap();
        let matcher = Matcher::new(Arc::new(catalog));

        let result = matcher.detect(Some("MY GRID BASED ON 6_DEGREE_GK")).unwrap();
        assert_eq!(result.match_type, SourceMethod::Keyword);
        assert_eq!(result.matched_keyword.as_deref(), Some("6_DEGREE_GK"));
        assert_eq!(result.definition.id(), "CGCS2000_6_DEGREE_GK_CM_117E");
    }

    #[test]
    fn test_parameter_parsed_id() {
        let matcher = Matcher::new(Arc::new(Catalog::empty()));
        let wkt = r#"PROJCS["LOCAL",PROJECTION["Transverse_Mercator"],PARAMETER["Central_Meridian",117.5],PARAMETER["False_Easting",0.0]]"#;
        let result = matcher.detect(Some(wkt)).unwrap();
        assert_eq!(result.match_type, SourceMethod::ParameterParsed);
        assert_eq!(result.definition.id(), "Parameters_TM_CM117.5");
        assert!(result.definition.transform_spec().contains("+lon_0=117.5 "));
    }
}
