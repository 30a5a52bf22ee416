//! Transformation de coordonnées vers WGS84
//!
//! Enchaînement pour un appel `transform` :
//! 1. court-circuit si l'entrée semble déjà en WGS84 (`Wgs84Detection`)
//! 2. résolution de la projection via `prjdetect`, sinon projection par défaut
//!    (CGCS2000 3° GK, fuseau 39, méridien central 117°E)
//! 3. transformation mémoïsée dans le `TransformCache`
//! 4. parcours de la géométrie ou de l'arbre, point par point
//! 5. validation des résultats (finis, bornes WGS84) : signalés, jamais remplacés

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use prjdetect::{DetectionResult, Matcher, ProjectionDefinition, SourceMethod};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::TransformCache;
use crate::config::{TransformOptions, Wgs84Detection};
use crate::error::{ProjectionError, TransformError};
use crate::geometry::Coordinates;
use crate::report::{StatsSnapshot, TransformStats};
use crate::reproject_lite::SmartReprojector;

/// Identifiant de la projection par défaut
pub const DEFAULT_PROJECTION_ID: &str = "CGCS2000_3_Degree_GK_Zone_39";

/// CGCS2000 3° Gauss-Krüger, fuseau 39 (méridien central 117°E)
pub const DEFAULT_TRANSFORM_SPEC: &str = "+proj=tmerc +lat_0=0 +lon_0=117 +k=1 +x_0=39500000 \
                                          +y_0=0 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs";

/// Tolérance du contrôle aller-retour (unités source)
pub const ROUND_TRIP_TOLERANCE: f64 = 0.001;

/// Durée estimée par coordonnée (ms)
const ESTIMATED_MS_PER_COORDINATE: f64 = 0.1;

/// Projection utilisée quand la détection n'aboutit pas
pub fn default_projection() -> ProjectionDefinition {
    ProjectionDefinition::new(
        DEFAULT_PROJECTION_ID,
        DEFAULT_TRANSFORM_SPEC,
        SourceMethod::DefaultFallback,
    )
}

/// Longitude dans [-180, 180] et latitude dans [-90, 90] (NaN exclus)
pub fn is_within_wgs84_bounds([lon, lat]: [f64; 2]) -> bool {
    (-180.0..=180.0).contains(&lon) && (-90.0..=90.0).contains(&lat)
}

/// Résultat détaillé d'une transformation
#[derive(Debug, Clone, PartialEq)]
pub struct TransformReport {
    /// Coordonnées transformées, même forme que l'entrée
    pub output: Coordinates,
    /// Projection utilisée (absente en cas de court-circuit)
    pub projection: Option<ProjectionDefinition>,
    /// Entrée considérée comme déjà en WGS84
    pub short_circuited: bool,
    /// Points en échec remplacés par l'original
    pub substituted: Vec<[f64; 2]>,
    /// Points source dont le résultat sort des bornes WGS84
    pub out_of_bounds: Vec<[f64; 2]>,
}

/// Résultat du contrôle aller-retour
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundTripCheck {
    pub is_valid: bool,
    /// Écart absolu `[dx, dy]` après transformation inverse
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_error: Option<[f64; 2]>,
    pub tolerance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Projection résolue et transformation correspondante
pub(crate) struct Resolved {
    pub definition: ProjectionDefinition,
    pub reprojector: Arc<SmartReprojector>,
}

/// Transformateur de coordonnées vers WGS84
#[derive(Debug)]
pub struct CoordinateTransformer {
    matcher: Matcher,
    cache: Arc<TransformCache>,
    stats: TransformStats,
}

impl Default for CoordinateTransformer {
    fn default() -> Self {
        Self::new(Matcher::default(), Arc::new(TransformCache::new()))
    }
}

impl CoordinateTransformer {
    pub fn new(matcher: Matcher, cache: Arc<TransformCache>) -> Self {
        Self {
            matcher,
            cache,
            stats: TransformStats::default(),
        }
    }

    /// Instance partagée par le processus (catalogue embarqué, cache commun)
    pub fn shared() -> &'static CoordinateTransformer {
        static SHARED: OnceLock<CoordinateTransformer> = OnceLock::new();
        SHARED.get_or_init(CoordinateTransformer::default)
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn cache(&self) -> &Arc<TransformCache> {
        &self.cache
    }

    /// Détection seule (sans projection par défaut)
    pub fn detect(&self, prj_text: Option<&str>) -> Option<DetectionResult> {
        self.matcher.detect(prj_text)
    }

    /// Projection qui serait utilisée pour ce texte PRJ
    pub fn resolve_projection(&self, prj_text: Option<&str>) -> ProjectionDefinition {
        match self.resolve(prj_text) {
            Ok(resolved) => resolved.definition,
            Err(_) => default_projection(),
        }
    }

    fn build(&self, spec: &str) -> Result<Arc<SmartReprojector>, ProjectionError> {
        let (reprojector, built) = self.cache.get_or_build(spec)?;
        self.stats.record_cache(built);
        Ok(reprojector)
    }

    pub(crate) fn resolve(&self, prj_text: Option<&str>) -> Result<Resolved, TransformError> {
        if let Some(found) = self.matcher.detect(prj_text) {
            let definition = found.definition;
            match self.build(definition.transform_spec()) {
                Ok(reprojector) => {
                    return Ok(Resolved {
                        definition,
                        reprojector,
                    })
                }
                Err(e) => warn!(
                    id = definition.id(),
                    error = %e,
                    "Detected projection cannot be evaluated, using default"
                ),
            }
        } else {
            info!(
                id = DEFAULT_PROJECTION_ID,
                "No projection detected, using default"
            );
        }

        let definition = default_projection();
        let reprojector =
            self.build(DEFAULT_TRANSFORM_SPEC)
                .map_err(|source| TransformError::InvalidSpec {
                    spec: DEFAULT_TRANSFORM_SPEC.to_string(),
                    source,
                })?;
        Ok(Resolved {
            definition,
            reprojector,
        })
    }

    /// L'entrée semble-t-elle déjà exprimée en WGS84 ?
    pub fn looks_like_wgs84(&self, coords: &Coordinates, detection: Wgs84Detection) -> bool {
        match detection {
            Wgs84Detection::FirstLeaf => coords.first_leaf().is_some_and(is_within_wgs84_bounds),
            Wgs84Detection::AllLeaves => {
                let leaves = coords.leaves();
                !leaves.is_empty() && leaves.into_iter().all(is_within_wgs84_bounds)
            }
            Wgs84Detection::Disabled => false,
        }
    }

    /// Transforme des coordonnées vers WGS84 (même forme en sortie)
    pub fn transform(
        &self,
        coords: &Coordinates,
        prj_text: Option<&str>,
        options: &TransformOptions,
    ) -> Result<Coordinates, TransformError> {
        self.transform_traced(coords, prj_text, options)
            .map(|report| report.output)
    }

    /// Comme `transform`, avec le détail des points substitués ou hors bornes
    pub fn transform_traced(
        &self,
        coords: &Coordinates,
        prj_text: Option<&str>,
        options: &TransformOptions,
    ) -> Result<TransformReport, TransformError> {
        coords.validate()?;
        if self.looks_like_wgs84(coords, options.wgs84_detection) {
            debug!("Coordinates already in WGS84, skipping transform");
            return Ok(TransformReport::unchanged(coords));
        }

        let resolved = self.resolve(prj_text)?;
        info!(
            id = resolved.definition.id(),
            method = %resolved.definition.source_method(),
            "Projection resolved"
        );
        self.apply(coords, resolved, options)
    }

    /// Transforme avec une définition imposée (pas de détection)
    ///
    /// Une définition non évaluable renvoie `InvalidSpec`, ou l'entrée
    /// inchangée si `fallback_to_original` est actif.
    pub fn transform_with(
        &self,
        coords: &Coordinates,
        definition: &ProjectionDefinition,
        options: &TransformOptions,
    ) -> Result<TransformReport, TransformError> {
        coords.validate()?;
        if self.looks_like_wgs84(coords, options.wgs84_detection) {
            return Ok(TransformReport::unchanged(coords));
        }

        let reprojector = match self.build(definition.transform_spec()) {
            Ok(reprojector) => reprojector,
            Err(source) if options.fallback_to_original => {
                warn!(
                    id = definition.id(),
                    error = %source,
                    "Cannot build transform, returning original coordinates"
                );
                self.stats.record_failure();
                return Ok(TransformReport {
                    projection: Some(definition.clone()),
                    short_circuited: false,
                    substituted: coords.leaves(),
                    ..TransformReport::unchanged(coords)
                });
            }
            Err(source) => {
                self.stats.record_failure();
                return Err(TransformError::InvalidSpec {
                    spec: definition.transform_spec().to_string(),
                    source,
                });
            }
        };

        let resolved = Resolved {
            definition: definition.clone(),
            reprojector,
        };
        self.apply(coords, resolved, options)
    }

    /// Transforme un point, avec contrôle des bornes WGS84
    pub(crate) fn transform_point(
        &self,
        reprojector: &SmartReprojector,
        point: [f64; 2],
    ) -> Result<([f64; 2], bool), ProjectionError> {
        let (lon, lat) = reprojector.to_wgs84(point[0], point[1])?;
        let out = [lon, lat];
        let in_bounds = is_within_wgs84_bounds(out);
        if !in_bounds {
            warn!(
                x = point[0],
                y = point[1],
                lon,
                lat,
                "Transformed point outside WGS84 bounds"
            );
            self.stats.record_out_of_bounds();
        }
        Ok((out, in_bounds))
    }

    fn apply(
        &self,
        coords: &Coordinates,
        resolved: Resolved,
        options: &TransformOptions,
    ) -> Result<TransformReport, TransformError> {
        let Resolved {
            definition,
            reprojector,
        } = resolved;
        let mut substituted = Vec::new();
        let mut out_of_bounds = Vec::new();

        let result = coords.try_map(|point| match self.transform_point(&reprojector, point) {
            Ok((out, in_bounds)) => {
                if !in_bounds {
                    out_of_bounds.push(point);
                }
                Ok(out)
            }
            Err(source) if options.fallback_to_original => {
                warn!(
                    x = point[0],
                    y = point[1],
                    error = %source,
                    "Point transform failed, keeping original"
                );
                substituted.push(point);
                Ok(point)
            }
            Err(source) => Err(TransformError::Point {
                point,
                spec: definition.transform_spec().to_string(),
                method: definition.source_method(),
                source,
            }),
        });

        match result {
            Ok(output) => {
                self.stats.record_success();
                Ok(TransformReport {
                    output,
                    projection: Some(definition),
                    short_circuited: false,
                    substituted,
                    out_of_bounds,
                })
            }
            Err(e) => {
                self.stats.record_failure();
                Err(e)
            }
        }
    }

    /// Contrôle aller-retour : l'inverse du point transformé doit retrouver
    /// l'original à `ROUND_TRIP_TOLERANCE` près
    pub fn validate_transform(
        &self,
        original: [f64; 2],
        transformed: [f64; 2],
        spec: &str,
    ) -> RoundTripCheck {
        let back = self
            .build(spec)
            .and_then(|reprojector| reprojector.from_wgs84(transformed[0], transformed[1]));

        match back {
            Ok((x, y)) => {
                let error = [(original[0] - x).abs(), (original[1] - y).abs()];
                RoundTripCheck {
                    is_valid: error[0] < ROUND_TRIP_TOLERANCE && error[1] < ROUND_TRIP_TOLERANCE,
                    original_error: Some(error),
                    tolerance: ROUND_TRIP_TOLERANCE,
                    error: None,
                }
            }
            Err(e) => RoundTripCheck {
                is_valid: false,
                original_error: None,
                tolerance: ROUND_TRIP_TOLERANCE,
                error: Some(e.to_string()),
            },
        }
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot(self.cache.len())
    }

    pub(crate) fn record_point(&self, success: bool) {
        if success {
            self.stats.record_success();
        } else {
            self.stats.record_failure();
        }
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
        info!("Transform cache cleared");
    }

    /// Estimation grossière de la durée d'une transformation
    pub fn estimate_transform_time(&self, coordinate_count: usize) -> Duration {
        let millis = (coordinate_count as f64 * ESTIMATED_MS_PER_COORDINATE).ceil();
        Duration::from_millis(millis as u64)
    }
}

impl TransformReport {
    fn unchanged(coords: &Coordinates) -> Self {
        Self {
            output: coords.clone(),
            projection: None,
            short_circuited: true,
            substituted: Vec::new(),
            out_of_bounds: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CoordinateTree;
    use prjdetect::Catalog;

    fn zone_39_point() -> Coordinates {
        CoordinateTree::point(39_500_000.0, 4_500_000.0).into()
    }

    #[test]
    fn test_default_projection() {
        let def = default_projection();
        assert_eq!(def.id(), "CGCS2000_3_Degree_GK_Zone_39");
        assert_eq!(def.source_method(), SourceMethod::DefaultFallback);
        assert!(def.transform_spec().contains("+lon_0=117"));
    }

    #[test]
    fn test_bounds() {
        assert!(is_within_wgs84_bounds([180.0, -90.0]));
        assert!(!is_within_wgs84_bounds([180.1, 0.0]));
        assert!(!is_within_wgs84_bounds([f64::NAN, 0.0]));
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let transformer = CoordinateTransformer::default();
        let def = transformer.resolve_projection(None);
        assert_eq!(def.source_method(), SourceMethod::DefaultFallback);

        let def = transformer.resolve_projection(Some("NOT A PRJ"));
        assert_eq!(def.id(), DEFAULT_PROJECTION_ID);
    }

    #[test]
    fn test_structural_detection_without_catalog() {
        let transformer = CoordinateTransformer::new(
            Matcher::new(Arc::new(Catalog::empty())),
            Arc::new(TransformCache::new()),
        );
        let prj = r#"PROJCS["CGCS2000_3_Degree_GK_Zone_39",GEOGCS["GCS_China_Geodetic_Coordinate_System_2000"]]"#;
        // Motif structurel : n'a pas besoin du catalogue
        let def = transformer.resolve_projection(Some(prj));
        assert_eq!(def.source_method(), SourceMethod::Regex);
    }

    #[test]
    fn test_transform_with_unbuildable_definition() {
        let transformer = CoordinateTransformer::default();
        let def = ProjectionDefinition::new("UNKNOWN", "+proj=nonexistent +lon_0=117", SourceMethod::Exact);
        let err = transformer
            .transform_with(&zone_39_point(), &def, &TransformOptions::default())
            .unwrap_err();
        assert!(matches!(err, TransformError::InvalidSpec { .. }));

        let report = transformer
            .transform_with(
                &zone_39_point(),
                &def,
                &TransformOptions::default().with_fallback(true),
            )
            .unwrap();
        assert_eq!(report.output, zone_39_point());
        assert_eq!(report.substituted, vec![[39_500_000.0, 4_500_000.0]]);
    }

    #[test]
    fn test_traced_transform() {
        let transformer = CoordinateTransformer::default();
        let report = transformer
            .transform_traced(&zone_39_point(), None, &TransformOptions::default())
            .unwrap();

        assert!(!report.short_circuited);
        assert_eq!(
            report.projection.map(|p| p.source_method()),
            Some(SourceMethod::DefaultFallback)
        );
        assert!(report.substituted.is_empty());
        assert!(report.out_of_bounds.is_empty());
    }

    #[test]
    fn test_short_circuit_modes() {
        let transformer = CoordinateTransformer::default();
        let mixed: Coordinates = CoordinateTree::Nested(vec![
            CoordinateTree::point(117.0, 40.0),
            CoordinateTree::point(39_500_000.0, 4_500_000.0),
        ])
        .into();

        assert!(transformer.looks_like_wgs84(&mixed, Wgs84Detection::FirstLeaf));
        assert!(!transformer.looks_like_wgs84(&mixed, Wgs84Detection::AllLeaves));
        assert!(!transformer.looks_like_wgs84(&mixed, Wgs84Detection::Disabled));
    }

    #[test]
    fn test_estimate_transform_time() {
        let transformer = CoordinateTransformer::default();
        assert_eq!(transformer.estimate_transform_time(0), Duration::ZERO);
        assert_eq!(transformer.estimate_transform_time(1), Duration::from_millis(1));
        assert_eq!(
            transformer.estimate_transform_time(10_000),
            Duration::from_millis(1000)
        );
    }

    #[test]
    fn test_validate_transform_bad_spec() {
        let transformer = CoordinateTransformer::default();
        let check = transformer.validate_transform([0.0, 0.0], [117.0, 40.0], "+proj=tmerc +k=abc");
        assert!(!check.is_valid);
        assert!(check.error.is_some());
        assert_eq!(check.tolerance, ROUND_TRIP_TOLERANCE);
    }
}
