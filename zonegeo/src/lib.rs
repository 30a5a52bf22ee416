//! # zonegeo
//!
//! Normalisation en WGS84 des coordonnées de zones d'activité exprimées dans
//! les systèmes projetés chinois (CGCS2000, Xian 1980, Beijing 1954).
//!
//! ## Features
//!
//! - Détection de la projection depuis le `.prj` (crate `prjdetect`)
//! - Transformation de géométries GeoJSON et d'arbres de coordonnées nus
//! - Reprojection Gauss-Krüger / UTM / Mercator en Rust pur (proj4rs), PROJ en
//!   option (feature `proj`)
//! - Cache des transformations, compteurs, lots avec progression
//! - CLI simple
//!
//! ## Usage CLI
//!
//! ```bash
//! # Projection détectée
//! zonegeo detect --prj ./parcelles.prj
//!
//! # Géométrie ou arbre de coordonnées vers WGS84
//! zonegeo transform --input ./zone.json --prj ./parcelles.prj --output ./zone_wgs84.json
//!
//! # Liste de points [[x, y], ...]
//! zonegeo batch --input ./points.json --config lenient
//! ```

pub mod batch;
pub mod cache;
pub mod config;
pub mod error;
pub mod geometry;
pub mod report;
#[cfg(feature = "proj")]
pub mod reproject;
pub mod reproject_lite;
pub mod transformer;

pub use batch::{BatchItem, BatchOutcome, BatchProgress};
pub use cache::{cache_key, TransformCache};
pub use config::{BatchOptions, Config, TransformOptions, Wgs84Detection};
pub use error::{ProjectionError, TransformError};
pub use geometry::{CoordinateTree, Coordinates};
pub use report::{BatchReport, BatchStatus, StatsSnapshot};
pub use transformer::{CoordinateTransformer, RoundTripCheck, TransformReport};

pub use prjdetect::{detect_projection, DetectionResult, ProjectionDefinition, SourceMethod};

/// Transforme des coordonnées vers WGS84 avec le transformateur partagé du
/// processus (catalogue embarqué, cache commun).
pub fn transform_coordinates(
    coords: &Coordinates,
    prj_text: Option<&str>,
    options: &TransformOptions,
) -> Result<Coordinates, TransformError> {
    CoordinateTransformer::shared().transform(coords, prj_text, options)
}
