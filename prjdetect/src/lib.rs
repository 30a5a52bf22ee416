//! # prjdetect
//!
//! Détection du système de coordonnées projeté décrit par un fichier `.prj`
//! (WKT ESRI ou OGC), centrée sur les référentiels chinois.
//!
//! ## Features
//!
//! - Catalogue embarqué : CGCS2000, Xian 1980, Beijing 1954 (fuseaux 3° et 6°),
//!   WGS84 UTM 43N–53N, Web Mercator et les systèmes géographiques associés
//! - Cinq stratégies ordonnées : EPSG, nom exact, mot-clé, motif structurel,
//!   paramètres WKT
//! - Catalogue injectable (tests, grilles locales en JSON)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use prjdetect::Matcher;
//!
//! let prj = std::fs::read_to_string("parcelles.prj")?;
//! if let Some(found) = Matcher::default().detect(Some(&prj)) {
//!     println!("{} via {}", found.definition.id(), found.match_type);
//!     println!("{}", found.definition.transform_spec());
//! }
//! ```

pub mod catalog;
pub mod datum;
pub mod error;
pub mod gauss_kruger;
pub mod matcher;
pub mod normalize;
pub mod proj_string;
pub mod types;

pub use catalog::{Catalog, CatalogEntry};
pub use datum::Datum;
pub use error::CatalogError;
pub use matcher::Matcher;
pub use normalize::normalize_prj;
pub use proj_string::{EllipsoidParams, ProjStringBuilder, ProjectionKind};
pub use types::{DetectionResult, ProjectionDefinition, SourceMethod};

/// Détecte la projection d'un texte PRJ avec le catalogue embarqué.
///
/// Renvoie `None` si le texte est absent, vide, ou si aucune stratégie
/// n'aboutit.
pub fn detect_projection(prj_text: Option<&str>) -> Option<DetectionResult> {
    Matcher::default().detect(prj_text)
}
