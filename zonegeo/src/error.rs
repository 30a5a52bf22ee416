//! Types d'erreurs pour zonegeo

use prjdetect::SourceMethod;
use thiserror::Error;

/// Erreur d'évaluation d'une projection (construction ou point)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// Chaîne proj4 refusée par proj4rs
    #[error("Cannot evaluate projection: {0}")]
    Definition(String),

    #[error("Invalid parameter +{name}={value}")]
    InvalidParameter { name: String, value: String },

    #[error("Degenerate scale factor k={0}")]
    DegenerateScale(f64),

    #[error("Non-finite result for ({x}, {y})")]
    NonFinite { x: f64, y: f64 },

    #[error("Transform failed for ({x}, {y}): {reason}")]
    Evaluation { x: f64, y: f64, reason: String },

    #[cfg(feature = "proj")]
    #[error("PROJ backend error: {0}")]
    Backend(String),
}

impl ProjectionError {
    pub fn invalid(name: &str, value: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            value: value.into(),
        }
    }
}

/// Erreur de transformation de coordonnées
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    /// Structure d'entrée non reconnue (type inconnu, arbre malformé)
    #[error("Unsupported coordinate format: {0}")]
    UnsupportedFormat(String),

    /// La chaîne proj4 résolue n'a pas pu être construite
    #[error("Cannot build transform for '{spec}': {source}")]
    InvalidSpec {
        spec: String,
        #[source]
        source: ProjectionError,
    },

    /// Échec sur un point précis
    #[error("Transform failed at {point:?} ({method}, '{spec}'): {source}")]
    Point {
        point: [f64; 2],
        spec: String,
        method: SourceMethod,
        #[source]
        source: ProjectionError,
    },
}

impl TransformError {
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedFormat(message.into())
    }
}
