//! Reprojection intelligente : reproject_lite en priorité, fallback sur proj
//!
//! Utilise automatiquement la meilleure option disponible.

use tracing::debug;

use super::ReprojectorLite;
use crate::error::ProjectionError;

/// Indique si le backend PROJ est compilé (feature `proj`)
pub fn proj_backend_available() -> bool {
    cfg!(feature = "proj")
}

/// Reprojection intelligente
///
/// Essaie d'abord reproject_lite (pure Rust), puis PROJ si la feature `proj`
/// est activée et que proj4rs refuse la définition.
#[derive(Debug)]
pub enum SmartReprojector {
    /// Reprojection légère (pure Rust)
    Lite(ReprojectorLite),
    /// Reprojection via PROJ (si feature activée)
    #[cfg(feature = "proj")]
    Proj(crate::reproject::Reprojector),
}

impl SmartReprojector {
    /// Construit la transformation pour une chaîne proj4
    pub fn new(spec: &str) -> Result<Self, ProjectionError> {
        match ReprojectorLite::from_spec(spec) {
            Ok(lite) => Ok(Self::Lite(lite)),
            #[cfg(feature = "proj")]
            Err(ProjectionError::Definition(reason)) => {
                debug!(reason = %reason, "Falling back to PROJ backend");
                crate::reproject::Reprojector::new(spec).map(Self::Proj)
            }
            Err(e) => {
                debug!(error = %e, "reproject_lite cannot evaluate spec");
                Err(e)
            }
        }
    }

    /// Coordonnées source → (lon, lat) WGS84
    pub fn to_wgs84(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        match self {
            Self::Lite(lite) => lite.to_wgs84(x, y),
            #[cfg(feature = "proj")]
            Self::Proj(proj) => proj.to_wgs84(x, y),
        }
    }

    /// (lon, lat) WGS84 → coordonnées source
    pub fn from_wgs84(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjectionError> {
        match self {
            Self::Lite(lite) => lite.from_wgs84(lon, lat),
            #[cfg(feature = "proj")]
            Self::Proj(proj) => proj.from_wgs84(lon, lat),
        }
    }

    /// Retourne une description du reprojector utilisé
    pub fn description(&self) -> &'static str {
        match self {
            Self::Lite(_) => "reproject_lite (pure Rust)",
            #[cfg(feature = "proj")]
            Self::Proj(_) => "proj (PROJ library)",
        }
    }
}
