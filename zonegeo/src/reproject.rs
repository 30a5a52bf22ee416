//! Reprojection avec PROJ
//!
//! Ce module est disponible uniquement avec le feature `proj`. Il couvre les
//! chaînes proj4 que proj4rs refuse (projections absentes de proj4rs,
//! grilles `+nadgrids=...`).

use std::fmt;
use std::sync::{Mutex, PoisonError};

use proj::Proj;

use crate::error::ProjectionError;

const WGS84: &str = "EPSG:4326";

/// Transformation PROJ entre une chaîne proj4 et WGS84 (dans les deux sens)
pub struct Reprojector {
    spec: String,
    forward: Mutex<Proj>,
    inverse: Mutex<Proj>,
}

impl fmt::Debug for Reprojector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reprojector")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

fn backend_error(context: &str, error: impl fmt::Display) -> ProjectionError {
    ProjectionError::Backend(format!("{}: {}", context, error))
}

impl Reprojector {
    /// Crée les deux transformations PROJ pour une chaîne proj4
    pub fn new(spec: &str) -> Result<Self, ProjectionError> {
        let forward = Proj::new_known_crs(spec, WGS84, None)
            .map_err(|e| backend_error("Failed to create projection to WGS84", e))?;
        let inverse = Proj::new_known_crs(WGS84, spec, None)
            .map_err(|e| backend_error("Failed to create projection from WGS84", e))?;

        Ok(Self {
            spec: spec.to_string(),
            forward: Mutex::new(forward),
            inverse: Mutex::new(inverse),
        })
    }

    fn convert(proj: &Mutex<Proj>, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let proj = proj.lock().unwrap_or_else(PoisonError::into_inner);
        let (u, v) = proj
            .convert((x, y))
            .map_err(|e| backend_error("Coordinate transformation failed", e))?;
        if !u.is_finite() || !v.is_finite() {
            return Err(ProjectionError::NonFinite { x, y });
        }
        Ok((u, v))
    }

    /// Coordonnées source → (lon, lat) WGS84
    pub fn to_wgs84(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        Self::convert(&self.forward, x, y)
    }

    /// (lon, lat) WGS84 → coordonnées source
    pub fn from_wgs84(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjectionError> {
        Self::convert(&self.inverse, lon, lat)
    }
}
