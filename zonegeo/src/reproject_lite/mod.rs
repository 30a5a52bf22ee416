//! Reprojection légère en Rust pur (proj4rs, sans bibliothèque C)
//!
//! Évalue les chaînes proj4 produites par `prjdetect` :
//! - Gauss-Krüger CGCS2000 / Xian 1980 / Beijing 1954 (`+proj=tmerc`)
//! - WGS84 UTM nord et sud (`+proj=utm`)
//! - Mercator et Web Mercator (`+proj=merc`)
//! - Géographiques (`+proj=longlat`)
//! - Toute autre projection connue de proj4rs (`lcc`, `aea`...)
//!
//! Cible unique : WGS84 longitude/latitude en degrés.

mod smart;

pub use smart::{proj_backend_available, SmartReprojector};

use std::fmt;

use proj4rs::transform::transform;
use proj4rs::Proj;

use crate::error::ProjectionError;

const WGS84_SPEC: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// Facteur d'échelle déclaré (`+k` ou `+k_0`), s'il y en a un
pub fn scale_factor(spec: &str) -> Result<Option<f64>, ProjectionError> {
    for token in spec.split_whitespace() {
        let Some((name, value)) = token.trim_start_matches('+').split_once('=') else {
            continue;
        };
        if name == "k" || name == "k_0" {
            return value
                .parse::<f64>()
                .map(Some)
                .map_err(|_| ProjectionError::invalid(name, value));
        }
    }
    Ok(None)
}

/// La projection source travaille-t-elle en degrés ?
fn is_geographic(spec: &str) -> bool {
    spec.split_whitespace().any(|token| {
        matches!(
            token,
            "+proj=longlat" | "+proj=latlong" | "+proj=lonlat" | "+proj=latlon"
        )
    })
}

enum Kernel {
    Proj4 { source: Proj, wgs84: Proj },
    /// `k=0` : chaque point échoue
    Degenerate(f64),
}

/// Transformation d'une projection source vers WGS84 (et retour)
pub struct ReprojectorLite {
    spec: String,
    geographic: bool,
    kernel: Kernel,
}

impl fmt::Debug for ReprojectorLite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReprojectorLite")
            .field("spec", &self.spec)
            .field("geographic", &self.geographic)
            .finish_non_exhaustive()
    }
}

impl ReprojectorLite {
    /// Construit la transformation depuis une chaîne proj4
    pub fn from_spec(spec: &str) -> Result<Self, ProjectionError> {
        let kernel = match scale_factor(spec)? {
            Some(k0) if k0 == 0.0 || !k0.is_finite() => Kernel::Degenerate(k0),
            _ => Kernel::Proj4 {
                source: Proj::from_proj_string(spec)
                    .map_err(|e| ProjectionError::Definition(format!("{}: {}", spec, e)))?,
                wgs84: Proj::from_proj_string(WGS84_SPEC)
                    .map_err(|e| ProjectionError::Definition(format!("{}: {}", WGS84_SPEC, e)))?,
            },
        };

        Ok(Self {
            spec: spec.to_string(),
            geographic: is_geographic(spec),
            kernel,
        })
    }

    pub fn spec(&self) -> &str {
        &self.spec
    }

    /// Coordonnées source → (lon, lat) WGS84 en degrés
    pub fn to_wgs84(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let (source, wgs84) = self.kernels()?;
        if !x.is_finite() || !y.is_finite() {
            return Err(ProjectionError::NonFinite { x, y });
        }

        let mut point = if self.geographic {
            (x.to_radians(), y.to_radians(), 0.0)
        } else {
            (x, y, 0.0)
        };
        transform(source, wgs84, &mut point).map_err(|e| ProjectionError::Evaluation {
            x,
            y,
            reason: e.to_string(),
        })?;

        let (lon, lat) = (point.0.to_degrees(), point.1.to_degrees());
        if !lon.is_finite() || !lat.is_finite() {
            return Err(ProjectionError::NonFinite { x, y });
        }
        Ok((lon, lat))
    }

    /// (lon, lat) WGS84 en degrés → coordonnées source
    pub fn from_wgs84(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjectionError> {
        let (source, wgs84) = self.kernels()?;
        if !lon.is_finite() || !lat.is_finite() {
            return Err(ProjectionError::NonFinite { x: lon, y: lat });
        }

        let mut point = (lon.to_radians(), lat.to_radians(), 0.0);
        transform(wgs84, source, &mut point).map_err(|e| ProjectionError::Evaluation {
            x: lon,
            y: lat,
            reason: e.to_string(),
        })?;

        let (x, y) = if self.geographic {
            (point.0.to_degrees(), point.1.to_degrees())
        } else {
            (point.0, point.1)
        };
        if !x.is_finite() || !y.is_finite() {
            return Err(ProjectionError::NonFinite { x: lon, y: lat });
        }
        Ok((x, y))
    }

    fn kernels(&self) -> Result<(&Proj, &Proj), ProjectionError> {
        match &self.kernel {
            Kernel::Proj4 { source, wgs84 } => Ok((source, wgs84)),
            Kernel::Degenerate(k0) => Err(ProjectionError::DegenerateScale(*k0)),
        }
    }
}
