//! Construction des chaînes de paramètres proj4
//!
//! Ordre des paramètres : type de projection, latitude d'origine, méridien
//! central, facteur d'échelle, fausse abscisse, fausse ordonnée, puis
//! ellipsoïde et translation vers WGS84.

use crate::datum::Datum;
use crate::gauss_kruger::BASE_FALSE_EASTING;

/// Famille de projection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionKind {
    TransverseMercator,
    Mercator,
}

impl ProjectionKind {
    fn token(self) -> &'static str {
        match self {
            Self::TransverseMercator => "tmerc",
            Self::Mercator => "merc",
        }
    }
}

/// Ellipsoïde de la définition
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EllipsoidParams {
    /// Datum connu : ellipsoïde + towgs84 depuis la table
    Datum(Datum),
    /// Ellipsoïde lu dans le WKT, sans translation connue
    Custom { a: f64, rf: f64 },
}

/// Constructeur de chaîne proj4
#[derive(Debug, Clone, PartialEq)]
pub struct ProjStringBuilder {
    kind: ProjectionKind,
    lat_0: f64,
    lon_0: f64,
    k: f64,
    x_0: f64,
    y_0: f64,
    ellipsoid: EllipsoidParams,
}

impl ProjStringBuilder {
    /// Transverse Mercator centrée sur `lon_0`, CGCS2000, x_0 = 500000
    pub fn transverse_mercator(lon_0: f64) -> Self {
        Self {
            kind: ProjectionKind::TransverseMercator,
            lat_0: 0.0,
            lon_0,
            k: 1.0,
            x_0: BASE_FALSE_EASTING,
            y_0: 0.0,
            ellipsoid: EllipsoidParams::Datum(Datum::Cgcs2000),
        }
    }

    pub fn kind(mut self, kind: ProjectionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn latitude_of_origin(mut self, lat_0: f64) -> Self {
        self.lat_0 = lat_0;
        self
    }

    pub fn scale_factor(mut self, k: f64) -> Self {
        self.k = k;
        self
    }

    pub fn false_easting(mut self, x_0: f64) -> Self {
        self.x_0 = x_0;
        self
    }

    pub fn false_northing(mut self, y_0: f64) -> Self {
        self.y_0 = y_0;
        self
    }

    pub fn datum(mut self, datum: Datum) -> Self {
        self.ellipsoid = EllipsoidParams::Datum(datum);
        self
    }

    pub fn ellipsoid(mut self, ellipsoid: EllipsoidParams) -> Self {
        self.ellipsoid = ellipsoid;
        self
    }

    /// Produit la chaîne proj4
    pub fn build(&self) -> String {
        let ellipsoid = match self.ellipsoid {
            EllipsoidParams::Datum(datum) => datum.proj_params(),
            EllipsoidParams::Custom { a, rf } => format!("+a={} +rf={}", a, rf),
        };
        format!(
            "+proj={} +lat_0={} +lon_0={} +k={} +x_0={} +y_0={} {} +units=m +no_defs",
            self.kind.token(),
            self.lat_0,
            self.lon_0,
            self.k,
            self.x_0,
            self.y_0,
            ellipsoid
        )
    }
}

/// Chaîne proj4 d'un système géographique sur le datum donné
pub fn longlat(datum: Datum) -> String {
    match datum {
        Datum::Wgs84 => "+proj=longlat +ellps=WGS84 +datum=WGS84 +no_defs".to_string(),
        other => format!("+proj=longlat {} +no_defs", other.proj_params()),
    }
}
