//! Table des datums chinois et de leurs paramètres proj4
//!
//! Chaque datum associe un ellipsoïde (demi-axes) et des paramètres de
//! translation vers WGS84 (`+towgs84`, 7 paramètres).

use serde::Serialize;

/// Datum géodésique supporté
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Datum {
    /// China Geodetic Coordinate System 2000 (ellipsoïde CGCS2000 ≈ GRS80)
    Cgcs2000,
    /// Xian 1980 (ellipsoïde IAG 1975)
    Xian1980,
    /// Beijing 1954 (ellipsoïde de Krassovsky)
    Beijing1954,
    /// WGS84
    Wgs84,
}

impl Datum {
    /// Préfixe utilisé dans les noms de projection (`CGCS2000_3_Degree_GK_...`)
    pub fn label(self) -> &'static str {
        match self {
            Self::Cgcs2000 => "CGCS2000",
            Self::Xian1980 => "Xian_1980",
            Self::Beijing1954 => "Beijing_1954",
            Self::Wgs84 => "WGS_1984",
        }
    }

    /// Paramètres d'ellipsoïde proj4
    pub fn ellipsoid_params(self) -> &'static str {
        match self {
            Self::Cgcs2000 => "+ellps=GRS80",
            Self::Xian1980 => "+a=6378140 +b=6356755.288157528",
            Self::Beijing1954 => "+a=6378245 +b=6356863.018773047",
            Self::Wgs84 => "+ellps=WGS84",
        }
    }

    /// Paramètres de translation vers WGS84 (dx, dy, dz, rx, ry, rz, ds)
    pub fn towgs84(self) -> &'static str {
        match self {
            Self::Cgcs2000 | Self::Wgs84 => "0,0,0,0,0,0,0",
            Self::Xian1980 => "12.7,-131.3,-44.7,0,0,0,0",
            Self::Beijing1954 => "15.8,-154.4,-82.3,0,0,0,0",
        }
    }

    /// Fragment proj4 complet : ellipsoïde + towgs84
    pub fn proj_params(self) -> String {
        format!("{} +towgs84={}", self.ellipsoid_params(), self.towgs84())
    }

    /// Déduit le datum d'un texte PRJ normalisé (majuscules).
    ///
    /// Les noms explicites passent avant les années seules : l'ellipsoïde de
    /// CGCS2000 s'appelle souvent `GRS_1980`, ce qui ferait sinon conclure à
    /// Xian 1980.
    pub fn infer(normalized: &str) -> Option<Self> {
        let has = |needles: &[&str]| needles.iter().any(|n| normalized.contains(n));

        if has(&["CGCS2000", "CGCS_2000", "CHINA_2000", "CHINA_GEODETIC"]) {
            Some(Self::Cgcs2000)
        } else if has(&["XIAN"]) {
            Some(Self::Xian1980)
        } else if has(&["BEIJING"]) {
            Some(Self::Beijing1954)
        } else if has(&["GRS_1980", "GRS 1980", "GRS80"]) {
            Some(Self::Cgcs2000)
        } else if has(&["KRASOVSKY", "KRASSOWSKY", "KRASSOVSKY"]) {
            Some(Self::Beijing1954)
        } else if has(&["1980", "IAG_1975"]) {
            Some(Self::Xian1980)
        } else if has(&["1954"]) {
            Some(Self::Beijing1954)
        } else if normalized.contains("WGS84")
            || normalized.contains("WGS_1984")
            || normalized.contains("WGS 84")
        {
            Some(Self::Wgs84)
        } else {
            None
        }
    }

    /// Comme [`Datum::infer`], avec CGCS2000 par défaut
    pub fn infer_or_default(normalized: &str) -> Self {
        Self::infer(normalized).unwrap_or(Self::Cgcs2000)
    }
}
