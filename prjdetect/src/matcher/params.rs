//! Extraction des paramètres WKT bruts et synthèse d'une définition

use std::sync::OnceLock;

use regex::Regex;

use crate::datum::Datum;
use crate::proj_string::{EllipsoidParams, ProjStringBuilder, ProjectionKind};

/// Paramètres lus dans le texte PRJ (tous optionnels)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WktParameters {
    pub projection: Option<String>,
    pub central_meridian: Option<f64>,
    pub false_easting: Option<f64>,
    pub false_northing: Option<f64>,
    pub scale_factor: Option<f64>,
    pub latitude_of_origin: Option<f64>,
    pub datum: Option<String>,
    pub ellipsoid: Option<String>,
    /// Demi-grand axe et inverse de l'aplatissement de l'ellipsoïde
    pub ellipsoid_axes: Option<(f64, f64)>,
}

struct NumericParameter {
    regex: Regex,
    apply: fn(&mut WktParameters, f64),
}

fn numeric_parameters() -> &'static [NumericParameter] {
    static PARAMS: OnceLock<Vec<NumericParameter>> = OnceLock::new();
    PARAMS.get_or_init(|| {
        let number = r#"["\s,]*(-?\d+(?:\.\d+)?(?:E[+-]?\d+)?)"#;
        let build = |name: &str, apply: fn(&mut WktParameters, f64)| NumericParameter {
            regex: Regex::new(&format!("(?i){}{}", name, number)).expect("valid parameter regex"),
            apply,
        };
        vec![
            build(r"CENTRAL[_\s]MERIDIAN", |p, v| p.central_meridian = Some(v)),
            build(r"FALSE[_\s]EASTING", |p, v| p.false_easting = Some(v)),
            build(r"FALSE[_\s]NORTHING", |p, v| p.false_northing = Some(v)),
            build(r"SCALE[_\s]FACTOR", |p, v| p.scale_factor = Some(v)),
            build(r"LATITUDE[_\s]OF[_\s]ORIGIN", |p, v| p.latitude_of_origin = Some(v)),
        ]
    })
}

fn named_node(node: &str) -> Regex {
    Regex::new(&format!(r#"(?i){}\s*\[\s*"([^"]+)""#, node)).expect("valid node regex")
}

fn projection_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| named_node("PROJECTION"))
}

fn datum_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| named_node("DATUM"))
}

fn ellipsoid_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r#"(?i)(?:ELLIPSOID|SPHEROID)\s*\[\s*"([^"]+)"\s*(?:,\s*(\d+(?:\.\d+)?)\s*,\s*(\d+(?:\.\d+)?))?"#,
        )
        .expect("valid ellipsoid regex")
    })
}

/// Lit tous les paramètres reconnus
pub fn extract(text: &str) -> WktParameters {
    let mut params = WktParameters::default();

    for parameter in numeric_parameters() {
        let value = parameter
            .regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .filter(|v| v.is_finite());
        if let Some(value) = value {
            (parameter.apply)(&mut params, value);
        }
    }

    let first_group = |regex: &Regex| {
        regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    };
    params.projection = first_group(projection_pattern());
    params.datum = first_group(datum_pattern());

    if let Some(caps) = ellipsoid_pattern().captures(text) {
        params.ellipsoid = caps.get(1).map(|m| m.as_str().to_string());
        let axis = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<f64>().ok());
        if let (Some(a), Some(rf)) = (axis(2), axis(3)) {
            if a > 0.0 && rf > 0.0 {
                params.ellipsoid_axes = Some((a, rf));
            }
        }
    }

    params
}

impl WktParameters {
    /// Famille de projection reconnue dans `PROJECTION[...]`
    pub fn projection_kind(&self) -> Option<ProjectionKind> {
        let name = self.projection.as_deref()?.to_uppercase().replace([' ', '-'], "_");
        if name.contains("TRANSVERSE_MERCATOR") || name.contains("GAUSS_KRUGER") {
            Some(ProjectionKind::TransverseMercator)
        } else if name.contains("MERCATOR") {
            Some(ProjectionKind::Mercator)
        } else {
            None
        }
    }

    /// Ellipsoïde déduit des nœuds DATUM / ELLIPSOID, puis des axes lus,
    /// sinon WGS84.
    pub fn ellipsoid_params(&self) -> EllipsoidParams {
        let names = format!(
            "{} {}",
            self.datum.as_deref().unwrap_or_default(),
            self.ellipsoid.as_deref().unwrap_or_default()
        )
        .to_uppercase();

        if let Some(datum) = Datum::infer(&names) {
            return EllipsoidParams::Datum(datum);
        }
        match self.ellipsoid_axes {
            Some((a, rf)) => EllipsoidParams::Custom { a, rf },
            None => EllipsoidParams::Datum(Datum::Wgs84),
        }
    }

    /// Suffisant pour synthétiser : méridien central + (fausse abscisse ou
    /// projection reconnue)
    pub fn is_sufficient(&self) -> bool {
        self.central_meridian.is_some()
            && (self.false_easting.is_some() || self.projection_kind().is_some())
    }

    /// Chaîne proj4 synthétisée, `None` si les paramètres sont insuffisants.
    ///
    /// Les valeurs explicites sont reprises telles quelles, y compris un
    /// facteur d'échelle nul.
    pub fn synthesize(&self) -> Option<String> {
        if !self.is_sufficient() {
            return None;
        }
        let central_meridian = self.central_meridian?;
        let mut builder = ProjStringBuilder::transverse_mercator(central_meridian)
            .kind(
                self.projection_kind()
                    .unwrap_or(ProjectionKind::TransverseMercator),
            )
            .ellipsoid(self.ellipsoid_params());

        if let Some(lat_0) = self.latitude_of_origin {
            builder = builder.latitude_of_origin(lat_0);
        }
        if let Some(k) = self.scale_factor {
            builder = builder.scale_factor(k);
        }
        if let Some(x_0) = self.false_easting {
            builder = builder.false_easting(x_0);
        }
        if let Some(y_0) = self.false_northing {
            builder = builder.false_northing(y_0);
        }
        Some(builder.build())
    }
}
