//! Inférence structurelle : méridien central ou numéro de fuseau extrait
//! du nom de projection

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::datum::Datum;
use crate::gauss_kruger::{
    is_standard_central_meridian, six_degree_zone_to_central_meridian, zone_false_easting,
    zone_to_central_meridian, BASE_FALSE_EASTING,
};
use crate::proj_string::ProjStringBuilder;

/// Ce que capture un motif
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    /// Numéro de fuseau 3° (méridien = 75 + (z - 25) × 3)
    ThreeDegreeZone,
    /// Numéro de fuseau 6° (méridien = 6z − 3)
    SixDegreeZone,
    /// Méridien central en degrés, bande de 3°
    ThreeDegreeMeridian,
    /// Méridien central en degrés, bande de 6°
    SixDegreeMeridian,
}

struct StructuralPattern {
    name: &'static str,
    regex: Regex,
    capture: Capture,
    /// Ignore les occurrences précédées de `UTM` (fuseaux UTM, pas Gauss-Krüger)
    skip_utm: bool,
}

const GK: &str = r"(?:GK|GAUSS[_ -]KRUGER)";
const DATUM_PREFIX: &str = r"(?:CGCS_?2000|XIAN[_ ]1980|BEIJING[_ ]1954)(?:[_ ]?/[_ ]?|[_ -])";

fn patterns() -> &'static [StructuralPattern] {
    static PATTERNS: OnceLock<Vec<StructuralPattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let build = |name: &'static str, pattern: String, capture: Capture| StructuralPattern {
            name,
            regex: Regex::new(&pattern).expect("valid structural regex"),
            capture,
            skip_utm: false,
        };
        vec![
            build(
                "3_degree_zone",
                format!(r"3[_ -]DEGREE[_ -]{GK}[_ -]ZONE[_ ]?(\d{{1,3}})"),
                Capture::ThreeDegreeZone,
            ),
            build(
                "3_degree_cm",
                format!(r"3[_ -]DEGREE[_ -]{GK}[_ -]CM[_ ]?(\d{{2,3}})E"),
                Capture::ThreeDegreeMeridian,
            ),
            build(
                "6_degree_zone",
                format!(r"(?:{DATUM_PREFIX}|6[_ -]DEGREE[_ -]){GK}[_ -]ZONE[_ ]?(\d{{1,3}})"),
                Capture::SixDegreeZone,
            ),
            build(
                "6_degree_cm",
                format!(r"(?:{DATUM_PREFIX}|6[_ -]DEGREE[_ -]){GK}[_ -]CM[_ ]?(\d{{2,3}})E"),
                Capture::SixDegreeMeridian,
            ),
            build(
                "cm_token",
                r"(?:^|[^A-Z0-9])CM[_ ]?(\d{2,3})E(?:[^A-Z]|$)".to_string(),
                Capture::ThreeDegreeMeridian,
            ),
            StructuralPattern {
                skip_utm: true,
                ..build(
                    "zone_token",
                    r"ZONE[_ ]*(\d{1,3})".to_string(),
                    Capture::ThreeDegreeZone,
                )
            },
        ]
    })
}

fn follows_utm(before: &str) -> bool {
    before
        .trim_end_matches(|c: char| c == '_' || c == ' ' || c == '-')
        .ends_with("UTM")
}

impl StructuralPattern {
    /// Premier nombre capturé hors contexte exclu
    fn capture_number(&self, normalized: &str) -> Option<i32> {
        self.regex
            .captures_iter(normalized)
            .filter(|caps| {
                !(self.skip_utm
                    && caps
                        .get(0)
                        .is_some_and(|m| follows_utm(&normalized[..m.start()])))
            })
            .find_map(|caps| caps.get(1)?.as_str().parse::<i32>().ok())
    }
}

/// Résultat de l'inférence structurelle
#[derive(Debug, Clone, PartialEq)]
pub struct StructuralMatch {
    pub pattern: &'static str,
    pub id: String,
    pub central_meridian: f64,
    pub spec: String,
}

/// Applique les motifs dans l'ordre ; le premier produisant un méridien
/// standard l'emporte.
///
/// `false_easting` est la valeur lue dans le texte, prioritaire sur la
/// valeur déduite du nom.
pub fn find(normalized: &str, false_easting: Option<f64>) -> Option<StructuralMatch> {
    for pattern in patterns() {
        let Some(number) = pattern.capture_number(normalized) else {
            continue;
        };

        let (central_meridian, default_easting) = match pattern.capture {
            Capture::ThreeDegreeZone => (zone_to_central_meridian(number), zone_false_easting(number)),
            Capture::SixDegreeZone => (
                six_degree_zone_to_central_meridian(number),
                zone_false_easting(number),
            ),
            Capture::ThreeDegreeMeridian | Capture::SixDegreeMeridian => (number, BASE_FALSE_EASTING),
        };
        let central_meridian = central_meridian as f64;

        if !is_standard_central_meridian(central_meridian) {
            debug!(
                pattern = pattern.name,
                value = number,
                central_meridian,
                "Non-standard central meridian rejected"
            );
            continue;
        }

        let datum = Datum::infer_or_default(normalized);
        let id = match pattern.capture {
            Capture::ThreeDegreeZone => format!("{}_3_Degree_GK_Zone_{}", datum.label(), number),
            Capture::SixDegreeZone => format!("{}_GK_Zone_{}", datum.label(), number),
            Capture::ThreeDegreeMeridian => {
                format!("{}_3_Degree_GK_CM_{}E", datum.label(), central_meridian)
            }
            Capture::SixDegreeMeridian => format!("{}_GK_CM_{}E", datum.label(), central_meridian),
        };
        let spec = ProjStringBuilder::transverse_mercator(central_meridian)
            .false_easting(false_easting.unwrap_or(default_easting))
            .datum(datum)
            .build();

        return Some(StructuralMatch {
            pattern: pattern.name,
            id,
            central_meridian,
            spec,
        });
    }
    None
}
