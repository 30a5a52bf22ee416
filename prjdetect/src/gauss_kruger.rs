//! Découpage en fuseaux Gauss-Kruger utilisé par les autorités chinoises
//!
//! - fuseaux de 3° numérotés 25 à 45 (méridiens centraux 75°E à 135°E)
//! - fuseaux de 6° numérotés 13 à 23 (méridiens centraux 75°E à 135°E)

/// Premier méridien central standard (°E)
pub const MIN_CENTRAL_MERIDIAN: i32 = 75;

/// Dernier méridien central standard (°E)
pub const MAX_CENTRAL_MERIDIAN: i32 = 135;

/// Fuseaux 3° couvrant la Chine
pub const THREE_DEGREE_ZONES: std::ops::RangeInclusive<i32> = 25..=45;

/// Fuseaux 6° couvrant la Chine
pub const SIX_DEGREE_ZONES: std::ops::RangeInclusive<i32> = 13..=23;

/// Fausse abscisse sans préfixe de fuseau
pub const BASE_FALSE_EASTING: f64 = 500_000.0;

/// Numéro de fuseau 3° → méridien central
pub fn zone_to_central_meridian(zone: i32) -> i32 {
    75 + (zone - 25) * 3
}

/// Méridien central → numéro de fuseau 3°
pub fn central_meridian_to_zone(central_meridian: f64) -> i32 {
    ((central_meridian - 75.0) / 3.0 + 25.0).round() as i32
}

/// Numéro de fuseau 6° → méridien central
pub fn six_degree_zone_to_central_meridian(zone: i32) -> i32 {
    6 * zone - 3
}

/// Vrai si la valeur est l'un des 21 méridiens centraux {75, 78, ..., 135}.
/// Aucun arrondi n'est appliqué.
pub fn is_standard_central_meridian(central_meridian: f64) -> bool {
    if central_meridian.fract() != 0.0 {
        return false;
    }
    let cm = central_meridian as i32;
    (MIN_CENTRAL_MERIDIAN..=MAX_CENTRAL_MERIDIAN).contains(&cm) && (cm - MIN_CENTRAL_MERIDIAN) % 3 == 0
}

/// Fausse abscisse préfixée par le numéro de fuseau (ex: 39500000 pour le fuseau 39)
pub fn zone_false_easting(zone: i32) -> f64 {
    zone as f64 * 1_000_000.0 + BASE_FALSE_EASTING
}

/// Les 21 méridiens centraux standards
pub fn standard_central_meridians() -> impl Iterator<Item = i32> {
    (MIN_CENTRAL_MERIDIAN..=MAX_CENTRAL_MERIDIAN).step_by(3)
}
