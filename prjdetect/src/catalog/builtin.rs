//! Catalogue embarqué des systèmes de coordonnées chinois
//!
//! Les entrées sont générées à partir des règles de découpage Gauss-Kruger
//! plutôt que listées à la main. Noms au format ESRI (`.prj`), codes EPSG
//! officiels.

use super::CatalogEntry;
use crate::datum::Datum;
use crate::gauss_kruger::{
    six_degree_zone_to_central_meridian, zone_false_easting, zone_to_central_meridian,
    BASE_FALSE_EASTING, SIX_DEGREE_ZONES, THREE_DEGREE_ZONES,
};
use crate::proj_string::{longlat, ProjStringBuilder};

/// Premiers codes EPSG de chaque série, par datum
struct EpsgSeries {
    datum: Datum,
    three_degree_zone: u32,
    three_degree_cm: u32,
    six_degree_zone: u32,
    six_degree_cm: u32,
}

const SERIES: &[EpsgSeries] = &[
    EpsgSeries {
        datum: Datum::Cgcs2000,
        three_degree_zone: 4513,
        three_degree_cm: 4534,
        six_degree_zone: 4491,
        six_degree_cm: 4502,
    },
    EpsgSeries {
        datum: Datum::Xian1980,
        three_degree_zone: 2349,
        three_degree_cm: 2370,
        six_degree_zone: 2327,
        six_degree_cm: 2338,
    },
    EpsgSeries {
        datum: Datum::Beijing1954,
        three_degree_zone: 2401,
        three_degree_cm: 2422,
        six_degree_zone: 21413,
        six_degree_cm: 21453,
    },
];

/// Fuseaux UTM nord couvrant la Chine
const UTM_ZONES: std::ops::RangeInclusive<u32> = 43..=53;

/// Construit toutes les entrées embarquées
pub fn entries() -> Vec<CatalogEntry> {
    let mut entries = Vec::with_capacity(220);

    for series in SERIES {
        let label = series.datum.label();

        for (i, zone) in THREE_DEGREE_ZONES.enumerate() {
            let cm = zone_to_central_meridian(zone) as f64;
            let i = i as u32;

            entries.push(
                CatalogEntry::new(
                    format!("{}_3_Degree_GK_Zone_{}", label, zone),
                    Some(series.three_degree_zone + i),
                    gauss_kruger(series.datum, cm, zone_false_easting(zone)),
                )
                .with_central_meridian(cm),
            );
            entries.push(
                CatalogEntry::new(
                    format!("{}_3_Degree_GK_CM_{}E", label, cm),
                    Some(series.three_degree_cm + i),
                    gauss_kruger(series.datum, cm, BASE_FALSE_EASTING),
                )
                .with_central_meridian(cm),
            );
        }

        for (i, zone) in SIX_DEGREE_ZONES.enumerate() {
            let cm = six_degree_zone_to_central_meridian(zone) as f64;
            let i = i as u32;

            entries.push(
                CatalogEntry::new(
                    format!("{}_GK_Zone_{}", label, zone),
                    Some(series.six_degree_zone + i),
                    gauss_kruger(series.datum, cm, zone_false_easting(zone)),
                )
                .with_central_meridian(cm),
            );
            entries.push(
                CatalogEntry::new(
                    format!("{}_GK_CM_{}E", label, cm),
                    Some(series.six_degree_cm + i),
                    gauss_kruger(series.datum, cm, BASE_FALSE_EASTING),
                )
                .with_central_meridian(cm),
            );
        }
    }

    for zone in UTM_ZONES {
        let cm = (zone * 6) as f64 - 183.0;
        entries.push(
            CatalogEntry::new(
                format!("WGS_1984_UTM_Zone_{}N", zone),
                Some(32600 + zone),
                format!("+proj=utm +zone={} +datum=WGS84 +units=m +no_defs", zone),
            )
            .with_central_meridian(cm),
        );
    }

    entries.push(CatalogEntry::new(
        "WGS_1984_Web_Mercator_Auxiliary_Sphere",
        Some(3857),
        "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 \
         +units=m +no_defs",
    ));

    entries.push(CatalogEntry::new(
        "GCS_WGS_1984",
        Some(4326),
        longlat(Datum::Wgs84),
    ));
    entries.push(CatalogEntry::new(
        "GCS_China_Geodetic_Coordinate_System_2000",
        Some(4490),
        longlat(Datum::Cgcs2000),
    ));
    entries.push(CatalogEntry::new(
        "GCS_Xian_1980",
        Some(4610),
        longlat(Datum::Xian1980),
    ));
    entries.push(CatalogEntry::new(
        "GCS_Beijing_1954",
        Some(4214),
        longlat(Datum::Beijing1954),
    ));

    entries
}

fn gauss_kruger(datum: Datum, cm: f64, false_easting: f64) -> String {
    ProjStringBuilder::transverse_mercator(cm)
        .false_easting(false_easting)
        .datum(datum)
        .build()
}
