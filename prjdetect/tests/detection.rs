//! Tests de détection sur des fichiers .prj réalistes

use std::sync::Arc;

use prjdetect::{detect_projection, Catalog, CatalogEntry, Matcher, SourceMethod};

const ESRI_CGCS2000_ZONE_39: &str = r#"PROJCS["CGCS2000_3_Degree_GK_Zone_39",GEOGCS["GCS_China_Geodetic_Coordinate_System_2000",DATUM["D_China_2000",SPHEROID["CGCS2000",6378137.0,298.257222101]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]],PROJECTION["Gauss_Kruger"],PARAMETER["False_Easting",39500000.0],PARAMETER["False_Northing",0.0],PARAMETER["Central_Meridian",117.0],PARAMETER["Scale_Factor",1.0],PARAMETER["Latitude_Of_Origin",0.0],UNIT["Meter",1.0]]"#;

const OGC_CGCS2000_ZONE_39: &str = r#"PROJCS["CGCS2000 / 3-degree Gauss-Kruger zone 39",
    GEOGCS["China Geodetic Coordinate System 2000",
        DATUM["China_2000",
            SPHEROID["CGCS2000",6378137,298.257222101,AUTHORITY["EPSG","1024"]],
            AUTHORITY["EPSG","1043"]],
        PRIMEM["Greenwich",0,AUTHORITY["EPSG","8901"]],
        UNIT["degree",0.0174532925199433,AUTHORITY["EPSG","9122"]],
        AUTHORITY["EPSG","4490"]],
    PROJECTION["Transverse_Mercator"],
    PARAMETER["latitude_of_origin",0],
    PARAMETER["central_meridian",117],
    PARAMETER["scale_factor",1],
    PARAMETER["false_easting",39500000],
    PARAMETER["false_northing",0],
    UNIT["metre",1,AUTHORITY["EPSG","9001"]],
    AUTHORITY["EPSG","4527"]]"#;

const XIAN_CUSTOM_TM: &str = r#"PROJCS["Custom_TM",GEOGCS["GCS_Xian_1980",DATUM["D_Xian_1980",SPHEROID["Xian_1980",6378140.0,298.257]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]],PROJECTION["Transverse_Mercator"],PARAMETER["False_Easting",500000.0],PARAMETER["False_Northing",0.0],PARAMETER["Central_Meridian",114.0],PARAMETER["Scale_Factor",0.9996],PARAMETER["Latitude_Of_Origin",0.0],UNIT["Meter",1.0]]"#;

#[test]
fn test_esri_wkt_exact_on_root_name() {
    let result = detect_projection(Some(ESRI_CGCS2000_ZONE_39)).unwrap();
    assert_eq!(result.match_type, SourceMethod::Exact);
    assert_eq!(result.definition.id(), "CGCS2000_3_Degree_GK_Zone_39");
    assert_eq!(result.epsg, Some(4527));
    assert_eq!(result.central_meridian, Some(117.0));
    assert_eq!(
        result.definition.transform_spec(),
        "+proj=tmerc +lat_0=0 +lon_0=117 +k=1 +x_0=39500000 +y_0=0 \
         +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs"
    );
}

#[test]
fn test_epsg_takes_priority() {
    let result = detect_projection(Some(OGC_CGCS2000_ZONE_39)).unwrap();
    assert_eq!(result.match_type, SourceMethod::Epsg);
    assert_eq!(result.epsg, Some(4527));
    assert_eq!(result.definition.id(), "CGCS2000_3_Degree_GK_Zone_39");
}

#[test]
fn test_epsg_overrides_conflicting_name_and_keyword() {
    // Le nom désigne le fuseau 40, le code celui du fuseau 39
    let prj = r#"PROJCS["CGCS2000_3_Degree_GK_Zone_40",GEOGCS["GCS_China_Geodetic_Coordinate_System_2000",AUTHORITY["EPSG","4490"]],PROJECTION["Gauss_Kruger"],PARAMETER["Central_Meridian",120.0],PARAMETER["False_Easting",40500000.0],AUTHORITY["EPSG","4527"]]"#;
    let result = detect_projection(Some(prj)).unwrap();
    assert_eq!(result.match_type, SourceMethod::Epsg);
    assert_eq!(result.epsg, Some(4527));
    assert_eq!(result.definition.id(), "CGCS2000_3_Degree_GK_Zone_39");
    assert!(result.definition.transform_spec().contains("+lon_0=117 "));

    let result = detect_projection(Some("MY_SITE_UTM_ZONE_50N_GRID EPSG:4527")).unwrap();
    assert_eq!(result.match_type, SourceMethod::Epsg);
    assert_eq!(result.definition.id(), "CGCS2000_3_Degree_GK_Zone_39");
}

#[test]
fn test_esri_projcs_with_geographic_authority_only() {
    let prj = r#"PROJCS["CGCS2000_3_Degree_GK_Zone_39",GEOGCS["GCS_China_Geodetic_Coordinate_System_2000",DATUM["D_China_2000",SPHEROID["CGCS2000",6378137.0,298.257222101]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433],AUTHORITY["EPSG","4490"]],PROJECTION["Gauss_Kruger"],PARAMETER["False_Easting",39500000.0],PARAMETER["False_Northing",0.0],PARAMETER["Central_Meridian",117.0],PARAMETER["Scale_Factor",1.0],PARAMETER["Latitude_Of_Origin",0.0],UNIT["Meter",1.0]]"#;
    let result = detect_projection(Some(prj)).unwrap();
    assert_eq!(result.match_type, SourceMethod::Exact);
    assert_eq!(result.epsg, Some(4527));
    assert!(result.definition.transform_spec().starts_with("+proj=tmerc "));

    // Même forme pour Xian 1980 / Beijing 1954 : jamais un système géographique
    for (geographic, name) in [(4610, "GCS_Xian_1980"), (4214, "GCS_Beijing_1954")] {
        let prj = format!(
            r#"PROJCS["Local_TM",GEOGCS["{}",AUTHORITY["EPSG","{}"]],PROJECTION["Transverse_Mercator"],PARAMETER["Central_Meridian",114.0],PARAMETER["False_Easting",500000.0]]"#,
            name, geographic
        );
        let result = detect_projection(Some(&prj)).unwrap();
        assert_ne!(result.match_type, SourceMethod::Epsg, "{}", name);
        assert!(!result.definition.transform_spec().contains("longlat"), "{}", name);
    }
}

#[test]
fn test_spaced_utm_name_uses_parameters() {
    let prj = r#"PROJCS["WGS 84 / UTM zone 43N",GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433]],PROJECTION["Transverse_Mercator"],PARAMETER["latitude_of_origin",0],PARAMETER["central_meridian",75],PARAMETER["scale_factor",0.9996],PARAMETER["false_easting",500000],PARAMETER["false_northing",0],UNIT["metre",1]]"#;
    let result = detect_projection(Some(prj)).unwrap();
    assert_eq!(result.match_type, SourceMethod::ParameterParsed);
    assert_eq!(result.central_meridian, Some(75.0));
    let spec = result.definition.transform_spec();
    assert!(spec.contains("+lon_0=75 "));
    assert!(spec.contains("+k=0.9996 "));
    assert!(spec.contains("+x_0=500000 "));
}

#[test]
fn test_ogc_name_without_authority_uses_structure() {
    let prj = r#"PROJCS["CGCS2000 / 3-degree Gauss-Kruger zone 39",PROJECTION["Transverse_Mercator"],PARAMETER["false_easting",39500000]]"#;
    let result = detect_projection(Some(prj)).unwrap();
    assert_eq!(result.match_type, SourceMethod::Regex);
    assert_eq!(result.matched_pattern.as_deref(), Some("3_degree_zone"));
    assert_eq!(result.definition.id(), "CGCS2000_3_Degree_GK_Zone_39");
    assert!(result.definition.transform_spec().contains("+x_0=39500000 "));
}

#[test]
fn test_zone_number_maps_to_central_meridian() {
    for (zone, cm) in [(25, 75.0), (39, 117.0), (41, 123.0), (45, 135.0)] {
        let text = format!("LOCAL SURVEY ZONE {}", zone);
        let result = detect_projection(Some(&text)).unwrap();
        assert_eq!(result.central_meridian, Some(cm), "zone {}", zone);
        assert!(result
            .definition
            .transform_spec()
            .contains(&format!("+lon_0={} ", cm)));
    }
}

#[test]
fn test_non_standard_meridian_not_snapped() {
    assert!(detect_projection(Some("LOCAL_CM_118E")).is_none());
    assert!(detect_projection(Some("SURVEY ZONE 12")).is_none());
}

#[test]
fn test_structural_datum_from_name() {
    let result =
        detect_projection(Some(r#"PROJCS["Beijing_1954_3_Degree_GK_CM_120E_local"]"#)).unwrap();
    assert_eq!(result.match_type, SourceMethod::Regex);
    assert_eq!(result.definition.id(), "Beijing_1954_3_Degree_GK_CM_120E");
    assert!(result.definition.transform_spec().contains("+a=6378245"));
}

#[test]
fn test_ambiguous_keyword_falls_through() {
    // CGCS2000 désigne des dizaines d'entrées : pas de correspondance
    assert!(detect_projection(Some("CGCS2000")).is_none());
}

#[test]
fn test_unique_keyword() {
    let result = detect_projection(Some("MY_SITE_UTM_ZONE_50N_GRID")).unwrap();
    assert_eq!(result.match_type, SourceMethod::Keyword);
    assert_eq!(result.matched_keyword.as_deref(), Some("UTM_ZONE_50N"));
    assert_eq!(result.epsg, Some(32650));
}

#[test]
fn test_parameter_parsing() {
    let result = detect_projection(Some(XIAN_CUSTOM_TM)).unwrap();
    assert_eq!(result.match_type, SourceMethod::ParameterParsed);
    assert_eq!(result.central_meridian, Some(114.0));
    let spec = result.definition.transform_spec();
    assert!(spec.starts_with("+proj=tmerc "));
    assert!(spec.contains("+lon_0=114 "));
    assert!(spec.contains("+k=0.9996 "));
    assert!(spec.contains("+a=6378140"));
}

#[test]
fn test_absent_or_empty_input() {
    assert!(detect_projection(None).is_none());
    assert!(detect_projection(Some("")).is_none());
    assert!(detect_projection(Some("  \t\n ")).is_none());
}

#[test]
fn test_detection_is_deterministic() {
    let first = detect_projection(Some(OGC_CGCS2000_ZONE_39));
    for _ in 0..5 {
        assert_eq!(detect_projection(Some(OGC_CGCS2000_ZONE_39)), first);
    }
}

#[test]
fn test_injected_catalog() {
    let catalog = Catalog::from_entries([CatalogEntry::new(
        "Hefei_Local_Grid",
        None,
        "+proj=tmerc +lat_0=0 +lon_0=117.3 +k=1 +x_0=0 +y_0=0 +ellps=GRS80 +units=m +no_defs",
    )
    .with_central_meridian(117.3)])
    .unwrap();
    let matcher = Matcher::new(Arc::new(catalog));

    let result = matcher
        .detect(Some(r#"PROJCS["Hefei_Local_Grid",PROJECTION["Transverse_Mercator"]]"#))
        .unwrap();
    assert_eq!(result.match_type, SourceMethod::Exact);
    assert_eq!(result.central_meridian, Some(117.3));

    // Sans le catalogue embarqué, un code EPSG standard n'est plus reconnu
    assert!(matcher.detect(Some("EPSG:4527")).is_none());
}

#[test]
fn test_extra_entries_extend_builtin() {
    let json = r#"[{"name": "Hefei_Local_Grid", "spec": "+proj=tmerc +lon_0=117.3 +x_0=0 +ellps=GRS80"}]"#;
    let catalog = Catalog::builtin().with_extra_json(json).unwrap();
    assert_eq!(catalog.len(), 209);

    let matcher = Matcher::new(Arc::new(catalog));
    assert_eq!(
        matcher.detect(Some("hefei_local_grid")).unwrap().match_type,
        SourceMethod::Exact
    );
    assert_eq!(
        matcher.detect(Some("EPSG:4527")).unwrap().match_type,
        SourceMethod::Epsg
    );
}
