//! Types de données pour le crate prjdetect

use std::fmt;

use serde::Serialize;

/// Stratégie ayant produit une définition de projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceMethod {
    /// Nom canonique identique à une entrée du catalogue
    Exact,
    /// Mot-clé présent dans une seule entrée du catalogue
    Keyword,
    /// Méridien central ou numéro de fuseau extrait par motif
    Regex,
    /// Définition synthétisée depuis les paramètres WKT bruts
    ParameterParsed,
    /// Code EPSG connu du catalogue
    Epsg,
    /// Projection par défaut (aucune détection)
    DefaultFallback,
}

impl SourceMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Keyword => "keyword",
            Self::Regex => "regex",
            Self::ParameterParsed => "parameter-parsed",
            Self::Epsg => "epsg",
            Self::DefaultFallback => "default-fallback",
        }
    }
}

impl fmt::Display for SourceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Définition de projection immuable : identifiant + chaîne proj4
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ProjectionDefinition {
    id: String,
    transform_spec: String,
    source_method: SourceMethod,
}

impl ProjectionDefinition {
    pub fn new(
        id: impl Into<String>,
        transform_spec: impl Into<String>,
        source_method: SourceMethod,
    ) -> Self {
        Self {
            id: id.into(),
            transform_spec: transform_spec.into(),
            source_method,
        }
    }

    /// Clé du catalogue ou nom synthétisé
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Chaîne de paramètres proj4 (`+proj=tmerc +lat_0=0 ...`)
    pub fn transform_spec(&self) -> &str {
        &self.transform_spec
    }

    pub fn source_method(&self) -> SourceMethod {
        self.source_method
    }
}

/// Résultat d'un appel de détection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionResult {
    pub match_type: SourceMethod,
    pub definition: ProjectionDefinition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub central_meridian: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epsg: Option<u32>,
}

impl DetectionResult {
    /// Résultat minimal : seuls le type et la définition sont renseignés
    pub fn new(definition: ProjectionDefinition) -> Self {
        Self {
            match_type: definition.source_method(),
            definition,
            matched_keyword: None,
            matched_pattern: None,
            central_meridian: None,
            epsg: None,
        }
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.matched_keyword = Some(keyword.into());
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.matched_pattern = Some(pattern.into());
        self
    }

    pub fn with_central_meridian(mut self, central_meridian: Option<f64>) -> Self {
        self.central_meridian = central_meridian;
        self
    }

    pub fn with_epsg(mut self, epsg: Option<u32>) -> Self {
        self.epsg = epsg;
        self
    }
}
