//! Configuration du transformateur

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Heuristique « déjà en WGS84 »
///
/// Une projection centrée près de l'équateur et du méridien d'origine peut
/// produire des coordonnées dans `[-180, 180] × [-90, 90]` : l'heuristique
/// peut alors court-circuiter à tort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Wgs84Detection {
    /// Première feuille uniquement
    #[default]
    FirstLeaf,
    /// Toutes les feuilles dans les bornes
    AllLeaves,
    /// Toujours transformer
    Disabled,
}

/// Options d'un appel `transform`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TransformOptions {
    /// Remplacer un point en échec par l'original (sinon erreur typée)
    #[serde(default)]
    pub fallback_to_original: bool,

    #[serde(default)]
    pub wgs84_detection: Wgs84Detection,
}

impl TransformOptions {
    pub fn with_fallback(mut self, fallback_to_original: bool) -> Self {
        self.fallback_to_original = fallback_to_original;
        self
    }

    pub fn with_wgs84_detection(mut self, detection: Wgs84Detection) -> Self {
        self.wgs84_detection = detection;
        self
    }
}

/// Options d'un lot de points
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BatchOptions {
    /// Taille des paquets (progression rapportée après chaque paquet)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Annoter les points en échec au lieu de les écarter
    #[serde(default)]
    pub include_failures: bool,
}

fn default_batch_size() -> usize {
    100
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            include_failures: false,
        }
    }
}

/// Configuration principale
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub transform: TransformOptions,

    #[serde(default)]
    pub batch: BatchOptions,

    /// Entrées de catalogue supplémentaires (JSON)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
}

impl Config {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Charge une configuration depuis un preset embarqué
    pub fn from_preset(preset: &str) -> Result<Self> {
        match preset {
            "default" => Self::load_embedded(include_str!("presets/default.json")),
            "lenient" => Self::load_embedded(include_str!("presets/lenient.json")),
            "strict" => Self::load_embedded(include_str!("presets/strict.json")),
            _ => anyhow::bail!("Unknown preset: {}. Use: default, lenient, strict", preset),
        }
    }

    /// Nom de preset ou chemin vers un fichier JSON
    pub fn resolve(spec: &str) -> Result<Self> {
        match spec {
            "default" | "lenient" | "strict" => Self::from_preset(spec),
            _ => Self::load(Path::new(spec)),
        }
    }

    fn load_embedded(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse embedded config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let default = Config::from_preset("default").unwrap();
        assert_eq!(default, Config::default());

        let lenient = Config::from_preset("lenient").unwrap();
        assert!(lenient.transform.fallback_to_original);
        assert!(lenient.batch.include_failures);

        let strict = Config::from_preset("strict").unwrap();
        assert_eq!(strict.transform.wgs84_detection, Wgs84Detection::AllLeaves);
        assert!(!strict.transform.fallback_to_original);

        assert!(Config::from_preset("fast").is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"transform": {"wgs84_detection": "disabled"}}"#).unwrap();
        assert_eq!(config.transform.wgs84_detection, Wgs84Detection::Disabled);
        assert!(!config.transform.fallback_to_original);
        assert_eq!(config.batch.batch_size, 100);
        assert!(config.catalog.is_none());
    }

    #[test]
    fn test_resolve_missing_file() {
        let err = Config::resolve("/nonexistent/zonegeo.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
