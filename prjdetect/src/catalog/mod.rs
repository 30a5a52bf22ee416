//! Catalogue immuable des systèmes de coordonnées connus
//!
//! Indexé par nom normalisé et par code EPSG. Le catalogue embarqué est
//! construit une seule fois par processus ([`Catalog::shared`]) ; les tests
//! peuvent injecter un catalogue minimal via [`Catalog::from_entries`].

mod builtin;

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CatalogError;
use crate::normalize::normalize_prj;
use crate::types::{ProjectionDefinition, SourceMethod};

/// Une entrée du catalogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Nom canonique (nom de projection du fichier .prj)
    pub name: String,

    /// Code EPSG (optionnel)
    #[serde(default)]
    pub epsg: Option<u32>,

    /// Chaîne proj4
    pub spec: String,

    /// Méridien central, si connu
    #[serde(default)]
    pub central_meridian: Option<f64>,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, epsg: Option<u32>, spec: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            epsg,
            spec: spec.into(),
            central_meridian: None,
        }
    }

    pub fn with_central_meridian(mut self, central_meridian: f64) -> Self {
        self.central_meridian = Some(central_meridian);
        self
    }

    /// Système géographique (`+proj=longlat`) plutôt que projeté
    pub fn is_geographic(&self) -> bool {
        self.spec.split_whitespace().any(|token| {
            matches!(
                token,
                "+proj=longlat" | "+proj=latlong" | "+proj=lonlat" | "+proj=latlon"
            )
        })
    }

    /// Définition de projection correspondant à cette entrée
    pub fn definition(&self, method: SourceMethod) -> ProjectionDefinition {
        ProjectionDefinition::new(self.name.clone(), self.spec.clone(), method)
    }
}

/// Catalogue de projections
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    /// Noms normalisés, même ordre que `entries`
    normalized: Vec<String>,
    by_name: HashMap<String, usize>,
    by_epsg: HashMap<u32, usize>,
}

impl Catalog {
    /// Catalogue vide
    pub fn empty() -> Self {
        Self::default()
    }

    /// Catalogue embarqué (CGCS2000, Xian 1980, Beijing 1954, UTM, Web Mercator)
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        for entry in builtin::entries() {
            if let Err(e) = catalog.insert(entry) {
                warn!(error = %e, "Skipping built-in catalog entry");
            }
        }
        debug!(entries = catalog.len(), "Built-in projection catalog ready");
        catalog
    }

    /// Instance partagée du catalogue embarqué, construite au premier appel
    pub fn shared() -> Arc<Catalog> {
        static SHARED: OnceLock<Arc<Catalog>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(Self::builtin())).clone()
    }

    /// Construit un catalogue depuis une liste d'entrées (doublons refusés)
    pub fn from_entries(
        entries: impl IntoIterator<Item = CatalogEntry>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::empty();
        for entry in entries {
            catalog.insert(entry)?;
        }
        Ok(catalog)
    }

    /// Ajoute des entrées décrites en JSON (tableau de [`CatalogEntry`])
    pub fn with_extra_json(mut self, json: &str) -> Result<Self, CatalogError> {
        let extra: Vec<CatalogEntry> = serde_json::from_str(json)?;
        let count = extra.len();
        for entry in extra {
            self.insert(entry)?;
        }
        debug!(added = count, total = self.len(), "Extra catalog entries loaded");
        Ok(self)
    }

    /// Ajoute des entrées depuis un fichier JSON
    pub fn load_extra(self, path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        self.with_extra_json(&content)
    }

    fn insert(&mut self, entry: CatalogEntry) -> Result<(), CatalogError> {
        let key = normalize_prj(&entry.name);
        if key.is_empty() {
            return Err(CatalogError::invalid_entry(&entry.name, "empty name"));
        }
        if !entry.spec.trim_start().starts_with("+proj=") {
            return Err(CatalogError::invalid_entry(
                &entry.name,
                "spec must start with +proj=",
            ));
        }
        if self.by_name.contains_key(&key) {
            return Err(CatalogError::DuplicateName(entry.name));
        }
        if let Some(code) = entry.epsg {
            if let Some(&existing) = self.by_epsg.get(&code) {
                return Err(CatalogError::DuplicateEpsg {
                    code,
                    first: self.entries[existing].name.clone(),
                    second: entry.name,
                });
            }
        }

        let index = self.entries.len();
        if let Some(code) = entry.epsg {
            self.by_epsg.insert(code, index);
        }
        self.by_name.insert(key.clone(), index);
        self.normalized.push(key);
        self.entries.push(entry);
        Ok(())
    }

    /// Recherche par code EPSG
    pub fn get_by_epsg(&self, code: u32) -> Option<&CatalogEntry> {
        self.by_epsg.get(&code).map(|&i| &self.entries[i])
    }

    /// Recherche par nom (normalisé avant comparaison)
    pub fn get_by_name(&self, name: &str) -> Option<&CatalogEntry> {
        self.get_by_normalized(&normalize_prj(name))
    }

    /// Recherche par nom déjà normalisé
    pub(crate) fn get_by_normalized(&self, key: &str) -> Option<&CatalogEntry> {
        self.by_name.get(key).map(|&i| &self.entries[i])
    }

    /// Paires (nom normalisé, entrée) dans l'ordre d'insertion
    pub(crate) fn normalized_entries(&self) -> impl Iterator<Item = (&str, &CatalogEntry)> {
        self.normalized
            .iter()
            .map(String::as_str)
            .zip(self.entries.iter())
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
