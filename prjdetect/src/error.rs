//! Types d'erreurs pour le crate prjdetect
//!
//! La détection elle-même ne renvoie jamais d'erreur : seules la construction
//! et l'extension du catalogue peuvent échouer.

use thiserror::Error;

/// Erreurs pouvant survenir lors de la construction du catalogue
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Erreur d'I/O lors de la lecture d'un fichier d'entrées supplémentaires
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON invalide
    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Deux entrées portent le même nom normalisé
    #[error("Duplicate catalog name: {0}")]
    DuplicateName(String),

    /// Deux entrées portent le même code EPSG
    #[error("Duplicate EPSG code {code} ({first} / {second})")]
    DuplicateEpsg {
        code: u32,
        first: String,
        second: String,
    },

    /// Entrée incomplète ou incohérente
    #[error("Invalid catalog entry {name}: {reason}")]
    InvalidEntry { name: String, reason: String },
}

impl CatalogError {
    /// Crée une erreur d'entrée invalide
    pub fn invalid_entry(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEntry {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
