//! Cache des transformations construites
//!
//! Clé = `proj_` + 16 premiers caractères hexadécimaux du hash blake3 de la
//! chaîne proj4. Les entrées ne sont jamais modifiées après insertion ; seul
//! `clear()` vide le cache.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::error::ProjectionError;
use crate::reproject_lite::SmartReprojector;

/// Clé de cache stable pour une chaîne proj4
pub fn cache_key(spec: &str) -> String {
    let hash = blake3::hash(spec.as_bytes());
    format!("proj_{}", &hex::encode(hash.as_bytes())[..16])
}

/// Transformations mémoïsées, partagées entre appels (et threads)
#[derive(Debug, Default)]
pub struct TransformCache {
    entries: RwLock<HashMap<String, Arc<SmartReprojector>>>,
}

impl TransformCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transformation en cache, ou construite puis insérée.
    ///
    /// Le booléen indique si l'entrée vient d'être construite.
    pub fn get_or_build(
        &self,
        spec: &str,
    ) -> Result<(Arc<SmartReprojector>, bool), ProjectionError> {
        let key = cache_key(spec);

        if let Some(found) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok((Arc::clone(found), false));
        }

        // Construction hors verrou : deux constructions concurrentes donnent
        // la même valeur, la dernière écriture gagne
        let built = Arc::new(SmartReprojector::new(spec)?);
        debug!(key = %key, backend = built.description(), "Transform cached");

        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Arc::clone(&built));
        Ok((built, true))
    }

    pub fn contains(&self, spec: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&cache_key(spec))
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
