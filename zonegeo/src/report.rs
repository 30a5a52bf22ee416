//! Compteurs de transformation et rapport de lot
//!
//! Les compteurs sont purement observationnels : ils ne conditionnent jamais
//! le comportement du transformateur.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::Result;
use prjdetect::SourceMethod;
use serde::Serialize;

/// Compteurs partagés du transformateur
#[derive(Debug, Default)]
pub struct TransformStats {
    successful: AtomicU64,
    failed: AtomicU64,
    cache_builds: AtomicU64,
    cache_hits: AtomicU64,
    out_of_bounds: AtomicU64,
}

/// Photographie des compteurs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Transformations (ou points de lot) réussies
    pub successful: u64,
    /// Transformations (ou points de lot) en échec
    pub failed: u64,
    /// Transformations construites puis mises en cache
    pub cache_builds: u64,
    /// Transformations retrouvées dans le cache
    pub cache_hits: u64,
    /// Points transformés hors des bornes WGS84
    pub out_of_bounds: u64,
    /// Nombre d'entrées du cache
    pub cache_size: usize,
}

impl TransformStats {
    pub fn record_success(&self) {
        self.successful.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache(&self, built: bool) {
        let counter = if built {
            &self.cache_builds
        } else {
            &self.cache_hits
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_out_of_bounds(&self) {
        self.out_of_bounds.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, cache_size: usize) -> StatsSnapshot {
        StatsSnapshot {
            successful: self.successful.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            cache_builds: self.cache_builds.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            out_of_bounds: self.out_of_bounds.load(Ordering::Relaxed),
            cache_size,
        }
    }
}

/// Statut global d'un lot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BatchStatus {
    /// Tous les points transformés
    Success,
    /// Certains points en échec
    PartialSuccess,
    /// Lot abandonné par le callback de progression
    Cancelled,
    /// Aucun point transformé
    Failed,
}

/// Rapport d'un lot de points
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub status: BatchStatus,
    /// Identifiant de la projection résolue
    pub projection_id: String,
    /// Stratégie de résolution
    pub projection_method: SourceMethod,
    pub duration_secs: f64,

    /// Nombre de points en entrée
    pub total: usize,
    /// Points transformés
    pub succeeded: usize,
    /// Points en échec
    pub failed: usize,
    /// Points transformés hors des bornes WGS84
    pub out_of_bounds: usize,
    /// Paquets traités
    pub chunks: usize,
    pub cancelled: bool,

    /// Premières erreurs rencontrées
    pub errors: Vec<String>,
}

const MAX_ERRORS: usize = 20;

impl BatchReport {
    pub fn new(projection_id: &str, projection_method: SourceMethod, total: usize) -> Self {
        Self {
            status: BatchStatus::Success,
            projection_id: projection_id.to_string(),
            projection_method,
            duration_secs: 0.0,
            total,
            succeeded: 0,
            failed: 0,
            out_of_bounds: 0,
            chunks: 0,
            cancelled: false,
            errors: Vec::new(),
        }
    }

    pub fn record_success(&mut self, in_bounds: bool) {
        self.succeeded += 1;
        if !in_bounds {
            self.out_of_bounds += 1;
        }
    }

    pub fn record_failure(&mut self, message: String) {
        self.failed += 1;
        if self.errors.len() < MAX_ERRORS {
            self.errors.push(message);
        }
    }

    /// Points non traités (lot abandonné)
    pub fn skipped(&self) -> usize {
        self.total - self.succeeded - self.failed
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    /// Détermine le statut final
    pub fn finalize(&mut self) {
        self.status = if self.cancelled {
            BatchStatus::Cancelled
        } else if self.failed == 0 {
            BatchStatus::Success
        } else if self.succeeded > 0 {
            BatchStatus::PartialSuccess
        } else {
            BatchStatus::Failed
        };
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("BATCH REPORT - {} ({})", self.projection_id, self.projection_method);
        println!("{}", "=".repeat(60));

        println!("\nStatus: {:?}", self.status);
        println!("Duration: {:.3}s", self.duration_secs);

        println!("\n--- SUMMARY ---");
        println!(
            "Points: {} total, {} transformed, {} failed, {} skipped",
            self.total,
            self.succeeded,
            self.failed,
            self.skipped()
        );
        println!("Chunks: {}", self.chunks);
        if self.out_of_bounds > 0 {
            println!("Out of WGS84 bounds: {}", self.out_of_bounds);
        }

        if !self.errors.is_empty() {
            println!("\n--- ERRORS ({}) ---", self.failed);
            for e in &self.errors {
                println!("  {}", e);
            }
            if self.failed > self.errors.len() {
                println!("  ... and {} more", self.failed - self.errors.len());
            }
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        format!(
            "{}: {}/{} transformed, {} failed",
            self.projection_id, self.succeeded, self.total, self.failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> BatchReport {
        BatchReport::new("CGCS2000_3_Degree_GK_Zone_39", SourceMethod::DefaultFallback, 3)
    }

    #[test]
    fn test_stats_snapshot() {
        let stats = TransformStats::default();
        stats.record_success();
        stats.record_success();
        stats.record_failure();
        stats.record_cache(true);
        stats.record_cache(false);
        stats.record_cache(false);
        stats.record_out_of_bounds();

        let snapshot = stats.snapshot(1);
        assert_eq!(
            snapshot,
            StatsSnapshot {
                successful: 2,
                failed: 1,
                cache_builds: 1,
                cache_hits: 2,
                out_of_bounds: 1,
                cache_size: 1,
            }
        );
    }

    #[test]
    fn test_finalize_success() {
        let mut report = report();
        report.record_success(true);
        report.finalize();
        assert_eq!(report.status, BatchStatus::Success);
        assert_eq!(report.skipped(), 2);
    }

    #[test]
    fn test_finalize_partial_and_failed() {
        let mut report = report();
        report.record_success(false);
        report.record_failure("boom".to_string());
        report.finalize();
        assert_eq!(report.status, BatchStatus::PartialSuccess);
        assert_eq!(report.out_of_bounds, 1);

        let mut report = self::report();
        report.record_failure("boom".to_string());
        report.finalize();
        assert_eq!(report.status, BatchStatus::Failed);
    }

    #[test]
    fn test_finalize_cancelled() {
        let mut report = report();
        report.cancelled = true;
        report.finalize();
        assert_eq!(report.status, BatchStatus::Cancelled);
    }

    #[test]
    fn test_errors_are_capped() {
        let mut report = BatchReport::new("X", SourceMethod::Exact, 100);
        for i in 0..30 {
            report.record_failure(format!("error {}", i));
        }
        assert_eq!(report.failed, 30);
        assert_eq!(report.errors.len(), MAX_ERRORS);
    }

    #[test]
    fn test_summary_and_json() {
        let mut report = report();
        report.record_success(true);
        report.record_success(true);
        assert!(report.summary().contains("2/3 transformed"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["projection_method"], "default-fallback");
        assert_eq!(json["status"], "Success");
    }
}
