//! Transformation de points par lots
//!
//! La projection est résolue une seule fois pour tout le lot. Les points sont
//! traités par paquets de `batch_size` ; le callback de progression est appelé
//! après chaque paquet et peut interrompre le lot (`ControlFlow::Break`).

use std::ops::ControlFlow;
use std::time::Instant;

use tracing::{info, warn};

use crate::config::BatchOptions;
use crate::error::TransformError;
use crate::report::BatchReport;
use crate::transformer::CoordinateTransformer;

/// Résultat pour un point du lot
#[derive(Debug, Clone, PartialEq)]
pub enum BatchItem {
    /// Point transformé en (lon, lat) WGS84
    Transformed([f64; 2]),
    /// Point en échec (conservé seulement avec `include_failures`)
    Failed {
        original: [f64; 2],
        error: TransformError,
    },
}

impl BatchItem {
    pub fn is_transformed(&self) -> bool {
        matches!(self, Self::Transformed(_))
    }
}

/// Avancement après un paquet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    /// Points traités jusqu'ici
    pub processed: usize,
    pub total: usize,
    /// Numéro du paquet terminé (à partir de 1)
    pub chunk: usize,
    pub chunks: usize,
}

/// Points transformés et rapport du lot
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub items: Vec<BatchItem>,
    pub report: BatchReport,
}

impl CoordinateTransformer {
    /// Transforme une liste de points `[x, y]`
    pub fn batch_transform(
        &self,
        points: &[[f64; 2]],
        prj_text: Option<&str>,
        options: &BatchOptions,
    ) -> Result<BatchOutcome, TransformError> {
        self.batch_transform_with_progress(points, prj_text, options, |_| ControlFlow::Continue(()))
    }

    /// Comme `batch_transform`, avec un callback de progression par paquet
    pub fn batch_transform_with_progress<F>(
        &self,
        points: &[[f64; 2]],
        prj_text: Option<&str>,
        options: &BatchOptions,
        mut on_progress: F,
    ) -> Result<BatchOutcome, TransformError>
    where
        F: FnMut(BatchProgress) -> ControlFlow<()>,
    {
        let start = Instant::now();
        let resolved = self.resolve(prj_text)?;
        let definition = &resolved.definition;

        let batch_size = options.batch_size.max(1);
        let chunks = points.len().div_ceil(batch_size);
        info!(
            points = points.len(),
            chunks,
            id = definition.id(),
            method = %definition.source_method(),
            "Starting batch transform"
        );

        let mut report = BatchReport::new(definition.id(), definition.source_method(), points.len());
        let mut items = Vec::with_capacity(points.len());
        let mut processed = 0;

        for (index, chunk) in points.chunks(batch_size).enumerate() {
            for &point in chunk {
                match self.transform_point(&resolved.reprojector, point) {
                    Ok((out, in_bounds)) => {
                        self.record_point(true);
                        report.record_success(in_bounds);
                        items.push(BatchItem::Transformed(out));
                    }
                    Err(source) => {
                        self.record_point(false);
                        let error = TransformError::Point {
                            point,
                            spec: definition.transform_spec().to_string(),
                            method: definition.source_method(),
                            source,
                        };
                        warn!(index = processed, error = %error, "Batch point failed");
                        report.record_failure(error.to_string());
                        if options.include_failures {
                            items.push(BatchItem::Failed {
                                original: point,
                                error,
                            });
                        }
                    }
                }
                processed += 1;
            }
            report.chunks += 1;

            let progress = BatchProgress {
                processed,
                total: points.len(),
                chunk: index + 1,
                chunks,
            };
            if on_progress(progress).is_break() {
                report.cancelled = processed < points.len();
                if report.cancelled {
                    info!(processed, total = points.len(), "Batch transform cancelled");
                }
                break;
            }
        }

        report.set_duration(start.elapsed());
        report.finalize();
        info!(summary = %report.summary(), "Batch transform finished");

        Ok(BatchOutcome { items, report })
    }
}
