//! Définition et implémentation des commandes CLI
//!
//! - `detect` : texte `.prj` → projection détectée (JSON)
//! - `transform` : géométrie GeoJSON ou arbre de coordonnées → WGS84
//! - `batch` : liste de points `[[x, y], ...]` → WGS84 + rapport

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Subcommand;
use prjdetect::{Catalog, Matcher};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use zonegeo::{BatchItem, Config, CoordinateTransformer, Coordinates, TransformCache};

#[derive(Subcommand)]
pub enum Commands {
    /// Detect the projected CRS described by a .prj file
    Detect {
        /// Path to the .prj file
        #[arg(short, long)]
        prj: PathBuf,

        /// Config preset name (default/lenient/strict) or path to a JSON config
        #[arg(long, env = "ZONEGEO_CONFIG", default_value = "default")]
        config: String,
    },

    /// Transform a GeoJSON geometry or a bare coordinate array to WGS84
    Transform {
        /// JSON file holding a geometry or a nested coordinate array
        #[arg(short, long)]
        input: PathBuf,

        /// Path to the .prj file (default projection when absent)
        #[arg(short, long)]
        prj: Option<PathBuf>,

        /// Config preset name (default/lenient/strict) or path to a JSON config
        #[arg(long, env = "ZONEGEO_CONFIG", default_value = "default")]
        config: String,

        /// Output file (stdout when absent)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Transform a list of [x, y] points in chunks
    Batch {
        /// JSON file holding [[x, y], ...]
        #[arg(short, long)]
        input: PathBuf,

        /// Path to the .prj file (default projection when absent)
        #[arg(short, long)]
        prj: Option<PathBuf>,

        /// Config preset name (default/lenient/strict) or path to a JSON config
        #[arg(long, env = "ZONEGEO_CONFIG", default_value = "default")]
        config: String,

        /// Override the chunk size of the config
        #[arg(long)]
        batch_size: Option<usize>,

        /// Output file (stdout when absent)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Save the batch report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

/// Exécute la commande detect
pub fn cmd_detect(prj: &Path, config_spec: &str) -> Result<()> {
    let config = Config::resolve(config_spec)?;
    let transformer = build_transformer(&config)?;
    let prj_text = read_prj(Some(prj))?;

    match transformer.detect(prj_text.as_deref()) {
        Some(found) => {
            info!(
                id = found.definition.id(),
                method = %found.match_type,
                "Projection detected"
            );
            println!("{}", serde_json::to_string_pretty(&found)?);
        }
        None => {
            let fallback = transformer.resolve_projection(None);
            warn!(
                default = fallback.id(),
                "No projection detected, transforms would use the default"
            );
            println!("null");
        }
    }

    Ok(())
}

/// Exécute la commande transform
pub fn cmd_transform(
    input: &Path,
    prj: Option<&Path>,
    config_spec: &str,
    output: Option<&Path>,
) -> Result<()> {
    let config = Config::resolve(config_spec)?;
    let transformer = build_transformer(&config)?;
    let prj_text = read_prj(prj)?;

    let value = read_json(input)?;
    let coords = Coordinates::from_json(&value)
        .with_context(|| format!("Invalid coordinates in {}", input.display()))?;

    let estimate = transformer.estimate_transform_time(coords.leaves().len());
    debug!(estimate_ms = estimate.as_millis() as u64, "Estimated transform time");

    let report = transformer.transform_traced(&coords, prj_text.as_deref(), &config.transform)?;

    match &report.projection {
        Some(definition) => info!(
            id = definition.id(),
            method = %definition.source_method(),
            substituted = report.substituted.len(),
            out_of_bounds = report.out_of_bounds.len(),
            "Transform done"
        ),
        None => info!("Input already in WGS84, written unchanged"),
    }

    write_json(output, &report.output.to_json()?)?;
    debug!(stats = ?transformer.stats(), "Transformer stats");
    Ok(())
}

/// Exécute la commande batch
pub fn cmd_batch(
    input: &Path,
    prj: Option<&Path>,
    config_spec: &str,
    batch_size: Option<usize>,
    output: Option<&Path>,
    report_path: Option<&Path>,
) -> Result<()> {
    let mut config = Config::resolve(config_spec)?;
    if let Some(size) = batch_size {
        config.batch.batch_size = size;
    }
    let transformer = build_transformer(&config)?;
    let prj_text = read_prj(prj)?;

    let points: Vec<[f64; 2]> = serde_json::from_value(read_json(input)?)
        .with_context(|| format!("Expected [[x, y], ...] in {}", input.display()))?;

    let outcome = transformer.batch_transform_with_progress(
        &points,
        prj_text.as_deref(),
        &config.batch,
        |progress| {
            debug!(
                processed = progress.processed,
                total = progress.total,
                chunk = progress.chunk,
                chunks = progress.chunks,
                "Batch progress"
            );
            std::ops::ControlFlow::Continue(())
        },
    )?;

    let items: Vec<Value> = outcome
        .items
        .iter()
        .map(|item| match item {
            BatchItem::Transformed([lon, lat]) => json!([lon, lat]),
            BatchItem::Failed { original, error } => json!({
                "error": error.to_string(),
                "original": original,
            }),
        })
        .collect();
    write_json(output, &Value::Array(items))?;

    if output.is_some() {
        outcome.report.display();
    }
    if let Some(path) = report_path {
        outcome
            .report
            .save_to_file(path)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        info!(path = %path.display(), "Report saved");
    }

    Ok(())
}

fn build_transformer(config: &Config) -> Result<CoordinateTransformer> {
    let catalog = match &config.catalog {
        Some(path) => Catalog::builtin()
            .load_extra(path)
            .with_context(|| format!("Failed to load catalog: {}", path.display()))?,
        None => Catalog::builtin(),
    };
    info!(entries = catalog.len(), "Catalog loaded");

    Ok(CoordinateTransformer::new(
        Matcher::new(Arc::new(catalog)),
        Arc::new(TransformCache::new()),
    ))
}

fn read_prj(path: Option<&Path>) -> Result<Option<String>> {
    path.map(|p| {
        std::fs::read_to_string(p).with_context(|| format!("Failed to read PRJ file: {}", p.display()))
    })
    .transpose()
}

fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn write_json(output: Option<&Path>, value: &Value) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            info!(path = %path.display(), "Output written");
        }
        None => println!("{}", json),
    }
    Ok(())
}
