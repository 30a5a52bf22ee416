//! Point d'entrée CLI pour zonegeo

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// Charger .env au démarrage
fn load_env() {
    // Chercher .env dans le répertoire courant ou parent
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

mod cli;

use cli::Commands;

/// Normaliser en WGS84 des coordonnées projetées chinoises
#[derive(Parser)]
#[command(name = "zonegeo")]
#[command(author, version)]
#[command(about = "Détecter la projection d'un .prj et transformer les coordonnées en WGS84")]
#[command(long_about = "Détection des systèmes projetés chinois (CGCS2000, Xian 1980, Beijing 1954, UTM) depuis un fichier .prj et transformation des géométries vers WGS84.\n\nSans .prj, la projection par défaut est CGCS2000 3° Gauss-Krüger fuseau 39 (117°E).")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    // Charger .env avant tout
    load_env();

    let cli = Cli::parse();

    // Configurer le logging
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Detect { prj, config } => {
            info!(prj = %prj.display(), "Détection de la projection");
            cli::cmd_detect(&prj, &config)?;
        }
        Commands::Transform {
            input,
            prj,
            config,
            output,
        } => {
            info!(input = %input.display(), config = %config, "Transformation vers WGS84");
            cli::cmd_transform(&input, prj.as_deref(), &config, output.as_deref())?;
        }
        Commands::Batch {
            input,
            prj,
            config,
            batch_size,
            output,
            report,
        } => {
            info!(input = %input.display(), config = %config, "Transformation par lots");
            cli::cmd_batch(
                &input,
                prj.as_deref(),
                &config,
                batch_size,
                output.as_deref(),
                report.as_deref(),
            )?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // Les logs vont sur stderr : stdout porte le JSON produit
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
