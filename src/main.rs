//! Command-line entry point.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tamarind::convert::{ConvertOptions, convert_library};
use tamarind::{SchemaRegistry, SchemaVersion};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Convert Calibre comic libraries into CBZ archives with ComicInfo metadata.
#[derive(Parser, Debug)]
#[command(name = "tamarind")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the Calibre library or a specific subfolder of that
    /// library. Every ZIP archive that sits next to a metadata.opf file is
    /// converted.
    path: PathBuf,

    /// ComicInfo schema version for the generated manifests
    #[arg(long = "schema", default_value = "2.0", value_parser = parse_schema)]
    schema: SchemaVersion,

    /// Route subject tags into the Genre field instead of Tags
    #[arg(long)]
    tags_as_genre: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn parse_schema(s: &str) -> Result<SchemaVersion, String> {
    s.parse().map_err(|err: tamarind::Error| err.to_string())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.debug { "tamarind=debug" } else { "tamarind=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let registry = SchemaRegistry::new();
    let options = ConvertOptions {
        schema_version: cli.schema,
        tags_as_genre: cli.tags_as_genre,
    };

    let report = convert_library(&cli.path, &options, &registry)
        .with_context(|| format!("conversion aborted for {}", cli.path.display()))?;

    tracing::info!(
        books = report.books,
        converted = report.converted,
        failed = report.failed,
        "conversion finished"
    );
    if report.converted == 0 && report.failed > 0 {
        anyhow::bail!("no archive could be converted ({} failed)", report.failed);
    }
    Ok(())
}
