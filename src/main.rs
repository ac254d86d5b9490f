//! cqlnav CLI application entry point
//!
//! Command-line front end to the query pipeline: resolves URL query strings
//! into CQL requests, replays recorded navigations through the fetch gate,
//! and prints the configured indexes and resource manifest.
//!
//! # Usage
//!
//! ```bash
//! # Requests for a title search
//! cqlnav resolve 'qindex=title&query=dune&filters=language.eng'
//!
//! # Only the id export for the same search
//! cqlnav resolve 'qindex=title&query=dune' -r recordsToExportIDs
//!
//! # Replay navigations and see which ones fetch
//! cqlnav replay navigations.jsonl
//!
//! # List indexes of the items segment
//! cqlnav indexes -s items
//! ```
//!
//! # Configuration
//!
//! Settings are read from the user's config directory
//! (`~/.config/cqlnav/config.toml` on Linux) and `CQLNAV_*` environment
//! variables. `RUST_LOG` overrides the configured log filter.

use cqlnav::{
    CqlnavError,
    cli::{Cli, Commands, load_identifier_types, parse_replay, replay, resolve_requests},
    config::Settings,
    gate::Navigation,
    manifest::{FetchRuntime, Manifest, ResourceRequest, SearchSession},
    segments::{IndexConfigProvider, SegmentRegistry},
};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, CqlnavError>;

/// Fetch runtime of the CLI: requests are only logged
struct LoggingRuntime;

impl FetchRuntime for LoggingRuntime {
    fn fetch(&mut self, request: &ResourceRequest) {
        tracing::info!(
            resource = %request.resource,
            path = %request.path,
            offset = request.offset,
            query = request.query.as_deref().unwrap_or_default(),
            "fetch"
        );
    }
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn handle_resolve(
    session: &mut SearchSession<SegmentRegistry>,
    search: String,
    resource: Option<&str>,
    offset: u64,
) -> Result<()> {
    let navigation = Navigation::new("cli", search, offset);
    let requests = resolve_requests(session, &navigation, resource)?;
    if requests.is_empty() {
        tracing::info!("no request would be issued");
    }
    print_json(&requests)
}

fn handle_replay(session: &mut SearchSession<SegmentRegistry>, file: &Path) -> Result<()> {
    let events = parse_replay(BufReader::new(File::open(file)?))?;
    tracing::debug!(events = events.len(), file = %file.display(), "replaying navigations");

    for outcome in replay(session, &events, &mut LoggingRuntime)? {
        println!("{}", serde_json::to_string(&outcome)?);
    }
    Ok(())
}

fn handle_indexes(registry: &SegmentRegistry, segment: &str) -> Result<()> {
    let config = registry.index_config(segment)?;
    for index in &config.indexes {
        println!("{}\t{}", index.name, index.label);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    if let Some(path) = &cli.segments_file {
        settings.segments_file = Some(path.clone());
    }

    init_tracing(&settings.log_filter);

    let identifier_types = cli
        .identifier_types
        .as_deref()
        .map(load_identifier_types)
        .transpose()?
        .unwrap_or_default();
    let registry = settings.segment_registry()?;
    let manifest = Manifest::new(&settings);

    match cli.command {
        Commands::Resolve { search, resource, offset } => {
            let mut session = SearchSession::new(registry, manifest).with_identifier_types(identifier_types);
            handle_resolve(&mut session, search, resource.as_deref(), offset)?;
        }
        Commands::Replay { file } => {
            let mut session = SearchSession::new(registry, manifest).with_identifier_types(identifier_types);
            handle_replay(&mut session, &file)?;
        }
        Commands::Indexes { segment } => handle_indexes(&registry, &segment)?,
        Commands::Manifest => print_json(&manifest.shape())?,
    }

    Ok(())
}
