//! Command-line interface definitions and parsing
//!
//! This module defines the CLI structure for cqlnav using the `clap` crate,
//! plus the helpers behind the commands that need more than printing.
//!
//! # Commands
//!
//! - **resolve**: compose the requests for one URL query string
//! - **replay**: feed a JSON-lines file of navigation events through a session
//! - **indexes**: list the search indexes of a segment
//! - **manifest**: print the resource manifest
//!
//! # Examples
//!
//! ```no_run
//! use cqlnav::cli::{Cli, Commands};
//!
//! let cli = Cli::parse_args();
//! match cli.command {
//!     Commands::Resolve { search, .. } => println!("resolving {search}"),
//!     _ => {}
//! }
//! ```

use crate::gate::{FacetSnapshot, Navigation};
use crate::manifest::{FetchPolicy, FetchRuntime, ManifestError, ResourceRequest, SearchSession};
use crate::query::IdentifierType;
use crate::segments::{DEFAULT_SEGMENT, IndexConfigProvider};
use crate::CqlnavError;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::path::PathBuf;

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "cqlnav")]
#[command(about = "Translate search form state into CQL requests", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to use instead of the default location
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Segment definitions layered over the built-in ones (overrides config)
    #[arg(long = "segments", value_name = "FILE", global = true)]
    pub segments_file: Option<PathBuf>,

    /// JSON array of identifier types (`[{"id": ..., "name": ...}]`)
    #[arg(long = "identifier-types", value_name = "FILE", global = true)]
    pub identifier_types: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the requests a URL query string produces
    #[command(visible_alias = "r")]
    Resolve {
        /// URL query string, e.g. `qindex=title&query=dune`
        #[arg(value_name = "QUERY_STRING")]
        search: String,

        /// Only this resource (export resources are built on demand)
        #[arg(short = 'r', long = "resource", value_name = "RESOURCE")]
        resource: Option<String>,

        /// Result offset of the navigation
        #[arg(short = 'o', long = "offset", default_value_t = 0)]
        offset: u64,
    },

    /// Replay navigation events and print each fetch decision
    Replay {
        /// JSON-lines file of `{key, search, resultOffset, facets}` events
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// List the search indexes of a segment
    #[command(visible_alias = "ls")]
    Indexes {
        /// Segment to list
        #[arg(short = 's', long = "segment", default_value = DEFAULT_SEGMENT)]
        segment: String,
    },

    /// Print the resource manifest as JSON
    Manifest,
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// One line of a replay file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayEvent {
    #[serde(flatten)]
    pub navigation: Navigation,

    /// Pending facet selections at the time of the navigation
    #[serde(default)]
    pub facets: FacetSnapshot,
}

/// What a replayed navigation did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayOutcome {
    pub key: String,
    pub fetch: bool,
    pub requests: Vec<ResourceRequest>,
}

/// Parse JSON-lines replay events, skipping blank lines
///
/// # Errors
///
/// Returns `CqlnavError::Io` if reading fails, or `CqlnavError::InvalidInput`
/// naming the line that is not a valid event.
pub fn parse_replay(reader: impl BufRead) -> Result<Vec<ReplayEvent>, CqlnavError> {
    let mut events = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event = serde_json::from_str(&line)
            .map_err(|e| CqlnavError::InvalidInput(format!("line {}: {e}", index + 1)))?;
        events.push(event);
    }
    Ok(events)
}

/// Drive `session` through `events`, handing requests to `runtime`
///
/// # Errors
///
/// Returns the first `ManifestError` raised by a navigation.
pub fn replay<P, R>(
    session: &mut SearchSession<P>,
    events: &[ReplayEvent],
    runtime: &mut R,
) -> Result<Vec<ReplayOutcome>, ManifestError>
where
    P: IndexConfigProvider,
    R: FetchRuntime + ?Sized,
{
    events
        .iter()
        .map(|event| {
            let requests = session.navigate(&event.navigation, &event.facets, &mut *runtime)?;
            Ok(ReplayOutcome {
                key: event.navigation.key.clone(),
                fetch: !requests.is_empty(),
                requests,
            })
        })
        .collect()
}

/// Requests for one navigation, optionally narrowed to one resource
///
/// # Errors
///
/// Returns `ManifestError::UnknownResource` for undeclared resources, or the
/// error raised while building the query.
pub fn resolve_requests<P: IndexConfigProvider>(
    session: &mut SearchSession<P>,
    navigation: &Navigation,
    resource: Option<&str>,
) -> Result<Vec<ResourceRequest>, ManifestError> {
    let Some(name) = resource else {
        return session.build_requests(navigation);
    };

    let fetch = session
        .manifest()
        .resource(name)
        .map(|definition| definition.fetch)
        .ok_or_else(|| ManifestError::UnknownResource(name.to_string()))?;

    match fetch {
        FetchPolicy::Gated => {
            let mut requests = session.build_requests(navigation)?;
            requests.retain(|request| request.resource == name);
            Ok(requests)
        }
        FetchPolicy::Never => Ok(session.export_request(name, navigation)?.into_iter().collect()),
    }
}

/// Read identifier types from a JSON file
///
/// # Errors
///
/// Returns `CqlnavError` if the file cannot be read or parsed.
pub fn load_identifier_types(path: &std::path::Path) -> Result<Vec<IdentifierType>, CqlnavError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
