//! hackernews - execute GraphQL documents against a link board store.
//!
//! # Usage
//!
//! ```bash
//! # Run a query against a snapshot
//! hackernews --store store.json --query links.graphql
//!
//! # Read the document from stdin, authenticate, and keep the changes
//! echo 'mutation { ... }' | hackernews --store store.json --query - \
//!     --authorization "Bearer <token>" --persist
//! ```

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_graphql::{Request, Variables};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use hackernews_core::metrics::init_metrics;
use hackernews_core::query::Catalog;
use hackernews_graphql::{AuthHeader, build_schema};
use hackernews_storage::{Database, MemoryRepositories, StoreConfig};

/// hackernews CLI - link board GraphQL backend.
#[derive(Parser, Debug)]
#[command(name = "hackernews")]
#[command(about = "Execute GraphQL documents against a hackernews store snapshot")]
#[command(version)]
struct Cli {
    /// JSON snapshot holding users, links and votes. Missing file = empty store.
    #[arg(long, env = "HACKERNEWS_STORE")]
    store: Option<PathBuf>,

    /// GraphQL document to execute, or `-` for stdin.
    #[arg(long, short = 'q')]
    query: String,

    /// Variables as a JSON object.
    #[arg(long)]
    variables: Option<String>,

    /// Authorization header value, e.g. `Bearer <token>`.
    #[arg(long, env = "HACKERNEWS_AUTHORIZATION")]
    authorization: Option<String>,

    /// Write the store back to the snapshot after execution.
    #[arg(long)]
    persist: bool,

    /// Print the Prometheus text exposition to stderr before exiting.
    #[arg(long)]
    print_metrics: bool,

    /// Enable JSON log output.
    #[arg(long, env = "JSON_LOGS")]
    json_logs: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs);

    // Metrics recorder (optional - failures don't stop execution)
    let metrics = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            init_metrics();
            Some(handle)
        }
        Err(e) => {
            warn!("Failed to install metrics recorder: {}. Continuing without metrics.", e);
            None
        }
    };

    // ─────────────────────────────────────────────────────────────────────────
    // STORE
    // ─────────────────────────────────────────────────────────────────────────
    let config = StoreConfig {
        snapshot_path: cli.store.clone(),
    };
    let db = Database::open(config)
        .await
        .context("Failed to open store")?;

    if cli.persist && cli.store.is_none() {
        warn!("--persist has no effect without --store");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // REQUEST
    // ─────────────────────────────────────────────────────────────────────────
    let document = read_document(&cli.query).context("Failed to read GraphQL document")?;
    let mut request = Request::new(document).data(AuthHeader(cli.authorization.clone()));

    if let Some(raw) = &cli.variables {
        let value: serde_json::Value =
            serde_json::from_str(raw).context("Variables must be a JSON object")?;
        request = request.variables(Variables::from_json(value));
    }

    let schema = build_schema(
        Arc::new(MemoryRepositories::new(&db)),
        Arc::new(Catalog::standard()),
    );

    debug!(authenticated = cli.authorization.is_some(), "Executing document");
    let response = schema.execute(request).await;

    if !response.errors.is_empty() {
        warn!(errors = response.errors.len(), "Document executed with errors");
    }

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &response).context("Failed to write response")?;
    writeln!(stdout)?;

    // ─────────────────────────────────────────────────────────────────────────
    // PERSIST
    // ─────────────────────────────────────────────────────────────────────────
    if cli.persist {
        db.save().await.context("Failed to save store")?;
        let stats = db.stats().await;
        info!(
            users = stats.users,
            links = stats.links,
            votes = stats.votes,
            "Store saved"
        );
    }

    if cli.print_metrics {
        match metrics {
            Some(handle) => eprintln!("{}", handle.render()),
            None => warn!("Metrics recorder unavailable"),
        }
    }

    Ok(())
}

/// Read the document from a file, or stdin for `-`.
fn read_document(source: &str) -> Result<String> {
    if source == "-" {
        let mut document = String::new();
        io::stdin().read_to_string(&mut document)?;
        return Ok(document);
    }

    std::fs::read_to_string(source).with_context(|| format!("Cannot read {source}"))
}

/// Initialize tracing subscriber. Logs go to stderr; stdout carries the response.
fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .json()
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .init();
    }
}
