//! Mind Map Session Demo
//!
//! Runs a scripted editing session against the kernel and prints the
//! resulting projection as JSON:
//! - Loads a seed tree (built-in sample or a JSON file)
//! - Enters edit mode, adds and renames a topic, collapses a branch
//! - Attempts a root deletion (refused with a notice)
//! - Saves through the simulated backend, which re-flows the layout
//!
//! ## Configuration
//!
//! Environment variables:
//! - `MINDMAP_LAYOUT_DIRECTION`: `LR` or `TB` (default: LR)
//! - `MINDMAP_SAVE_DELAY_MS`: simulated save latency (default: 500)
//! - `MINDMAP_PLACEHOLDER_LABEL`: label for new topics (default: New Topic)
//! - `RUST_LOG`: Log level filter (default: info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: json)
//!
//! ## Usage
//!
//! ```bash
//! LOG_FORMAT=pretty cargo run --bin mindmap_session --features demo -- seed.json
//! ```

use std::process::ExitCode;

use tracing::{error, info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use mindmap_kernel::{
    MindMap, MindMapConfig, MindMapHandle, NodeId, SeedNode, SessionError, SimulatedSaveBackend,
};

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mindmap_session=info,mindmap_kernel=info".into());

    if log_format == "pretty" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn load_seed() -> Result<SeedNode, String> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .map_err(|e| format!("Failed to read seed {}: {}", path, e))?;
            SeedNode::from_json(&json).map_err(|e| e.to_string())
        }
        None => Ok(SeedNode::sample()),
    }
}

async fn run(seed: SeedNode, config: MindMapConfig) -> Result<(), SessionError> {
    let backend = SimulatedSaveBackend::from_config(&config);
    let handle = MindMapHandle::new(MindMap::new(&seed, config)?);

    handle.enter_edit();

    let first_branch = handle
        .lock()
        .store()
        .child_edges_of(&NodeId::root())
        .next()
        .map(|edge| edge.target.clone());

    if let Some(branch) = first_branch {
        let actions = handle
            .view()
            .node(&branch)
            .and_then(|node| node.actions.clone());
        if let Some(actions) = actions {
            if let Some(child) = actions.add_child() {
                handle.on_label_change(child.as_str(), "Weekend Plans");
            }
            actions.toggle_collapse();
        }
    }

    handle.on_delete_node(NodeId::root().as_str());
    for notice in handle.take_notices() {
        warn!(%notice, "notice raised");
    }

    let receipt = handle.save(&backend).await?;
    info!(
        fingerprint = %receipt.fingerprint,
        nodes = receipt.node_count,
        saved_at = %receipt.saved_at,
        "session saved"
    );

    let view = handle.view();
    match serde_json::to_string_pretty(&view) {
        Ok(json) => println!("{}", json),
        Err(e) => error!(error = %e, "failed to serialize projection"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let config = MindMapConfig::from_env();
    info!(
        direction = %config.layout.direction,
        save_delay_ms = config.save_delay_ms,
        "starting mind map session"
    );

    let seed = match load_seed() {
        Ok(seed) => seed,
        Err(e) => {
            error!(error = %e, "could not load seed");
            return ExitCode::FAILURE;
        }
    };

    match run(seed, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "session failed");
            ExitCode::FAILURE
        }
    }
}
