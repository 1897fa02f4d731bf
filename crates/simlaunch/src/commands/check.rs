//! One-shot inspection of the exchange file.
//!
//! Reads everything `run` would read, dispatches nothing, and reports what
//! a poll would do right now.

use serde::Serialize;
use tracing::warn;

use simlaunch_core::{ExchangeState, NetworkEntry, Registry, StatusDocument, exchange};

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct CheckReport {
    exchange: ExchangeState,
    network: Option<NetworkEntry>,
    /// What `run` would start, if the network matched.
    command_line: Option<String>,
    /// The status document currently on disk, if any.
    status: Option<StatusDocument>,
}

fn detail(r: &CheckReport) -> String {
    let mut lines = vec![
        format!("Network ID:     {}", r.exchange.network_id),
        format!("Comm interval:  {}", r.exchange.comm_interval),
        format!("Simulation:     {}", r.exchange.simulation_started),
        format!("Incident:       {}", r.exchange.incident_started),
    ];
    match r.network {
        Some(ref n) => {
            lines.push(format!("Network:        {} ({})", n.name, n.directory.display()));
        }
        None => lines.push("Network:        no matching registry entry".into()),
    }
    if let Some(ref cmd) = r.command_line {
        lines.push(format!("Would run:      {cmd}"));
    }
    if let Some(ref s) = r.status {
        lines.push(format!("Current status: {} ({})", s.status, s.network_id));
    }
    lines.join("\n")
}

pub fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::resolve(global)?;
    let registry = Registry::load(&cfg.paths.registry)?;

    let state =
        exchange::read(&cfg.paths.exchange).map_err(|source| CliError::NotReady { source })?;
    let network = registry.find(state.network_id).cloned();
    let command_line = network
        .as_ref()
        .map(|n| cfg.simulator.display_for(&n.directory));
    // Shared with the simulator, so a bad document is reported, not fatal.
    let status = StatusDocument::read(&cfg.paths.status).unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable status file");
        None
    });

    let report = CheckReport {
        exchange: state,
        network,
        command_line,
        status,
    };
    let out = output::render_single(&global.output, &report, detail, |r| {
        r.exchange.network_id.to_string()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
