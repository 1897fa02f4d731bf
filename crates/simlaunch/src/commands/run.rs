//! The launcher proper: wait for the CAD Simulation Manager, then start
//! the requested network.

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use simlaunch_core::status::ensure_marker;
use simlaunch_core::{NetworkEntry, Poller, ProcessLauncher, Registry, RunOutcome};

use crate::cli::{GlobalOpts, RunArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct Launched {
    network: NetworkEntry,
    command_line: String,
    pid: Option<u32>,
    /// Only present with `--wait`.
    exit_code: Option<i32>,
}

pub async fn handle(args: &RunArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load(global)?;
    config::apply_run_args(&mut cfg, args);
    let launcher_cfg = cfg.to_launcher_config()?;

    if !global.quiet {
        eprintln!(
            "{} {} watching {}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            launcher_cfg.root.display()
        );
    }
    info!(root = %launcher_cfg.root.display(), "simulation launcher starting");

    let registry = Registry::load(&launcher_cfg.paths.registry)?;
    info!(networks = registry.len(), "network registry loaded");

    if let Err(e) = ensure_marker(&launcher_cfg.paths.marker) {
        warn!(
            path = %launcher_cfg.paths.marker.display(),
            error = %e,
            "could not create marker file"
        );
    }

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    let mut poller = Poller::new(&launcher_cfg, &registry, ProcessLauncher);
    let launched = match poller.run(&cancel).await? {
        RunOutcome::Dispatched { entry, report } => Launched {
            network: entry,
            command_line: report.command_line,
            pid: report.pid,
            exit_code: report.exit_code,
        },
        RunOutcome::Cancelled => return Err(CliError::Interrupted),
    };

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &launched,
        |l| {
            format!(
                "{} {} ({}) -> {}",
                output::success("Network loaded:", color),
                l.network.name,
                l.network.id,
                output::attention(&l.command_line, color),
            )
        },
        |l| l.network.id.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
