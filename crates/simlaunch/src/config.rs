//! CLI configuration: thin wrapper around `simlaunch_config`.
//!
//! Re-exports the shared types and layers `GlobalOpts` / `RunArgs` flag
//! overrides on top of file + env configuration.

use std::path::PathBuf;

use simlaunch_core::LauncherConfig;

use crate::cli::{GlobalOpts, RunArgs};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use simlaunch_config::{Config, config_path, load_config, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Config file in effect: `--config` flag, else the platform default.
pub fn active_config_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(config_path)
}

/// Load config from file + env, then apply global flag overrides.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = load_config(&active_config_path(global))?;
    if let Some(ref root) = global.root {
        cfg.root_dir.clone_from(root);
    }
    Ok(cfg)
}

/// Apply `run` flag overrides. Flags take priority over file and env.
pub fn apply_run_args(cfg: &mut Config, args: &RunArgs) {
    if let Some(ref interval) = args.interval {
        cfg.poll_interval.clone_from(interval);
    }
    if let Some(ref simulator) = args.simulator {
        cfg.simulator.executable.clone_from(simulator);
    }
    cfg.strict_startup |= args.strict_startup;
    cfg.simulator.wait |= args.wait;
}

/// Load, override, and validate in one go.
pub fn resolve(global: &GlobalOpts) -> Result<LauncherConfig, CliError> {
    Ok(load(global)?.to_launcher_config()?)
}
