//! Configuration for the simlaunch launcher.
//!
//! TOML file, `SIMLAUNCH_`-prefixed environment overrides, and translation
//! into `simlaunch_core::LauncherConfig`. The CLI layers its flag
//! overrides on top before translating.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use simlaunch_core::{LauncherConfig, SimPaths, SimulatorCommand};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Shared directory the CAD Simulation Manager writes into.
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,

    /// Delay between exchange-file checks, in humantime form ("2s").
    #[serde(default = "default_poll_interval")]
    pub poll_interval: String,

    /// Exit instead of waiting when the first check finds bad data.
    #[serde(default)]
    pub strict_startup: bool,

    #[serde(default)]
    pub files: Files,

    #[serde(default)]
    pub simulator: Simulator,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            poll_interval: default_poll_interval(),
            strict_startup: false,
            files: Files::default(),
            simulator: Simulator::default(),
        }
    }
}

fn default_root_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_poll_interval() -> String {
    "2s".into()
}

/// File names, relative to `root_dir` unless absolute.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Files {
    pub exchange: PathBuf,
    pub registry: PathBuf,
    pub status: PathBuf,
    pub marker: PathBuf,
}

impl Default for Files {
    fn default() -> Self {
        let stock = SimPaths::under(Path::new(""));
        Self {
            exchange: stock.exchange,
            registry: stock.registry,
            status: stock.status,
            marker: stock.marker,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Simulator {
    /// Simulator executable, looked up on `PATH` if not a path.
    pub executable: PathBuf,
    /// Flags placed before the network directory.
    pub args: Vec<String>,
    /// Wait for the simulator to exit and log its status.
    pub wait: bool,
}

impl Default for Simulator {
    fn default() -> Self {
        let stock = SimulatorCommand::default();
        Self {
            executable: stock.executable,
            args: stock.args,
            wait: stock.wait,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "tmc-simulator", "simlaunch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("simlaunch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load defaults, then the TOML file at `path` (if present), then
/// `SIMLAUNCH_*` env vars. Nested keys use a double underscore:
/// `SIMLAUNCH_SIMULATOR__EXECUTABLE`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SIMLAUNCH_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation to runtime config ───────────────────────────────────

impl Config {
    /// Parsed `poll_interval`. Must be non-zero.
    pub fn poll_interval(&self) -> Result<Duration, ConfigError> {
        let interval =
            humantime::parse_duration(&self.poll_interval).map_err(|e| ConfigError::Validation {
                field: "poll_interval".into(),
                reason: format!("'{}': {e}", self.poll_interval),
            })?;
        if interval.is_zero() {
            return Err(ConfigError::Validation {
                field: "poll_interval".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(interval)
    }

    /// Resolve file names against `root_dir`. Does not touch the disk.
    pub fn paths(&self) -> SimPaths {
        let root = &self.root_dir;
        SimPaths {
            exchange: root.join(&self.files.exchange),
            registry: root.join(&self.files.registry),
            status: root.join(&self.files.status),
            marker: root.join(&self.files.marker),
        }
    }

    /// Validate and build the launcher's runtime config. The root
    /// directory must exist.
    pub fn to_launcher_config(&self) -> Result<LauncherConfig, ConfigError> {
        if !self.root_dir.is_dir() {
            return Err(ConfigError::Validation {
                field: "root_dir".into(),
                reason: format!("{} is not a directory", self.root_dir.display()),
            });
        }
        if self.simulator.executable.as_os_str().is_empty() {
            return Err(ConfigError::Validation {
                field: "simulator.executable".into(),
                reason: "must not be empty".into(),
            });
        }

        Ok(LauncherConfig {
            root: self.root_dir.clone(),
            paths: self.paths(),
            simulator: SimulatorCommand {
                executable: self.simulator.executable.clone(),
                args: self.simulator.args.clone(),
                wait: self.simulator.wait,
            },
            poll_interval: self.poll_interval()?,
            strict_startup: self.strict_startup,
        })
    }
}
