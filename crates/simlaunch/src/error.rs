//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into operator-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use simlaunch_config::ConfigError;
use simlaunch_core::{CoreError, ExchangeError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const DATA: i32 = 3;
    pub const NOT_READY: i32 = 4;
    pub const REGISTRY: i32 = 5;
    pub const LAUNCH: i32 = 6;
    pub const INTERRUPTED: i32 = 130;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Registry ─────────────────────────────────────────────────────

    #[error("Could not load the network registry")]
    #[diagnostic(
        code(simlaunch::registry),
        help(
            "The registry starts with 'number of networks: N' followed by N lines of\n\
             '<id> <name> <directory>'.\n\
             Try: simlaunch networks"
        )
    )]
    Registry {
        #[source]
        source: CoreError,
    },

    // ── Exchange file ────────────────────────────────────────────────

    #[error("Incomplete data from CAD")]
    #[diagnostic(
        code(simlaunch::incomplete_data),
        help(
            "Check the exchange file written by the CAD Simulation Manager.\n\
             Run without --strict-startup to keep waiting for a complete file."
        )
    )]
    StartupData {
        #[source]
        source: ExchangeError,
    },

    #[error("Exchange file is not ready: {source}")]
    #[diagnostic(code(simlaunch::not_ready))]
    NotReady {
        #[source]
        source: ExchangeError,
    },

    // ── Launch ───────────────────────────────────────────────────────

    #[error("Could not start the simulator")]
    #[diagnostic(
        code(simlaunch::launch),
        help(
            "Check that the simulator executable exists and is on PATH,\n\
             or set [simulator] executable in the config file."
        )
    )]
    Launch {
        #[source]
        source: CoreError,
    },

    #[error("Interrupted while waiting for the CAD Simulation Manager")]
    #[diagnostic(code(simlaunch::interrupted))]
    Interrupted,

    // ── Configuration ────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(simlaunch::validation))]
    Validation { field: String, reason: String },

    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(simlaunch::config_exists),
        help("Use --force to overwrite it.")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(simlaunch::config))]
    Config(Box<figment::Error>),

    #[error("Could not write configuration: {0}")]
    #[diagnostic(code(simlaunch::config_write))]
    ConfigWrite(String),

    // ── Core / IO ────────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(simlaunch::core))]
    Core(CoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Registry { .. } => exit_code::REGISTRY,
            Self::StartupData { .. } => exit_code::DATA,
            Self::NotReady { .. } => exit_code::NOT_READY,
            Self::Launch { .. } => exit_code::LAUNCH,
            Self::Interrupted => exit_code::INTERRUPTED,
            Self::Validation { .. } | Self::ConfigExists { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::RegistryUnreadable { .. }
            | CoreError::RegistryLine { .. }
            | CoreError::RegistryCount { .. } => CliError::Registry { source: err },

            CoreError::Launch { .. } => CliError::Launch { source: err },

            CoreError::StartupData { source } => CliError::StartupData { source },

            other => CliError::Core(other),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Figment(err) => CliError::Config(err),
            ConfigError::Serialization(err) => CliError::ConfigWrite(err.to_string()),
            ConfigError::Io(err) => CliError::Io(err),
        }
    }
}
