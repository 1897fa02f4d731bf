//! Clap derive structures for the `simlaunch` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// simlaunch -- start the traffic simulator when the CAD side asks for it
#[derive(Debug, Parser)]
#[command(
    name = "simlaunch",
    version,
    about = "Launch traffic simulation networks on request from the CAD Simulation Manager",
    long_about = "Watches the TMC simulator root directory for the exchange file written by\n\
        the CAD Simulation Manager, looks the requested network up in\n\
        networkFinder.cfg, marks it LOADING in the status file, and starts the\n\
        simulator on that network's directory.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Root directory shared with the CAD Simulation Manager
    #[arg(long, short = 'r', env = "SIMLAUNCH_ROOT_DIR", global = true)]
    pub root: Option<PathBuf>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "SIMLAUNCH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SIMLAUNCH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Wait for the exchange file and launch the requested network
    #[command(alias = "start")]
    Run(RunArgs),

    /// Read the exchange file once and report what would be launched
    Check,

    /// List the networks in the registry
    #[command(alias = "net", alias = "n")]
    Networks,

    /// Manage the launcher configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Run ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Delay between exchange-file checks (e.g. "2s", "500ms")
    #[arg(long, short = 'i', env = "SIMLAUNCH_POLL_INTERVAL")]
    pub interval: Option<String>,

    /// Exit if the first check finds incomplete or corrupt data
    #[arg(long)]
    pub strict_startup: bool,

    /// Simulator executable (overrides config)
    #[arg(long)]
    pub simulator: Option<PathBuf>,

    /// Wait for the simulator to exit and log its status
    #[arg(long)]
    pub wait: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Write a config file with the current settings
    Init {
        /// Overwrite an existing config file
        #[arg(long, short = 'f')]
        force: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
