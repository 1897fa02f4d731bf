//! Launch logic for the TMC simulator's traffic-simulation hand-off.
//!
//! The CAD Simulation Manager signals a run by writing an exchange file
//! into a shared root directory. This crate owns everything between that
//! file appearing and the simulator process being started:
//!
//! - **[`Registry`]**: The operator-maintained list of simulation
//!   networks, loaded once from `networkFinder.cfg` and validated against
//!   its declared count.
//!
//! - **[`exchange`]**: Decodes the exchange file (BOM-aware) and pulls the
//!   four `Basic` fields into an [`ExchangeState`]. Every way the file can
//!   fail to be ready is a distinct [`ExchangeError`] variant.
//!
//! - **[`Dispatcher`]**: Looks the requested network up in the registry,
//!   writes the `LOADING` status document, and hands off to a [`Launcher`].
//!
//! - **[`Poller`]**: The fixed-interval check/dispatch state machine that
//!   drives the whole thing until a dispatch succeeds or it is cancelled.
//!
//! Like the rest of the workspace, core never reads config files: the
//! binary builds a [`LauncherConfig`] and passes it in.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod exchange;
pub mod launch;
pub mod model;
pub mod poll;
pub mod registry;
pub mod status;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{LauncherConfig, SimPaths, SimulatorCommand};
pub use dispatch::{Dispatch, Dispatcher};
pub use error::{CoreError, ExchangeError};
pub use launch::{LaunchReport, Launcher, ProcessLauncher};
pub use model::{ExchangeState, NetworkEntry, NetworkId, NetworkStatus};
pub use poll::{CheckOutcome, PollState, Poller, RunOutcome};
pub use registry::Registry;
pub use status::StatusDocument;
