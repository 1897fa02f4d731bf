// ── Poll loop ──
//
// Idle -> Checking -> { Dispatched (terminal), NotReady -> sleep -> Checking }
//
// The first check runs immediately. Everything short of a dispatch keeps
// the loop going, except a failed simulator spawn and, with strict startup,
// a data error on the very first check.

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::LauncherConfig;
use crate::dispatch::{Dispatch, Dispatcher};
use crate::error::{CoreError, ExchangeError};
use crate::exchange;
use crate::launch::{LaunchReport, Launcher};
use crate::model::{NetworkEntry, NetworkId};
use crate::registry::Registry;

/// Repeat-suppression key for status write failures.
const STATUS_WRITE_FAILED: &str = "status_write_failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Checking,
    NotReady,
    Dispatched,
}

/// Result of a single check.
#[derive(Debug)]
pub enum CheckOutcome {
    /// The exchange file could not produce a state.
    NotReady(ExchangeError),
    /// The file names a network the registry does not have.
    NoMatch { network_id: NetworkId },
    /// A network matched but the status file could not be written, so
    /// nothing was launched.
    StatusWriteFailed(CoreError),
    Dispatched {
        entry: NetworkEntry,
        report: LaunchReport,
    },
}

impl CheckOutcome {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, Self::Dispatched { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Dispatched {
        entry: NetworkEntry,
        report: LaunchReport,
    },
    Cancelled,
}

pub struct Poller<'a, L> {
    config: &'a LauncherConfig,
    dispatcher: Dispatcher<'a, L>,
    state: PollState,
    checks: u64,
    last_kind: Option<&'static str>,
}

impl<'a, L: Launcher> Poller<'a, L> {
    pub fn new(config: &'a LauncherConfig, registry: &'a Registry, launcher: L) -> Self {
        Self {
            config,
            dispatcher: Dispatcher::new(config, registry, launcher),
            state: PollState::Idle,
            checks: 0,
            last_kind: None,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    /// Number of checks performed so far.
    pub fn checks(&self) -> u64 {
        self.checks
    }

    /// Read the exchange file once and dispatch if it is ready.
    ///
    /// Errors only for conditions that should end the launcher.
    pub fn check(&mut self) -> Result<CheckOutcome, CoreError> {
        let first = self.checks == 0;
        self.checks += 1;
        self.state = PollState::Checking;

        let outcome = match exchange::read(&self.config.paths.exchange) {
            Err(err) if first && self.config.strict_startup && err.is_data_error() => {
                error!(error = %err, "incomplete data from CAD; check the exchange file");
                self.state = PollState::NotReady;
                return Err(CoreError::StartupData { source: err });
            }
            Err(err) => {
                self.log_not_ready(&err);
                CheckOutcome::NotReady(err)
            }
            Ok(state) => {
                debug!(
                    comm_interval = state.comm_interval,
                    network_id = %state.network_id,
                    simulation = state.simulation_started,
                    incident = state.incident_started,
                    "exchange file ready"
                );
                match self.dispatcher.dispatch(&state) {
                    Ok(Dispatch::NoMatch { network_id }) => {
                        self.last_kind = None;
                        CheckOutcome::NoMatch { network_id }
                    }
                    Ok(Dispatch::Launched { entry, report }) => {
                        CheckOutcome::Dispatched { entry, report }
                    }
                    Err(err @ CoreError::StatusWrite { .. }) => {
                        if self.first_of_kind(STATUS_WRITE_FAILED) {
                            warn!(error = %err, "status file not written; simulator not started");
                        } else {
                            debug!(error = %err, "status file still not writable");
                        }
                        CheckOutcome::StatusWriteFailed(err)
                    }
                    Err(err) => {
                        self.state = PollState::NotReady;
                        return Err(err);
                    }
                }
            }
        };

        self.state = if outcome.is_dispatched() {
            PollState::Dispatched
        } else {
            PollState::NotReady
        };
        Ok(outcome)
    }

    /// Check immediately, then every `poll_interval` until a dispatch
    /// succeeds or `cancel` fires.
    pub async fn run(&mut self, cancel: &CancellationToken) -> Result<RunOutcome, CoreError> {
        info!(
            exchange = %self.config.paths.exchange.display(),
            interval = ?self.config.poll_interval,
            "waiting for CAD Simulation Manager to start"
        );

        loop {
            if let CheckOutcome::Dispatched { entry, report } = self.check()? {
                info!(network = %entry.name, checks = self.checks, "simulation network loaded");
                return Ok(RunOutcome::Dispatched { entry, report });
            }

            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    info!(checks = self.checks, "stopped waiting");
                    return Ok(RunOutcome::Cancelled);
                }
                () = tokio::time::sleep(self.config.poll_interval) => {}
            }
        }
    }

    /// Records `kind` as the latest failure. True if it differs from the
    /// previous one.
    fn first_of_kind(&mut self, kind: &'static str) -> bool {
        if self.last_kind == Some(kind) {
            return false;
        }
        self.last_kind = Some(kind);
        true
    }

    /// Log a new kind of not-ready once at info/warn, repeats at debug.
    fn log_not_ready(&mut self, err: &ExchangeError) {
        let kind = err.kind();
        if !self.first_of_kind(kind) {
            debug!(reason = kind, "still waiting");
            return;
        }
        match err {
            ExchangeError::Absent { .. } | ExchangeError::Empty => {
                info!(reason = %err, "exchange file not ready");
            }
            _ => warn!(reason = %err, "exchange file not usable"),
        }
    }
}
