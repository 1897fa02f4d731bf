// ── Dispatch ──
//
// Match the requested network against the registry, write the LOADING
// status document, and hand off to the launcher. A status write failure
// stops the hand-off before anything is started.

use tracing::{info, warn};

use crate::config::LauncherConfig;
use crate::error::CoreError;
use crate::launch::{LaunchReport, Launcher};
use crate::model::{ExchangeState, NetworkEntry, NetworkId};
use crate::registry::Registry;
use crate::status::StatusDocument;

/// Result of a dispatch attempt that did not error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// No registry entry carries the requested id. Nothing was written.
    NoMatch { network_id: NetworkId },
    /// Status written and simulator started.
    Launched {
        entry: NetworkEntry,
        report: LaunchReport,
    },
}

pub struct Dispatcher<'a, L> {
    config: &'a LauncherConfig,
    registry: &'a Registry,
    launcher: L,
}

impl<'a, L: Launcher> Dispatcher<'a, L> {
    pub fn new(config: &'a LauncherConfig, registry: &'a Registry, launcher: L) -> Self {
        Self {
            config,
            registry,
            launcher,
        }
    }

    pub fn dispatch(&self, state: &ExchangeState) -> Result<Dispatch, CoreError> {
        let Some(entry) = self.registry.find(state.network_id) else {
            warn!(network_id = %state.network_id, "no corresponding network found");
            return Ok(Dispatch::NoMatch {
                network_id: state.network_id,
            });
        };

        info!(
            network_id = %entry.id,
            name = %entry.name,
            directory = %entry.directory.display(),
            "matched simulation network"
        );

        StatusDocument::loading(entry.id).write(&self.config.paths.status)?;
        let report = self
            .launcher
            .launch(&self.config.simulator, &entry.directory)?;

        Ok(Dispatch::Launched {
            entry: entry.clone(),
            report,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::launch::testing::RecordingLauncher;
    use crate::model::NetworkStatus;

    fn registry() -> Registry {
        Registry::parse("number of networks: 2\n1 irvine /nets/irvine\n42 sr55 /nets/sr55\n")
            .unwrap()
    }

    fn state(id: i64) -> ExchangeState {
        ExchangeState {
            comm_interval: 30,
            network_id: NetworkId(id),
            simulation_started: false,
            incident_started: false,
        }
    }

    #[test]
    fn match_writes_status_and_launches() {
        let dir = tempfile::tempdir().unwrap();
        let config = LauncherConfig::with_root(dir.path());
        let registry = registry();
        let launcher = RecordingLauncher::default();
        let dispatcher = Dispatcher::new(&config, &registry, &launcher);

        let outcome = dispatcher.dispatch(&state(42)).unwrap();
        let Dispatch::Launched { entry, report } = outcome else {
            panic!("expected a launch, got {outcome:?}");
        };
        assert_eq!(entry.name, "sr55");
        assert_eq!(report.command_line, "Modeller -cmd -going /nets/sr55");
        assert_eq!(*launcher.launched.borrow(), vec![PathBuf::from("/nets/sr55")]);

        let written = StatusDocument::read(&config.paths.status).unwrap().unwrap();
        assert_eq!(written.network_id, NetworkId(42));
        assert_eq!(written.status, NetworkStatus::Loading);
    }

    #[test]
    fn unknown_network_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = LauncherConfig::with_root(dir.path());
        let registry = registry();
        let launcher = RecordingLauncher::default();
        let dispatcher = Dispatcher::new(&config, &registry, &launcher);

        assert_eq!(
            dispatcher.dispatch(&state(999)).unwrap(),
            Dispatch::NoMatch {
                network_id: NetworkId(999)
            }
        );
        assert!(!config.paths.status.exists());
        assert!(launcher.launched.borrow().is_empty());
    }

    #[test]
    fn status_write_failure_skips_launch() {
        let dir = tempfile::tempdir().unwrap();
        let config = LauncherConfig::with_root(dir.path().join("missing"));
        let registry = registry();
        let launcher = RecordingLauncher::default();
        let dispatcher = Dispatcher::new(&config, &registry, &launcher);

        assert!(matches!(
            dispatcher.dispatch(&state(1)).unwrap_err(),
            CoreError::StatusWrite { .. }
        ));
        assert!(launcher.launched.borrow().is_empty());
    }

    #[test]
    fn launch_failure_is_propagated() {
        let dir = tempfile::tempdir().unwrap();
        let config = LauncherConfig::with_root(dir.path());
        let registry = registry();
        let dispatcher = Dispatcher::new(&config, &registry, RecordingLauncher::failing());

        assert!(matches!(
            dispatcher.dispatch(&state(1)).unwrap_err(),
            CoreError::Launch { .. }
        ));
        // Status is written before the launch is attempted.
        assert!(config.paths.status.exists());
    }
}
