// ── Simulator hand-off ──
//
// Launching is fire-and-forget: the child is spawned, its pid logged, and
// the launcher moves on. With `wait` set the child is waited for and its
// exit status logged, but nothing is decided on it.

use std::path::Path;
use std::process::Command;

use tracing::{info, warn};

use crate::config::SimulatorCommand;
use crate::error::CoreError;

/// What happened when the simulator was started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchReport {
    /// The full command line, for logs.
    pub command_line: String,
    pub pid: Option<u32>,
    /// Only populated when the launcher waited for the child.
    pub exit_code: Option<i32>,
}

/// Starts the simulator for a network directory.
pub trait Launcher {
    fn launch(&self, command: &SimulatorCommand, directory: &Path)
    -> Result<LaunchReport, CoreError>;
}

impl<L: Launcher + ?Sized> Launcher for &L {
    fn launch(
        &self,
        command: &SimulatorCommand,
        directory: &Path,
    ) -> Result<LaunchReport, CoreError> {
        (**self).launch(command, directory)
    }
}

/// Spawns the simulator as a real child process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(
        &self,
        command: &SimulatorCommand,
        directory: &Path,
    ) -> Result<LaunchReport, CoreError> {
        let command_line = command.display_for(directory);
        info!(command = %command_line, "starting simulator");

        let mut child = Command::new(&command.executable)
            .args(&command.args)
            .arg(directory)
            .spawn()
            .map_err(|source| CoreError::Launch {
                command: command_line.clone(),
                source,
            })?;

        let pid = child.id();
        info!(pid, "simulator started");

        let exit_code = if command.wait {
            match child.wait() {
                Ok(status) => {
                    info!(%status, "simulator exited");
                    status.code()
                }
                Err(e) => {
                    warn!(error = %e, "could not wait for simulator");
                    None
                }
            }
        } else {
            None
        };

        Ok(LaunchReport {
            command_line,
            pid: Some(pid),
            exit_code,
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::path::PathBuf;

    use super::*;

    /// Records launch requests instead of spawning anything.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingLauncher {
        pub launched: RefCell<Vec<PathBuf>>,
        pub fail: bool,
    }

    impl RecordingLauncher {
        pub(crate) fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }
    }

    impl Launcher for RecordingLauncher {
        fn launch(
            &self,
            command: &SimulatorCommand,
            directory: &Path,
        ) -> Result<LaunchReport, CoreError> {
            let command_line = command.display_for(directory);
            if self.fail {
                return Err(CoreError::Launch {
                    command: command_line,
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                });
            }
            self.launched.borrow_mut().push(directory.to_path_buf());
            Ok(LaunchReport {
                command_line,
                pid: Some(4242),
                exit_code: None,
            })
        }
    }
}
