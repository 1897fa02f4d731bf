// ── Runtime launcher configuration ──
//
// These types describe *where* the launcher looks and *what* it runs.
// They never touch disk. The CLI resolves config file, env, and flags
// into a `LauncherConfig` and hands it in.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Locations of every file the launcher reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimPaths {
    /// Exchange file written by the CAD Simulation Manager.
    pub exchange: PathBuf,
    /// Network registry (`networkFinder.cfg`).
    pub registry: PathBuf,
    /// Status document written on dispatch.
    pub status: PathBuf,
    /// Companion camera status file, created empty if missing.
    pub marker: PathBuf,
}

impl SimPaths {
    /// Default file names resolved under `root`.
    pub fn under(root: &Path) -> Self {
        Self {
            exchange: root.join("exchange.xml"),
            registry: root.join("networkFinder.cfg"),
            status: root.join("paramics_status.xml"),
            marker: root.join("camera_status.xml"),
        }
    }
}

/// The simulator invocation, minus the target network directory.
///
/// The final command line is `executable args... <network dir>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatorCommand {
    pub executable: PathBuf,
    pub args: Vec<String>,
    /// Block until the simulator exits and log its status. The status is
    /// never acted upon.
    pub wait: bool,
}

impl Default for SimulatorCommand {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("Modeller"),
            args: vec!["-cmd".into(), "-going".into()],
            wait: false,
        }
    }
}

impl SimulatorCommand {
    /// Render the command line for display and logging.
    pub fn display_for(&self, directory: &Path) -> String {
        let mut parts = vec![self.executable.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.push(directory.display().to_string());
        parts.join(" ")
    }
}

/// Everything the poll loop needs, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherConfig {
    pub root: PathBuf,
    pub paths: SimPaths,
    pub simulator: SimulatorCommand,
    /// Delay between exchange-file checks.
    pub poll_interval: Duration,
    /// Treat data errors on the very first check as fatal.
    pub strict_startup: bool,
}

impl LauncherConfig {
    /// Defaults rooted at `root`: stock file names, `Modeller -cmd -going`,
    /// 2 s polling.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            paths: SimPaths::under(&root),
            root,
            simulator: SimulatorCommand::default(),
            poll_interval: Duration::from_secs(2),
            strict_startup: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_resolve_under_root() {
        let paths = SimPaths::under(Path::new("/srv/tmc"));
        assert_eq!(paths.exchange, Path::new("/srv/tmc/exchange.xml"));
        assert_eq!(paths.registry, Path::new("/srv/tmc/networkFinder.cfg"));
        assert_eq!(paths.status, Path::new("/srv/tmc/paramics_status.xml"));
        assert_eq!(paths.marker, Path::new("/srv/tmc/camera_status.xml"));
    }

    #[test]
    fn command_line_appends_directory_last() {
        let cmd = SimulatorCommand::default();
        assert_eq!(
            cmd.display_for(Path::new("nets/irvine")),
            "Modeller -cmd -going nets/irvine"
        );
    }
}
