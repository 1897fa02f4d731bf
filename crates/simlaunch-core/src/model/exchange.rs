// ── Exchange file contents ──

use serde::Serialize;

use super::network::NetworkId;

/// The four `Basic` fields of a complete exchange file.
///
/// Rebuilt from scratch on every successful read; a read that cannot
/// produce all four fields produces no state at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExchangeState {
    /// `Comm_Interval`: the manager's communication interval.
    pub comm_interval: i64,
    /// `Network_ID`: which registry network to launch.
    pub network_id: NetworkId,
    /// `Simulation` is exactly `TRUE`.
    pub simulation_started: bool,
    /// `Incident` is exactly `TRUE`.
    pub incident_started: bool,
}
