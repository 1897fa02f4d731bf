// ── Simulation network types ──

use std::fmt;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;
use strum::{Display, EnumString};

/// Identifier shared between the CAD Simulation Manager's `Network_ID`
/// and the first column of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NetworkId(pub i64);

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NetworkId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// One line of the registry: a launchable simulation network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkEntry {
    pub id: NetworkId,
    /// Short human name (single token, no whitespace).
    pub name: String,
    /// Network directory handed to the simulator.
    pub directory: PathBuf,
}

/// Values of `Network_Status` in the status document.
///
/// The launcher only ever writes `LOADING`; the simulator plugin moves the
/// document on to `WARMING` and `LOADED` once it is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NetworkStatus {
    Loading,
    Warming,
    Loaded,
}
