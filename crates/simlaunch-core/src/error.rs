// ── Core error types ──
//
// `ExchangeError` covers every way the exchange file can fail to be
// ready. The poll loop handles these locally; none of them stop the
// launcher unless strict startup is on. `CoreError` covers the failures
// that do stop it: a bad registry, or a simulator that cannot be spawned.

use std::path::PathBuf;

use strum::IntoStaticStr;
use thiserror::Error;

/// Outcome of an exchange-file read that did not yield a complete state.
#[derive(Debug, Error, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ExchangeError {
    #[error("no exchange file at {}", path.display())]
    Absent { path: PathBuf },

    #[error("unable to open exchange file {}: {source}", path.display())]
    Unopenable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("exchange file is not text ({reason})")]
    Undecodable { reason: String },

    #[error("exchange file is empty")]
    Empty,

    #[error("exchange file is not well-formed: {reason}")]
    Malformed { reason: String },

    #[error("missing element: {missing}")]
    Incomplete { missing: &'static str },

    #[error("element {field} is not an integer: '{value}'")]
    InvalidValue { field: &'static str, value: String },
}

impl ExchangeError {
    /// The file is there but its contents are wrong, as opposed to simply
    /// not being ready yet.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::Undecodable { .. } | Self::Incomplete { .. } | Self::InvalidValue { .. }
        )
    }

    /// Short machine-readable label (`absent`, `incomplete`, ...).
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

/// Errors that end the launcher.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Registry ─────────────────────────────────────────────────────
    #[error("cannot open the network registry {}: {source}", path.display())]
    RegistryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("registry line {line}: {reason}")]
    RegistryLine { line: usize, reason: String },

    #[error("registry declares {declared} networks but lists {found}")]
    RegistryCount { declared: usize, found: usize },

    // ── Dispatch ─────────────────────────────────────────────────────
    #[error("cannot write status file {}: {source}", path.display())]
    StatusWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("status file {} is not a status document: {reason}", path.display())]
    StatusRead { path: PathBuf, reason: String },

    #[error("failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // ── Startup ──────────────────────────────────────────────────────
    #[error("incomplete data from CAD: {source}")]
    StartupData {
        #[source]
        source: ExchangeError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_errors_are_classified() {
        assert!(ExchangeError::Incomplete { missing: "Incident" }.is_data_error());
        assert!(
            ExchangeError::Undecodable {
                reason: "nul".into()
            }
            .is_data_error()
        );
        assert!(!ExchangeError::Empty.is_data_error());
        assert!(
            !ExchangeError::Absent {
                path: PathBuf::from("exchange.xml")
            }
            .is_data_error()
        );
    }

    #[test]
    fn kinds_are_snake_case() {
        assert_eq!(ExchangeError::Empty.kind(), "empty");
        assert_eq!(
            ExchangeError::InvalidValue {
                field: "Network_ID",
                value: "x".into()
            }
            .kind(),
            "invalid_value"
        );
    }

    #[test]
    fn incomplete_names_the_tag() {
        let err = ExchangeError::Incomplete { missing: "Incident" };
        assert_eq!(err.to_string(), "missing element: Incident");
    }
}
