// ── Network registry ──
//
// `networkFinder.cfg` is a hand-edited text file:
//
//     number of networks: 2
//     1 irvine c:/tmc_simulator/networks/irvine
//     2 i405 c:/tmc_simulator/networks/i405
//
// Loaded once at startup and never mutated.

use std::borrow::Cow;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use encoding_rs::{UTF_8, WINDOWS_1252};
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{NetworkEntry, NetworkId};

const HEADER_PREFIX: &str = "number of networks:";

/// Ordered, immutable list of launchable networks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    entries: Vec<NetworkEntry>,
}

impl Registry {
    /// Read and parse the registry file at `path`.
    ///
    /// Hand-edited files are often saved as Windows-1252; anything that is
    /// not UTF-8 is read that way.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let bytes = std::fs::read(path).map_err(|source| CoreError::RegistryUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::parse(&decode(&bytes))?;
        debug!(path = %path.display(), networks = registry.len(), "loaded network registry");
        Ok(registry)
    }

    /// Parse registry text. The header's declared count must match the
    /// number of entry lines.
    pub fn parse(text: &str) -> Result<Self, CoreError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let Some((header_line, header)) = lines.next() else {
            return Err(CoreError::RegistryLine {
                line: 1,
                reason: "missing 'number of networks: N' header".into(),
            });
        };
        let declared = parse_header(header).ok_or_else(|| CoreError::RegistryLine {
            line: header_line,
            reason: format!("expected 'number of networks: N', got '{header}'"),
        })?;

        let mut entries = Vec::with_capacity(declared);
        let mut seen = HashSet::new();
        for (line, text) in lines {
            let entry = parse_entry(line, text)?;
            if !seen.insert(entry.id) {
                warn!(
                    network_id = %entry.id,
                    line,
                    "duplicate network id in registry; the earlier entry wins"
                );
            }
            entries.push(entry);
        }

        if entries.len() != declared {
            return Err(CoreError::RegistryCount {
                declared,
                found: entries.len(),
            });
        }

        Ok(Self { entries })
    }

    /// First entry whose id matches.
    pub fn find(&self, id: NetworkId) -> Option<&NetworkEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn entries(&self) -> &[NetworkEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// UTF-8 (BOM stripped) when valid, Windows-1252 otherwise. Never fails.
fn decode(bytes: &[u8]) -> Cow<'_, str> {
    let (text, had_errors) = UTF_8.decode_with_bom_removal(bytes);
    if had_errors {
        WINDOWS_1252.decode_without_bom_handling(bytes).0
    } else {
        text
    }
}

/// Accepts `number of networks: N` or a bare `N`.
fn parse_header(header: &str) -> Option<usize> {
    let count = header
        .get(..HEADER_PREFIX.len())
        .filter(|prefix| prefix.eq_ignore_ascii_case(HEADER_PREFIX))
        .map_or(header, |_| &header[HEADER_PREFIX.len()..]);
    count.trim().parse().ok()
}

fn parse_entry(line: usize, text: &str) -> Result<NetworkEntry, CoreError> {
    let mut fields = text.split_whitespace();
    let (Some(id), Some(name), Some(directory)) = (fields.next(), fields.next(), fields.next())
    else {
        return Err(CoreError::RegistryLine {
            line,
            reason: format!("expected '<id> <name> <directory>', got '{text}'"),
        });
    };
    if let Some(extra) = fields.next() {
        return Err(CoreError::RegistryLine {
            line,
            reason: format!("unexpected trailing field '{extra}' (names and directories cannot contain spaces)"),
        });
    }
    let id = id.parse::<NetworkId>().map_err(|e| CoreError::RegistryLine {
        line,
        reason: format!("network id '{id}' is not an integer: {e}"),
    })?;

    Ok(NetworkEntry {
        id,
        name: name.to_owned(),
        directory: PathBuf::from(directory),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const THREE: &str = "number of networks: 3\n\
                         7 irvine c:/tmc/irvine\n\
                         2 i405 c:/tmc/i405\n\
                         42 sr55 c:/tmc/sr55\n";

    #[test]
    fn loads_declared_entries_in_order() {
        let registry = Registry::parse(THREE).unwrap();
        assert_eq!(registry.len(), 3);
        let ids: Vec<i64> = registry.entries().iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![7, 2, 42]);
        assert_eq!(registry.entries()[2].name, "sr55");
        assert_eq!(registry.entries()[2].directory, PathBuf::from("c:/tmc/sr55"));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("networkFinder.cfg");
        std::fs::write(&path, THREE).unwrap();
        assert_eq!(Registry::load(&path).unwrap().len(), 3);
    }

    #[test]
    fn load_falls_back_to_windows_1252() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("networkFinder.cfg");
        std::fs::write(&path, b"number of networks: 1\n1 montr\xE9al c:/nets/montreal\n").unwrap();

        let registry = Registry::load(&path).unwrap();
        assert_eq!(registry.find(NetworkId(1)).unwrap().name, "montr\u{e9}al");
    }

    #[test]
    fn load_strips_utf8_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("networkFinder.cfg");
        std::fs::write(&path, b"\xEF\xBB\xBFnumber of networks: 1\n3 caf\xC3\xA9 /nets/cafe\n")
            .unwrap();

        let registry = Registry::load(&path).unwrap();
        assert_eq!(registry.find(NetworkId(3)).unwrap().name, "caf\u{e9}");
    }

    #[test]
    fn missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = Registry::load(&dir.path().join("networkFinder.cfg")).unwrap_err();
        assert!(matches!(err, CoreError::RegistryUnreadable { .. }));
    }

    #[test]
    fn bare_count_header_is_accepted() {
        let registry = Registry::parse("1\n5 demo /nets/demo\n").unwrap();
        assert_eq!(registry.find(NetworkId(5)).unwrap().name, "demo");
    }

    #[test]
    fn blank_lines_are_skipped() {
        let registry = Registry::parse("\nnumber of networks: 1\n\n9 a /a\n\n").unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn count_mismatch_fails() {
        let err = Registry::parse("number of networks: 3\n1 a /a\n2 b /b\n").unwrap_err();
        assert!(matches!(
            err,
            CoreError::RegistryCount {
                declared: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn extra_entries_also_fail() {
        let err = Registry::parse("number of networks: 1\n1 a /a\n2 b /b\n").unwrap_err();
        assert!(matches!(
            err,
            CoreError::RegistryCount {
                declared: 1,
                found: 2
            }
        ));
    }

    #[test]
    fn short_line_reports_line_number() {
        let err = Registry::parse("number of networks: 2\n1 a /a\n2 b\n").unwrap_err();
        assert!(matches!(err, CoreError::RegistryLine { line: 3, .. }));
    }

    #[test]
    fn non_integer_id_fails() {
        let err = Registry::parse("number of networks: 1\nx a /a\n").unwrap_err();
        assert!(matches!(err, CoreError::RegistryLine { line: 2, .. }));
    }

    #[test]
    fn garbage_header_fails() {
        let err = Registry::parse("networks galore\n").unwrap_err();
        assert!(matches!(err, CoreError::RegistryLine { line: 1, .. }));
    }

    #[test]
    fn empty_file_fails() {
        assert!(Registry::parse("").is_err());
    }

    #[test]
    fn duplicate_ids_resolve_to_first() {
        let registry =
            Registry::parse("number of networks: 2\n4 first /one\n4 second /two\n").unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.find(NetworkId(4)).unwrap().name, "first");
    }

    #[test]
    fn find_misses_unknown_id() {
        let registry = Registry::parse(THREE).unwrap();
        assert!(registry.find(NetworkId(999)).is_none());
    }
}
