// ── Status document ──
//
// Written to `paramics_status.xml` right before the simulator is started,
// so the CAD side can see a network is on its way:
//
//     <?xml version="1.0" encoding="UTF-8"?>
//     <Paramics>
//       <Network_Status>LOADING</Network_Status>
//       <Network_ID>42</Network_ID>
//     </Paramics>

use std::fs::OpenOptions;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::CoreError;
use crate::model::{NetworkId, NetworkStatus};

const ROOT: &str = "Paramics";
const NETWORK_STATUS: &str = "Network_Status";
const NETWORK_ID: &str = "Network_ID";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusDocument {
    pub status: NetworkStatus,
    pub network_id: NetworkId,
}

impl StatusDocument {
    pub fn loading(network_id: NetworkId) -> Self {
        Self {
            status: NetworkStatus::Loading,
            network_id,
        }
    }

    /// Serialize to the indented XML the CAD side expects.
    pub fn render(&self) -> String {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        let status = self.status.to_string();
        let id = self.network_id.to_string();

        let events = [
            Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
            Event::Start(BytesStart::new(ROOT)),
            Event::Start(BytesStart::new(NETWORK_STATUS)),
            Event::Text(BytesText::new(&status)),
            Event::End(BytesEnd::new(NETWORK_STATUS)),
            Event::Start(BytesStart::new(NETWORK_ID)),
            Event::Text(BytesText::new(&id)),
            Event::End(BytesEnd::new(NETWORK_ID)),
            Event::End(BytesEnd::new(ROOT)),
        ];
        for event in events {
            writer
                .write_event(event)
                .expect("writing to a Vec should not fail");
        }

        let mut out = String::from_utf8(writer.into_inner()).expect("writer emits UTF-8");
        out.push('\n');
        out
    }

    /// Replace the status file at `path` with this document.
    pub fn write(&self, path: &Path) -> Result<(), CoreError> {
        std::fs::write(path, self.render()).map_err(|source| CoreError::StatusWrite {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), status = %self.status, network_id = %self.network_id, "wrote status file");
        Ok(())
    }

    /// Read a status document back, e.g. one the simulator has since
    /// advanced to `LOADED`. Returns `Ok(None)` if the file does not exist.
    pub fn read(path: &Path) -> Result<Option<Self>, CoreError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Self::parse(&text)
            .map(Some)
            .map_err(|reason| CoreError::StatusRead {
                path: path.to_path_buf(),
                reason,
            })
    }

    fn parse(text: &str) -> Result<Self, String> {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut depth = 0usize;
        let mut current: Option<&'static str> = None;
        let mut status = None;
        let mut network_id = None;

        loop {
            match reader.read_event().map_err(|e| e.to_string())? {
                Event::Start(e) => {
                    depth += 1;
                    current = match (depth, e.local_name().as_ref()) {
                        (2, b"Network_Status") => Some(NETWORK_STATUS),
                        (2, b"Network_ID") => Some(NETWORK_ID),
                        _ => None,
                    };
                }
                Event::Text(t) if depth == 2 => {
                    let value = t.unescape().map_err(|e| e.to_string())?;
                    match current {
                        Some(NETWORK_STATUS) if status.is_none() => {
                            let parsed = value
                                .parse::<NetworkStatus>()
                                .map_err(|_| format!("unknown {NETWORK_STATUS} '{value}'"))?;
                            status = Some(parsed);
                        }
                        Some(NETWORK_ID) if network_id.is_none() => {
                            let parsed = value
                                .parse::<NetworkId>()
                                .map_err(|e| format!("bad {NETWORK_ID} '{value}': {e}"))?;
                            network_id = Some(parsed);
                        }
                        _ => {}
                    }
                }
                Event::End(_) => {
                    current = None;
                    depth = depth.saturating_sub(1);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(Self {
            status: status.ok_or_else(|| format!("missing {NETWORK_STATUS}"))?,
            network_id: network_id.ok_or_else(|| format!("missing {NETWORK_ID}"))?,
        })
    }
}

/// Make sure the companion camera status file exists, creating it empty
/// if it does not. Returns whether it was created.
pub fn ensure_marker(path: &Path) -> std::io::Result<bool> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => {
            info!(path = %path.display(), "created empty marker file");
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e),
    }
}
