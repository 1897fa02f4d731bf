// ── Exchange file reader ──
//
// The CAD Simulation Manager writes `exchange.xml` when it wants a
// network loaded:
//
//     <CAD_Simulator>
//       <Basic>
//         <Comm_Interval>30</Comm_Interval>
//         <Network_ID>2</Network_ID>
//         <Simulation>FALSE</Simulation>
//         <Incident>FALSE</Incident>
//       </Basic>
//     </CAD_Simulator>
//
// The root element name is not checked. Only direct children of the root
// and of `Basic` are considered, and the first occurrence of a tag wins.
// Scanning stops when the first root element closes.

use std::borrow::Cow;
use std::path::Path;

use encoding_rs::{Encoding, WINDOWS_1252};
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::ExchangeError;
use crate::model::{ExchangeState, NetworkId};

pub const BASIC: &str = "Basic";
pub const COMM_INTERVAL: &str = "Comm_Interval";
pub const NETWORK_ID: &str = "Network_ID";
pub const SIMULATION: &str = "Simulation";
pub const INCIDENT: &str = "Incident";

/// `Basic` children in the order they are checked and reported.
const FIELDS: [&str; 4] = [COMM_INTERVAL, NETWORK_ID, SIMULATION, INCIDENT];

/// Read, decode, and parse the exchange file at `path`.
///
/// Side-effect free: reading an unchanged file twice yields equal states.
pub fn read(path: &Path) -> Result<ExchangeState, ExchangeError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ExchangeError::Absent {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(ExchangeError::Unopenable {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    parse(&decode(&bytes)?)
}

/// Decode raw file bytes to text.
///
/// A byte-order mark selects UTF-8, UTF-16LE, or UTF-16BE and the rest of
/// the file must be valid in that encoding. Without a BOM the bytes are
/// taken as UTF-8, falling back to Windows-1252. Text containing NUL is
/// rejected as binary.
pub fn decode(bytes: &[u8]) -> Result<Cow<'_, str>, ExchangeError> {
    let text = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => encoding
            .decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
            .ok_or_else(|| ExchangeError::Undecodable {
                reason: format!("invalid {} after byte-order mark", encoding.name()),
            })?,
        None => match std::str::from_utf8(bytes) {
            Ok(text) => Cow::Borrowed(text),
            Err(_) => WINDOWS_1252.decode_without_bom_handling(bytes).0,
        },
    };

    if text.contains('\0') {
        return Err(ExchangeError::Undecodable {
            reason: "contains NUL characters, possibly binary data".into(),
        });
    }
    Ok(text)
}

/// Extract the four `Basic` fields from decoded exchange text.
pub fn parse(text: &str) -> Result<ExchangeState, ExchangeError> {
    let fields = scan(text)?;

    let comm_interval = parse_int(COMM_INTERVAL, &fields[0])?;
    let network_id = NetworkId(parse_int(NETWORK_ID, &fields[1])?);

    Ok(ExchangeState {
        comm_interval,
        network_id,
        simulation_started: fields[2] == "TRUE",
        incident_started: fields[3] == "TRUE",
    })
}

/// Walk the document once, collecting the text of each field in `FIELDS`
/// order. Reports the first missing element.
fn scan(text: &str) -> Result<[String; 4], ExchangeError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut depth = 0usize;
    let mut saw_root = false;
    let mut saw_basic = false;
    let mut in_basic = false;
    let mut capturing: Option<usize> = None;
    let mut found: [Option<String>; 4] = Default::default();

    loop {
        let event = reader.read_event().map_err(|e| ExchangeError::Malformed {
            reason: format!("{e} at byte {}", reader.error_position()),
        })?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                let level = depth + 1;
                let name = e.local_name();
                match level {
                    // A self-closing root ends the document.
                    1 if is_empty => {
                        saw_root = true;
                        break;
                    }
                    1 => saw_root = true,
                    2 if !saw_basic && name.as_ref() == BASIC.as_bytes() => {
                        saw_basic = true;
                        in_basic = !is_empty;
                    }
                    3 if in_basic => {
                        let slot = FIELDS
                            .iter()
                            .position(|field| name.as_ref() == field.as_bytes());
                        if let Some(idx) = slot.filter(|&idx| found[idx].is_none()) {
                            found[idx] = Some(String::new());
                            capturing = (!is_empty).then_some(idx);
                        }
                    }
                    _ => {}
                }
                if !is_empty {
                    depth = level;
                }
            }
            Event::Text(t) if depth == 3 => {
                if let Some(idx) = capturing {
                    let text = t.unescape().map_err(|e| ExchangeError::Malformed {
                        reason: e.to_string(),
                    })?;
                    push_text(&mut found[idx], &text);
                }
            }
            Event::CData(c) if depth == 3 => {
                if let Some(idx) = capturing {
                    push_text(&mut found[idx], &String::from_utf8_lossy(&c));
                }
            }
            Event::End(_) => {
                match depth {
                    3 => capturing = None,
                    2 => in_basic = false,
                    1 => break,
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => {
                if depth > 0 {
                    return Err(ExchangeError::Malformed {
                        reason: "document ends before its root element is closed".into(),
                    });
                }
                break;
            }
            _ => {}
        }
    }

    if !saw_root {
        return Err(ExchangeError::Empty);
    }
    if !saw_basic {
        return Err(ExchangeError::Incomplete { missing: BASIC });
    }

    let [comm, net, sim, inc] = found;
    Ok([
        comm.ok_or(ExchangeError::Incomplete { missing: COMM_INTERVAL })?,
        net.ok_or(ExchangeError::Incomplete { missing: NETWORK_ID })?,
        sim.ok_or(ExchangeError::Incomplete { missing: SIMULATION })?,
        inc.ok_or(ExchangeError::Incomplete { missing: INCIDENT })?,
    ])
}

fn push_text(slot: &mut Option<String>, text: &str) {
    if let Some(buf) = slot {
        buf.push_str(text);
    }
}

fn parse_int(field: &'static str, text: &str) -> Result<i64, ExchangeError> {
    text.trim()
        .parse()
        .map_err(|_| ExchangeError::InvalidValue {
            field,
            value: text.to_owned(),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const READY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<CAD_Simulator>
  <Basic>
    <Comm_Interval>30</Comm_Interval>
    <Network_ID>42</Network_ID>
    <Simulation>TRUE</Simulation>
    <Incident>FALSE</Incident>
  </Basic>
</CAD_Simulator>
"#;

    fn ready_state() -> ExchangeState {
        ExchangeState {
            comm_interval: 30,
            network_id: NetworkId(42),
            simulation_started: true,
            incident_started: false,
        }
    }

    fn utf16le_with_bom(text: &str) -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn parses_complete_document() {
        assert_eq!(parse(READY).unwrap(), ready_state());
    }

    #[test]
    fn utf16_bom_matches_ascii() {
        let wide = utf16le_with_bom(READY);
        let text = decode(&wide).unwrap();
        assert_eq!(parse(&text).unwrap(), parse(READY).unwrap());
    }

    #[test]
    fn utf16be_bom_is_understood() {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in READY.encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        assert_eq!(parse(&decode(&bytes).unwrap()).unwrap(), ready_state());
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(READY.as_bytes());
        assert_eq!(parse(&decode(&bytes).unwrap()).unwrap(), ready_state());
    }

    #[test]
    fn odd_length_utf16_is_undecodable() {
        let mut wide = utf16le_with_bom(READY);
        wide.push(0x3C);
        assert!(matches!(
            decode(&wide).unwrap_err(),
            ExchangeError::Undecodable { .. }
        ));
    }

    #[test]
    fn wide_text_without_bom_is_binary() {
        let wide = utf16le_with_bom(READY);
        assert!(matches!(
            decode(&wide[2..]).unwrap_err(),
            ExchangeError::Undecodable { .. }
        ));
    }

    #[test]
    fn single_byte_text_falls_back_to_windows_1252() {
        let bytes = b"<r><Basic><Comm_Interval>1</Comm_Interval><Network_ID>2</Network_ID>\
<Simulation>\xC9T\xC9</Simulation><Incident>TRUE</Incident></Basic></r>";
        let state = parse(&decode(bytes).unwrap()).unwrap();
        assert!(!state.simulation_started);
        assert!(state.incident_started);
    }

    #[test]
    fn missing_incident_is_incomplete() {
        let doc = READY.replace("<Incident>FALSE</Incident>", "");
        let err = parse(&doc).unwrap_err();
        assert!(matches!(err, ExchangeError::Incomplete { missing: "Incident" }));
    }

    #[test]
    fn missing_basic_is_incomplete() {
        let err = parse("<CAD_Simulator><Other/></CAD_Simulator>").unwrap_err();
        assert!(matches!(err, ExchangeError::Incomplete { missing: "Basic" }));
    }

    #[test]
    fn first_missing_field_is_reported() {
        let err = parse("<r><Basic><Incident>TRUE</Incident></Basic></r>").unwrap_err();
        assert!(matches!(
            err,
            ExchangeError::Incomplete {
                missing: "Comm_Interval"
            }
        ));
    }

    #[test]
    fn nested_fields_do_not_count() {
        let doc = "<r><Basic><Comm_Interval>1</Comm_Interval><Network_ID>2</Network_ID>\
                   <Simulation>TRUE</Simulation><Extra><Incident>TRUE</Incident></Extra></Basic></r>";
        assert!(matches!(
            parse(doc).unwrap_err(),
            ExchangeError::Incomplete { missing: "Incident" }
        ));
    }

    #[test]
    fn fields_outside_basic_do_not_count() {
        let doc = "<r><Network_ID>2</Network_ID><Basic><Comm_Interval>1</Comm_Interval>\
                   <Simulation>TRUE</Simulation><Incident>TRUE</Incident></Basic></r>";
        assert!(matches!(
            parse(doc).unwrap_err(),
            ExchangeError::Incomplete {
                missing: "Network_ID"
            }
        ));
    }

    #[test]
    fn booleans_are_case_sensitive() {
        let doc = READY
            .replace("<Simulation>TRUE", "<Simulation>true")
            .replace("<Incident>FALSE", "<Incident>TRUE");
        let state = parse(&doc).unwrap();
        assert!(!state.simulation_started);
        assert!(state.incident_started);
    }

    #[test]
    fn self_closing_boolean_is_false() {
        let doc = READY.replace("<Simulation>TRUE</Simulation>", "<Simulation/>");
        assert!(!parse(&doc).unwrap().simulation_started);
    }

    #[test]
    fn non_integer_network_id_is_invalid() {
        let doc = READY.replace("<Network_ID>42", "<Network_ID>forty-two");
        assert!(matches!(
            parse(&doc).unwrap_err(),
            ExchangeError::InvalidValue {
                field: "Network_ID",
                ..
            }
        ));
    }

    #[test]
    fn empty_document_is_empty() {
        assert!(matches!(parse("").unwrap_err(), ExchangeError::Empty));
        assert!(matches!(
            parse("<?xml version=\"1.0\"?>\n").unwrap_err(),
            ExchangeError::Empty
        ));
    }

    #[test]
    fn truncated_document_is_malformed() {
        let cut = &READY[..READY.find("</Basic>").unwrap()];
        assert!(matches!(
            parse(cut).unwrap_err(),
            ExchangeError::Malformed { .. }
        ));
    }

    #[test]
    fn read_distinguishes_absent_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read(&dir.path().join("exchange.xml")).unwrap_err();
        assert!(matches!(err, ExchangeError::Absent { .. }));
    }

    #[test]
    fn read_directory_is_unopenable() {
        let dir = tempfile::tempdir().unwrap();
        let err = read(dir.path()).unwrap_err();
        assert!(matches!(err, ExchangeError::Unopenable { .. }));
    }

    #[test]
    fn read_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exchange.xml");
        std::fs::write(&path, READY).unwrap();
        let first = read(&path).unwrap();
        let second = read(&path).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, ready_state());
    }

    #[test]
    fn only_the_first_root_is_scanned() {
        let text = format!("<a/>{}", READY.replace(r#"<?xml version="1.0" encoding="UTF-8"?>"#, ""));
        assert!(matches!(
            parse(&text),
            Err(ExchangeError::Incomplete { missing: BASIC })
        ));
    }

    #[test]
    fn content_after_the_root_is_ignored() {
        let text = format!("{READY}<CAD_Simulator><Basic/></CAD_Simulator>");
        assert_eq!(parse(&text).unwrap(), ready_state());
    }
}
