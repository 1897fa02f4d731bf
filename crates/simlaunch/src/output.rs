//! Rendering for `--output`.
//!
//! Structured formats serialize the report itself. `table` and `plain`
//! are rendered per command: a table or detail block, or bare network ids.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};

// ── Color ────────────────────────────────────────────────────────────

/// Color is on for `always`, and for `auto` on a terminal without `NO_COLOR`.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Green when color is on, plain otherwise.
pub fn success(text: &str, color: bool) -> String {
    if color {
        text.green().bold().to_string()
    } else {
        text.to_owned()
    }
}

/// Yellow when color is on, plain otherwise.
pub fn attention(text: &str, color: bool) -> String {
    if color {
        text.yellow().to_string()
    } else {
        text.to_owned()
    }
}

// ── Rendering ────────────────────────────────────────────────────────

/// Serialized text for `json`, `json-compact` and `yaml`; `None` for the
/// human formats, which each caller renders its own way.
fn structured<T: Serialize + ?Sized>(format: &OutputFormat, data: &T) -> Option<String> {
    let text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(data),
        OutputFormat::JsonCompact => serde_json::to_string(data),
        OutputFormat::Yaml => {
            return Some(serde_yaml::to_string(data).expect("serialization should not fail"));
        }
        OutputFormat::Table | OutputFormat::Plain => return None,
    };
    Some(text.expect("serialization should not fail"))
}

/// Registry-style listing: a rounded table of `to_row` rows, or one
/// `key` per line for `plain`.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    key: impl Fn(&T) -> String,
) -> String
where
    T: Serialize,
    R: Tabled,
{
    structured(format, data).unwrap_or_else(|| match format {
        OutputFormat::Plain => data.iter().map(key).collect::<Vec<_>>().join("\n"),
        _ => Table::new(data.iter().map(to_row))
            .with(Style::rounded())
            .to_string(),
    })
}

/// A single report: `detail` for the table format, `key` for `plain`.
pub fn render_single<T: Serialize>(
    format: &OutputFormat,
    data: &T,
    detail: impl Fn(&T) -> String,
    key: impl Fn(&T) -> String,
) -> String {
    structured(format, data).unwrap_or_else(|| match format {
        OutputFormat::Plain => key(data),
        _ => detail(data),
    })
}

/// Print to stdout unless `--quiet`. Empty output prints nothing.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let _ = writeln!(io::stdout().lock(), "{output}");
}
