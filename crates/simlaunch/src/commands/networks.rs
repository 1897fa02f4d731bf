//! Registry listing.

use tabled::Tabled;

use simlaunch_core::{NetworkEntry, Registry};

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct NetworkRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Directory")]
    directory: String,
}

impl From<&NetworkEntry> for NetworkRow {
    fn from(n: &NetworkEntry) -> Self {
        Self {
            id: n.id.to_string(),
            name: n.name.clone(),
            directory: n.directory.display().to_string(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    // The registry path is all we need; the root itself need not validate.
    let cfg = config::load(global)?;
    let registry = Registry::load(&cfg.paths().registry)?;

    let out = output::render_list(
        &global.output,
        registry.entries(),
        |n| NetworkRow::from(n),
        |n| n.id.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
