// ── Domain model ──

mod exchange;
mod network;

pub use exchange::ExchangeState;
pub use network::{NetworkEntry, NetworkId, NetworkStatus};
