//! Status reporting
//!
//! Progress messages are ad hoc human-readable strings pushed through an
//! injected sink rather than printed from inside the harvester.

use tracing::info;

/// Destination for progress messages
pub trait StatusSink: Send {
    /// Report one message
    fn report(&mut self, message: &str);
}

/// Forwards every message to `tracing::info!`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingStatus;

impl StatusSink for TracingStatus {
    fn report(&mut self, message: &str) {
        info!("{message}");
    }
}

impl StatusSink for Vec<String> {
    fn report(&mut self, message: &str) {
        self.push(message.to_string());
    }
}
