//! Console output shared by the turn driver and the event listener.

use std::{
    io::Write,
    sync::{Arc, Mutex},
};
use tracing::warn;

/// A cloneable handle to the terminal (or any writer standing in for it).
///
/// Every print is flushed immediately so streamed deltas show up as they
/// arrive.
#[derive(Clone)]
pub struct Console {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Console {
    pub fn new<W: Write + Send + 'static>(out: W) -> Self {
        Self {
            out: Arc::new(Mutex::new(Box::new(out))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    /// Writes `text` as-is, without adding a newline.
    pub fn print(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
            warn!(error = %e, "Failed to write to console");
        }
    }
}
