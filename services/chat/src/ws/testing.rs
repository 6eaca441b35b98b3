//! In-memory stand-ins for the socket and the terminal.

use async_trait::async_trait;
use openai_realtime::{ClientEvent, EventSender, RealtimeError};
use std::{
    io::Write,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

/// Records every event instead of sending it.
#[derive(Clone, Default)]
pub(crate) struct RecordingSender {
    events: Arc<Mutex<Vec<ClientEvent>>>,
    closed: Arc<AtomicBool>,
}

impl RecordingSender {
    pub(crate) fn events(&self) -> Vec<ClientEvent> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Waits until at least `count` events were recorded, panicking after a second.
    pub(crate) async fn wait_for(&self, count: usize) {
        tokio::time::timeout(Duration::from_secs(1), async {
            while self.events.lock().unwrap().len() < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("expected {count} events, got {:?}", self.events()));
    }
}

#[async_trait]
impl EventSender for RecordingSender {
    async fn send(&self, event: ClientEvent) -> Result<(), RealtimeError> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }

    async fn close(&self) -> Result<(), RealtimeError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// A `Write` target whose contents can be read back.
#[derive(Clone, Default)]
pub(crate) struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
