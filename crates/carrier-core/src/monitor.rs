//! SIM state monitor
//!
//! Turns bursts of SIM and service state notifications into one carrier
//! snapshot per burst. The first event of a burst opens a debounce window;
//! events inside the window are absorbed and a single snapshot is pushed
//! when it closes. One snapshot is also pushed at start.

use crate::query::CarrierQuery;
use crate::types::{CarrierInfo, SimEvent};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

/// Destination for carrier snapshots
pub trait CarrierSink: Send + Sync {
    fn deliver(&self, snapshot: Vec<CarrierInfo>);
}

impl CarrierSink for broadcast::Sender<Vec<CarrierInfo>> {
    fn deliver(&self, snapshot: Vec<CarrierInfo>) {
        let _ = self.send(snapshot);
    }
}

impl CarrierSink for mpsc::UnboundedSender<Vec<CarrierInfo>> {
    fn deliver(&self, snapshot: Vec<CarrierInfo>) {
        if self.send(snapshot).is_err() {
            debug!("Carrier snapshot receiver dropped");
        }
    }
}

pub struct SimMonitor {
    query: CarrierQuery,
    debounce: Duration,
}

impl SimMonitor {
    pub fn new(query: CarrierQuery, debounce: Duration) -> Self {
        Self { query, debounce }
    }

    /// Run until `events` closes. A burst still open when the channel
    /// closes is flushed before returning.
    pub async fn run<S: CarrierSink>(self, mut events: mpsc::Receiver<SimEvent>, sink: S) {
        info!("SIM monitor started (debounce {:?})", self.debounce);

        // Initial push
        let mut pending = true;
        let mut open = true;

        while open {
            if pending {
                let deadline = Instant::now() + self.debounce;
                let mut absorbed = 0usize;
                loop {
                    tokio::select! {
                        _ = sleep_until(deadline) => break,
                        event = events.recv() => match event {
                            Some(event) => {
                                absorbed += 1;
                                debug!("Coalescing {:?}", event);
                            }
                            None => {
                                open = false;
                                break;
                            }
                        },
                    }
                }

                let snapshot = self.query.snapshot();
                debug!(
                    "Pushing carrier snapshot ({} entries, {} events coalesced)",
                    snapshot.len(),
                    absorbed
                );
                sink.deliver(snapshot);
                pending = false;
                continue;
            }

            match events.recv().await {
                Some(event) => {
                    debug!("SIM event {:?}", event);
                    pending = true;
                }
                None => open = false,
            }
        }

        info!("SIM monitor stopped");
    }
}
