//! Page event delivery.
//!
//! Hosts post batches of [`PageEvent`] from their scroll/resize callbacks
//! into an unbounded channel; the task owning the controller drains them
//! through an [`EventPump`]. Each event still goes through the controller's
//! own throttle, so a burst inside one window collapses to its first event.

use crate::controller::StickySidebar;
use anyhow::{Result, anyhow};
use dom::HostDocument;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

/// Events a sticky controller reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PageEvent {
    Scroll,
    Resize,
}

/// Counters for one pump pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PumpStats {
    pub handled: u64,
    pub dropped: u64,
}

impl PumpStats {
    fn record(&mut self, handled: bool) {
        if handled {
            self.handled = self.handled.saturating_add(1);
        } else {
            self.dropped = self.dropped.saturating_add(1);
        }
    }
}

/// Receiving end of a page event channel.
pub struct EventPump {
    receiver: mpsc::UnboundedReceiver<Vec<PageEvent>>,
}

impl EventPump {
    /// Create a connected sender/pump pair.
    pub fn channel() -> (mpsc::UnboundedSender<Vec<PageEvent>>, Self) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (sender, Self { receiver })
    }

    /// Drain every pending batch without blocking.
    ///
    /// # Errors
    /// Returns an error if every sender is gone and nothing was left to deliver.
    pub fn try_pump<D: HostDocument>(&mut self, sidebar: &mut StickySidebar<D>) -> Result<PumpStats> {
        self.try_pump_at(sidebar, Instant::now())
    }

    /// Same as [`EventPump::try_pump`] with every event stamped at `now`.
    ///
    /// # Errors
    /// Returns an error if every sender is gone and nothing was left to deliver.
    pub fn try_pump_at<D: HostDocument>(
        &mut self,
        sidebar: &mut StickySidebar<D>,
        now: Instant,
    ) -> Result<PumpStats> {
        let mut stats = PumpStats::default();
        loop {
            match self.receiver.try_recv() {
                Ok(batch) => {
                    for event in batch {
                        stats.record(sidebar.handle_at(event, now));
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if stats == PumpStats::default() {
                        return Err(anyhow!("page event channel closed"));
                    }
                    break;
                }
            }
        }
        Ok(stats)
    }

    /// Handle batches as they arrive until every sender is dropped.
    pub async fn pump<D: HostDocument>(&mut self, sidebar: &mut StickySidebar<D>) -> PumpStats {
        let mut stats = PumpStats::default();
        while let Some(batch) = self.receiver.recv().await {
            for event in batch {
                stats.record(sidebar.handle(event));
            }
        }
        stats
    }
}
