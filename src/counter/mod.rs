use std::sync::{Arc, RwLock};
use std::time::Duration;

use spdlog::{debug, error, info};
use tokio::sync::mpsc;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;

use crate::counter::view_counts::ViewCounts;
use crate::counter::view_sender::ViewSender;

pub mod request_memo;
pub mod view_counts;
pub mod view_sender;

pub struct ViewEvent {
    pub slug: String,
}

/// Owns the counter: a channel feeding a receiver task that applies the
/// increments and flushes dirty totals to the store. Pages read the
/// totals through the shared handle; all writes go through the channel.
pub struct CounterHandler {
    _receiver_task: JoinHandle<()>,
    sender: Sender<ViewEvent>,
    counts: Arc<RwLock<ViewCounts>>,
}

impl CounterHandler {
    pub fn new(counts: ViewCounts, flush_secs: u64) -> Self {
        let counts = Arc::new(RwLock::new(counts));
        let (tx, mut rx) = mpsc::channel::<ViewEvent>(64);

        let shared = counts.clone();
        let receiver_task = tokio::spawn(async move {
            info!("Starting view counter receiver");
            let mut dirty = false;
            loop {
                match tokio::time::timeout(Duration::from_secs(flush_secs), rx.recv()).await {
                    Ok(Some(event)) => {
                        let total = shared.write().unwrap().increment(&event.slug);
                        debug!("View {} recorded for {}", total, &event.slug);
                        dirty = true;
                    }
                    Ok(None) => break,
                    Err(_timeout) => {
                        if dirty {
                            match shared.read().unwrap().persist() {
                                Ok(()) => dirty = false,
                                Err(e) => error!("Error persisting view counts: {}", e),
                            }
                        }
                    }
                }
            }

            if let Err(e) = shared.read().unwrap().persist() {
                error!("Error persisting view counts: {}", e);
            }
        });

        Self {
            _receiver_task: receiver_task,
            sender: tx,
            counts,
        }
    }

    pub fn new_sender(&self) -> ViewSender {
        ViewSender::new(self.sender.clone())
    }

    pub fn counts(&self) -> Arc<RwLock<ViewCounts>> {
        self.counts.clone()
    }
}
