use spdlog::error;
use tokio::sync::mpsc::Sender;

use crate::counter::ViewEvent;

/// Sending half of the view counter. Handlers fire and forget; the
/// receiver task does the counting and persistence.
#[derive(Clone)]
pub struct ViewSender {
    sender_ch: Option<Sender<ViewEvent>>,
}

impl ViewSender {
    pub fn new(sender_ch: Sender<ViewEvent>) -> Self {
        Self {
            sender_ch: Some(sender_ch),
        }
    }

    /// Sender that drops every event, for setups without view counting.
    pub fn no_op() -> Self {
        Self { sender_ch: None }
    }

    pub async fn post_viewed(&self, slug: String) {
        if let Some(ref sender) = self.sender_ch {
            if let Err(e) = sender.send(ViewEvent { slug }).await {
                error!("Error recording post view: {}", e);
            }
        }
    }
}
