//! Web domain event sink implementation.

use std::time::Duration;

use spendwise_core::events::{DomainEvent, DomainEventSink};
use tokio::sync::mpsc;

use super::webhook_worker::webhook_worker;

/// Domain event sink for the web server runtime.
///
/// `emit` only enqueues; the HTTP call happens on a spawned worker so a slow
/// or unreachable webhook never delays the request that produced the event.
pub struct WebhookEventSink {
    tx: mpsc::UnboundedSender<DomainEvent>,
}

impl WebhookEventSink {
    /// Builds the HTTP client and spawns the delivery worker. Must be called
    /// inside a Tokio runtime.
    pub fn start(url: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(webhook_worker(rx, client, url));
        Ok(Self { tx })
    }
}

impl DomainEventSink for WebhookEventSink {
    fn emit(&self, event: DomainEvent) {
        if let Err(e) = self.tx.send(event) {
            tracing::warn!("Dropping {} event, webhook worker is gone", e.0.name());
        }
    }
}
