//! Delivers queued domain events to the workflow webhook.

use spendwise_core::events::DomainEvent;
use tokio::sync::mpsc;

/// Header carrying the event name, so receivers can route without parsing.
pub const EVENT_HEADER: &str = "x-spendwise-event";

/// Runs until every sender is dropped. Events are delivered one at a time,
/// in emission order.
pub async fn webhook_worker(
    mut rx: mpsc::UnboundedReceiver<DomainEvent>,
    client: reqwest::Client,
    url: String,
) {
    tracing::info!("Webhook worker started for {}", url);

    while let Some(event) = rx.recv().await {
        deliver(&client, &url, &event).await;
    }

    tracing::info!("Webhook worker shutting down");
}

async fn deliver(client: &reqwest::Client, url: &str, event: &DomainEvent) {
    let result = client
        .post(url)
        .header(EVENT_HEADER, event.name())
        .json(event)
        .send()
        .await;

    match result {
        Ok(response) if response.status().is_success() => {
            tracing::debug!(
                "Delivered {} for company {} to webhook",
                event.name(),
                event.company_id()
            );
        }
        Ok(response) => {
            tracing::warn!(
                "Webhook rejected {} with status {}",
                event.name(),
                response.status()
            );
        }
        Err(e) => {
            tracing::warn!("Failed to deliver {} to webhook: {}", event.name(), e);
        }
    }
}
