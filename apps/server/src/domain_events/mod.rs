//! Domain events runtime bridge for the web server.
//!
//! Core services emit events through [`WebhookEventSink`]; a background
//! worker POSTs each one as JSON to the configured workflow webhook.
//! Delivery is best-effort: failures are logged and never retried.

mod sink;
mod webhook_worker;

pub use sink::WebhookEventSink;
