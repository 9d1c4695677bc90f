//! Domain events module.
//!
//! Provides domain event types and the sink trait for emitting events
//! after successful expense mutations. The server implements the sink to
//! forward events to the configured workflow webhook.

mod domain_event;
mod sink;

pub use domain_event::*;
pub use sink::*;
