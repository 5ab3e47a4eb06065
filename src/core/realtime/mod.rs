//! Upstream realtime API integration
//!
//! Covers the REST side of call brokering (create and accept) plus the
//! session descriptor and WebSocket event types shared with the observer.

pub mod client;
pub mod messages;
pub mod session;

pub use client::{CreatedCall, RealtimeApi};
pub use messages::{ClientEvent, ServerEvent};
pub use session::SessionDescriptor;
