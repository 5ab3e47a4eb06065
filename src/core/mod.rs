pub mod observer;
pub mod realtime;

// Re-export commonly used types for convenience
pub use observer::{ObserverConfig, ObserverError};
pub use realtime::{CreatedCall, RealtimeApi, SessionDescriptor};
