// Port Layer - Interfaces for external dependencies

pub mod input;
pub mod time_provider;
pub mod transport;

// Re-exports
pub use input::InputPort;
pub use time_provider::TimeProvider;
pub use transport::{TransportError, TransportPort, WireResponse};
