//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the workbench core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod clock;
mod notifier;
mod request_service;

pub use clock::Clock;
pub use notifier::Notifier;
pub use request_service::{RequestService, ServiceResult, TransportError};
