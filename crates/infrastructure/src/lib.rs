//! Pulse Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus settings persistence.

pub mod adapters;
pub mod persistence;
pub mod serialization;

pub use adapters::{ReqwestRequestService, SystemClock, TracingNotifier};
pub use persistence::{SettingsError, SettingsRepository, apply_overrides};
pub use serialization::{
    SerializationError, from_json_bytes, to_json_stable, to_json_stable_bytes,
};
