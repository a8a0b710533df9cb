//! Pulse Domain - Core business types
//!
//! This crate defines the domain model for the PulseAPI request workbench.
//! All types here are pure Rust with no I/O dependencies.

pub mod envelope;
pub mod error;
pub mod id;
pub mod notice;
pub mod request;
pub mod response;
pub mod settings;
pub mod state;
pub mod tab;

pub use envelope::ServiceEnvelope;
pub use error::{DomainError, DomainResult};
pub use id::{TabId, generate_id_v7};
pub use notice::{Notice, NoticeLevel};
pub use request::{
    BodyContentType, HttpMethod, KeyValue, KeyValueRow, NewRequest, PersistedRequest,
    RequestDetails, RequestUpdate,
};
pub use response::{RunDisplay, RunRecord};
pub use settings::ClientSettings;
pub use state::ExecutionState;
pub use tab::{SaveState, Tab, TabUpdate};
