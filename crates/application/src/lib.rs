//! Pulse Application - Request workbench core
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for the request service, notices and time)
//! - The tab store and the active-tab synchronizer
//! - The execution pipeline, editors and save/lifecycle use cases
//! - The workbench facade that turns failures into notices

pub mod debounce;
pub mod editors;
pub mod error;
pub mod execute_request;
pub mod ports;
pub mod sync;
pub mod tab_store;
pub mod use_cases;
pub mod workbench;

#[cfg(test)]
mod test_support;

pub use debounce::Debouncer;
pub use editors::{
    BodyEditor, CommitFn, CommitFuture, DebouncedCommit, KeyValueEditor, UrlEditor, UrlTarget,
};
pub use error::{ApplicationError, ApplicationResult, EnvelopeResultExt};
pub use execute_request::ExecuteRequest;
pub use ports::{Clock, Notifier, RequestService, ServiceResult, TransportError};
pub use sync::{ActiveTabSynchronizer, SyncOutcome};
pub use tab_store::{ActiveTicket, SharedTabStore, TabStore};
pub use use_cases::{
    CreateRequest, CreateRequestInput, CreateRequestOutput, DeleteOutcome, DeleteRequest,
    QuickSave, UpdateRequest, UpdateRequestInput,
};
pub use workbench::{SaveTarget, Workbench};
