//! Application use cases (business logic orchestration).

mod create_request;
mod delete_request;
mod quick_save;
mod update_request;

pub use create_request::*;
pub use delete_request::*;
pub use quick_save::*;
pub use update_request::*;
