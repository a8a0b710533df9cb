//! HTTP Request domain types

mod body;
mod key_value;
mod method;
mod persisted;

pub use body::{BodyContentType, format_body, prepare_body_for_save};
pub use key_value::{KeyValue, KeyValueRow, committable_pairs, rows_from_pairs};
pub use method::HttpMethod;
pub use persisted::{NewRequest, PersistedRequest, RequestDetails, RequestUpdate};
