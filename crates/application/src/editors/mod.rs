//! Editor surfaces bound to the fields of one tab.

mod body;
mod commit;
mod key_value;
mod url;

pub use body::BodyEditor;
pub use commit::{CommitFn, CommitFuture, DebouncedCommit};
pub use key_value::KeyValueEditor;
pub use url::{UrlEditor, UrlTarget};
