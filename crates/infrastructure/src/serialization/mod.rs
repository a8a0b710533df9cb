//! JSON serialization helpers.

mod json;

pub use json::*;
