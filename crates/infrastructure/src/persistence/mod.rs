//! Persistence of client-side files.

mod settings_repository;

pub use settings_repository::*;
