//! Execution result types

mod run;

pub use run::{ERROR_RUN_PREFIX, RunDisplay, RunRecord};
