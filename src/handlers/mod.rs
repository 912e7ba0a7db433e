//! HTTP handlers for script execution.

pub mod scripts;
pub use scripts::*;
