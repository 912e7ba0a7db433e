//! Service layer: resolve, render and execute a script in one call.

pub mod scripts;
pub use scripts::*;
