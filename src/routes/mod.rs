pub mod common;
pub mod scripts;

pub use common::*;
pub use scripts::*;
