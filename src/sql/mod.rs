//! Bound values and row decoding shared by the database backends.

pub mod params;
pub mod row;
pub use params::*;
pub use row::*;
