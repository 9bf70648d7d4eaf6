//! Core domain types

pub mod country;
pub mod source;
pub mod summary;

pub use country::*;
pub use source::*;
pub use summary::*;
