//! Port traits (interfaces) for dependency injection

pub mod render;
pub mod source;
pub mod storage;

pub use render::SummaryRenderer;
pub use source::{CountrySource, RateSource};
pub use storage::CountryStore;
