//! HTTP handlers

pub mod countries;
pub mod error;
pub mod health;
pub mod status;

pub use error::ApiError;
pub use health::health;
