//! Business logic services

pub mod external_api;
pub mod image;
pub mod refresh;

pub use external_api::ExternalApiClient;
pub use image::PngSummaryRenderer;
pub use refresh::RefreshService;
