//! Summary image rendering

use crate::types::SummaryStats;
use crate::Result;
use async_trait::async_trait;
use std::path::PathBuf;

#[async_trait]
pub trait SummaryRenderer: Send + Sync {
    /// Render `stats`, replacing any previous image. Returns the image path.
    async fn render(&self, stats: &SummaryStats) -> Result<PathBuf>;

    /// Where the image lives once rendered
    fn image_path(&self) -> PathBuf;
}
