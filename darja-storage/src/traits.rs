//! Category Sink Trait Definitions
//!
//! Defines the common interface for every destination of category buckets.

use darja_segmenter::{Category, CategoryBuckets};
use thiserror::Error;

/// Errors that can occur while persisting category buckets.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Category {0} has not been written")]
    NotFound(Category),
}

/// Destination for the four category buckets.
///
/// Each write replaces whatever was previously stored for the category.
pub trait CategorySink: Send + Sync {
    /// Replace the stored words of one category.
    fn write_category(&self, category: Category, words: &[String]) -> Result<(), SinkError>;

    /// Replace all four categories.
    fn persist(&self, buckets: &CategoryBuckets) -> Result<(), SinkError> {
        for (category, words) in buckets.iter() {
            self.write_category(category, words)?;
        }
        Ok(())
    }

    /// Get the name/type of this sink for logging.
    fn sink_type(&self) -> &'static str;
}
