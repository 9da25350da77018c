//! Persistence of segmentation category buckets.
//!
//! A [`CategorySink`] receives the four buckets produced by a segmentation
//! request and replaces whatever it previously held for each category.

pub mod local;
pub mod memory;
pub mod traits;

use serde::{Deserialize, Serialize};

pub use local::LocalCategoryStore;
pub use memory::MemoryCategorySink;
pub use traits::{CategorySink, SinkError};

/// On-disk encoding of a category file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkFormat {
    /// One segmented word per line.
    #[default]
    Lines,
    /// A JSON array of segmented words.
    Json,
}

impl SinkFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            SinkFormat::Lines => "txt",
            SinkFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for SinkFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lines" | "txt" => Ok(SinkFormat::Lines),
            "json" => Ok(SinkFormat::Json),
            other => Err(format!("unknown sink format: {other}")),
        }
    }
}
