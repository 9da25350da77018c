//! In-Memory Category Sink

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use darja_segmenter::Category;

use super::traits::{CategorySink, SinkError};

/// Keeps the latest buckets in memory.
#[derive(Debug, Default)]
pub struct MemoryCategorySink {
    buckets: RwLock<HashMap<Category, Vec<String>>>,
}

impl MemoryCategorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Words last written for `category`, if any.
    pub fn get(&self, category: Category) -> Option<Vec<String>> {
        let guard = self.buckets.read().unwrap_or_else(PoisonError::into_inner);
        guard.get(&category).cloned()
    }

    /// Number of categories written so far.
    pub fn len(&self) -> usize {
        self.buckets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CategorySink for MemoryCategorySink {
    fn write_category(&self, category: Category, words: &[String]) -> Result<(), SinkError> {
        let mut guard = self.buckets.write().unwrap_or_else(PoisonError::into_inner);
        guard.insert(category, words.to_vec());
        Ok(())
    }

    fn sink_type(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use darja_segmenter::CategoryBuckets;

    #[test]
    fn persist_writes_all_four_categories() {
        let sink = MemoryCategorySink::new();
        let mut buckets = CategoryBuckets::new();
        buckets.push(Category::PrefixOnly, "ي+كتب");

        sink.persist(&buckets).unwrap();
        assert_eq!(sink.len(), 4);
        assert_eq!(sink.get(Category::PrefixOnly).unwrap(), vec!["ي+كتب"]);
        assert_eq!(sink.get(Category::None).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn writes_replace_previous_content() {
        let sink = MemoryCategorySink::new();
        sink.write_category(Category::None, &["دار".to_string()])
            .unwrap();
        sink.write_category(Category::None, &["باب".to_string()])
            .unwrap();
        assert_eq!(sink.get(Category::None).unwrap(), vec!["باب"]);
    }
}
