//! Local Filesystem Category Store
//!
//! Writes one file per category under a root directory.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use darja_segmenter::{Category, CategoryBuckets};
use metrics::counter;
use tempfile::NamedTempFile;
use tracing::debug;

use super::traits::{CategorySink, SinkError};
use super::SinkFormat;

/// Directory-backed category store.
///
/// Clones share one persist lock, so a full [`CategorySink::persist`] never
/// interleaves with another on the same store.
#[derive(Debug, Clone)]
pub struct LocalCategoryStore {
    root: PathBuf,
    format: SinkFormat,
    persist_lock: Arc<Mutex<()>>,
}

impl LocalCategoryStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, SinkError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            format: SinkFormat::default(),
            persist_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Set the on-disk encoding of category files.
    pub fn with_format(mut self, format: SinkFormat) -> Self {
        self.format = format;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn format(&self) -> SinkFormat {
        self.format
    }

    /// Path of the file holding `category`.
    pub fn path_for(&self, category: Category) -> PathBuf {
        self.root
            .join(format!("{}.{}", category.name(), self.format.extension()))
    }

    /// Read back the words last written for `category`.
    pub fn read_category(&self, category: Category) -> Result<Vec<String>, SinkError> {
        let path = self.path_for(category);
        if !path.exists() {
            return Err(SinkError::NotFound(category));
        }
        let content = fs::read_to_string(&path)?;
        match self.format {
            SinkFormat::Lines => {
                let mut words: Vec<String> = content.lines().map(str::to_string).collect();
                words.retain(|w| !w.is_empty());
                Ok(words)
            }
            SinkFormat::Json => Ok(serde_json::from_str(&content)?),
        }
    }

    fn encode(&self, words: &[String]) -> Result<String, SinkError> {
        match self.format {
            SinkFormat::Lines => {
                let mut content = words.join("\n");
                if !content.is_empty() {
                    content.push('\n');
                }
                Ok(content)
            }
            SinkFormat::Json => Ok(serde_json::to_string_pretty(words)?),
        }
    }
}

impl CategorySink for LocalCategoryStore {
    fn write_category(&self, category: Category, words: &[String]) -> Result<(), SinkError> {
        let dest = self.path_for(category);
        // Each write stages into its own file in the same directory.
        let mut staging = NamedTempFile::new_in(&self.root)?;
        staging.write_all(self.encode(words)?.as_bytes())?;
        staging.flush()?;
        staging.persist(&dest).map_err(|err| err.error)?;
        counter!("darja_sink_writes_total", "sink" => "local").increment(1);
        debug!(category = %category, path = %dest.display(), words = words.len(), "wrote category");
        Ok(())
    }

    fn persist(&self, buckets: &CategoryBuckets) -> Result<(), SinkError> {
        let _guard = self
            .persist_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for (category, words) in buckets.iter() {
            self.write_category(category, words)?;
        }
        Ok(())
    }

    fn sink_type(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_root_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("categories");
        let store = LocalCategoryStore::new(&root).unwrap();
        assert!(store.root().is_dir());
    }

    #[test]
    fn names_files_after_categories() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalCategoryStore::new(dir.path()).unwrap();
        assert!(store
            .path_for(Category::PrefixAndSuffix)
            .ends_with("prefix_and_suffix.txt"));

        let store = store.with_format(SinkFormat::Json);
        assert!(store.path_for(Category::None).ends_with("none.json"));
    }

    #[test]
    fn missing_category_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalCategoryStore::new(dir.path()).unwrap();
        assert!(matches!(
            store.read_category(Category::SuffixOnly),
            Err(SinkError::NotFound(Category::SuffixOnly))
        ));
    }

    #[test]
    fn empty_bucket_writes_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalCategoryStore::new(dir.path()).unwrap();
        store.write_category(Category::None, &[]).unwrap();
        assert_eq!(fs::read_to_string(store.path_for(Category::None)).unwrap(), "");
        assert!(store.read_category(Category::None).unwrap().is_empty());
    }
}
