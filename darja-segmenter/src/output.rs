//! Categorizer and Output Assembler

use serde::{Deserialize, Serialize};

/// Morphological category of a segmented word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    PrefixOnly,
    SuffixOnly,
    PrefixAndSuffix,
    None,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::PrefixOnly,
        Category::SuffixOnly,
        Category::PrefixAndSuffix,
        Category::None,
    ];

    /// Stable name, used as the key of persisted buckets.
    pub fn name(&self) -> &'static str {
        match self {
            Category::PrefixOnly => "prefix_only",
            Category::SuffixOnly => "suffix_only",
            Category::PrefixAndSuffix => "prefix_and_suffix",
            Category::None => "none",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Clitic kinds stripped anywhere while segmenting one word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrippedAffixes {
    pub prefix: bool,
    pub suffix: bool,
}

impl StrippedAffixes {
    /// Map the stripped clitic kinds to a category.
    pub fn category(&self) -> Category {
        match (self.prefix, self.suffix) {
            (true, true) => Category::PrefixAndSuffix,
            (true, false) => Category::PrefixOnly,
            (false, true) => Category::SuffixOnly,
            (false, false) => Category::None,
        }
    }
}

/// One input word and its segmentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentedWord {
    pub surface: String,
    pub segmented: String,
    pub category: Category,
}

/// Segmented words grouped by category, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBuckets {
    pub prefix_only: Vec<String>,
    pub suffix_only: Vec<String>,
    pub prefix_and_suffix: Vec<String>,
    pub none: Vec<String>,
}

impl CategoryBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segmented word to the bucket of `category`.
    pub fn push(&mut self, category: Category, segmented: impl Into<String>) {
        self.bucket_mut(category).push(segmented.into());
    }

    /// Words in the bucket of `category`, in insertion order.
    pub fn get(&self, category: Category) -> &[String] {
        match category {
            Category::PrefixOnly => &self.prefix_only,
            Category::SuffixOnly => &self.suffix_only,
            Category::PrefixAndSuffix => &self.prefix_and_suffix,
            Category::None => &self.none,
        }
    }

    fn bucket_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::PrefixOnly => &mut self.prefix_only,
            Category::SuffixOnly => &mut self.suffix_only,
            Category::PrefixAndSuffix => &mut self.prefix_and_suffix,
            Category::None => &mut self.none,
        }
    }

    /// All four buckets, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[String])> {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// Append another set of buckets, keeping order.
    pub fn merge(&mut self, other: CategoryBuckets) {
        self.prefix_only.extend(other.prefix_only);
        self.suffix_only.extend(other.suffix_only);
        self.prefix_and_suffix.extend(other.prefix_and_suffix);
        self.none.extend(other.none);
    }

    /// Total number of words across all buckets.
    pub fn len(&self) -> usize {
        self.prefix_only.len()
            + self.suffix_only.len()
            + self.prefix_and_suffix.len()
            + self.none.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of segmenting a whole text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentationOutput {
    /// Segmented words joined by single spaces.
    pub text: String,
    pub words: Vec<SegmentedWord>,
    pub buckets: CategoryBuckets,
}

/// Join segmented words and sort them into buckets.
pub fn assemble(words: Vec<SegmentedWord>) -> SegmentationOutput {
    let mut buckets = CategoryBuckets::new();
    for word in &words {
        buckets.push(word.category, word.segmented.as_str());
    }
    let text = words
        .iter()
        .map(|word| word.segmented.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    SegmentationOutput {
        text,
        words,
        buckets,
    }
}
