//! Segmentation Lexicon
//!
//! Exact-match word sets (roots and terminal words) and the ordered clitic
//! lists consulted by the affix scan. A lexicon is built once and shared
//! read-only between segmentation calls.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Default prefix clitics (prepositions, articles, verb-person markers).
pub static DEFAULT_PREFIX_CLITICS: &[&str] = &[
    // Article and preposition + article
    "ال", "بال", "فال", "كال", "لل",
    // Prepositions
    "ب", "ف", "ك", "ل",
    // Imperfect person markers
    "ي", "ت", "ن",
];

/// Default suffix clitics (object/possessive pronouns, plural and dual endings).
pub static DEFAULT_SUFFIX_CLITICS: &[&str] = &[
    // Pronouns
    "ه", "ها", "هم", "ك", "كم", "ي", "ني", "نا",
    // Verb endings
    "و", "وا", "ت", "تو",
    // Plural and dual
    "ات", "ين", "ان",
    // Pronouns with lam
    "لي", "لك", "له", "لها", "لهم",
];

/// Errors raised while reading a word list.
#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("word list {path} is unavailable: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read-only lexicon used by the segmenter.
#[derive(Debug, Clone)]
pub struct Lexicon {
    roots: HashSet<String>,
    terminals: HashSet<String>,
    prefixes: Vec<String>,
    suffixes: Vec<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexicon {
    /// Create a lexicon with no words and the default clitic lists.
    pub fn new() -> Self {
        Self {
            roots: HashSet::new(),
            terminals: HashSet::new(),
            prefixes: to_owned_list(DEFAULT_PREFIX_CLITICS),
            suffixes: to_owned_list(DEFAULT_SUFFIX_CLITICS),
        }
    }

    /// Create a lexicon where every lookup fails.
    pub fn empty() -> Self {
        Self {
            roots: HashSet::new(),
            terminals: HashSet::new(),
            prefixes: Vec::new(),
            suffixes: Vec::new(),
        }
    }

    /// Add root words.
    pub fn with_roots<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roots.extend(words.into_iter().map(Into::into));
        self
    }

    /// Add terminal words (particles, loanwords) that are never decomposed.
    pub fn with_terminals<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.terminals.extend(words.into_iter().map(Into::into));
        self
    }

    /// Replace the prefix clitic list.
    pub fn with_prefixes<I, S>(mut self, clitics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefixes = clitics.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the suffix clitic list.
    pub fn with_suffixes<I, S>(mut self, clitics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suffixes = clitics.into_iter().map(Into::into).collect();
        self
    }

    /// Load root words from a line-delimited file.
    ///
    /// An unreadable file leaves the root set unchanged; the failure is
    /// logged and segmentation carries on with what is available.
    pub fn load_roots(mut self, path: impl AsRef<Path>) -> Self {
        self.roots.extend(load_or_empty(path.as_ref(), "roots"));
        self
    }

    /// Load terminal words from a line-delimited file. Same failure policy as
    /// [`Lexicon::load_roots`].
    pub fn load_terminals(mut self, path: impl AsRef<Path>) -> Self {
        self.terminals
            .extend(load_or_empty(path.as_ref(), "terminals"));
        self
    }

    /// Check whether `word` is a known root.
    pub fn is_root(&self, word: &str) -> bool {
        self.roots.contains(word)
    }

    /// Check whether `word` is a terminal word.
    pub fn is_terminal(&self, word: &str) -> bool {
        self.terminals.contains(word)
    }

    /// Root or terminal: the word is kept whole.
    pub fn is_known(&self, word: &str) -> bool {
        self.is_root(word) || self.is_terminal(word)
    }

    /// Check whether `candidate` is a listed prefix clitic.
    pub fn is_prefix_clitic(&self, candidate: &str) -> bool {
        self.prefixes.iter().any(|p| p == candidate)
    }

    /// Check whether `candidate` is a listed suffix clitic.
    pub fn is_suffix_clitic(&self, candidate: &str) -> bool {
        self.suffixes.iter().any(|s| s == candidate)
    }

    /// Prefix clitics in lookup order.
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Suffix clitics in lookup order.
    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    /// Number of root words.
    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Number of terminal words.
    pub fn terminal_count(&self) -> usize {
        self.terminals.len()
    }
}

/// Parse a word list: one token per line, surrounding whitespace trimmed,
/// blank lines skipped.
pub fn parse_word_list(content: &str) -> HashSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read a word list from disk.
pub fn load_word_list(path: impl AsRef<Path>) -> Result<HashSet<String>, LexiconError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| LexiconError::Unavailable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_word_list(&content))
}

fn load_or_empty(path: &Path, list: &'static str) -> HashSet<String> {
    match load_word_list(path) {
        Ok(words) => {
            debug!(list, path = %path.display(), count = words.len(), "loaded word list");
            words
        }
        Err(err) => {
            warn!(list, error = %err, "word list unavailable, continuing without it");
            HashSet::new()
        }
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
