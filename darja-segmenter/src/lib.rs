//! Rule-based clitic segmentation for Algerian Arabic (Darja).
//!
//! A [`Segmenter`] splits prefixes and suffixes off each word using a
//! [`Lexicon`] of roots, terminal words and clitic lists, and sorts the words
//! into four [`Category`] buckets according to which clitic kinds they lost.

pub mod lexicon;
pub mod normalizer;
pub mod output;
pub mod rules;
pub mod segmenter;

pub use lexicon::{
    load_word_list, parse_word_list, Lexicon, LexiconError, DEFAULT_PREFIX_CLITICS,
    DEFAULT_SUFFIX_CLITICS,
};
pub use normalizer::ArabicNormalizer;
pub use output::{
    assemble, Category, CategoryBuckets, SegmentationOutput, SegmentedWord, StrippedAffixes,
};
pub use rules::{select_rule, Action, Candidate, Rule, RuleKind, FALLBACK_RULES};
pub use segmenter::{Segmenter, SegmenterConfig, AFFIX_JOINER, CONJUNCTION_JOINER};
