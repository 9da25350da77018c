//! Recursive Clitic Segmenter
//!
//! Splits each word into clitics and stem:
//! 1. Root and terminal words are kept whole.
//! 2. An affix scan looks for the shortest lexicon-backed prefix/suffix split.
//! 3. Otherwise the first matching fallback rule peels a clitic and the
//!    remainder is segmented again.
//!
//! Every recursive call works on a strictly shorter slice, so recursion depth
//! is bounded by the word length. Per-word state lives on the stack of one
//! call, which keeps a shared [`Segmenter`] safe to use from many threads.

use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::lexicon::Lexicon;
use crate::output::{assemble, SegmentationOutput, SegmentedWord, StrippedAffixes};
use crate::rules::{select_rule, Action, Candidate};

/// Joiner placed at affix boundaries.
pub const AFFIX_JOINER: char = '+';
/// Joiner placed after the conjunction و.
pub const CONJUNCTION_JOINER: char = ' ';

/// Behaviour switches for the fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmenterConfig {
    /// Keep segmenting what follows ال / لل instead of returning it as is.
    pub recurse_after_article: bool,
    /// Once a person or preposition prefix is peeled, do not peel another one
    /// further down the same word.
    pub limit_stacked_prefixes: bool,
    /// Write لل as ل+ال+... (restoring the elided alef) rather than ل+ل+...
    pub restore_elided_article: bool,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            recurse_after_article: false,
            limit_stacked_prefixes: true,
            restore_elided_article: true,
        }
    }
}

/// State handed down one recursion chain.
#[derive(Debug, Clone, Copy, Default)]
struct Chain {
    prefix_peeled: bool,
}

/// Clitic segmenter over a shared lexicon.
#[derive(Debug, Clone)]
pub struct Segmenter {
    lexicon: Arc<Lexicon>,
    config: SegmenterConfig,
}

impl Segmenter {
    /// Create a segmenter over `lexicon` with the default configuration.
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self {
            lexicon,
            config: SegmenterConfig::default(),
        }
    }

    /// Replace the rule configuration.
    pub fn with_config(mut self, config: SegmenterConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the lexicon used for lookups.
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Get the active configuration.
    pub fn config(&self) -> SegmenterConfig {
        self.config
    }

    /// Segment normalized text: split on whitespace, segment and classify
    /// every word, then assemble the output.
    pub fn segment(&self, text: &str) -> SegmentationOutput {
        let words: Vec<&str> = text.split_whitespace().collect();
        let segmented = words
            .iter()
            .enumerate()
            .map(|(i, word)| {
                let previous = i.checked_sub(1).map(|p| words[p]);
                self.segment_word(word, previous)
            })
            .collect();
        assemble(segmented)
    }

    /// Segment many texts in parallel. Output order follows input order.
    pub fn segment_batch<S>(&self, texts: &[S]) -> Vec<SegmentationOutput>
    where
        S: AsRef<str> + Sync,
    {
        texts
            .par_iter()
            .map(|text| self.segment(text.as_ref()))
            .collect()
    }

    /// Segment and classify a single word.
    pub fn segment_word(&self, word: &str, previous: Option<&str>) -> SegmentedWord {
        let mut stripped = StrippedAffixes::default();
        let segmented = self.tokenize(word, previous, &mut stripped);
        SegmentedWord {
            surface: word.to_string(),
            segmented,
            category: stripped.category(),
        }
    }

    /// Segment a single word, recording which clitic kinds were stripped.
    pub fn tokenize(
        &self,
        word: &str,
        previous: Option<&str>,
        stripped: &mut StrippedAffixes,
    ) -> String {
        let chars: Vec<char> = word.chars().collect();
        self.tokenize_chars(&chars, previous, Chain::default(), stripped)
    }

    fn tokenize_chars(
        &self,
        chars: &[char],
        previous: Option<&str>,
        chain: Chain,
        stripped: &mut StrippedAffixes,
    ) -> String {
        let word = collect(chars);
        if self.lexicon.is_known(&word) {
            return word;
        }

        if let Some(segmented) = self.affix_scan(chars, &word, stripped) {
            return segmented;
        }

        let candidate = Candidate::new(chars)
            .after(previous)
            .with_prefix_peeled(chain.prefix_peeled);
        match select_rule(&candidate) {
            Some(rule) => {
                trace!(rule = ?rule.kind, %word, "fallback rule");
                self.apply(rule.action, chars, previous, chain, stripped)
            }
            None => word,
        }
    }

    /// Shortest boundary first: prefix + root, root + suffix, or
    /// prefix + root + suffix.
    fn affix_scan(
        &self,
        chars: &[char],
        word: &str,
        stripped: &mut StrippedAffixes,
    ) -> Option<String> {
        let lexicon = &self.lexicon;
        let word_is_prefix = lexicon.is_prefix_clitic(word);

        for k in 1..chars.len() {
            let head = collect(&chars[..k]);
            let tail = collect(&chars[k..]);
            let head_is_prefix = lexicon.is_prefix_clitic(&head);

            if head_is_prefix && lexicon.is_root(&tail) {
                stripped.prefix = true;
                return Some(join(&[&head, &tail]));
            }

            if lexicon.is_root(&head) && lexicon.is_suffix_clitic(&tail) {
                stripped.suffix = true;
                return Some(join(&[&head, &tail]));
            }

            if head_is_prefix && !word_is_prefix {
                let rest = &chars[k..];
                for j in 1..=rest.len() {
                    let stem = collect(&rest[..j]);
                    let suffix = collect(&rest[j..]);
                    if lexicon.is_root(&stem) && lexicon.is_suffix_clitic(&suffix) {
                        stripped.prefix = true;
                        stripped.suffix = true;
                        return Some(join(&[&head, &stem, &suffix]));
                    }
                }
            }
        }

        None
    }

    fn apply(
        &self,
        action: Action,
        chars: &[char],
        previous: Option<&str>,
        chain: Chain,
        stripped: &mut StrippedAffixes,
    ) -> String {
        match action {
            Action::Negation => self.negation(chars, previous, chain, stripped),
            Action::Prefix { len } => {
                stripped.prefix = true;
                let (head, rest) = chars.split_at(len);
                let rest = self.tokenize_chars(rest, previous, chain, stripped);
                join(&[&collect(head), &rest])
            }
            Action::StackedPrefix => {
                stripped.prefix = true;
                let next = Chain {
                    prefix_peeled: chain.prefix_peeled || self.config.limit_stacked_prefixes,
                };
                let (head, rest) = chars.split_at(1);
                let rest = self.tokenize_chars(rest, previous, next, stripped);
                join(&[&collect(head), &rest])
            }
            Action::Suffix { len } => {
                stripped.suffix = true;
                let (stem, tail) = chars.split_at(chars.len() - len);
                let stem = self.tokenize_chars(stem, previous, chain, stripped);
                join(&[&stem, &collect(tail)])
            }
            Action::Conjunction => {
                let (head, rest) = chars.split_at(1);
                let rest = self.tokenize_chars(rest, previous, chain, stripped);
                format!("{}{}{}", collect(head), CONJUNCTION_JOINER, rest)
            }
            Action::DoubleLam => {
                stripped.prefix = true;
                let rest = self.article_remainder(&chars[2..], previous, chain, stripped);
                if self.config.restore_elided_article {
                    join(&["ل", "ال", &rest])
                } else {
                    join(&["ل", "ل", &rest])
                }
            }
            Action::DefiniteArticle => {
                stripped.prefix = true;
                let (article, rest) = chars.split_at(2);
                let rest = self.article_remainder(rest, previous, chain, stripped);
                join(&[&collect(article), &rest])
            }
        }
    }

    fn article_remainder(
        &self,
        rest: &[char],
        previous: Option<&str>,
        chain: Chain,
        stripped: &mut StrippedAffixes,
    ) -> String {
        if self.config.recurse_after_article {
            self.tokenize_chars(rest, previous, chain, stripped)
        } else {
            collect(rest)
        }
    }

    /// ما...ش and م...ش circumfixes, or a bare trailing ش.
    fn negation(
        &self,
        chars: &[char],
        previous: Option<&str>,
        chain: Chain,
        stripped: &mut StrippedAffixes,
    ) -> String {
        let (body, shin) = chars.split_at(chars.len() - 1);
        let lead = if body.starts_with(&['م', 'ا']) {
            2
        } else if body.first() == Some(&'م') {
            1
        } else {
            0
        };

        stripped.suffix = true;
        let (particle, stem) = body.split_at(lead);
        let stem = self.tokenize_chars(stem, previous, chain, stripped);
        if particle.is_empty() {
            return join(&[&stem, &collect(shin)]);
        }

        stripped.prefix = true;
        join(&[&collect(particle), &stem, &collect(shin)])
    }
}

fn collect(chars: &[char]) -> String {
    chars.iter().collect()
}

fn join(parts: &[&str]) -> String {
    let mut out = String::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            out.push(AFFIX_JOINER);
        }
        out.push_str(part);
    }
    out
}
