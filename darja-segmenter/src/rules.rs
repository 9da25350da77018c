//! Fallback Rule Chain
//!
//! When the affix scan finds no lexicon-backed split, the segmenter walks
//! [`FALLBACK_RULES`] in order and applies the first rule whose guard holds.
//! The order is part of the segmenter's observable behaviour.

/// Negation particle that may precede a ش-final verb.
pub const NEGATION_PARTICLE: &str = "ما";

const PRONOUN_CHARS: [char; 4] = ['ك', 'و', 'ه', 'ي'];
const LAM_PRONOUNS: [&str; 4] = ["كم", "هم", "نا", "ها"];
const PAIR_SUFFIXES: [&str; 8] = ["كم", "هم", "نا", "ها", "ني", "ان", "ات", "ين"];
const PERSON_PREFIX_CHARS: [char; 3] = ['ن', 'ي', 'ت'];
const PREPOSITION_CHARS: [char; 2] = ['ب', 'ف'];

/// Identifies a fallback rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// ما...ش / م...ش circumfix
    Negation,
    /// Leading يا or ما
    VocativeParticle,
    /// ل + كم/هم/نا/ها
    LamPronounLong,
    /// Two-character pronoun, dual or plural ending
    PairSuffix,
    /// Trailing لي
    LiSuffix,
    /// ل + ك/و/ه/ي
    LamPronounShort,
    /// One-character pronoun ending
    PronounSuffix,
    /// Leading conjunction و
    Conjunction,
    /// Trailing ة
    FeminineMarker,
    /// Leading ن/ي/ت
    PersonPrefix,
    /// Leading ب/ف
    PrepositionPrefix,
    /// Leading لل (ل + elided ال)
    DoubleLam,
    /// Leading ال
    DefiniteArticle,
    /// Leading ل
    LamPrefix,
    /// Trailing ت
    TaaSuffix,
}

/// What a rule does once its guard holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Hand over to the negation subroutine.
    Negation,
    /// Peel `len` leading characters and segment the rest.
    Prefix { len: usize },
    /// Peel one leading character and block further stacked prefixes.
    StackedPrefix,
    /// Peel `len` trailing characters and segment the rest.
    Suffix { len: usize },
    /// Split off و with a space joiner.
    Conjunction,
    /// Rewrite لل as ل + ال.
    DoubleLam,
    /// Split off ال.
    DefiniteArticle,
}

/// The word under inspection plus the context a guard may consult.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub chars: &'a [char],
    /// The preceding word of the sentence, if any.
    pub previous: Option<&'a str>,
    /// A stacked prefix rule already fired higher in this recursion chain.
    pub prefix_peeled: bool,
}

impl<'a> Candidate<'a> {
    pub fn new(chars: &'a [char]) -> Self {
        Self {
            chars,
            previous: None,
            prefix_peeled: false,
        }
    }

    pub fn after(mut self, previous: Option<&'a str>) -> Self {
        self.previous = previous;
        self
    }

    pub fn with_prefix_peeled(mut self, peeled: bool) -> Self {
        self.prefix_peeled = peeled;
        self
    }

    fn len(&self) -> usize {
        self.chars.len()
    }

    fn first(&self) -> Option<char> {
        self.chars.first().copied()
    }

    fn last(&self) -> Option<char> {
        self.chars.last().copied()
    }

    /// Character `n` positions from the end (1 = last).
    fn from_end(&self, n: usize) -> Option<char> {
        self.len().checked_sub(n).map(|i| self.chars[i])
    }

    fn starts_with(&self, prefix: &str) -> bool {
        let mut chars = self.chars.iter();
        prefix.chars().all(|c| chars.next() == Some(&c))
    }

    fn ends_with(&self, suffix: &str) -> bool {
        let n = suffix.chars().count();
        n <= self.len() && self.chars[self.len() - n..].iter().copied().eq(suffix.chars())
    }
}

/// A guarded rewrite in the fallback chain.
pub struct Rule {
    pub kind: RuleKind,
    pub action: Action,
    guard: fn(&Candidate<'_>) -> bool,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("kind", &self.kind)
            .field("action", &self.action)
            .finish_non_exhaustive()
    }
}

impl Rule {
    pub fn matches(&self, candidate: &Candidate<'_>) -> bool {
        (self.guard)(candidate)
    }
}

/// Fallback rules in priority order.
pub static FALLBACK_RULES: &[Rule] = &[
    Rule {
        kind: RuleKind::Negation,
        action: Action::Negation,
        guard: negation,
    },
    Rule {
        kind: RuleKind::VocativeParticle,
        action: Action::Prefix { len: 2 },
        guard: vocative_particle,
    },
    Rule {
        kind: RuleKind::LamPronounLong,
        action: Action::Suffix { len: 3 },
        guard: lam_pronoun_long,
    },
    Rule {
        kind: RuleKind::PairSuffix,
        action: Action::Suffix { len: 2 },
        guard: pair_suffix,
    },
    Rule {
        kind: RuleKind::LiSuffix,
        action: Action::Suffix { len: 2 },
        guard: li_suffix,
    },
    Rule {
        kind: RuleKind::LamPronounShort,
        action: Action::Suffix { len: 2 },
        guard: lam_pronoun_short,
    },
    Rule {
        kind: RuleKind::PronounSuffix,
        action: Action::Suffix { len: 1 },
        guard: pronoun_suffix,
    },
    Rule {
        kind: RuleKind::Conjunction,
        action: Action::Conjunction,
        guard: conjunction,
    },
    Rule {
        kind: RuleKind::FeminineMarker,
        action: Action::Suffix { len: 1 },
        guard: feminine_marker,
    },
    Rule {
        kind: RuleKind::PersonPrefix,
        action: Action::StackedPrefix,
        guard: person_prefix,
    },
    Rule {
        kind: RuleKind::PrepositionPrefix,
        action: Action::StackedPrefix,
        guard: preposition_prefix,
    },
    Rule {
        kind: RuleKind::DoubleLam,
        action: Action::DoubleLam,
        guard: double_lam,
    },
    Rule {
        kind: RuleKind::DefiniteArticle,
        action: Action::DefiniteArticle,
        guard: definite_article,
    },
    Rule {
        kind: RuleKind::LamPrefix,
        action: Action::Prefix { len: 1 },
        guard: lam_prefix,
    },
    Rule {
        kind: RuleKind::TaaSuffix,
        action: Action::Suffix { len: 1 },
        guard: taa_suffix,
    },
];

/// First rule whose guard holds, or `None` when the word stays whole.
pub fn select_rule(candidate: &Candidate<'_>) -> Option<&'static Rule> {
    FALLBACK_RULES.iter().find(|rule| rule.matches(candidate))
}

fn negation(c: &Candidate<'_>) -> bool {
    c.len() > 3
        && c.last() == Some('ش')
        && (c.previous == Some(NEGATION_PARTICLE)
            || (c.first() == Some('م') && !c.starts_with(NEGATION_PARTICLE)))
}

fn vocative_particle(c: &Candidate<'_>) -> bool {
    c.len() > 3 && (c.starts_with("يا") || c.starts_with(NEGATION_PARTICLE))
}

fn lam_pronoun_long(c: &Candidate<'_>) -> bool {
    c.len() > 4
        && LAM_PRONOUNS.iter().any(|p| c.ends_with(p))
        && c.from_end(3) == Some('ل')
}

fn pair_suffix(c: &Candidate<'_>) -> bool {
    c.len() > 3 && PAIR_SUFFIXES.iter().any(|s| c.ends_with(s))
}

fn li_suffix(c: &Candidate<'_>) -> bool {
    c.len() > 3 && c.ends_with("لي")
}

fn lam_pronoun_short(c: &Candidate<'_>) -> bool {
    c.len() > 3
        && c.last().is_some_and(|ch| PRONOUN_CHARS.contains(&ch))
        && c.from_end(2) == Some('ل')
}

fn pronoun_suffix(c: &Candidate<'_>) -> bool {
    c.len() > 2 && c.last().is_some_and(|ch| PRONOUN_CHARS.contains(&ch))
}

fn conjunction(c: &Candidate<'_>) -> bool {
    c.len() > 3 && c.first() == Some('و')
}

fn feminine_marker(c: &Candidate<'_>) -> bool {
    c.len() > 2 && c.last() == Some('ة')
}

fn person_prefix(c: &Candidate<'_>) -> bool {
    c.len() > 2
        && !c.prefix_peeled
        && c.first().is_some_and(|ch| PERSON_PREFIX_CHARS.contains(&ch))
        && c.last() != Some('ة')
}

fn preposition_prefix(c: &Candidate<'_>) -> bool {
    c.len() > 2
        && !c.prefix_peeled
        && c.first().is_some_and(|ch| PREPOSITION_CHARS.contains(&ch))
}

fn double_lam(c: &Candidate<'_>) -> bool {
    c.len() > 3 && c.starts_with("لل")
}

fn definite_article(c: &Candidate<'_>) -> bool {
    c.len() > 3 && c.starts_with("ال")
}

fn lam_prefix(c: &Candidate<'_>) -> bool {
    c.len() > 2 && c.first() == Some('ل')
}

fn taa_suffix(c: &Candidate<'_>) -> bool {
    c.len() > 2 && c.last() == Some('ت')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(word: &str) -> Vec<char> {
        word.chars().collect()
    }

    fn kind_of(word: &str) -> Option<RuleKind> {
        let chars = chars(word);
        select_rule(&Candidate::new(&chars)).map(|rule| rule.kind)
    }

    fn kind_after(previous: &str, word: &str) -> Option<RuleKind> {
        let chars = chars(word);
        select_rule(&Candidate::new(&chars).after(Some(previous))).map(|rule| rule.kind)
    }

    #[test]
    fn table_lists_every_rule_once() {
        assert_eq!(FALLBACK_RULES.len(), 15);
        let mut seen = std::collections::HashSet::new();
        for rule in FALLBACK_RULES {
            assert!(seen.insert(rule.kind));
        }
    }

    #[test]
    fn negation_needs_mim_or_preceding_particle() {
        assert_eq!(kind_of("مكتبش"), Some(RuleKind::Negation));
        assert_eq!(kind_after("ما", "كتبش"), Some(RuleKind::Negation));
        assert_eq!(kind_of("كتبش"), None);
        // ما-initial words only negate after a standalone ما
        assert_eq!(kind_of("ماكتبش"), Some(RuleKind::VocativeParticle));
        assert_eq!(kind_after("ما", "ماكتبش"), Some(RuleKind::Negation));
    }

    #[test]
    fn negation_requires_more_than_three_chars() {
        assert_eq!(kind_of("مش"), None);
        assert_ne!(kind_of("مدش"), Some(RuleKind::Negation));
    }

    #[test]
    fn vocative_particle_beats_pronoun_suffix() {
        assert_eq!(kind_of("ياخو"), Some(RuleKind::VocativeParticle));
        assert_eq!(kind_of("ماكلو"), Some(RuleKind::VocativeParticle));
    }

    #[test]
    fn suffix_rules_in_priority_order() {
        assert_eq!(kind_of("كتبلها"), Some(RuleKind::LamPronounLong));
        assert_eq!(kind_of("كتبهم"), Some(RuleKind::PairSuffix));
        assert_eq!(kind_of("كتبلي"), Some(RuleKind::LiSuffix));
        assert_eq!(kind_of("كتبلك"), Some(RuleKind::LamPronounShort));
        assert_eq!(kind_of("كتبو"), Some(RuleKind::PronounSuffix));
        assert_eq!(kind_of("مدرسة"), Some(RuleKind::FeminineMarker));
        assert_eq!(kind_of("قعدت"), Some(RuleKind::TaaSuffix));
    }

    #[test]
    fn lam_pronoun_long_needs_five_chars() {
        // four characters: the pair suffix takes it instead
        assert_eq!(kind_of("بلها"), Some(RuleKind::PairSuffix));
    }

    #[test]
    fn conjunction_and_prefix_rules() {
        assert_eq!(kind_of("وقال"), Some(RuleKind::Conjunction));
        assert_eq!(kind_of("نقول"), Some(RuleKind::PersonPrefix));
        assert_eq!(kind_of("فدار"), Some(RuleKind::PrepositionPrefix));
        assert_eq!(kind_of("للدار"), Some(RuleKind::DoubleLam));
        assert_eq!(kind_of("الدار"), Some(RuleKind::DefiniteArticle));
        assert_eq!(kind_of("لدار"), Some(RuleKind::LamPrefix));
    }

    #[test]
    fn person_prefix_skips_feminine_words() {
        // ة-final is taken by the feminine rule before the person prefix
        assert_eq!(kind_of("تربة"), Some(RuleKind::FeminineMarker));
    }

    #[test]
    fn stacked_prefixes_are_blocked_once_peeled() {
        let word = chars("نقول");
        let peeled = Candidate::new(&word).with_prefix_peeled(true);
        assert_eq!(select_rule(&peeled).map(|r| r.kind), None);

        let word = chars("بدر");
        let peeled = Candidate::new(&word).with_prefix_peeled(true);
        assert_eq!(select_rule(&peeled).map(|r| r.kind), None);
    }

    #[test]
    fn short_words_never_match() {
        for word in ["بة", "يك", "ال", "لل", "وو", "ت", "ش"] {
            assert_eq!(kind_of(word), None, "{word}");
        }
    }

    #[test]
    fn actions_match_rule_shapes() {
        let action = |kind: RuleKind| {
            FALLBACK_RULES
                .iter()
                .find(|rule| rule.kind == kind)
                .map(|rule| rule.action)
        };
        assert_eq!(action(RuleKind::LamPronounLong), Some(Action::Suffix { len: 3 }));
        assert_eq!(action(RuleKind::VocativeParticle), Some(Action::Prefix { len: 2 }));
        assert_eq!(action(RuleKind::PersonPrefix), Some(Action::StackedPrefix));
        assert_eq!(action(RuleKind::Conjunction), Some(Action::Conjunction));
    }
}
