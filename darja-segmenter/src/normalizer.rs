//! Arabic Text Normalizer
//!
//! Brings raw input to the form the segmenter expects:
//! - Alef variants folded to bare alef
//! - Taa marbuta folded to haa
//! - Whitespace runs collapsed to a single space, ends trimmed
//!
//! Diacritics and tatweel removal are available but off by default.

use serde::{Deserialize, Serialize};

/// Arabic text normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArabicNormalizer {
    /// Normalize alef variants to bare alef
    pub normalize_alef: bool,
    /// Normalize taa marbuta to haa
    pub normalize_taa_marbuta: bool,
    /// Collapse whitespace runs and trim
    pub collapse_whitespace: bool,
    /// Remove diacritical marks (tashkeel)
    pub remove_diacritics: bool,
    /// Remove tatweel (kashida)
    pub remove_tatweel: bool,
}

impl Default for ArabicNormalizer {
    fn default() -> Self {
        Self {
            normalize_alef: true,
            normalize_taa_marbuta: true,
            collapse_whitespace: true,
            remove_diacritics: false,
            remove_tatweel: false,
        }
    }
}

impl ArabicNormalizer {
    /// Create a new Arabic normalizer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize Arabic text.
    pub fn normalize(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len());
        let mut pending_space = false;

        for ch in text.chars() {
            if self.collapse_whitespace && ch.is_whitespace() {
                pending_space = !result.is_empty();
                continue;
            }

            if self.remove_diacritics && is_arabic_diacritic(ch) {
                continue;
            }

            if self.remove_tatweel && ch == '\u{0640}' {
                continue;
            }

            if pending_space {
                result.push(' ');
                pending_space = false;
            }

            if self.normalize_alef && is_alef_variant(ch) {
                result.push('\u{0627}');
            } else if self.normalize_taa_marbuta && ch == '\u{0629}' {
                result.push('\u{0647}');
            } else {
                result.push(ch);
            }
        }

        result
    }
}

fn is_arabic_diacritic(ch: char) -> bool {
    matches!(ch,
        '\u{064B}'..='\u{0652}' | // Fathatan to Sukun
        '\u{0653}'..='\u{0655}' | // Maddah, Hamza above/below
        '\u{065F}' |              // Wavy hamza below
        '\u{0670}'                // Superscript alef
    )
}

fn is_alef_variant(ch: char) -> bool {
    matches!(ch,
        '\u{0622}' | // Alef with madda
        '\u{0623}' | // Alef with hamza above
        '\u{0625}' | // Alef with hamza below
        '\u{0671}'   // Alef wasla
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_alef_variants() {
        let normalizer = ArabicNormalizer::new();
        assert_eq!(normalizer.normalize("أحمد"), "احمد");
        assert_eq!(normalizer.normalize("إسلام"), "اسلام");
        assert_eq!(normalizer.normalize("آمين"), "امين");
    }

    #[test]
    fn folds_taa_marbuta() {
        let normalizer = ArabicNormalizer::new();
        assert_eq!(normalizer.normalize("مدرسة"), "مدرسه");
    }

    #[test]
    fn collapses_and_trims_whitespace() {
        let normalizer = ArabicNormalizer::new();
        assert_eq!(normalizer.normalize("  يكتب \t\n كتبها  "), "يكتب كتبها");
        assert_eq!(normalizer.normalize("   "), "");
    }

    #[test]
    fn keeps_diacritics_unless_asked() {
        let input = "كِتَابٌ";
        assert_eq!(ArabicNormalizer::new().normalize(input), input);

        let stripping = ArabicNormalizer {
            remove_diacritics: true,
            ..ArabicNormalizer::default()
        };
        assert_eq!(stripping.normalize(input), "كتاب");
    }

    #[test]
    fn removes_tatweel_when_enabled() {
        let normalizer = ArabicNormalizer {
            remove_tatweel: true,
            ..ArabicNormalizer::default()
        };
        assert_eq!(normalizer.normalize("العـــربية"), "العربيه");
    }
}
