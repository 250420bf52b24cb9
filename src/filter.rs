// this_file: src/filter.rs

//! Candidate text filtering.
//!
//! Decides whether a feed comment is usable as a caption: word-count bounds,
//! per-word length limit, required-vocabulary intersection, and a forbidden
//! character set (used to reject text the caption font cannot render, e.g.
//! pictographs). Rejection reasons are logged at debug level only; they never
//! change the boolean outcome.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How candidate words are compared against the required vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordMatch {
    /// Exact string comparison, case preserved.
    #[default]
    Exact,
    /// Candidate words are lower-cased before lookup; the vocabulary is
    /// expected to already be lower-case.
    Lowercase,
}

/// Filter criteria for candidate captions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Minimum word count (inclusive)
    pub min_words: usize,
    /// Maximum word count (inclusive)
    pub max_words: usize,
    /// Maximum length of any single word, in characters
    pub max_word_length: usize,
    /// The candidate must contain at least one of these words.
    /// An empty set accepts nothing.
    pub required_vocabulary: HashSet<String>,
    /// The candidate must contain none of these characters.
    pub forbidden_characters: HashSet<char>,
    /// Vocabulary comparison policy
    pub word_match: WordMatch,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            min_words: 3,
            max_words: 30,
            max_word_length: 20,
            required_vocabulary: HashSet::new(),
            forbidden_characters: HashSet::new(),
            word_match: WordMatch::Exact,
        }
    }
}

impl FilterCriteria {
    /// Convenience constructor with the given required vocabulary and
    /// default bounds.
    pub fn with_vocabulary(required_vocabulary: HashSet<String>) -> Self {
        Self {
            required_vocabulary,
            ..Self::default()
        }
    }
}

/// Returns true when `text` satisfies all criteria.
///
/// Rules are applied in order, short-circuiting on the first failure:
/// word count, per-word length, vocabulary intersection, forbidden
/// characters. Order matters only for the debug log line.
pub fn accepts(text: &str, criteria: &FilterCriteria) -> bool {
    let words: Vec<&str> = text.split_whitespace().collect();

    if words.len() < criteria.min_words || words.len() > criteria.max_words {
        log::debug!(
            "Rejected (word count {} outside {}..={}): {:?}",
            words.len(),
            criteria.min_words,
            criteria.max_words,
            text
        );
        return false;
    }

    if let Some(word) = words
        .iter()
        .find(|w| w.chars().count() > criteria.max_word_length)
    {
        log::debug!(
            "Rejected (word {:?} longer than {} chars): {:?}",
            word,
            criteria.max_word_length,
            text
        );
        return false;
    }

    let vocabulary_hit = words.iter().any(|w| match criteria.word_match {
        WordMatch::Exact => criteria.required_vocabulary.contains(*w),
        WordMatch::Lowercase => criteria
            .required_vocabulary
            .contains(w.to_lowercase().as_str()),
    });
    if !vocabulary_hit {
        log::debug!("Rejected (no required vocabulary word): {:?}", text);
        return false;
    }

    if let Some(c) = text
        .chars()
        .find(|c| criteria.forbidden_characters.contains(c))
    {
        log::debug!("Rejected (forbidden character {:?}): {:?}", c, text);
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn criteria(words: &[&str]) -> FilterCriteria {
        FilterCriteria::with_vocabulary(vocab(words))
    }

    #[test]
    fn test_accepts_matching_candidate() {
        let c = criteria(&["beautiful"]);
        assert!(accepts("what a beautiful view of the valley", &c));
    }

    #[test]
    fn test_rejects_below_min_words() {
        let c = criteria(&["wow"]);
        assert!(!accepts("wow", &c));
    }

    #[test]
    fn test_rejects_above_max_words() {
        let c = FilterCriteria {
            max_words: 5,
            ..criteria(&["view"])
        };
        assert!(!accepts("what a very beautiful view of the valley", &c));
    }

    #[test]
    fn test_rejects_regardless_of_vocabulary_when_count_fails() {
        let c = criteria(&["beautiful"]);
        assert!(!accepts("beautiful", &c));
    }

    #[test]
    fn test_rejects_overlong_word() {
        let c = FilterCriteria {
            max_word_length: 10,
            ..criteria(&["view"])
        };
        assert!(!accepts("a truly incomprehensibilities view here", &c));
    }

    #[test]
    fn test_rejects_without_vocabulary_hit() {
        let c = criteria(&["mountain"]);
        assert!(!accepts("what a beautiful view of the valley", &c));
    }

    #[test]
    fn test_empty_vocabulary_rejects_everything() {
        let c = criteria(&[]);
        assert!(!accepts("what a beautiful view of the valley", &c));
    }

    #[test]
    fn test_exact_match_is_case_sensitive() {
        let c = criteria(&["beautiful"]);
        assert!(!accepts("what a Beautiful view of the valley", &c));
    }

    #[test]
    fn test_lowercase_match_normalizes_candidate() {
        let c = FilterCriteria {
            word_match: WordMatch::Lowercase,
            ..criteria(&["beautiful"])
        };
        assert!(accepts("what a Beautiful view of the valley", &c));
    }

    #[test]
    fn test_rejects_forbidden_character() {
        let c = FilterCriteria {
            forbidden_characters: ['\u{1F600}'].into_iter().collect(),
            ..criteria(&["beautiful"])
        };
        assert!(!accepts("what a beautiful view \u{1F600} of the valley", &c));
    }

    #[test]
    fn test_forbidden_check_runs_after_vocabulary() {
        // A forbidden character alone does not matter if the vocabulary
        // check already failed; the result is false either way.
        let c = FilterCriteria {
            forbidden_characters: ['!'].into_iter().collect(),
            ..criteria(&["beautiful"])
        };
        assert!(!accepts("what a gorgeous view of the valley!", &c));
    }

    #[test]
    fn test_empty_text_fails_word_count() {
        let c = criteria(&["beautiful"]);
        assert!(!accepts("", &c));
    }

    #[test]
    fn test_criteria_round_trips_through_json() {
        let c = FilterCriteria {
            forbidden_characters: ['~'].into_iter().collect(),
            word_match: WordMatch::Lowercase,
            ..criteria(&["valley"])
        };
        let json = serde_json::to_string(&c).unwrap();
        let back: FilterCriteria = serde_json::from_str(&json).unwrap();
        assert_eq!(back.word_match, WordMatch::Lowercase);
        assert!(back.required_vocabulary.contains("valley"));
        assert!(back.forbidden_characters.contains(&'~'));
    }
}
