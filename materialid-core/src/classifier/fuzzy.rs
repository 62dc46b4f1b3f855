//! Scoring taxonomy keys found anywhere in a product title.

use super::{
    policy::FUZZY_ACCEPT_ABOVE,
    result::{ClassificationResult, MatchSource},
};
use crate::{error::MaterialIdError, taxonomy::Taxonomy};
use regex::Regex;
use tracing::debug;

/// Keys this short are only trusted as whole words.
const MIN_SUBSTRING_KEY_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    WordBoundary,
    Substring,
}

/// Confidence for a key of `key_len` chars found in a title of `title_len`
/// chars. Word-boundary hits start at 90, substring hits at 70 and never
/// exceed 85, so a whole-word hit always outranks a substring hit.
pub fn fuzzy_confidence(kind: MatchKind, key_len: usize, title_len: usize) -> f64 {
    if title_len == 0 {
        return 0.0;
    }
    let coverage = key_len as f64 / title_len as f64;
    match kind {
        MatchKind::WordBoundary => (90.0 + coverage * 10.0).min(100.0),
        MatchKind::Substring => (70.0 + coverage * 20.0).min(85.0),
    }
}

#[derive(Debug, Clone)]
struct KeyMatcher {
    key: String,
    key_len: usize,
    whole_word: Regex,
}

/// Word-boundary matchers for every descriptor key, compiled once.
#[derive(Debug, Clone)]
pub struct FuzzyTitleMatcher {
    keys: Vec<KeyMatcher>,
}

impl FuzzyTitleMatcher {
    pub fn new(taxonomy: &Taxonomy) -> Result<Self, MaterialIdError> {
        let keys = taxonomy
            .descriptors()
            .map(|(key, _)| {
                let source = format!(r"(?:^|\W){}(?:\W|$)", regex::escape(key));
                let whole_word = Regex::new(&source).map_err(|e| MaterialIdError::InvalidPattern(key.to_string(), e))?;
                Ok(KeyMatcher {
                    key: key.to_string(),
                    key_len: key.chars().count(),
                    whole_word,
                })
            })
            .collect::<Result<Vec<_>, MaterialIdError>>()?;
        Ok(Self { keys })
    }

    /// Best-scoring key in `title` (already normalized).
    ///
    /// Every key is scored and the maximum kept; on equal scores the key
    /// declared first stays. The winner is returned only above 60.
    pub fn best_match(&self, title: &str) -> Option<ClassificationResult> {
        let title_len = title.chars().count();
        if title_len == 0 {
            return None;
        }

        let mut best: Option<(&KeyMatcher, f64)> = None;
        for matcher in &self.keys {
            let kind = if matcher.whole_word.is_match(title) {
                MatchKind::WordBoundary
            } else if matcher.key_len >= MIN_SUBSTRING_KEY_LEN && title.contains(matcher.key.as_str()) {
                MatchKind::Substring
            } else {
                continue;
            };

            let confidence = fuzzy_confidence(kind, matcher.key_len, title_len);
            if best.map_or(true, |(_, top)| confidence > top) {
                best = Some((matcher, confidence));
            }
        }

        let (matcher, confidence) = best?;
        if confidence <= FUZZY_ACCEPT_ABOVE {
            debug!("Fuzzy candidate '{}' scored {:.1}, below acceptance", matcher.key, confidence);
            return None;
        }
        Some(ClassificationResult::new(matcher.key.as_str(), confidence, MatchSource::FuzzyTitle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(keys: &[&str]) -> FuzzyTitleMatcher {
        let mut yaml = String::from("materials:\n");
        for key in keys {
            yaml.push_str(&format!("  {}: {{ summary: test, impact: Moderate }}\n", key));
        }
        FuzzyTitleMatcher::new(&Taxonomy::from_yaml_str(&yaml, "fuzzy").unwrap()).unwrap()
    }

    #[test]
    fn test_whole_word_outranks_substring_at_equal_length() {
        for (key_len, title_len) in [(4, 8), (4, 40), (12, 12), (5, 6)] {
            assert!(
                fuzzy_confidence(MatchKind::WordBoundary, key_len, title_len)
                    >= fuzzy_confidence(MatchKind::Substring, key_len, title_len)
            );
        }
        let matcher = matcher(&["wool"]);
        let word = matcher.best_match("wool hat").unwrap();
        let substring = matcher.best_match("woolyhat").unwrap();
        assert!(word.confidence > substring.confidence);
        assert_eq!(word.confidence, 95.0);
        assert_eq!(substring.confidence, 80.0);
    }

    #[test]
    fn test_keeps_maximum_not_first_found() {
        let matcher = matcher(&["steel", "stainless steel"]);
        let result = matcher.best_match("insulated stainless steel bottle").unwrap();
        assert_eq!(result.material, "stainless steel");
    }

    #[test]
    fn test_short_keys_need_word_boundary() {
        let matcher = matcher(&["oak"]);
        assert!(matcher.best_match("soaked sponge").is_none());
        assert_eq!(matcher.best_match("solid oak shelf").unwrap().material, "oak");
    }

    #[test]
    fn test_ties_keep_first_declared_key() {
        let matcher = matcher(&["silk", "wool"]);
        let result = matcher.best_match("silk wool").unwrap();
        assert_eq!(result.material, "silk");
    }

    #[test]
    fn test_empty_title_never_matches() {
        assert!(matcher(&["wool"]).best_match("").is_none());
    }
}
