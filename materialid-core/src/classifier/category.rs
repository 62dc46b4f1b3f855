//! Coarse guesses from product-category vocabulary ("backpack" → nylon).

use super::{
    policy::{CATEGORY_CONFIDENCE, LAST_RESORT_CONFIDENCE},
    result::{ClassificationResult, MatchSource},
};
use crate::{error::MaterialIdError, taxonomy::Taxonomy};
use regex::Regex;
use tracing::debug;

#[derive(Debug, Clone)]
struct CompiledRule {
    material: String,
    priority: i32,
    keywords: Regex,
}

/// Category rules compiled to whole-word matchers, in declaration order.
#[derive(Debug, Clone)]
pub struct CategoryGuesser {
    rules: Vec<CompiledRule>,
    last_resort: Vec<(String, String)>,
}

impl CategoryGuesser {
    pub fn new(taxonomy: &Taxonomy) -> Result<Self, MaterialIdError> {
        let rules = taxonomy
            .category_rules()
            .iter()
            .map(|rule| {
                let alternatives: Vec<String> = rule.keywords.iter().map(|k| regex::escape(k)).collect();
                // Keywords also match their simple plural.
                let source = format!(r"(?:^|\W)(?:{})(?:e?s)?(?:\W|$)", alternatives.join("|"));
                let keywords = Regex::new(&source).map_err(|e| MaterialIdError::InvalidRule(rule.material.clone(), e))?;
                Ok(CompiledRule {
                    material: rule.material.clone(),
                    priority: rule.priority,
                    keywords,
                })
            })
            .collect::<Result<Vec<_>, MaterialIdError>>()?;

        let last_resort = taxonomy
            .last_resort()
            .iter()
            .map(|entry| (entry.word.clone(), entry.material.clone()))
            .collect();

        Ok(Self { rules, last_resort })
    }

    /// Category rule guess, then the last-resort word list.
    pub fn guess(&self, title: &str, taxonomy: &Taxonomy) -> Option<ClassificationResult> {
        self.guess_category(title, taxonomy)
            .or_else(|| self.guess_last_resort(title, taxonomy))
    }

    /// The strictly highest-priority matching rule; ties go to the rule
    /// declared first.
    pub fn guess_category(&self, title: &str, taxonomy: &Taxonomy) -> Option<ClassificationResult> {
        let mut best: Option<&CompiledRule> = None;
        for rule in &self.rules {
            if !taxonomy.contains(&rule.material) || !rule.keywords.is_match(title) {
                continue;
            }
            if best.map_or(true, |top| rule.priority > top.priority) {
                best = Some(rule);
            }
        }

        let rule = best?;
        debug!("Category rule for '{}' (priority {}) matched", rule.material, rule.priority);
        Some(ClassificationResult::new(rule.material.as_str(), CATEGORY_CONFIDENCE, MatchSource::Category).generic())
    }

    pub fn guess_last_resort(&self, title: &str, taxonomy: &Taxonomy) -> Option<ClassificationResult> {
        let words: Vec<&str> = title
            .split(|c: char| !(c.is_alphanumeric() || c == '-'))
            .filter(|w| !w.is_empty())
            .collect();

        self.last_resort
            .iter()
            .find(|(word, material)| words.contains(&word.as_str()) && taxonomy.contains(material))
            .map(|(_, material)| {
                ClassificationResult::new(material.as_str(), LAST_RESORT_CONFIDENCE, MatchSource::LastResort).generic()
            })
    }
}
