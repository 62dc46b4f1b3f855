//! "<modifier> <base material>" extraction from material hints.

use super::{
    policy::{COMPOUND_BASE_CONFIDENCE, COMPOUND_EXACT_CONFIDENCE, COMPOUND_PARTIAL_CONFIDENCE},
    result::{ClassificationResult, MatchSource},
};
use crate::{error::MaterialIdError, taxonomy::Taxonomy};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    /// Built-in patterns, most specific first. The generic adjective form
    /// is last because it accepts any base word.
    pub static ref DEFAULT_COMPOUND_PATTERNS: Vec<(&'static str, &'static str)> = vec![
        (
            "metal_alloy",
            r"\b(?P<modifier>stainless|carbon|galvani[sz]ed|anodi[sz]ed|cast|wrought|forged|brushed|sterling|surgical|recycled|titanium|aluminium|aluminum|nickel|copper|zinc)\s+(?P<base>steel|iron|aluminium|aluminum|silver|gold|copper|brass|bronze|titanium|alloy)\b",
        ),
        (
            "textile_modifier",
            r"\b(?P<modifier>recycled|organic|pima|supima|egyptian|merino|brushed|combed|ring[- ]spun|mercerized|virgin|bci|bamboo|tencel)\s+(?P<base>cotton|polyester|nylon|wool|silk|linen|rayon|viscose|cashmere|denim|fleece|lyocell|spandex|acrylic|hemp)\b",
        ),
        (
            "leather_authenticity",
            r"\b(?P<modifier>faux|vegan|synthetic|bonded|pu|patent|nubuck|full[- ]grain|top[- ]grain|split|vegetable[- ]tanned|chrome[- ]tanned|recycled|plant[- ]based)\s+(?P<base>leather)\b",
        ),
        (
            "generic_modifier",
            r"\b(?P<modifier>recycled|organic|sustainable|reclaimed|natural|synthetic|bio-based|biodegradable|compostable|eco-friendly|upcycled|post-consumer|certified|solid|engineered|tempered|borosilicate|food-grade|virgin)\s+(?P<base>[a-z][a-z-]*)\b",
        ),
    ];
}

/// One compound term found in a hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundMatch {
    pub full_text: String,
    pub modifier: String,
    pub base: String,
}

impl CompoundMatch {
    /// The same match with its base spelled the way the fallback table
    /// spells it ("aluminium" as "aluminum"). `None` when the table has no
    /// other spelling for the base.
    pub fn respelled(&self, taxonomy: &Taxonomy) -> Option<CompoundMatch> {
        let target = taxonomy.fallbacks().get(&self.base)?;
        if *target == self.base {
            return None;
        }
        let at = self.full_text.rfind(self.base.as_str())?;
        let full_text = format!(
            "{}{}{}",
            &self.full_text[..at],
            target,
            &self.full_text[at + self.base.len()..]
        );
        Some(CompoundMatch {
            full_text,
            modifier: self.modifier.clone(),
            base: target.clone(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct CompoundPattern {
    name: String,
    regex: Regex,
}

impl CompoundPattern {
    /// Compiles a pattern. It must name `modifier` and `base` groups.
    pub fn new(name: &str, source: &str) -> Result<Self, MaterialIdError> {
        let regex = Regex::new(source).map_err(|e| MaterialIdError::InvalidPattern(name.to_string(), e))?;
        let names: Vec<&str> = regex.capture_names().flatten().collect();
        if !names.contains(&"modifier") || !names.contains(&"base") {
            return Err(MaterialIdError::MissingCaptureGroup(name.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            regex,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// First occurrence of the pattern in `text`.
    pub fn find(&self, text: &str) -> Option<CompoundMatch> {
        let caps = self.regex.captures(text)?;
        Some(CompoundMatch {
            full_text: caps.get(0)?.as_str().to_string(),
            modifier: caps.name("modifier")?.as_str().to_string(),
            base: caps.name("base")?.as_str().to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct CompoundMatcher {
    patterns: Vec<CompoundPattern>,
}

impl CompoundMatcher {
    pub fn new(patterns: Vec<CompoundPattern>) -> Self {
        Self { patterns }
    }

    pub fn with_default_patterns() -> Result<Self, MaterialIdError> {
        Self::compile(DEFAULT_COMPOUND_PATTERNS.iter().copied())
    }

    pub fn compile<'a, I>(sources: I) -> Result<Self, MaterialIdError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let patterns = sources
            .into_iter()
            .map(|(name, source)| CompoundPattern::new(name, source))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(patterns))
    }

    pub fn patterns(&self) -> &[CompoundPattern] {
        &self.patterns
    }

    /// Resolves the first compound term that maps onto the taxonomy.
    ///
    /// Patterns are tried in order. The first one whose match resolves at
    /// any of the three levels (whole phrase, overlapping key, base term)
    /// decides; a match that resolves nowhere moves on to the next pattern.
    pub fn resolve(&self, hint: &str, taxonomy: &Taxonomy) -> Option<ClassificationResult> {
        self.patterns.iter().find_map(|pattern| {
            let found = pattern.find(hint)?;
            let resolved = resolve_match(&found, taxonomy).or_else(|| {
                let respelled = found.respelled(taxonomy)?;
                let mut result = resolve_match(&respelled, taxonomy)?;
                result.original_hint.get_or_insert_with(|| found.full_text.clone());
                Some(result)
            });
            if resolved.is_none() {
                debug!("Compound '{}' ({}) did not resolve", found.full_text, pattern.name);
            }
            resolved
        })
    }
}

fn resolve_match(found: &CompoundMatch, taxonomy: &Taxonomy) -> Option<ClassificationResult> {
    let phrase = found.full_text.as_str();

    if taxonomy.contains(phrase) {
        return Some(
            ClassificationResult::new(phrase, COMPOUND_EXACT_CONFIDENCE, MatchSource::Compound)
                .compound_of(&found.modifier),
        );
    }

    // The bare base is left to the next level so the lower base-only
    // confidence applies to it.
    let overlapping = taxonomy
        .descriptors()
        .map(|(key, _)| key)
        .find(|key| *key != found.base && (phrase.contains(key) || key.contains(phrase)));
    if let Some(key) = overlapping {
        let mut result = ClassificationResult::new(key, COMPOUND_PARTIAL_CONFIDENCE, MatchSource::Compound)
            .compound_of(&found.modifier);
        result.original_hint = Some(phrase.to_string());
        return Some(result);
    }

    if taxonomy.contains(&found.base) {
        let mut result = ClassificationResult::new(found.base.as_str(), COMPOUND_BASE_CONFIDENCE, MatchSource::Compound)
            .compound_of(&found.modifier)
            .generic();
        result.base_of = Some(phrase.to_string());
        return Some(result);
    }

    None
}
