use super::{
    category::CategoryGuesser, compound::CompoundMatcher, engine::MaterialClassifier, fuzzy::FuzzyTitleMatcher,
};
use crate::{error::MaterialIdError, taxonomy::Taxonomy};
use std::sync::Arc;
use tracing::warn;

/// A fluent builder for constructing a `MaterialClassifier`.
///
/// Everything that can be wrong with the pattern and rule tables surfaces
/// from `build`, so a classifier that exists never fails per call.
#[derive(Default)]
pub struct ClassifierBuilder {
    taxonomy: Option<Arc<Taxonomy>>,
    compound_patterns: Option<Vec<(String, String)>>,
}

impl ClassifierBuilder {
    /// Creates a new, empty `ClassifierBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the taxonomy the classifier reads. Shared, never copied.
    pub fn with_taxonomy(mut self, taxonomy: Arc<Taxonomy>) -> Self {
        self.taxonomy = Some(taxonomy);
        self
    }

    /// Replaces the built-in compound patterns with `(name, regex)` pairs.
    /// Each regex must define `modifier` and `base` groups.
    pub fn with_compound_patterns(mut self, patterns: Vec<(String, String)>) -> Self {
        self.compound_patterns = Some(patterns);
        self
    }

    /// Compiles every table and returns the classifier.
    ///
    /// # Errors
    ///
    /// Returns a `MaterialIdError` if a compound pattern or category rule
    /// fails to compile. A missing taxonomy is not an error: the classifier
    /// runs against the empty taxonomy and matches nothing.
    pub fn build(self) -> Result<MaterialClassifier, MaterialIdError> {
        let taxonomy = self.taxonomy.unwrap_or_else(|| {
            warn!("No taxonomy supplied; classifier will match nothing");
            Arc::new(Taxonomy::empty())
        });

        let compound = match self.compound_patterns {
            Some(patterns) => CompoundMatcher::compile(patterns.iter().map(|(n, p)| (n.as_str(), p.as_str())))?,
            None => CompoundMatcher::with_default_patterns()?,
        };
        let fuzzy = FuzzyTitleMatcher::new(&taxonomy)?;
        let category = CategoryGuesser::new(&taxonomy)?;

        Ok(MaterialClassifier {
            taxonomy,
            compound,
            fuzzy,
            category,
        })
    }
}
