use super::{
    builder::ClassifierBuilder,
    category::CategoryGuesser,
    compound::CompoundMatcher,
    family::match_family,
    fuzzy::FuzzyTitleMatcher,
    lookup::lookup,
    policy::gate,
    related::related_materials,
    result::{Classification, ClassificationResult},
};
use crate::{
    error::MaterialIdError,
    normalize::{normalize, normalize_hint},
    taxonomy::{Taxonomy, TaxonomyStore},
};
use std::sync::Arc;
use tracing::debug;

/// The classification cascade over one taxonomy.
///
/// Immutable after construction; share it behind an `Arc` across threads.
/// To follow taxonomy reloads, use `LiveClassifier`.
#[derive(Debug)]
pub struct MaterialClassifier {
    pub(super) taxonomy: Arc<Taxonomy>,
    pub(super) compound: CompoundMatcher,
    pub(super) fuzzy: FuzzyTitleMatcher,
    pub(super) category: CategoryGuesser,
}

impl MaterialClassifier {
    /// A classifier with the built-in compound patterns.
    pub fn new(taxonomy: Arc<Taxonomy>) -> Result<Self, MaterialIdError> {
        ClassifierBuilder::new().with_taxonomy(taxonomy).build()
    }

    /// A classifier over the store's current taxonomy snapshot.
    pub fn from_store(store: &TaxonomyStore) -> Result<Self, MaterialIdError> {
        Self::new(store.snapshot())
    }

    pub fn builder() -> ClassifierBuilder {
        ClassifierBuilder::new()
    }

    pub fn taxonomy(&self) -> &Arc<Taxonomy> {
        &self.taxonomy
    }

    /// Classifies a product for display.
    ///
    /// Runs the cascade, suppresses results under the display threshold and
    /// attaches the material's descriptor. `None` means show nothing.
    pub fn classify(&self, title: &str, hint: Option<&str>) -> Option<Classification> {
        let result = gate(self.resolve(title, hint))?;
        let descriptor = self.taxonomy.descriptor(&result.material)?.clone();
        Some(Classification { result, descriptor })
    }

    /// Runs the cascade without the display gate.
    ///
    /// Hint stages (compound, family, exact/fallback) run first, then title
    /// stages (fuzzy title, category, last resort). The first stage that
    /// produces a result decides.
    pub fn resolve(&self, title: &str, hint: Option<&str>) -> Option<ClassificationResult> {
        if let Some(hint) = normalize_hint(hint) {
            if let Some(result) = self.resolve_hint(&hint) {
                return Some(result);
            }
            debug!("Hint '{}' did not resolve, trying title", hint);
        }
        self.resolve_title(&normalize(title))
    }

    /// Materials related to `material`, for "you might also consider".
    pub fn related(&self, material: &str) -> Vec<String> {
        related_materials(&self.taxonomy, material)
    }

    fn resolve_hint(&self, hint: &str) -> Option<ClassificationResult> {
        self.compound
            .resolve(hint, &self.taxonomy)
            .or_else(|| match_family(hint, &self.taxonomy))
            .or_else(|| lookup(hint, &self.taxonomy))
    }

    fn resolve_title(&self, title: &str) -> Option<ClassificationResult> {
        if title.is_empty() {
            return None;
        }
        self.fuzzy
            .best_match(title)
            .or_else(|| self.category.guess(title, &self.taxonomy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::result::MatchSource;

    fn bundled() -> MaterialClassifier {
        MaterialClassifier::new(Arc::new(Taxonomy::bundled().unwrap())).unwrap()
    }

    #[test]
    fn test_classifier_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MaterialClassifier>();
    }

    #[test]
    fn test_hint_beats_title() {
        let classifier = bundled();
        let result = classifier.resolve("Bamboo Cutting Board", Some("bamboo")).unwrap();
        assert_eq!(result.source, MatchSource::Family);
        assert_eq!(result.confidence, 95.0);
        assert_eq!(result.family.as_deref(), Some("wood"));
    }

    #[test]
    fn test_unresolved_hint_falls_back_to_title() {
        let classifier = bundled();
        let result = classifier.resolve("Merino Wool Beanie", Some("zxqv")).unwrap();
        assert_eq!(result.source, MatchSource::FuzzyTitle);
        assert_eq!(result.material, "merino wool");
    }

    #[test]
    fn test_empty_taxonomy_matches_nothing() {
        let classifier = MaterialClassifier::builder().build().unwrap();
        assert!(classifier.classify("Stainless Steel Water Bottle", Some("stainless steel")).is_none());
        assert!(classifier.related("steel").is_empty());
    }

    #[test]
    fn test_custom_patterns_replace_defaults() {
        let classifier = MaterialClassifier::builder()
            .with_taxonomy(Arc::new(Taxonomy::bundled().unwrap()))
            .with_compound_patterns(vec![(
                "blend".to_string(),
                r"\b(?P<base>cotton|wool)\s+(?P<modifier>blend)\b".to_string(),
            )])
            .build()
            .unwrap();
        let result = classifier.resolve("", Some("wool blend")).unwrap();
        assert_eq!(result.source, MatchSource::Compound);
        assert_eq!(result.material, "wool");
        assert_eq!(result.confidence, 75.0);
    }

    #[test]
    fn test_invalid_pattern_fails_at_build() {
        let built = MaterialClassifier::builder()
            .with_compound_patterns(vec![("bad".to_string(), "(?P<base>[".to_string())])
            .build();
        assert!(matches!(built, Err(MaterialIdError::InvalidPattern(..))));
    }
}
