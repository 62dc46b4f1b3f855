use super::{
    policy::{EXACT_CONFIDENCE, FALLBACK_CONFIDENCE},
    result::{ClassificationResult, MatchSource},
};
use crate::taxonomy::Taxonomy;

/// Direct descriptor lookup, then the static fallback table.
pub fn lookup(hint: &str, taxonomy: &Taxonomy) -> Option<ClassificationResult> {
    exact_match(hint, taxonomy).or_else(|| fallback_match(hint, taxonomy))
}

/// A descriptor key contained in the hint, or containing it.
pub fn exact_match(hint: &str, taxonomy: &Taxonomy) -> Option<ClassificationResult> {
    if hint.is_empty() {
        return None;
    }
    taxonomy
        .descriptors()
        .map(|(key, _)| key)
        .find(|key| hint.contains(key) || key.contains(hint))
        .map(|key| ClassificationResult::new(key, EXACT_CONFIDENCE, MatchSource::Exact))
}

/// The hint verbatim in the fallback table, with a target that resolves.
pub fn fallback_match(hint: &str, taxonomy: &Taxonomy) -> Option<ClassificationResult> {
    let target = taxonomy.fallbacks().get(hint)?;
    if !taxonomy.contains(target) {
        return None;
    }
    let mut result = ClassificationResult::new(target.as_str(), FALLBACK_CONFIDENCE, MatchSource::Fallback).generic();
    result.original_hint = Some(hint.to_string());
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taxonomy() -> Taxonomy {
        Taxonomy::from_yaml_str(
            r#"
materials:
  steel: { summary: Alloy, impact: Moderate }
  plastics: { summary: Polymers, impact: High }
fallbacks:
  metal: steel
  polycarbonate: plastics
"#,
            "lookup",
        )
        .unwrap()
    }

    #[test]
    fn test_key_containment_both_ways() {
        let taxonomy = taxonomy();
        assert_eq!(lookup("brushed steel", &taxonomy).unwrap().material, "steel");
        let partial = lookup("plast", &taxonomy).unwrap();
        assert_eq!(partial.material, "plastics");
        assert_eq!(partial.confidence, 95.0);
        assert_eq!(partial.source, MatchSource::Exact);
    }

    #[test]
    fn test_fallback_table() {
        let taxonomy = taxonomy();
        let result = lookup("metal", &taxonomy).unwrap();
        assert_eq!(result.material, "steel");
        assert_eq!(result.confidence, 85.0);
        assert_eq!(result.source, MatchSource::Fallback);
        assert!(!result.is_specific);
        assert!(lookup("polycarbonate", &taxonomy).is_some());
        assert!(lookup("metal frame", &taxonomy).is_none());
    }
}
