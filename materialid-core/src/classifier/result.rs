use super::policy::clamp_confidence;
use materialid_schemas::material::MaterialDescriptor;
use serde::Serialize;
use strum::{Display, IntoStaticStr};

/// The cascade stage that produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Display, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MatchSource {
    Compound,
    Family,
    Exact,
    Fallback,
    FuzzyTitle,
    Category,
    LastResort,
}

/// Outcome of one classification call. Built fresh per call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub material: String,
    pub confidence: f64,
    pub is_specific: bool,
    pub source: MatchSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub compound: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_of: Option<String>,
}

impl ClassificationResult {
    pub fn new(material: impl Into<String>, confidence: f64, source: MatchSource) -> Self {
        Self {
            material: material.into(),
            confidence: clamp_confidence(confidence),
            is_specific: true,
            source,
            family: None,
            subcategory: None,
            compound: false,
            modifier: None,
            original_hint: None,
            base_of: None,
        }
    }

    pub fn generic(mut self) -> Self {
        self.is_specific = false;
        self
    }

    pub fn in_family(mut self, family: &str, subcategory: &str) -> Self {
        self.family = Some(family.to_string());
        self.subcategory = Some(subcategory.to_string());
        self
    }

    pub fn compound_of(mut self, modifier: &str) -> Self {
        self.compound = true;
        self.modifier = Some(modifier.to_string());
        self
    }
}

/// A result merged with its descriptor, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    #[serde(flatten)]
    pub result: ClassificationResult,
    #[serde(flatten)]
    pub descriptor: MaterialDescriptor,
}

impl Classification {
    pub fn material(&self) -> &str {
        &self.result.material
    }

    pub fn confidence(&self) -> f64 {
        self.result.confidence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use materialid_schemas::material::ImpactLevel;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_classification_serializes_flat() {
        let classification = Classification {
            result: ClassificationResult::new("leather", 95.0, MatchSource::Family).in_family("leather", "natural_leather"),
            descriptor: MaterialDescriptor {
                summary: "Animal hide".to_string(),
                impact: ImpactLevel::High,
                recyclable: Some(false),
            },
        };
        assert_eq!(
            serde_json::to_value(&classification).unwrap(),
            json!({
                "material": "leather",
                "confidence": 95.0,
                "is_specific": true,
                "source": "family",
                "family": "leather",
                "subcategory": "natural_leather",
                "summary": "Animal hide",
                "impact": "High",
                "recyclable": false,
            })
        );
    }

    #[test]
    fn test_match_source_names() {
        assert_eq!(MatchSource::FuzzyTitle.to_string(), "fuzzy_title");
        assert_eq!(MatchSource::LastResort.to_string(), "last_resort");
    }
}
