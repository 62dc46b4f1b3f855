use crate::material::{ImpactLevel, MaterialDescriptor};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Extended life-cycle record for a material.
///
/// Only `summary`, `impact` and `recyclable`/`recyclability` feed the
/// descriptor. The nested sections are carried through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LifecycleRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<ImpactLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recyclable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2_intensity_kg_per_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recyclability: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environmental_impact: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supply_chain: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circular_economy: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_metrics: Option<Value>,
}

impl LifecycleRecord {
    pub fn to_descriptor(&self) -> MaterialDescriptor {
        let summary = self
            .summary
            .clone()
            .or_else(|| {
                self.environmental_impact
                    .as_ref()
                    .and_then(|impact| impact.get("summary"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_default();

        MaterialDescriptor {
            summary,
            impact: self.impact.unwrap_or_default(),
            recyclable: self.recyclable.or_else(|| self.recyclability.as_ref().and_then(recyclable_from)),
        }
    }

    /// True when none of the life-cycle sections were present in the source.
    pub fn is_bare(&self) -> bool {
        self.co2_intensity_kg_per_kg.is_none()
            && self.recyclability.is_none()
            && self.environmental_impact.is_none()
            && self.supply_chain.is_none()
            && self.circular_economy.is_none()
            && self.performance_metrics.is_none()
    }
}

// `recyclability` shows up as a flag, a rate, or a section with a flag in it.
fn recyclable_from(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(rate) => rate.as_f64().map(|r| r > 0.0),
        Value::Object(section) => section.get("recyclable").and_then(Value::as_bool),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_falls_back_to_environmental_impact() {
        let record = LifecycleRecord {
            environmental_impact: Some(json!({ "summary": "Energy intensive smelting" })),
            recyclability: Some(json!({ "recyclable": false })),
            ..Default::default()
        };
        let descriptor = record.to_descriptor();
        assert_eq!(descriptor.summary, "Energy intensive smelting");
        assert_eq!(descriptor.impact, ImpactLevel::Varies);
        assert_eq!(descriptor.recyclable, Some(false));
        assert!(!record.is_bare());
    }

    #[test]
    fn test_empty_record_is_bare() {
        let record = LifecycleRecord::default();
        assert!(record.is_bare());
        assert_eq!(record.to_descriptor().recyclable, None);
    }
}
