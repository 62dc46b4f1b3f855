use crate::lifecycle::LifecycleRecord;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Coarse environmental impact band shown next to a material.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
pub enum ImpactLevel {
    #[serde(alias = "low")]
    Low,
    #[serde(rename = "Low-Moderate", alias = "low-moderate")]
    #[strum(serialize = "Low-Moderate")]
    LowModerate,
    #[serde(alias = "moderate")]
    Moderate,
    #[serde(alias = "high")]
    High,
    #[default]
    #[serde(alias = "varies")]
    Varies,
}

/// The environmental summary record attached to a material key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaterialDescriptor {
    pub summary: String,
    pub impact: ImpactLevel,
    #[serde(default)]
    pub recyclable: Option<bool>,
}

/// One value of the `materials` record in a taxonomy source.
///
/// Most entries are plain descriptors. Entries carrying life-cycle data are
/// kept whole so downstream consumers can read their extra fields; the
/// classifier only ever looks at the descriptor derived from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaxonomyEntry {
    Descriptor(MaterialDescriptor),
    LifeCycle(LifecycleRecord),
}

impl TaxonomyEntry {
    pub fn descriptor(&self) -> MaterialDescriptor {
        match self {
            TaxonomyEntry::Descriptor(descriptor) => descriptor.clone(),
            TaxonomyEntry::LifeCycle(record) => record.to_descriptor(),
        }
    }

    pub fn is_life_cycle(&self) -> bool {
        matches!(self, TaxonomyEntry::LifeCycle(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_impact_level_string_forms() {
        assert_eq!(ImpactLevel::LowModerate.to_string(), "Low-Moderate");
        assert_eq!(ImpactLevel::from_str("High").unwrap(), ImpactLevel::High);
        let parsed: ImpactLevel = serde_yaml::from_str("low-moderate").unwrap();
        assert_eq!(parsed, ImpactLevel::LowModerate);
    }

    #[test]
    fn test_simple_entry_parses_as_descriptor() {
        let yaml = "summary: Durable alloy\nimpact: Moderate\nrecyclable: true\n";
        let entry: TaxonomyEntry = serde_yaml::from_str(yaml).unwrap();
        assert!(!entry.is_life_cycle());
        assert_eq!(entry.descriptor().recyclable, Some(true));
    }

    #[test]
    fn test_extended_entry_keeps_extra_fields() {
        let yaml = r#"
summary: Virgin aluminium
impact: High
co2_intensity_kg_per_kg: 11.5
recyclability: 0.95
supply_chain:
  primary_regions: [china, russia]
"#;
        let entry: TaxonomyEntry = serde_yaml::from_str(yaml).unwrap();
        assert!(entry.is_life_cycle());
        let descriptor = entry.descriptor();
        assert_eq!(descriptor.summary, "Virgin aluminium");
        assert_eq!(descriptor.impact, ImpactLevel::High);
        assert_eq!(descriptor.recyclable, Some(true));
        match entry {
            TaxonomyEntry::LifeCycle(record) => {
                assert_eq!(record.co2_intensity_kg_per_kg, Some(11.5));
                assert!(record.supply_chain.is_some());
            }
            TaxonomyEntry::Descriptor(_) => unreachable!(),
        }
    }
}
