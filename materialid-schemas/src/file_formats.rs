use crate::{
    family::Families,
    material::TaxonomyEntry,
    rule::{CategoryRule, LastResortEntry},
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// On-disk layout of a taxonomy source (YAML or JSON).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyFile {
    #[serde(default)]
    pub schema_version: String,
    #[serde(default)]
    pub materials: IndexMap<String, TaxonomyEntry>,
    #[serde(default)]
    pub families: Families,
    #[serde(default)]
    pub category_rules: Vec<CategoryRule>,
    #[serde(default)]
    pub fallbacks: IndexMap<String, String>,
    #[serde(default)]
    pub last_resort: Vec<LastResortEntry>,
}

impl TaxonomyFile {
    /// Merges `other` into `self`.
    ///
    /// Materials and fallbacks are keyed, so later files override earlier
    /// ones. Families merge per subcategory; rules and last-resort entries
    /// are appended in order.
    pub fn merge(&mut self, other: TaxonomyFile) {
        if self.schema_version.is_empty() {
            self.schema_version = other.schema_version;
        }
        self.materials.extend(other.materials);
        for (family, subcategories) in other.families {
            let target = self.families.entry(family).or_default();
            for (subcategory, members) in subcategories {
                let existing = target.entry(subcategory).or_default();
                for member in members {
                    if !existing.contains(&member) {
                        existing.push(member);
                    }
                }
            }
        }
        self.category_rules.extend(other.category_rules);
        self.fallbacks.extend(other.fallbacks);
        self.last_resort.extend(other.last_resort);
    }
}
