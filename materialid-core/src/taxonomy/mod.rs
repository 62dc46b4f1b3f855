//! The material taxonomy: descriptors, the family hierarchy and the rule
//! tables the classifier reads. A `Taxonomy` is immutable once built.

pub mod loader;
pub mod store;

pub use loader::{load_source, load_taxonomy_dir, load_taxonomy_file};
pub use store::TaxonomyStore;

use crate::{error::MaterialIdError, normalize::normalize};
use indexmap::IndexMap;
use materialid_schemas::{
    family::{self, Families, FamilyPosition},
    file_formats::TaxonomyFile,
    material::{MaterialDescriptor, TaxonomyEntry},
    rule::{CategoryRule, LastResortEntry},
};
use std::path::Path;
use tracing::{info, warn};

const BUNDLED_TAXONOMY: &str = include_str!("../../data/default_taxonomy.yaml");

#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    schema_version: String,
    entries: IndexMap<String, TaxonomyEntry>,
    descriptors: IndexMap<String, MaterialDescriptor>,
    families: Families,
    category_rules: Vec<CategoryRule>,
    fallbacks: IndexMap<String, String>,
    last_resort: Vec<LastResortEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxonomyStats {
    pub materials: usize,
    pub life_cycle_records: usize,
    pub families: usize,
    pub subcategories: usize,
    pub family_members: usize,
    pub category_rules: usize,
    pub fallbacks: usize,
    pub last_resort: usize,
    /// Family members with no descriptor. They never resolve.
    pub unresolved_members: Vec<String>,
}

impl Taxonomy {
    /// The taxonomy used when nothing could be loaded. Every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The taxonomy shipped with the crate.
    pub fn bundled() -> Result<Self, MaterialIdError> {
        Self::from_yaml_str(BUNDLED_TAXONOMY, "bundled taxonomy")
    }

    /// Loads a taxonomy from a file or a directory of files.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MaterialIdError> {
        Self::from_file(load_source(path)?)
    }

    pub fn from_yaml_str(source: &str, origin: &str) -> Result<Self, MaterialIdError> {
        let file: TaxonomyFile = serde_yaml::from_str(source)
            .map_err(|e| MaterialIdError::YamlParsing(origin.to_string(), e))?;
        Self::from_file(file)
    }

    pub fn from_json_str(source: &str, origin: &str) -> Result<Self, MaterialIdError> {
        let file: TaxonomyFile = serde_json::from_str(source)
            .map_err(|e| MaterialIdError::JsonParsing(origin.to_string(), e))?;
        Self::from_file(file)
    }

    /// Validates a parsed source and builds the taxonomy from it.
    ///
    /// # Errors
    ///
    /// Returns `MaterialIdError::Validation` when a key is not in canonical
    /// (normalized) form, a rule has no keywords, or a rule, fallback or
    /// last-resort entry targets a material without a descriptor.
    pub fn from_file(file: TaxonomyFile) -> Result<Self, MaterialIdError> {
        for key in file.materials.keys() {
            ensure_canonical("material key", key)?;
        }

        let descriptors: IndexMap<String, MaterialDescriptor> = file
            .materials
            .iter()
            .map(|(key, entry)| (key.clone(), entry.descriptor()))
            .collect();

        for (key, entry) in &file.materials {
            if let TaxonomyEntry::LifeCycle(record) = entry {
                if record.is_bare() && record.summary.is_none() {
                    warn!("Material '{}' has neither a descriptor nor life-cycle data", key);
                }
            }
        }

        for (family, subcategories) in &file.families {
            for (subcategory, members) in subcategories {
                for member in members {
                    ensure_canonical("family member", member)?;
                    if !descriptors.contains_key(member) {
                        warn!(
                            "Family member '{}' in {}/{} has no descriptor and will never match",
                            member, family, subcategory
                        );
                    }
                }
            }
        }

        for rule in &file.category_rules {
            if rule.keywords.is_empty() {
                return Err(MaterialIdError::Validation(format!(
                    "category rule for '{}' has no keywords",
                    rule.material
                )));
            }
            for keyword in &rule.keywords {
                ensure_canonical("category keyword", keyword)?;
            }
            ensure_target(&descriptors, "category rule", &rule.material)?;
        }

        for (hint, target) in &file.fallbacks {
            ensure_canonical("fallback hint", hint)?;
            ensure_target(&descriptors, "fallback", target)?;
        }

        for entry in &file.last_resort {
            ensure_canonical("last-resort word", &entry.word)?;
            ensure_target(&descriptors, "last-resort entry", &entry.material)?;
        }

        let taxonomy = Self {
            schema_version: file.schema_version,
            entries: file.materials,
            descriptors,
            families: file.families,
            category_rules: file.category_rules,
            fallbacks: file.fallbacks,
            last_resort: file.last_resort,
        };

        info!(
            "Taxonomy built: {} materials, {} families, {} category rules",
            taxonomy.descriptors.len(),
            taxonomy.families.len(),
            taxonomy.category_rules.len()
        );
        Ok(taxonomy)
    }

    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.descriptors.contains_key(key)
    }

    pub fn descriptor(&self, key: &str) -> Option<&MaterialDescriptor> {
        self.descriptors.get(key)
    }

    /// The source entry for `key`, including any life-cycle data.
    pub fn entry(&self, key: &str) -> Option<&TaxonomyEntry> {
        self.entries.get(key)
    }

    /// Descriptors in declaration order.
    pub fn descriptors(&self) -> impl Iterator<Item = (&str, &MaterialDescriptor)> {
        self.descriptors.iter().map(|(k, d)| (k.as_str(), d))
    }

    pub fn families(&self) -> &Families {
        &self.families
    }

    pub fn family_of(&self, key: &str) -> Option<FamilyPosition<'_>> {
        family::position_of(&self.families, key)
    }

    pub fn category_rules(&self) -> &[CategoryRule] {
        &self.category_rules
    }

    pub fn fallbacks(&self) -> &IndexMap<String, String> {
        &self.fallbacks
    }

    pub fn last_resort(&self) -> &[LastResortEntry] {
        &self.last_resort
    }

    pub fn stats(&self) -> TaxonomyStats {
        let mut stats = TaxonomyStats {
            materials: self.descriptors.len(),
            life_cycle_records: self.entries.values().filter(|e| e.is_life_cycle()).count(),
            families: self.families.len(),
            category_rules: self.category_rules.len(),
            fallbacks: self.fallbacks.len(),
            last_resort: self.last_resort.len(),
            ..Default::default()
        };
        for subcategories in self.families.values() {
            stats.subcategories += subcategories.len();
            for member in subcategories.values().flatten() {
                stats.family_members += 1;
                if !self.descriptors.contains_key(member) && !stats.unresolved_members.contains(member) {
                    stats.unresolved_members.push(member.clone());
                }
            }
        }
        stats
    }
}

fn ensure_canonical(what: &str, value: &str) -> Result<(), MaterialIdError> {
    if value.is_empty() || normalize(value) != value {
        return Err(MaterialIdError::Validation(format!(
            "{} '{}' must be non-empty, trimmed and lowercase",
            what, value
        )));
    }
    Ok(())
}

fn ensure_target(
    descriptors: &IndexMap<String, MaterialDescriptor>,
    what: &str,
    target: &str,
) -> Result<(), MaterialIdError> {
    if descriptors.contains_key(target) {
        Ok(())
    } else {
        Err(MaterialIdError::Validation(format!(
            "{} targets '{}', which has no descriptor",
            what, target
        )))
    }
}
