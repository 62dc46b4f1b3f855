use crate::{normalize::normalize, taxonomy::Taxonomy};

pub const MAX_RELATED: usize = 4;

/// Modifiers tried when a material sits in no family.
pub const VARIANT_PREFIXES: &[&str] = &["recycled", "organic", "sustainable", "reclaimed"];

/// Up to four materials worth suggesting alongside `material`.
///
/// Members of the material's own subcategory come first, then the rest of
/// its family, both in declaration order. Only materials outside every
/// family fall back to prefix variants ("recycled X", or X for "organic X").
pub fn related_materials(taxonomy: &Taxonomy, material: &str) -> Vec<String> {
    let material = normalize(material);
    let mut related: Vec<String> = Vec::new();
    let mut push = |candidate: &str| {
        if candidate != material
            && taxonomy.contains(candidate)
            && !related.iter().any(|r| r == candidate)
            && related.len() < MAX_RELATED
        {
            related.push(candidate.to_string());
        }
    };

    let position = taxonomy.family_of(&material);
    if let Some(subcategories) = position.as_ref().and_then(|p| taxonomy.families().get(p.family)) {
        let own = position.as_ref().map_or("", |p| p.subcategory);
        if let Some(siblings) = subcategories.get(own) {
            siblings.iter().for_each(|s| push(s));
        }
        subcategories
            .iter()
            .filter(|(name, _)| name.as_str() != own)
            .flat_map(|(_, members)| members)
            .for_each(|m| push(m));
        return related;
    }

    for prefix in VARIANT_PREFIXES {
        push(&format!("{} {}", prefix, material));
        if let Some(base) = material.strip_prefix(prefix).and_then(|rest| rest.strip_prefix(' ')) {
            push(base);
        }
    }
    related
}
