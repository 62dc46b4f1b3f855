use indexmap::IndexMap;

/// Ordered subcategory name → member material keys.
pub type Subcategories = IndexMap<String, Vec<String>>;

/// Ordered family name → subcategories.
///
/// Declaration order is significant: a key listed in more than one family
/// belongs to the first family that lists it.
pub type Families = IndexMap<String, Subcategories>;

/// Where a material key sits in the family hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyPosition<'a> {
    pub family: &'a str,
    pub subcategory: &'a str,
}

/// Finds the first family/subcategory whose member list contains `key`.
pub fn position_of<'a>(families: &'a Families, key: &str) -> Option<FamilyPosition<'a>> {
    families.iter().find_map(|(family, subcategories)| {
        subcategories
            .iter()
            .find(|(_, members)| members.iter().any(|m| m == key))
            .map(|(subcategory, _)| FamilyPosition {
                family: family.as_str(),
                subcategory: subcategory.as_str(),
            })
    })
}
