use super::{
    policy::FAMILY_CONFIDENCE,
    result::{ClassificationResult, MatchSource},
};
use crate::taxonomy::Taxonomy;

/// First family member contained in the hint.
///
/// Families, subcategories and members are walked in declaration order and
/// the first member with a descriptor that occurs in `hint` wins.
pub fn match_family(hint: &str, taxonomy: &Taxonomy) -> Option<ClassificationResult> {
    for (family, subcategories) in taxonomy.families() {
        for (subcategory, members) in subcategories {
            for member in members {
                if !member.is_empty() && hint.contains(member.as_str()) && taxonomy.contains(member) {
                    return Some(
                        ClassificationResult::new(member.as_str(), FAMILY_CONFIDENCE, MatchSource::Family)
                            .in_family(family, subcategory),
                    );
                }
            }
        }
    }
    None
}
