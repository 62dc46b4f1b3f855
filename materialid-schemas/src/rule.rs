use serde::{Deserialize, Serialize};

/// Product-category vocabulary mapped to a likely material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub keywords: Vec<String>,
    pub material: String,
    #[serde(default)]
    pub priority: i32,
}

/// Single-word descriptor consulted after every other stage failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastResortEntry {
    pub word: String,
    pub material: String,
}
