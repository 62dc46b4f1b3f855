use thiserror::Error;

#[derive(Debug, Error)]
pub enum MaterialIdError {
    #[error("Taxonomy validation failed: {0}")]
    Validation(String),

    #[error("No taxonomy source has been loaded")]
    NoSource,

    #[error("Unsupported taxonomy source '{0}': expected a directory or a .yaml, .yml or .json file")]
    UnsupportedSource(String),

    #[error("Invalid compound pattern '{0}': {1}")]
    InvalidPattern(String, #[source] regex::Error),

    #[error("Compound pattern '{0}' must define `modifier` and `base` capture groups")]
    MissingCaptureGroup(String),

    #[error("Invalid category rule for '{0}': {1}")]
    InvalidRule(String, #[source] regex::Error),

    #[error("I/O error for file '{0}': {1}")]
    FileIO(String, #[source] std::io::Error),

    #[error("Failed to parse YAML from '{0}': {1}")]
    YamlParsing(String, #[source] serde_yaml::Error),

    #[error("Failed to parse JSON from '{0}': {1}")]
    JsonParsing(String, #[source] serde_json::Error),

    #[error("Failed to process CSV file '{0}': {1}")]
    CsvError(String, #[source] csv::Error),
}
