pub mod analysis;
pub mod classifier;
pub mod error;
pub mod logger;
pub mod normalize;
pub mod taxonomy;

pub use classifier::{Classification, ClassificationResult, ClassifierBuilder, LiveClassifier, MatchSource, MaterialClassifier};
pub use error::MaterialIdError;
pub use taxonomy::{Taxonomy, TaxonomyStats, TaxonomyStore};
