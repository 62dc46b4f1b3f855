//! The classification cascade and its stages.

pub mod builder;
pub mod category;
pub mod compound;
pub mod engine;
pub mod family;
pub mod fuzzy;
pub mod live;
pub mod lookup;
pub mod policy;
pub mod related;
pub mod result;

pub use builder::ClassifierBuilder;
pub use compound::{CompoundMatch, CompoundMatcher, CompoundPattern, DEFAULT_COMPOUND_PATTERNS};
pub use engine::MaterialClassifier;
pub use live::LiveClassifier;
pub use policy::{gate, passes_threshold, MIN_DISPLAY_CONFIDENCE};
pub use related::related_materials;
pub use result::{Classification, ClassificationResult, MatchSource};
