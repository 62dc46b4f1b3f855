//! Confidence arithmetic shared by every stage, and the display gate.

use super::result::ClassificationResult;

/// Results below this confidence are never shown to a consumer.
pub const MIN_DISPLAY_CONFIDENCE: f64 = 25.0;

pub const COMPOUND_EXACT_CONFIDENCE: f64 = 90.0;
pub const COMPOUND_PARTIAL_CONFIDENCE: f64 = 85.0;
pub const COMPOUND_BASE_CONFIDENCE: f64 = 75.0;
pub const FAMILY_CONFIDENCE: f64 = 95.0;
pub const EXACT_CONFIDENCE: f64 = 95.0;
pub const FALLBACK_CONFIDENCE: f64 = 85.0;
pub const CATEGORY_CONFIDENCE: f64 = 60.0;
pub const LAST_RESORT_CONFIDENCE: f64 = 50.0;

/// A fuzzy title candidate must score strictly above this.
pub const FUZZY_ACCEPT_ABOVE: f64 = 60.0;

/// Pins a confidence into 0–100. NaN counts as no confidence at all.
pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

pub fn passes_threshold(result: &ClassificationResult) -> bool {
    result.confidence >= MIN_DISPLAY_CONFIDENCE
}

/// Drops results too weak to act on, whatever stage produced them.
pub fn gate(result: Option<ClassificationResult>) -> Option<ClassificationResult> {
    result.filter(passes_threshold)
}
