use crate::{classifier::Classification, error::MaterialIdError, logger::LogEntry};
use std::collections::BTreeMap;

/// Aggregate view of a batch classification run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub classified: usize,
    pub recyclable: usize,
    pub confidence_sum: f64,
    pub by_material: BTreeMap<String, usize>,
    pub by_source: BTreeMap<String, usize>,
    pub by_impact: BTreeMap<String, usize>,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: Option<&Classification>) {
        self.total += 1;
        let Some(classification) = outcome else {
            return;
        };
        self.count(
            &classification.result.material,
            classification.result.confidence,
            &classification.result.source.to_string(),
            &classification.descriptor.impact.to_string(),
            classification.descriptor.recyclable,
        );
    }

    pub fn record_entry(&mut self, entry: &LogEntry) {
        self.total += 1;
        if !entry.is_classified() {
            return;
        }
        self.count(
            &entry.material,
            entry.confidence.unwrap_or_default(),
            &entry.source,
            &entry.impact,
            entry.recyclable,
        );
    }

    fn count(&mut self, material: &str, confidence: f64, source: &str, impact: &str, recyclable: Option<bool>) {
        self.classified += 1;
        self.confidence_sum += confidence;
        if recyclable == Some(true) {
            self.recyclable += 1;
        }
        *self.by_material.entry(material.to_string()).or_insert(0) += 1;
        *self.by_source.entry(source.to_string()).or_insert(0) += 1;
        *self.by_impact.entry(impact.to_string()).or_insert(0) += 1;
    }

    /// Rows that produced nothing displayable.
    pub fn suppressed(&self) -> usize {
        self.total - self.classified
    }

    pub fn mean_confidence(&self) -> f64 {
        if self.classified == 0 {
            0.0
        } else {
            self.confidence_sum / self.classified as f64
        }
    }

    /// Share of rows classified, 0–1.
    pub fn coverage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.classified as f64 / self.total as f64
        }
    }

    pub fn merge(&mut self, other: BatchSummary) {
        self.total += other.total;
        self.classified += other.classified;
        self.recyclable += other.recyclable;
        self.confidence_sum += other.confidence_sum;
        for (material, count) in other.by_material {
            *self.by_material.entry(material).or_insert(0) += count;
        }
        for (source, count) in other.by_source {
            *self.by_source.entry(source).or_insert(0) += count;
        }
        for (impact, count) in other.by_impact {
            *self.by_impact.entry(impact).or_insert(0) += count;
        }
    }
}

/// Rebuilds a summary from a classification log written by
/// `ClassificationLogger`.
pub fn summarize_log(log_path: &str) -> Result<BatchSummary, MaterialIdError> {
    let mut reader =
        csv::Reader::from_path(log_path).map_err(|e| MaterialIdError::CsvError(log_path.to_string(), e))?;
    let mut summary = BatchSummary::default();
    for record in reader.deserialize() {
        let entry: LogEntry = record.map_err(|e| MaterialIdError::CsvError(log_path.to_string(), e))?;
        summary.record_entry(&entry);
    }
    Ok(summary)
}

pub fn aggregate(summaries: Vec<BatchSummary>) -> BatchSummary {
    let mut combined = BatchSummary::default();
    for summary in summaries {
        combined.merge(summary);
    }
    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{logger::ClassificationLogger, MaterialClassifier, Taxonomy};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    const TITLES: &[(&str, Option<&str>)] = &[
        ("Stainless Steel Water Bottle", Some("stainless steel")),
        ("Organic Cotton T-Shirt", None),
        ("Mystery Gadget XJ-9", Some("unknown")),
        ("Sony WH-1000XM4 Headphones", None),
    ];

    #[test]
    fn test_summary_matches_log_roundtrip() {
        let classifier = MaterialClassifier::new(Arc::new(Taxonomy::bundled().unwrap())).unwrap();
        let path = std::env::temp_dir().join(format!("materialid-analysis-{}.csv", std::process::id()));
        let path_str = path.to_str().unwrap();

        let mut direct = BatchSummary::default();
        let mut logger = ClassificationLogger::new(path_str).unwrap();
        for (title, hint) in TITLES {
            let outcome = classifier.classify(title, *hint);
            direct.record(outcome.as_ref());
            logger.log_classification(title, *hint, outcome.as_ref()).unwrap();
        }
        drop(logger);

        let from_log = summarize_log(path_str).unwrap();
        assert_eq!(from_log, direct);
        assert_eq!(direct.total, 4);
        assert_eq!(direct.classified, 3);
        assert_eq!(direct.suppressed(), 1);
        assert_eq!(direct.by_source.get("last_resort"), Some(&1));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_aggregate_adds_counts() {
        let mut a = BatchSummary::default();
        a.record(None);
        let mut b = BatchSummary {
            total: 2,
            classified: 2,
            confidence_sum: 150.0,
            ..Default::default()
        };
        b.by_material.insert("cotton".to_string(), 2);

        let combined = aggregate(vec![a, b]);
        assert_eq!(combined.total, 3);
        assert_eq!(combined.classified, 2);
        assert_eq!(combined.mean_confidence(), 75.0);
        assert_eq!(combined.by_material["cotton"], 2);
        assert!((combined.coverage() - 2.0 / 3.0).abs() < 1e-9);
    }
}
