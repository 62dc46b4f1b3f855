use crate::classifier::Classification;
use csv::Writer;
use serde::{Deserialize, Serialize};
use std::{fs, io};

/// One row of a batch classification log. Unclassified rows leave the
/// result columns empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub title: String,
    pub material_hint: String,
    pub material: String,
    pub confidence: Option<f64>,
    pub source: String,
    pub is_specific: Option<bool>,
    pub family: String,
    pub subcategory: String,
    pub impact: String,
    pub recyclable: Option<bool>,
    pub summary: String,
}

impl LogEntry {
    pub fn new(title: &str, hint: Option<&str>, outcome: Option<&Classification>) -> Self {
        let mut entry = Self {
            title: title.to_string(),
            material_hint: hint.unwrap_or_default().to_string(),
            material: String::new(),
            confidence: None,
            source: String::new(),
            is_specific: None,
            family: String::new(),
            subcategory: String::new(),
            impact: String::new(),
            recyclable: None,
            summary: String::new(),
        };
        if let Some(classification) = outcome {
            let result = &classification.result;
            entry.material = result.material.clone();
            entry.confidence = Some(result.confidence);
            entry.source = result.source.to_string();
            entry.is_specific = Some(result.is_specific);
            entry.family = result.family.clone().unwrap_or_default();
            entry.subcategory = result.subcategory.clone().unwrap_or_default();
            entry.impact = classification.descriptor.impact.to_string();
            entry.recyclable = classification.descriptor.recyclable;
            entry.summary = classification.descriptor.summary.clone();
        }
        entry
    }

    pub fn is_classified(&self) -> bool {
        !self.material.is_empty()
    }
}

pub struct ClassificationLogger<W: io::Write = fs::File> {
    writer: Writer<W>,
}

impl ClassificationLogger<fs::File> {
    pub fn new(path: &str) -> Result<Self, io::Error> {
        let writer = Writer::from_path(path)?;
        Ok(Self { writer })
    }
}

impl<W: io::Write> ClassificationLogger<W> {
    pub fn from_writer(writer: W) -> Self {
        Self {
            writer: Writer::from_writer(writer),
        }
    }

    pub fn log_classification(
        &mut self,
        title: &str,
        hint: Option<&str>,
        outcome: Option<&Classification>,
    ) -> Result<(), anyhow::Error> {
        self.writer.serialize(LogEntry::new(title, hint, outcome))?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W, anyhow::Error> {
        self.writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("failed to flush classification log: {}", e.error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MaterialClassifier, Taxonomy};
    use std::sync::Arc;

    #[test]
    fn test_rows_for_classified_and_unclassified() {
        let classifier = MaterialClassifier::new(Arc::new(Taxonomy::bundled().unwrap())).unwrap();
        let mut logger = ClassificationLogger::from_writer(Vec::new());

        let hit = classifier.classify("Cast Iron Skillet", None);
        logger.log_classification("Cast Iron Skillet", None, hit.as_ref()).unwrap();
        logger.log_classification("Mystery Gadget XJ-9", Some("unknown"), None).unwrap();

        let bytes = logger.into_inner().unwrap();
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let rows: Vec<LogEntry> = reader.deserialize().collect::<Result<_, _>>().unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].material, "cast iron");
        assert_eq!(rows[0].source, "fuzzy_title");
        assert_eq!(rows[0].family, "");
        assert!(rows[0].is_classified());
        assert_eq!(rows[1].material_hint, "unknown");
        assert_eq!(rows[1].confidence, None);
        assert!(!rows[1].is_classified());
    }
}
