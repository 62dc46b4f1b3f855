use anyhow::{Context, Result};
use materialid_core::{
    analysis::{self, BatchSummary},
    logger::ClassificationLogger,
    Classification, LiveClassifier, MaterialClassifier, Taxonomy,
};
use serde::Deserialize;
use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// One row of a batch input file.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRow {
    pub title: String,
    #[serde(default)]
    pub material_hint: Option<String>,
}

/// Classifies a single product and prints the outcome.
pub fn run_classify(classifier: &MaterialClassifier, title: &str, hint: Option<&str>, as_json: bool) -> Result<()> {
    let outcome = classifier.classify(title, hint);
    if as_json {
        println!("{}", serde_json::to_string_pretty(&outcome).context("Failed to serialize classification")?);
        return Ok(());
    }
    match outcome {
        Some(classification) => print_classification(&classification, &classifier.related(classification.material())),
        None => println!("No confident material classification for '{}'.", title),
    }
    Ok(())
}

pub fn run_related(classifier: &MaterialClassifier, material: &str) {
    let related = classifier.related(material);
    if related.is_empty() {
        println!("No related materials for '{}'.", material);
        return;
    }
    println!("Related to '{}':", material);
    for name in related {
        println!("  - {}", name);
    }
}

/// Prints taxonomy statistics. Fails when the taxonomy holds no materials.
pub fn run_validate(taxonomy: &Taxonomy) -> Result<()> {
    let stats = taxonomy.stats();
    println!("\n--- [Taxonomy] schema {} ---", taxonomy.schema_version());
    println!("  - Materials:            {}", stats.materials);
    println!("  - Life-cycle records:   {}", stats.life_cycle_records);
    println!("  - Families:             {} ({} subcategories, {} members)", stats.families, stats.subcategories, stats.family_members);
    println!("  - Category rules:       {}", stats.category_rules);
    println!("  - Fallback hints:       {}", stats.fallbacks);
    println!("  - Last-resort words:    {}", stats.last_resort);
    if !stats.unresolved_members.is_empty() {
        println!("  - Members without a descriptor: {}", stats.unresolved_members.join(", "));
    }
    if taxonomy.is_empty() {
        anyhow::bail!("Taxonomy contains no materials");
    }
    println!("Taxonomy is valid.");
    Ok(())
}

/// Classifies every input file into a fresh run directory under
/// `output_root` and returns that directory.
///
/// Each input gets its own `<stem>_classifications.csv` log and a copy of
/// itself in the run directory. The taxonomy is refreshed before each file,
/// so edits made during a long run apply to the files that follow.
pub fn run_batch(live: &LiveClassifier, inputs: &[PathBuf], output_root: &Path) -> Result<PathBuf> {
    println!("\n--- [Workflow] Starting Batch Classification ---");

    let mut stems = BTreeSet::new();
    for input in inputs {
        if !stems.insert(input_stem(input)) {
            anyhow::bail!("Batch inputs must have distinct file names: {}", input.display());
        }
    }

    let run_dir = output_root.join(format!("run_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S")));
    fs::create_dir_all(&run_dir)
        .with_context(|| format!("Failed to create output directory: {}", run_dir.display()))?;

    let mut per_input = Vec::with_capacity(inputs.len());
    for input in inputs {
        match live.refresh() {
            Ok(true) => println!("Taxonomy changed on disk; reloaded before {}", input.display()),
            Ok(false) => {}
            Err(e) => warn!("Taxonomy reload failed, keeping the previous one: {}", e),
        }
        let summary = classify_input(&live.current(), input, &run_dir)?;
        per_input.push((input_stem(input), summary));
    }

    println!("\n--- [Workflow] Aggregating Reports ---");
    let combined = analysis::aggregate(per_input.iter().map(|(_, summary)| summary.clone()).collect());
    fs::write(run_dir.join("summary.md"), render_summary_markdown(&combined, &per_input))
        .with_context(|| format!("Failed to write summary into {}", run_dir.display()))?;

    print_summary_report(&combined);
    Ok(run_dir)
}

fn input_stem(input: &Path) -> String {
    input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("products")
        .to_string()
}

fn classify_input(classifier: &MaterialClassifier, input: &Path, run_dir: &Path) -> Result<BatchSummary> {
    println!("\nClassifying: {}", input.display());

    // Keep the input next to its results for traceability.
    let input_name = input.file_name().map_or_else(|| "products.csv".into(), |n| n.to_owned());
    fs::copy(input, run_dir.join(input_name))
        .with_context(|| format!("Failed to copy {} into the run directory", input.display()))?;

    let log_path = run_dir.join(format!("{}_classifications.csv", input_stem(input)));
    let log_path_str = log_path.to_str().context("Output path is not valid UTF-8")?;
    let mut logger = ClassificationLogger::new(log_path_str)
        .with_context(|| format!("Failed to create {}", log_path.display()))?;

    let mut reader =
        csv::Reader::from_path(input).with_context(|| format!("Failed to open batch input: {}", input.display()))?;
    let mut rows = 0usize;
    for (line, record) in reader.deserialize::<ProductRow>().enumerate() {
        let row = match record {
            Ok(row) => row,
            Err(e) => {
                warn!("Skipping row {} of {}: {}", line + 1, input.display(), e);
                continue;
            }
        };
        let outcome = classifier.classify(&row.title, row.material_hint.as_deref());
        debug!(title = %row.title, material = ?outcome.as_ref().map(|c| c.material()), "classified");
        logger.log_classification(&row.title, row.material_hint.as_deref(), outcome.as_ref())?;
        rows += 1;
    }
    logger.into_inner()?;
    info!("Classified {} rows from {}", rows, input.display());

    Ok(analysis::summarize_log(log_path_str)?)
}

fn print_classification(classification: &Classification, related: &[String]) {
    let result = &classification.result;
    println!("Material:    {}", result.material);
    println!("Confidence:  {:.0}% ({})", result.confidence, result.source);
    if let (Some(family), Some(subcategory)) = (&result.family, &result.subcategory) {
        println!("Family:      {} / {}", family, subcategory);
    }
    if let Some(base_of) = &result.base_of {
        println!("Base of:     {}", base_of);
    }
    println!("Impact:      {}", classification.descriptor.impact);
    match classification.descriptor.recyclable {
        Some(true) => println!("Recyclable:  yes"),
        Some(false) => println!("Recyclable:  no"),
        None => {}
    }
    println!("Summary:     {}", classification.descriptor.summary);
    if !related.is_empty() {
        println!("Related:     {}", related.join(", "));
    }
}

fn render_summary_markdown(summary: &BatchSummary, per_input: &[(String, BatchSummary)]) -> String {
    let mut report = String::from("# Batch classification summary\n\n");
    report.push_str("| Metric | Value |\n");
    report.push_str("|--------|-------|\n");
    report.push_str(&format!("| Products | {} |\n", summary.total));
    report.push_str(&format!("| Classified | {} ({:.1}%) |\n", summary.classified, summary.coverage() * 100.0));
    report.push_str(&format!("| Suppressed | {} |\n", summary.suppressed()));
    report.push_str(&format!("| Mean confidence | {:.1} |\n", summary.mean_confidence()));
    report.push_str(&format!("| Recyclable | {} |\n", summary.recyclable));

    if per_input.len() > 1 {
        report.push_str("\n| Input | Products | Classified | Suppressed | Mean confidence |\n");
        report.push_str("|---|---|---|---|---|\n");
        for (name, input) in per_input {
            report.push_str(&format!(
                "| {} | {} | {} | {} | {:.1} |\n",
                name,
                input.total,
                input.classified,
                input.suppressed(),
                input.mean_confidence()
            ));
        }
    }

    for (heading, counts) in [
        ("Material", &summary.by_material),
        ("Match stage", &summary.by_source),
        ("Impact", &summary.by_impact),
    ] {
        if counts.is_empty() {
            continue;
        }
        report.push_str(&format!("\n| {} | Count |\n", heading));
        report.push_str("|---|---|\n");
        for (name, count) in counts {
            report.push_str(&format!("| {} | {} |\n", name, count));
        }
    }
    report
}

fn print_summary_report(summary: &BatchSummary) {
    println!("\n\n--- [Batch Summary Report] ---");
    println!("========================================");
    println!("  - Products:        {}", summary.total);
    println!("  - Classified:      {} ({:.1}%)", summary.classified, summary.coverage() * 100.0);
    println!("  - Suppressed:      {}", summary.suppressed());
    println!("  - Mean confidence: {:.1}", summary.mean_confidence());
    println!("  - Recyclable:      {}", summary.recyclable);
    println!("----------------------------------------");
    println!("\nBy match stage:");
    for (source, count) in &summary.by_source {
        println!("  - {:<12} {:>5}", source, count);
    }
    println!("\nTop materials:");
    let mut materials: Vec<_> = summary.by_material.iter().collect();
    materials.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (material, count) in materials.into_iter().take(10) {
        println!("  - {:<20} {:>5}", material, count);
    }
    println!("========================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use materialid_core::TaxonomyStore;

    fn bundled_live() -> LiveClassifier {
        LiveClassifier::new(TaxonomyStore::with_taxonomy(Taxonomy::bundled().unwrap())).unwrap()
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!("materialid-batch-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(&root).unwrap();
        root
    }

    #[test]
    fn test_batch_run_writes_log_summary_and_input_copy() {
        let root = scratch_dir("single");
        let input = root.join("products.csv");
        fs::write(
            &input,
            "title,material_hint\nSony WH-1000XM4 Headphones,\nPremium Leather Backpack,genuine leather\nMystery Gadget XJ-9,unknown\n",
        )
        .unwrap();

        let run_dir = run_batch(&bundled_live(), &[input], &root.join("runs")).unwrap();

        assert!(run_dir.join("products.csv").exists());
        let log = run_dir.join("products_classifications.csv");
        let summary = analysis::summarize_log(log.to_str().unwrap()).unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.classified, 2);
        let markdown = fs::read_to_string(run_dir.join("summary.md")).unwrap();
        assert!(markdown.contains("| Suppressed | 1 |"));
        assert!(!markdown.contains("| Input |"));

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_batch_aggregates_several_inputs() {
        let root = scratch_dir("multi");
        let kitchen = root.join("kitchen.csv");
        let apparel = root.join("apparel.csv");
        fs::write(&kitchen, "title,material_hint\nCast Iron Skillet,\nMystery Gadget XJ-9,unknown\n").unwrap();
        fs::write(&apparel, "title,material_hint\nOrganic Cotton T-Shirt,\n").unwrap();

        let run_dir = run_batch(&bundled_live(), &[kitchen, apparel], &root.join("runs")).unwrap();

        assert!(run_dir.join("kitchen_classifications.csv").exists());
        assert!(run_dir.join("apparel_classifications.csv").exists());
        let markdown = fs::read_to_string(run_dir.join("summary.md")).unwrap();
        assert!(markdown.contains("| Products | 3 |"));
        assert!(markdown.contains("| Suppressed | 1 |"));
        assert!(markdown.contains("| kitchen | 2 | 1 | 1 |"));
        assert!(markdown.contains("| apparel | 1 | 1 | 0 |"));

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_duplicate_input_names_are_rejected() {
        let root = scratch_dir("dupes");
        let a = root.join("a");
        let b = root.join("b");
        fs::create_dir_all(&a).unwrap();
        fs::create_dir_all(&b).unwrap();
        let inputs = [a.join("products.csv"), b.join("products.csv")];
        for input in &inputs {
            fs::write(input, "title,material_hint\nCork Board,\n").unwrap();
        }

        assert!(run_batch(&bundled_live(), &inputs, &root.join("runs")).is_err());
        assert!(!root.join("runs").exists());

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_unclassified_batch_omits_breakdowns() {
        let mut summary = BatchSummary::default();
        summary.record(None);
        let markdown = render_summary_markdown(&summary, &[]);
        assert!(markdown.contains("| Products | 1 |"));
        assert!(!markdown.contains("Match stage"));
    }
}
