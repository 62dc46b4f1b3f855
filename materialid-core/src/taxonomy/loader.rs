use crate::error::MaterialIdError;
use materialid_schemas::file_formats::TaxonomyFile;
use std::{fs, path::Path};
use tracing::{debug, info};

/// Loads a taxonomy source from a single file or a directory of files.
pub fn load_source<P: AsRef<Path>>(path: P) -> Result<TaxonomyFile, MaterialIdError> {
    let path = path.as_ref();
    if path.is_dir() {
        load_taxonomy_dir(path)
    } else {
        load_taxonomy_file(path)
    }
}

/// Parses one `.yaml`, `.yml` or `.json` taxonomy file.
pub fn load_taxonomy_file<P: AsRef<Path>>(path: P) -> Result<TaxonomyFile, MaterialIdError> {
    let path = path.as_ref();
    let origin = path.display().to_string();
    let format = SourceFormat::of(path).ok_or_else(|| MaterialIdError::UnsupportedSource(origin.clone()))?;

    let content = fs::read_to_string(path).map_err(|e| MaterialIdError::FileIO(origin.clone(), e))?;
    debug!("Parsing taxonomy file {}", origin);

    match format {
        SourceFormat::Yaml => {
            serde_yaml::from_str(&content).map_err(|e| MaterialIdError::YamlParsing(origin, e))
        }
        SourceFormat::Json => {
            serde_json::from_str(&content).map_err(|e| MaterialIdError::JsonParsing(origin, e))
        }
    }
}

/// Merges every taxonomy file in `dir_path` into one source.
///
/// Files are visited in lexicographic path order so the merged family and
/// rule order does not depend on the platform's directory listing.
pub fn load_taxonomy_dir<P: AsRef<Path>>(dir_path: P) -> Result<TaxonomyFile, MaterialIdError> {
    let dir_path = dir_path.as_ref();
    let origin = dir_path.display().to_string();

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir_path).map_err(|e| MaterialIdError::FileIO(origin.clone(), e))? {
        let entry = entry.map_err(|e| MaterialIdError::FileIO(origin.clone(), e))?;
        let path = entry.path();
        if path.is_file() && SourceFormat::of(&path).is_some() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut merged = TaxonomyFile::default();
    for path in &paths {
        merged.merge(load_taxonomy_file(path)?);
    }

    info!("Merged {} taxonomy files from '{}'", paths.len(), origin);
    Ok(merged)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceFormat {
    Yaml,
    Json,
}

impl SourceFormat {
    fn of(path: &Path) -> Option<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Some(Self::Yaml),
            Some("json") => Some(Self::Json),
            _ => None,
        }
    }
}
