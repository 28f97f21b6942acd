//! Template repository loading

use crate::error::CatalogError;
use crate::model::CalculationTemplate;
use std::fs;
use std::path::{Path, PathBuf};

/// One repository record: a decoded template, or why it could not be decoded
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateRecord {
    Parsed(CalculationTemplate),
    Malformed { id: String, message: String },
}

/// Source of the raw, unfiltered template collection
pub trait TemplateRepository {
    /// One-shot fetch of every record. No retries. A record with a bad shape
    /// comes back as `TemplateRecord::Malformed`; only an unreadable source
    /// or a top level that is not a sequence fails the whole fetch.
    fn fetch_templates(&self) -> Result<Vec<TemplateRecord>, CatalogError>;
}

/// Templates stored in a JSON array or a YAML sequence on disk
#[derive(Debug, Clone)]
pub struct FileTemplateRepository {
    path: PathBuf,
}

impl FileTemplateRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_yaml(&self) -> bool {
        matches!(
            self.path.extension().and_then(|ext| ext.to_str()),
            Some("yaml") | Some("yml")
        )
    }
}

impl TemplateRepository for FileTemplateRepository {
    fn fetch_templates(&self) -> Result<Vec<TemplateRecord>, CatalogError> {
        let contents =
            fs::read_to_string(&self.path).map_err(|e| CatalogError::RepositoryUnavailable {
                message: format!("Failed to read {}: {}", self.path.display(), e),
            })?;

        if self.is_yaml() {
            parse_yaml(&contents)
        } else {
            parse_json(&contents)
        }
    }
}

/// Parse a JSON array of templates, decoding each element on its own
pub fn parse_json(contents: &str) -> Result<Vec<TemplateRecord>, CatalogError> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(contents).map_err(|e| CatalogError::MalformedRepository {
            message: format!("Failed to parse templates JSON: {}", e),
        })?;

    Ok(decode_records(
        values,
        |value| value.get("id").and_then(|id| id.as_str()).map(str::to_string),
        |value| serde_json::from_value(value).map_err(|e| e.to_string()),
    ))
}

/// Parse a YAML sequence of templates, decoding each element on its own
pub fn parse_yaml(contents: &str) -> Result<Vec<TemplateRecord>, CatalogError> {
    let values: Vec<serde_yaml::Value> =
        serde_yaml::from_str(contents).map_err(|e| CatalogError::MalformedRepository {
            message: format!("Failed to parse templates YAML: {}", e),
        })?;

    Ok(decode_records(
        values,
        |value| value.get("id").and_then(|id| id.as_str()).map(str::to_string),
        |value| serde_yaml::from_value(value).map_err(|e| e.to_string()),
    ))
}

fn decode_records<V>(
    values: Vec<V>,
    id_of: impl Fn(&V) -> Option<String>,
    decode: impl Fn(V) -> Result<CalculationTemplate, String>,
) -> Vec<TemplateRecord> {
    values
        .into_iter()
        .enumerate()
        .map(|(idx, value)| {
            // Records without a usable id are named by position
            let id = id_of(&value).unwrap_or_else(|| format!("#{}", idx + 1));
            match decode(value) {
                Ok(template) => TemplateRecord::Parsed(template),
                Err(message) => TemplateRecord::Malformed { id, message },
            }
        })
        .collect()
}

/// Fixed in-memory collection, handy for hosts that already hold the data
#[derive(Debug, Clone, Default)]
pub struct StaticTemplateRepository {
    pub templates: Vec<CalculationTemplate>,
}

impl TemplateRepository for StaticTemplateRepository {
    fn fetch_templates(&self) -> Result<Vec<TemplateRecord>, CatalogError> {
        Ok(self
            .templates
            .iter()
            .cloned()
            .map(TemplateRecord::Parsed)
            .collect())
    }
}
