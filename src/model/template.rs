//! Data models for calculation templates

use super::parameter::TemplateParameter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Engineering effort level of a template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Basic,
    Intermediate,
    Advanced,
}

/// A reusable definition of an engineering calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub profession: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub difficulty: Difficulty,
    /// Citation to the Ecuadorian construction code (NEC)
    #[serde(default)]
    pub nec_reference: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub usage_count: u64,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub trending: bool,
    #[serde(default)]
    pub popular: bool,
    /// Set by the external review process, never changed here
    #[serde(default)]
    pub verified: bool,
    /// Derived per user from the favorites set at read time
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub parameters: Vec<TemplateParameter>,
}

impl CalculationTemplate {
    /// Whether the lowercase `term` occurs in the name, description, any tag
    /// or the NEC reference
    pub fn matches_search(&self, term: &str) -> bool {
        let contains = |field: &str| field.to_lowercase().contains(term);
        contains(&self.name)
            || contains(&self.description)
            || self.tags.iter().any(|tag| contains(tag))
            || self.nec_reference.as_deref().is_some_and(contains)
    }
}
