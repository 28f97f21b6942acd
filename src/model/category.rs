//! Category definitions and facet counts

use serde::{Deserialize, Serialize};

/// A subcategory known to the catalog configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcategoryDefinition {
    pub id: String,
    pub name: String,
}

/// A category known to the catalog configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub subcategories: Vec<SubcategoryDefinition>,
}

impl CategoryDefinition {
    pub fn new(id: &str, name: &str, subcategories: &[(&str, &str)]) -> Self {
        CategoryDefinition {
            id: id.to_string(),
            name: name.to_string(),
            subcategories: subcategories
                .iter()
                .map(|(id, name)| SubcategoryDefinition {
                    id: id.to_string(),
                    name: name.to_string(),
                })
                .collect(),
        }
    }
}

/// Subcategory facet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSubcategory {
    pub id: String,
    pub name: String,
    pub count: usize,
}

/// Category facet with its subcategory facets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateCategory {
    pub id: String,
    pub name: String,
    pub count: usize,
    pub subcategories: Vec<TemplateSubcategory>,
}

impl TemplateCategory {
    pub fn subcategory(&self, id: &str) -> Option<&TemplateSubcategory> {
        self.subcategories.iter().find(|s| s.id == id)
    }
}
