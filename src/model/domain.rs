//! Catalog state owned by the engine

use super::category::{CategoryDefinition, TemplateCategory};
use super::template::CalculationTemplate;
use std::collections::BTreeSet;

/// Source collection, favorites set and the facets derived from them
#[derive(Debug, Default)]
pub struct CatalogState {
    /// Templates that passed the load checks, favorites merged in
    pub templates: Vec<CalculationTemplate>,

    /// Per-user favorite template ids
    pub favorites: BTreeSet<String>,

    /// Known categories, in sidebar order
    pub categories: Vec<CategoryDefinition>,

    /// Facet counts, recomputed whenever `templates` changes
    pub facets: Vec<TemplateCategory>,
}

impl CatalogState {
    pub fn new(categories: Vec<CategoryDefinition>, favorites: BTreeSet<String>) -> Self {
        Self {
            templates: Vec::new(),
            favorites,
            categories,
            facets: Vec::new(),
        }
    }

    /// Write `isFavorite` onto every template from the favorites set
    pub fn merge_favorites(&mut self) {
        for template in &mut self.templates {
            template.is_favorite = self.favorites.contains(&template.id);
        }
    }
}
