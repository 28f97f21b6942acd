//! Catalog Query Engine
//!
//! Owns the loaded template collection and the favorites set. Loading from
//! the repository is the only fallible boundary; queries never fail.

use super::query::{all_professions, all_tags, compute_facets, filter_templates, sort_templates};
use super::repository::{TemplateRecord, TemplateRepository};
use super::schema::{load_records, LoadReport};
use crate::config::{default_categories, CatalogConfig};
use crate::error::CatalogError;
use crate::model::{
    CalculationTemplate, CatalogState, CategoryDefinition, FavoritesStore, SortBy,
    TemplateCategory, TemplateFilters, TemplateStats,
};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

pub struct CatalogEngine {
    state: CatalogState,
    store: Box<dyn FavoritesStore>,
    default_sort: SortBy,
}

impl CatalogEngine {
    /// Create an empty engine with the built-in categories, loading the
    /// favorites set once.
    pub fn new(store: Box<dyn FavoritesStore>) -> Self {
        Self::with_categories(store, default_categories())
    }

    /// Create an engine using the categories from `config`
    pub fn from_config(config: &CatalogConfig, store: Box<dyn FavoritesStore>) -> Self {
        let mut engine = Self::with_categories(store, config.categories.clone());
        engine.default_sort = config.default_sort;
        engine
    }

    pub fn with_categories(
        store: Box<dyn FavoritesStore>,
        categories: Vec<CategoryDefinition>,
    ) -> Self {
        let favorites = match store.load() {
            Ok(ids) => ids,
            Err(error) => {
                warn!(%error, "starting with no favorites");
                BTreeSet::new()
            }
        };

        let mut engine = Self {
            state: CatalogState::new(categories, favorites),
            store,
            default_sort: SortBy::default(),
        };
        engine.refresh_facets();
        engine
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Loading
    // ─────────────────────────────────────────────────────────────────────────

    /// Fetch the collection from `repository`. Records that fail to decode or
    /// check are reported as rejected; only a failed fetch empties the
    /// catalog and returns the error.
    pub fn reload(
        &mut self,
        repository: &dyn TemplateRepository,
    ) -> Result<LoadReport, CatalogError> {
        match repository.fetch_templates() {
            Ok(records) => Ok(self.install(load_records(records))),
            Err(error) => {
                warn!(%error, "template repository failed, catalog is empty");
                self.state.templates.clear();
                self.refresh_facets();
                Err(error)
            }
        }
    }

    /// Check `templates` and make the valid ones the new collection
    pub fn replace_templates(&mut self, templates: Vec<CalculationTemplate>) -> LoadReport {
        self.install(load_records(
            templates.into_iter().map(TemplateRecord::Parsed).collect(),
        ))
    }

    fn install(&mut self, mut report: LoadReport) -> LoadReport {
        self.state.templates = report.accepted.clone();
        self.state.merge_favorites();
        self.refresh_facets();

        // Hand back the merged view
        report.accepted = self.state.templates.clone();
        info!(
            templates = self.state.templates.len(),
            favorites = self.state.favorites.len(),
            "catalog loaded"
        );
        report
    }

    fn refresh_facets(&mut self) {
        self.state.facets = compute_facets(&self.state.templates, &self.state.categories);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Filter and sort the collection
    pub fn get_filtered_templates(&self, filters: &TemplateFilters) -> Vec<CalculationTemplate> {
        let mut result = filter_templates(&self.state.templates, filters);
        sort_templates(&mut result, filters.sort_by);
        debug!(
            matched = result.len(),
            sort = ?filters.sort_by,
            "catalog query"
        );
        result.into_iter().cloned().collect()
    }

    /// Empty filter set carrying the configured default ordering
    pub fn default_filters(&self) -> TemplateFilters {
        TemplateFilters::default().sort_by(self.default_sort)
    }

    /// Every loaded template, in repository order
    pub fn templates(&self) -> &[CalculationTemplate] {
        &self.state.templates
    }

    pub fn template(&self, id: &str) -> Option<&CalculationTemplate> {
        self.state.templates.iter().find(|t| t.id == id)
    }

    /// Category facets over the verified collection
    pub fn categories(&self) -> &[TemplateCategory] {
        &self.state.facets
    }

    pub fn all_tags(&self) -> Vec<String> {
        all_tags(&self.state.templates)
    }

    pub fn all_professions(&self) -> Vec<String> {
        all_professions(&self.state.templates)
    }

    /// Stats over the whole collection
    pub fn stats(&self) -> TemplateStats {
        TemplateStats::from_templates(&self.state.templates)
    }

    /// Stats over an arbitrary list, e.g. a query result
    pub fn get_template_stats(&self, list: &[CalculationTemplate]) -> TemplateStats {
        TemplateStats::from_templates(list)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Favorites
    // ─────────────────────────────────────────────────────────────────────────

    pub fn is_favorite(&self, id: &str) -> bool {
        self.state.favorites.contains(id)
    }

    pub fn favorites(&self) -> &BTreeSet<String> {
        &self.state.favorites
    }

    /// Flip `id` in the favorites set and persist it. Returns the new state.
    /// If persisting fails the flip is undone.
    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool, CatalogError> {
        let now_favorite = if self.state.favorites.remove(id) {
            false
        } else {
            self.state.favorites.insert(id.to_string());
            true
        };

        if let Err(error) = self.store.save(&self.state.favorites) {
            warn!(template = id, %error, "failed to persist favorites");
            if now_favorite {
                self.state.favorites.remove(id);
            } else {
                self.state.favorites.insert(id.to_string());
            }
            return Err(error);
        }

        if let Some(template) = self.state.templates.iter_mut().find(|t| t.id == id) {
            template.is_favorite = now_favorite;
        }
        debug!(template = id, favorite = now_favorite, "favorite toggled");
        Ok(now_favorite)
    }
}
