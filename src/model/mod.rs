//! Model layer - catalog data types
//!
//! This module contains the data the engine works on:
//! - `CalculationTemplate` / `TemplateParameter` - templates and their inputs
//! - `TemplateFilters` - per-query filter set
//! - `TemplateCategory` / `TemplateStats` - derived facets and aggregates
//! - `FavoritesStore` - favorites persistence
//! - `CatalogState` - everything the engine owns

pub mod category;
pub mod dependency_graph;
pub mod domain;
pub mod favorites;
pub mod filters;
pub mod parameter;
pub mod stats;
pub mod template;

// Re-export commonly used types
pub use category::{
    CategoryDefinition, SubcategoryDefinition, TemplateCategory, TemplateSubcategory,
};
pub use dependency_graph::DependencyGraph;
pub use domain::CatalogState;
pub use favorites::{FavoritesStore, JsonFavoritesStore, MemoryFavoritesStore, FAVORITES_KEY};
pub use filters::{SortBy, TemplateFilters};
pub use parameter::{
    Condition, DependencyAction, ParameterDependency, ParameterState, ParameterType,
    TemplateParameter,
};
pub use stats::TemplateStats;
pub use template::{CalculationTemplate, Difficulty};
