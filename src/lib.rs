//! calc-templates - calculation template catalog for construction engineering
//!
//! Filters, sorts and facets a catalog of engineering calculation templates,
//! validates parameter values against their schema and resolves the
//! show/hide/require/disable rules between parameters.

pub mod config;
pub mod error;
pub mod model;
pub mod services;

pub use config::CatalogConfig;
pub use error::{CatalogError, SchemaError, ValueError};
pub use model::{
    CalculationTemplate, Difficulty, ParameterState, SortBy, TemplateCategory, TemplateFilters,
    TemplateParameter, TemplateStats,
};
pub use services::{
    resolve_states, validate_inputs, validate_value, CatalogEngine, TemplateRepository,
    ValidationOutcome,
};
