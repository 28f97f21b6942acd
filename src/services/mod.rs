//! Catalog services
//!
//! This module contains the behaviour built on the model layer:
//! - Parameter schema validation and template load checks
//! - Dependency resolution for parameter forms
//! - Catalog filtering, sorting and facets
//! - Template repository access
//! - The catalog engine tying them together

pub mod catalog;
pub mod dependency;
pub mod query;
pub mod repository;
pub mod schema;

pub use catalog::CatalogEngine;
pub use dependency::{default_values, resolve_states, validate_inputs, FormReport, InputValues};
pub use query::{compare_by, compare_names, compute_facets, filter_templates, sort_templates};
pub use repository::{
    FileTemplateRepository, StaticTemplateRepository, TemplateRecord, TemplateRepository,
};
pub use schema::{
    check_template, is_valid_parameter_name, load_records, load_templates, validate_value,
    LoadReport, RejectedTemplate, ValidationOutcome,
};
