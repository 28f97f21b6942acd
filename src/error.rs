//! Error taxonomy for the template catalog
//!
//! - `SchemaError` - a template authored incorrectly (InvalidSchema), fatal
//!   for that template at load time
//! - `ValueError` - a field-scoped validation failure for one input value
//! - `CatalogError` - failures talking to the repository or favorites store

/// Reasons a template definition is rejected at load time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("select parameter '{parameter}' declares no options")]
    EmptyOptions { parameter: String },

    #[error("parameter '{parameter}' depends on unknown parameter '{depends_on}'")]
    UnknownDependency {
        parameter: String,
        depends_on: String,
    },

    #[error("parameter '{parameter}' depends on itself")]
    SelfDependency { parameter: String },

    #[error("dependency cycle: {}", path.join(" -> "))]
    DependencyCycle { path: Vec<String> },

    #[error("parameter name '{name}' is not a valid identifier")]
    InvalidName { name: String },

    #[error("parameter id '{id}' is declared more than once")]
    DuplicateParameterId { id: String },

    #[error("parameter name '{name}' is declared more than once")]
    DuplicateParameterName { name: String },

    #[error("parameter '{parameter}' has min {min} greater than max {max}")]
    InvertedRange { parameter: String, min: f64, max: f64 },

    #[error("default value of parameter '{parameter}' is invalid: {source}")]
    InvalidDefault {
        parameter: String,
        #[source]
        source: ValueError,
    },

    #[error("rating {rating} is outside 0..=5")]
    RatingOutOfRange { rating: f64 },

    #[error("template id '{id}' is declared more than once")]
    DuplicateTemplateId { id: String },

    #[error("template record could not be decoded: {message}")]
    Malformed { message: String },
}

/// A single parameter value failing its declared type or constraints.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueError {
    #[error("'{parameter}' is required")]
    MissingRequired { parameter: String },

    #[error("'{parameter}' expects a {expected} value")]
    TypeMismatch {
        parameter: String,
        expected: &'static str,
    },

    #[error("'{parameter}' must be within {}..={}", fmt_bound(.min), fmt_bound(.max))]
    OutOfRange {
        parameter: String,
        value: f64,
        min: Option<f64>,
        max: Option<f64>,
    },

    #[error("'{parameter}' must be one of the declared options")]
    NotAnOption { parameter: String, value: String },
}

impl ValueError {
    /// Name of the parameter the failure belongs to
    pub fn parameter(&self) -> &str {
        match self {
            Self::MissingRequired { parameter }
            | Self::TypeMismatch { parameter, .. }
            | Self::OutOfRange { parameter, .. }
            | Self::NotAnOption { parameter, .. } => parameter,
        }
    }
}

fn fmt_bound(bound: &Option<f64>) -> String {
    bound.map(|b| b.to_string()).unwrap_or_default()
}

/// Failures of the external collaborators.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("template repository unavailable: {message}")]
    RepositoryUnavailable { message: String },

    #[error("template repository returned malformed data: {message}")]
    MalformedRepository { message: String },

    #[error("favorites store unavailable: {message}")]
    FavoritesUnavailable { message: String },
}
