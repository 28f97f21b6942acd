//! Data models for template input parameters and their dependency rules

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declared type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    Number,
    Select,
    Text,
    Boolean,
    Date,
}

impl ParameterType {
    /// Human readable type name used in validation messages
    pub fn label(&self) -> &'static str {
        match self {
            ParameterType::Number => "number",
            ParameterType::Select => "select",
            ParameterType::Text => "text",
            ParameterType::Boolean => "boolean",
            ParameterType::Date => "date",
        }
    }
}

/// Effect a matching dependency rule has on its target parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyAction {
    Show,
    Hide,
    Require,
    Disable,
}

/// Predicate evaluated against the source parameter's current value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operator", content = "value", rename_all = "camelCase")]
pub enum Condition {
    Equals(Value),
    NotEquals(Value),
    In(Vec<Value>),
    NotIn(Vec<Value>),
    GreaterThan(f64),
    LessThan(f64),
    IsSet,
    IsEmpty,
    Truthy,
}

impl Condition {
    /// Evaluate the condition. `None` means the source has no value yet.
    pub fn matches(&self, value: Option<&Value>) -> bool {
        let value = value.filter(|v| !v.is_null());
        match self {
            Condition::Equals(expected) => value.is_some_and(|v| loose_eq(v, expected)),
            Condition::NotEquals(expected) => !value.is_some_and(|v| loose_eq(v, expected)),
            Condition::In(candidates) => {
                value.is_some_and(|v| candidates.iter().any(|c| loose_eq(v, c)))
            }
            Condition::NotIn(candidates) => {
                !value.is_some_and(|v| candidates.iter().any(|c| loose_eq(v, c)))
            }
            Condition::GreaterThan(bound) => {
                value.and_then(Value::as_f64).is_some_and(|n| n > *bound)
            }
            Condition::LessThan(bound) => {
                value.and_then(Value::as_f64).is_some_and(|n| n < *bound)
            }
            Condition::IsSet => value.is_some_and(|v| !is_blank(v)),
            Condition::IsEmpty => value.map_or(true, is_blank),
            Condition::Truthy => value.is_some_and(is_truthy),
        }
    }
}

/// Equality that treats `5` and `5.0` as the same number
fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) if a.is_number() && b.is_number() => x == y,
        _ => a == b,
    }
}

/// Null or an empty (whitespace only) string
pub(crate) fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A rule making the owning parameter react to another parameter's value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDependency {
    /// `name` of the source parameter
    pub depends_on: String,
    pub condition: Condition,
    pub action: DependencyAction,
}

/// A single named, typed input slot on a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateParameter {
    pub id: String,
    /// Identifier the formula refers to
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default_value: Option<Value>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<ParameterDependency>,
}

impl TemplateParameter {
    /// Label with the unit appended, e.g. "Span (m)"
    pub fn display_label(&self) -> String {
        match &self.unit {
            Some(unit) if !unit.is_empty() => format!("{} ({})", self.label, unit),
            _ => self.label.clone(),
        }
    }
}

/// Resolved presentation state of one parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterState {
    pub visible: bool,
    pub required: bool,
    pub enabled: bool,
}
