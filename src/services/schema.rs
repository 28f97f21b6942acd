//! Parameter schema validation
//!
//! Two layers:
//! - `validate_value` checks one candidate value against a parameter
//! - `check_template` / `load_templates` / `load_records` reject badly
//!   authored templates

use super::repository::TemplateRecord;
use crate::error::{SchemaError, ValueError};
use crate::model::parameter::{is_blank, ParameterType, TemplateParameter};
use crate::model::{CalculationTemplate, DependencyGraph};
use chrono::{DateTime, NaiveDate};
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::{info, warn};

/// Outcome of validating a single value
pub type ValidationOutcome = Result<(), ValueError>;

fn identifier_regex() -> &'static Regex {
    static IDENTIFIER: OnceLock<Regex> = OnceLock::new();
    IDENTIFIER.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"))
}

/// Whether `name` can be referenced from a formula
pub fn is_valid_parameter_name(name: &str) -> bool {
    identifier_regex().is_match(name)
}

/// Validate `value` (`None` when the input was never given) against the
/// parameter's declared type and constraints.
pub fn validate_value(parameter: &TemplateParameter, value: Option<&Value>) -> ValidationOutcome {
    validate_with_required(parameter, value, parameter.required)
}

/// Same as `validate_value` with the required flag supplied by the caller,
/// used when dependency rules changed it.
pub(crate) fn validate_with_required(
    parameter: &TemplateParameter,
    value: Option<&Value>,
    required: bool,
) -> ValidationOutcome {
    let value = match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(v) => Some(v),
    };

    let Some(value) = value else {
        return if required {
            Err(missing_required(parameter))
        } else {
            Ok(())
        };
    };

    match parameter.param_type {
        ParameterType::Number => check_number(parameter, value),
        ParameterType::Select => check_select(parameter, value),
        ParameterType::Text => check_text(parameter, value, required),
        ParameterType::Boolean => match value {
            Value::Bool(_) => Ok(()),
            _ => Err(type_mismatch(parameter)),
        },
        ParameterType::Date => check_date(parameter, value),
    }
}

fn missing_required(parameter: &TemplateParameter) -> ValueError {
    ValueError::MissingRequired {
        parameter: parameter.name.clone(),
    }
}

fn type_mismatch(parameter: &TemplateParameter) -> ValueError {
    ValueError::TypeMismatch {
        parameter: parameter.name.clone(),
        expected: parameter.param_type.label(),
    }
}

fn check_number(parameter: &TemplateParameter, value: &Value) -> ValidationOutcome {
    // Numeric strings are rejected; coercion is the caller's job
    let number = value.as_f64().ok_or_else(|| type_mismatch(parameter))?;

    let below = parameter.min.is_some_and(|min| number < min);
    let above = parameter.max.is_some_and(|max| number > max);
    if below || above {
        return Err(ValueError::OutOfRange {
            parameter: parameter.name.clone(),
            value: number,
            min: parameter.min,
            max: parameter.max,
        });
    }
    Ok(())
}

fn check_select(parameter: &TemplateParameter, value: &Value) -> ValidationOutcome {
    let choice = value.as_str().ok_or_else(|| type_mismatch(parameter))?;
    if parameter.options.iter().any(|option| option == choice) {
        Ok(())
    } else {
        Err(ValueError::NotAnOption {
            parameter: parameter.name.clone(),
            value: choice.to_string(),
        })
    }
}

fn check_text(parameter: &TemplateParameter, value: &Value, required: bool) -> ValidationOutcome {
    let text = value.as_str().ok_or_else(|| type_mismatch(parameter))?;
    if required && text.trim().is_empty() {
        return Err(missing_required(parameter));
    }
    Ok(())
}

fn check_date(parameter: &TemplateParameter, value: &Value) -> ValidationOutcome {
    let raw = value.as_str().ok_or_else(|| type_mismatch(parameter))?;
    parse_date(raw)
        .map(|_| ())
        .ok_or_else(|| type_mismatch(parameter))
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Check a template definition; any error makes it unloadable
pub fn check_template(template: &CalculationTemplate) -> Result<(), SchemaError> {
    if !(0.0..=5.0).contains(&template.rating) {
        return Err(SchemaError::RatingOutOfRange {
            rating: template.rating,
        });
    }

    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    for param in &template.parameters {
        check_parameter(param)?;
        if !ids.insert(param.id.as_str()) {
            return Err(SchemaError::DuplicateParameterId {
                id: param.id.clone(),
            });
        }
        if !names.insert(param.name.as_str()) {
            return Err(SchemaError::DuplicateParameterName {
                name: param.name.clone(),
            });
        }
    }

    for param in &template.parameters {
        for dep in &param.dependencies {
            if dep.depends_on == param.name {
                return Err(SchemaError::SelfDependency {
                    parameter: param.name.clone(),
                });
            }
            if !names.contains(dep.depends_on.as_str()) {
                return Err(SchemaError::UnknownDependency {
                    parameter: param.name.clone(),
                    depends_on: dep.depends_on.clone(),
                });
            }
        }
    }

    if let Some(path) = DependencyGraph::build(&template.parameters).find_cycle() {
        return Err(SchemaError::DependencyCycle { path });
    }

    Ok(())
}

fn check_parameter(param: &TemplateParameter) -> Result<(), SchemaError> {
    if !is_valid_parameter_name(&param.name) {
        return Err(SchemaError::InvalidName {
            name: param.name.clone(),
        });
    }

    if param.param_type == ParameterType::Select && param.options.is_empty() {
        return Err(SchemaError::EmptyOptions {
            parameter: param.name.clone(),
        });
    }

    if let (Some(min), Some(max)) = (param.min, param.max) {
        if min > max {
            return Err(SchemaError::InvertedRange {
                parameter: param.name.clone(),
                min,
                max,
            });
        }
    }

    if let Some(default) = param.default_value.as_ref().filter(|v| !is_blank(v)) {
        validate_with_required(param, Some(default), false).map_err(|source| {
            SchemaError::InvalidDefault {
                parameter: param.name.clone(),
                source,
            }
        })?;
    }

    Ok(())
}

/// A template excluded from the catalog and why
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedTemplate {
    pub id: String,
    pub error: SchemaError,
}

/// Result of checking a batch of templates
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub accepted: Vec<CalculationTemplate>,
    pub rejected: Vec<RejectedTemplate>,
}

/// Check every template, keeping the valid ones in input order. A repeated
/// id keeps the first occurrence.
pub fn load_templates(templates: Vec<CalculationTemplate>) -> LoadReport {
    load_records(templates.into_iter().map(TemplateRecord::Parsed).collect())
}

/// Like `load_templates`, for raw repository records. A record that could not
/// be decoded is rejected as `SchemaError::Malformed` in its input position.
pub fn load_records(records: Vec<TemplateRecord>) -> LoadReport {
    let mut report = LoadReport::default();
    let mut seen = HashSet::new();

    for record in records {
        let template = match record {
            TemplateRecord::Parsed(template) => template,
            TemplateRecord::Malformed { id, message } => {
                warn!(template = %id, %message, "rejecting undecodable template");
                report.rejected.push(RejectedTemplate {
                    id,
                    error: SchemaError::Malformed { message },
                });
                continue;
            }
        };

        let outcome = if seen.contains(&template.id) {
            Err(SchemaError::DuplicateTemplateId {
                id: template.id.clone(),
            })
        } else {
            check_template(&template)
        };

        match outcome {
            Ok(()) => {
                seen.insert(template.id.clone());
                report.accepted.push(template);
            }
            Err(error) => {
                warn!(template = %template.id, %error, "rejecting template");
                report.rejected.push(RejectedTemplate {
                    id: template.id,
                    error,
                });
            }
        }
    }

    info!(
        accepted = report.accepted.len(),
        rejected = report.rejected.len(),
        "templates checked"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parameter::{Condition, DependencyAction, ParameterDependency};
    use crate::model::template::fixtures::template;
    use serde_json::json;

    fn param(name: &str, param_type: ParameterType) -> TemplateParameter {
        TemplateParameter {
            id: format!("id-{name}"),
            name: name.to_string(),
            label: name.to_string(),
            param_type,
            unit: None,
            required: false,
            default_value: None,
            min: None,
            max: None,
            options: Vec::new(),
            description: None,
            dependencies: Vec::new(),
        }
    }

    fn depends(mut p: TemplateParameter, source: &str) -> TemplateParameter {
        p.dependencies.push(ParameterDependency {
            depends_on: source.to_string(),
            condition: Condition::Truthy,
            action: DependencyAction::Show,
        });
        p
    }

    #[test]
    fn test_number_range_is_inclusive() {
        let mut p = param("load", ParameterType::Number);
        p.min = Some(1.0);
        p.max = Some(10.0);

        assert!(validate_value(&p, Some(&json!(1))).is_ok());
        assert!(validate_value(&p, Some(&json!(10))).is_ok());
        assert!(matches!(
            validate_value(&p, Some(&json!(0))),
            Err(ValueError::OutOfRange { .. })
        ));
        assert!(matches!(
            validate_value(&p, Some(&json!(11))),
            Err(ValueError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_numeric_string_is_type_mismatch() {
        let p = param("load", ParameterType::Number);
        assert!(matches!(
            validate_value(&p, Some(&json!("5"))),
            Err(ValueError::TypeMismatch { expected: "number", .. })
        ));
    }

    #[test]
    fn test_required_checked_before_type() {
        let mut p = param("load", ParameterType::Number);
        p.required = true;
        for value in [None, Some(json!(null)), Some(json!(""))] {
            assert_eq!(
                validate_value(&p, value.as_ref()),
                Err(ValueError::MissingRequired {
                    parameter: "load".to_string()
                })
            );
        }
    }

    #[test]
    fn test_optional_blank_is_valid() {
        let p = param("load", ParameterType::Number);
        assert!(validate_value(&p, None).is_ok());
        assert!(validate_value(&p, Some(&json!(""))).is_ok());
    }

    #[test]
    fn test_select_membership() {
        let mut p = param("soil", ParameterType::Select);
        p.options = vec!["A".to_string(), "B".to_string()];
        assert!(validate_value(&p, Some(&json!("A"))).is_ok());
        assert!(matches!(
            validate_value(&p, Some(&json!("Z"))),
            Err(ValueError::NotAnOption { .. })
        ));
        assert!(matches!(
            validate_value(&p, Some(&json!(1))),
            Err(ValueError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_required_text_rejects_whitespace() {
        let mut p = param("notes", ParameterType::Text);
        assert!(validate_value(&p, Some(&json!("   "))).is_ok());
        p.required = true;
        assert!(matches!(
            validate_value(&p, Some(&json!("   "))),
            Err(ValueError::MissingRequired { .. })
        ));
        assert!(validate_value(&p, Some(&json!("ok"))).is_ok());
    }

    #[test]
    fn test_boolean_is_strict() {
        let p = param("flag", ParameterType::Boolean);
        assert!(validate_value(&p, Some(&json!(false))).is_ok());
        assert!(validate_value(&p, Some(&json!("true"))).is_err());
        assert!(validate_value(&p, Some(&json!(1))).is_err());
    }

    #[test]
    fn test_date_formats() {
        let p = param("start", ParameterType::Date);
        assert!(validate_value(&p, Some(&json!("2024-02-29"))).is_ok());
        assert!(validate_value(&p, Some(&json!("2024-03-01T08:00:00-05:00"))).is_ok());
        assert!(matches!(
            validate_value(&p, Some(&json!("2023-02-29"))),
            Err(ValueError::TypeMismatch { expected: "date", .. })
        ));
        assert!(validate_value(&p, Some(&json!("01/03/2024"))).is_err());
    }

    #[test]
    fn test_parameter_names() {
        assert!(is_valid_parameter_name("f_c"));
        assert!(is_valid_parameter_name("_tmp2"));
        assert!(!is_valid_parameter_name("2x"));
        assert!(!is_valid_parameter_name("span-length"));
        assert!(!is_valid_parameter_name(""));
    }

    #[test]
    fn test_empty_select_options_is_invalid_schema() {
        let mut t = template("t", "structural");
        t.parameters = vec![param("soil", ParameterType::Select)];
        assert_eq!(
            check_template(&t),
            Err(SchemaError::EmptyOptions {
                parameter: "soil".to_string()
            })
        );
    }

    #[test]
    fn test_dependency_reference_checks() {
        let mut t = template("t", "structural");
        t.parameters = vec![depends(param("a", ParameterType::Text), "a")];
        assert!(matches!(
            check_template(&t),
            Err(SchemaError::SelfDependency { .. })
        ));

        t.parameters = vec![depends(param("a", ParameterType::Text), "missing")];
        assert!(matches!(
            check_template(&t),
            Err(SchemaError::UnknownDependency { .. })
        ));
    }

    #[test]
    fn test_cycle_is_invalid_schema() {
        let mut t = template("t", "structural");
        t.parameters = vec![
            depends(param("a", ParameterType::Text), "b"),
            depends(param("b", ParameterType::Text), "a"),
        ];
        assert!(matches!(
            check_template(&t),
            Err(SchemaError::DependencyCycle { .. })
        ));
    }

    #[test]
    fn test_bad_default_and_range() {
        let mut p = param("span", ParameterType::Number);
        p.min = Some(1.0);
        p.max = Some(5.0);
        p.default_value = Some(json!(9));
        let mut t = template("t", "structural");
        t.parameters = vec![p.clone()];
        assert!(matches!(
            check_template(&t),
            Err(SchemaError::InvalidDefault { .. })
        ));

        p.default_value = None;
        p.min = Some(6.0);
        t.parameters = vec![p];
        assert!(matches!(
            check_template(&t),
            Err(SchemaError::InvertedRange { .. })
        ));
    }

    #[test]
    fn test_load_excludes_only_offending_templates() {
        let mut cyclic = template("cyclic", "structural");
        cyclic.parameters = vec![
            depends(param("a", ParameterType::Text), "b"),
            depends(param("b", ParameterType::Text), "a"),
        ];
        let mut bad_rating = template("rated", "electrical");
        bad_rating.rating = 7.0;

        let report = load_templates(vec![
            template("ok", "structural"),
            cyclic,
            template("ok", "hydraulic"),
            bad_rating,
            template("fine", "electrical"),
        ]);

        let accepted: Vec<&str> = report.accepted.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(accepted, vec!["ok", "fine"]);
        assert_eq!(report.accepted[0].category, "structural");

        let rejected: Vec<&str> = report.rejected.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(rejected, vec!["cyclic", "ok", "rated"]);
        assert!(matches!(
            report.rejected[1].error,
            SchemaError::DuplicateTemplateId { .. }
        ));
    }

    #[test]
    fn test_undecodable_record_is_rejected_in_place() {
        let report = load_records(vec![
            TemplateRecord::Parsed(template("first", "structural")),
            TemplateRecord::Malformed {
                id: "broken".to_string(),
                message: "unknown variant `expert`".to_string(),
            },
            TemplateRecord::Parsed(template("last", "hydraulic")),
        ]);

        let accepted: Vec<&str> = report.accepted.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(accepted, vec!["first", "last"]);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].id, "broken");
        assert!(matches!(
            &report.rejected[0].error,
            SchemaError::Malformed { message } if message.contains("expert")
        ));
    }
}
