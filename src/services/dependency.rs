//! Dependency resolution and form-level validation
//!
//! Rules are applied in a fixed order: by the target parameter's declaration
//! order, then by the rule's position in the target's `dependencies`. A later
//! matching rule overwrites the state field an earlier one set. Rules read
//! only source values, never resolved state, so one pass is enough.

use super::schema::validate_with_required;
use crate::error::ValueError;
use crate::model::parameter::{DependencyAction, ParameterState, TemplateParameter};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Current input values keyed by parameter `name`
pub type InputValues = HashMap<String, Value>;

/// Resolve visibility, requirement and enablement for every parameter,
/// keyed by parameter `id`. Assumes the template passed `check_template`.
pub fn resolve_states(
    parameters: &[TemplateParameter],
    values: &InputValues,
) -> HashMap<String, ParameterState> {
    let mut states = HashMap::with_capacity(parameters.len());

    for param in parameters {
        let mut state = ParameterState {
            visible: true,
            required: param.required,
            enabled: true,
        };

        for dep in &param.dependencies {
            if !dep.condition.matches(values.get(&dep.depends_on)) {
                continue;
            }
            match dep.action {
                DependencyAction::Show => state.visible = true,
                DependencyAction::Hide => state.visible = false,
                DependencyAction::Require => state.required = true,
                DependencyAction::Disable => state.enabled = false,
            }
        }

        // Hidden fields never block submission
        if !state.visible {
            state.required = false;
        }

        states.insert(param.id.clone(), state);
    }

    states
}

/// Declared default values keyed by parameter `name`
pub fn default_values(parameters: &[TemplateParameter]) -> BTreeMap<String, Value> {
    parameters
        .iter()
        .filter_map(|p| p.default_value.clone().map(|v| (p.name.clone(), v)))
        .collect()
}

/// Result of validating a whole input form
#[derive(Debug, Clone, Default)]
pub struct FormReport {
    pub states: HashMap<String, ParameterState>,
    /// Failures keyed by parameter `id`
    pub errors: BTreeMap<String, ValueError>,
}

impl FormReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Resolve states, then validate every visible and enabled parameter
/// against its resolved `required` flag.
pub fn validate_inputs(parameters: &[TemplateParameter], values: &InputValues) -> FormReport {
    let states = resolve_states(parameters, values);
    let mut errors = BTreeMap::new();

    for param in parameters {
        let Some(state) = states.get(&param.id) else {
            continue;
        };
        if !state.visible || !state.enabled {
            continue;
        }
        if let Err(err) = validate_with_required(param, values.get(&param.name), state.required) {
            errors.insert(param.id.clone(), err);
        }
    }

    FormReport { states, errors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parameter::{Condition, ParameterDependency, ParameterType};
    use serde_json::json;

    fn param(name: &str, required: bool) -> TemplateParameter {
        TemplateParameter {
            id: format!("id-{name}"),
            name: name.to_string(),
            label: name.to_string(),
            param_type: ParameterType::Text,
            unit: None,
            required,
            default_value: None,
            min: None,
            max: None,
            options: Vec::new(),
            description: None,
            dependencies: Vec::new(),
        }
    }

    fn rule(source: &str, condition: Condition, action: DependencyAction) -> ParameterDependency {
        ParameterDependency {
            depends_on: source.to_string(),
            condition,
            action,
        }
    }

    fn values(pairs: &[(&str, Value)]) -> InputValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_defaults_without_rules() {
        let params = vec![param("a", true), param("b", false)];
        let states = resolve_states(&params, &InputValues::new());
        assert_eq!(
            states["id-a"],
            ParameterState {
                visible: true,
                required: true,
                enabled: true
            }
        );
        assert!(!states["id-b"].required);
    }

    #[test]
    fn test_hidden_implies_not_required() {
        let mut target = param("basement_depth", true);
        target.dependencies.push(rule(
            "has_basement",
            Condition::Equals(json!(false)),
            DependencyAction::Hide,
        ));
        target.dependencies.push(rule(
            "has_basement",
            Condition::Equals(json!(false)),
            DependencyAction::Require,
        ));
        let params = vec![param("has_basement", false), target.clone()];

        let states = resolve_states(&params, &values(&[("has_basement", json!(false))]));
        let state = states["id-basement_depth"];
        assert!(!state.visible);
        assert!(!state.required);
        assert!(target.required);
    }

    #[test]
    fn test_last_matching_rule_wins() {
        let mut target = param("t", false);
        target.dependencies = vec![
            rule("s", Condition::IsSet, DependencyAction::Hide),
            rule("s", Condition::Equals(json!("x")), DependencyAction::Show),
        ];
        let params = vec![param("s", false), target];

        let shown = resolve_states(&params, &values(&[("s", json!("x"))]));
        assert!(shown["id-t"].visible);

        let hidden = resolve_states(&params, &values(&[("s", json!("y"))]));
        assert!(!hidden["id-t"].visible);
    }

    #[test]
    fn test_non_matching_rules_leave_state_alone() {
        let mut target = param("t", false);
        target.dependencies = vec![
            rule("s", Condition::Truthy, DependencyAction::Disable),
            rule("s", Condition::Truthy, DependencyAction::Require),
        ];
        let params = vec![param("s", false), target];

        let states = resolve_states(&params, &values(&[("s", json!(0))]));
        assert!(states["id-t"].enabled);
        assert!(!states["id-t"].required);

        let states = resolve_states(&params, &values(&[("s", json!(1))]));
        assert!(!states["id-t"].enabled);
        assert!(states["id-t"].required);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let mut target = param("t", true);
        target.dependencies = vec![rule("s", Condition::IsEmpty, DependencyAction::Hide)];
        let params = vec![param("s", false), target];
        let input = values(&[]);
        assert_eq!(resolve_states(&params, &input), resolve_states(&params, &input));
    }

    #[test]
    fn test_validate_inputs_skips_hidden_and_disabled() {
        let mut hidden = param("hidden", true);
        hidden.dependencies = vec![rule(
            "mode",
            Condition::Equals(json!("simple")),
            DependencyAction::Hide,
        )];
        let mut disabled = param("disabled", true);
        disabled.dependencies = vec![rule("mode", Condition::IsSet, DependencyAction::Disable)];
        let mut required_later = param("extra", false);
        required_later.dependencies =
            vec![rule("mode", Condition::IsSet, DependencyAction::Require)];
        let params = vec![param("mode", true), hidden, disabled, required_later];

        let report = validate_inputs(&params, &values(&[("mode", json!("simple"))]));
        assert!(!report.is_valid());
        assert_eq!(report.errors.len(), 1);
        assert!(matches!(
            report.errors["id-extra"],
            ValueError::MissingRequired { .. }
        ));

        let report = validate_inputs(
            &params,
            &values(&[("mode", json!("simple")), ("extra", json!("done"))]),
        );
        assert!(report.is_valid());
    }

    #[test]
    fn test_default_values() {
        let mut a = param("a", false);
        a.default_value = Some(json!("x"));
        let params = vec![a, param("b", false)];
        let defaults = default_values(&params);
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults["a"], json!("x"));
    }
}
