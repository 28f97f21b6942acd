//! Dependency graph between the parameters of one template

use super::parameter::TemplateParameter;
use std::collections::HashMap;

/// Edges follow `dependsOn`: a parameter points at the parameters whose
/// values its rules read.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Parameter names in declaration order
    order: Vec<String>,
    upstream: HashMap<String, Vec<String>>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

impl DependencyGraph {
    /// Build the graph from a template's parameter list
    pub fn build(parameters: &[TemplateParameter]) -> Self {
        let mut upstream: HashMap<String, Vec<String>> = HashMap::new();

        for param in parameters {
            let sources = upstream.entry(param.name.clone()).or_default();
            for dep in &param.dependencies {
                if !sources.contains(&dep.depends_on) {
                    sources.push(dep.depends_on.clone());
                }
            }
        }

        DependencyGraph {
            order: parameters.iter().map(|p| p.name.clone()).collect(),
            upstream,
        }
    }

    /// Names this parameter's rules read
    pub fn get_upstream(&self, name: &str) -> Vec<String> {
        self.upstream.get(name).cloned().unwrap_or_default()
    }

    /// Find a dependency cycle, returned as a closed path (`[a, b, a]`).
    /// Edges to unknown names are ignored here.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let mut marks: HashMap<&str, Mark> = self
            .order
            .iter()
            .map(|name| (name.as_str(), Mark::Unvisited))
            .collect();
        let mut path: Vec<&str> = Vec::new();

        for name in &self.order {
            if marks[name.as_str()] == Mark::Unvisited {
                if let Some(cycle) = self.visit(name, &mut marks, &mut path) {
                    return Some(cycle);
                }
            }
        }
        None
    }

    fn visit<'a>(
        &'a self,
        name: &'a str,
        marks: &mut HashMap<&'a str, Mark>,
        path: &mut Vec<&'a str>,
    ) -> Option<Vec<String>> {
        marks.insert(name, Mark::InProgress);
        path.push(name);

        if let Some(sources) = self.upstream.get(name) {
            for source in sources {
                match marks.get(source.as_str()).copied() {
                    Some(Mark::InProgress) => {
                        let start = path.iter().position(|n| *n == source.as_str())?;
                        let mut cycle: Vec<String> =
                            path[start..].iter().map(|n| n.to_string()).collect();
                        cycle.push(source.clone());
                        return Some(cycle);
                    }
                    Some(Mark::Unvisited) => {
                        if let Some(cycle) = self.visit(source, marks, path) {
                            return Some(cycle);
                        }
                    }
                    Some(Mark::Done) | None => {}
                }
            }
        }

        path.pop();
        marks.insert(name, Mark::Done);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parameter::{
        Condition, DependencyAction, ParameterDependency, ParameterType,
    };

    fn create_test_param(name: &str, depends_on: &[&str]) -> TemplateParameter {
        TemplateParameter {
            id: format!("id-{name}"),
            name: name.to_string(),
            label: name.to_string(),
            param_type: ParameterType::Text,
            unit: None,
            required: false,
            default_value: None,
            min: None,
            max: None,
            options: Vec::new(),
            description: None,
            dependencies: depends_on
                .iter()
                .map(|source| ParameterDependency {
                    depends_on: source.to_string(),
                    condition: Condition::IsSet,
                    action: DependencyAction::Show,
                })
                .collect(),
        }
    }

    #[test]
    fn test_graph_build() {
        let params = vec![
            create_test_param("a", &[]),
            create_test_param("b", &["a"]),
            create_test_param("c", &["b", "a"]),
        ];
        let graph = DependencyGraph::build(&params);

        assert!(graph.get_upstream("a").is_empty());
        assert_eq!(graph.get_upstream("c"), vec!["b", "a"]);
        assert!(graph.find_cycle().is_none());
    }

    #[test]
    fn test_two_node_cycle() {
        let params = vec![create_test_param("a", &["b"]), create_test_param("b", &["a"])];
        let cycle = DependencyGraph::build(&params).find_cycle().unwrap();
        assert_eq!(cycle, vec!["a", "b", "a"]);
    }

    #[test]
    fn test_longer_cycle_behind_acyclic_prefix() {
        let params = vec![
            create_test_param("root", &[]),
            create_test_param("x", &["root", "z"]),
            create_test_param("y", &["x"]),
            create_test_param("z", &["y"]),
        ];
        let cycle = DependencyGraph::build(&params).find_cycle().unwrap();
        assert_eq!(cycle.first(), cycle.last());
        assert_eq!(cycle.len(), 4);
    }

    #[test]
    fn test_unknown_sources_are_ignored() {
        let params = vec![create_test_param("a", &["ghost"])];
        assert!(DependencyGraph::build(&params).find_cycle().is_none());
    }
}
