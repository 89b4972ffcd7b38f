//! CodeBuild environment variable analysis.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_yaml::Value;

use super::intrinsic::{mentions_intrinsic, ref_target, render};

/// Type assumed when an environment variable omits `Type`.
pub const DEFAULT_VARIABLE_TYPE: &str = "PLAINTEXT";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentVariable {
    pub value: Option<Value>,
    pub var_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnvironmentAnalysis {
    pub variable_count: usize,
    pub variables: BTreeMap<String, EnvironmentVariable>,
    pub variable_names: BTreeSet<String>,
    /// Parameters referenced through `Ref`.
    pub parameter_references: BTreeSet<String>,
    /// Literal string values.
    pub hardcoded_values: BTreeSet<String>,
}

/// Analyse a CodeBuild `Environment.EnvironmentVariables` list.
///
/// Entries without a `Name` are counted but otherwise ignored.
pub fn analyze_environment_variables(variables: &[Value]) -> EnvironmentAnalysis {
    let mut analysis = EnvironmentAnalysis {
        variable_count: variables.len(),
        ..Default::default()
    };

    for variable in variables {
        let Some(name) = variable.get("Name").and_then(Value::as_str) else {
            continue;
        };
        let value = variable.get("Value");
        let var_type = variable
            .get("Type")
            .map(render)
            .unwrap_or_else(|| DEFAULT_VARIABLE_TYPE.to_string());

        analysis.variable_names.insert(name.to_string());
        analysis.variables.insert(
            name.to_string(),
            EnvironmentVariable {
                value: value.cloned(),
                var_type,
            },
        );

        if let Some(param) = value.and_then(ref_target) {
            analysis.parameter_references.insert(param.to_string());
        } else if let Some(Value::String(s)) = value {
            if !mentions_intrinsic(s) {
                analysis.hardcoded_values.insert(s.clone());
            }
        }
    }

    analysis
}

/// Environment variables of a CodeBuild project resource.
pub fn project_environment_variables(project: &Value) -> &[Value] {
    project
        .get("Properties")
        .and_then(|p| p.get("Environment"))
        .and_then(|e| e.get("EnvironmentVariables"))
        .and_then(Value::as_sequence)
        .map(|s| s.as_slice())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECT: &str = r#"
Type: AWS::CodeBuild::Project
Properties:
  Environment:
    ComputeType: BUILD_GENERAL1_SMALL
    EnvironmentVariables:
      - Name: ENVIRONMENT
        Value: !Ref Environment
      - Name: REGION
        Value: us-east-1
      - Name: API_KEY
        Type: PARAMETER_STORE
        Value: /app/api-key
      - Name: STACK
        Value: !Sub '${AWS::StackName}'
      - Value: orphan
"#;

    #[test]
    fn classifies_variables() {
        let project: Value = serde_yaml::from_str(PROJECT).unwrap();
        let analysis = analyze_environment_variables(project_environment_variables(&project));

        assert_eq!(analysis.variable_count, 5);
        assert_eq!(analysis.variable_names.len(), 4);
        assert_eq!(analysis.variables["REGION"].var_type, "PLAINTEXT");
        assert_eq!(analysis.variables["API_KEY"].var_type, "PARAMETER_STORE");
        assert!(analysis.parameter_references.contains("Environment"));
        assert_eq!(
            analysis.hardcoded_values.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["/app/api-key", "us-east-1"]
        );
    }

    #[test]
    fn long_form_ref_counts_as_parameter() {
        let vars: Vec<Value> = serde_yaml::from_str("[{Name: A, Value: {Ref: Stage}}]").unwrap();
        let analysis = analyze_environment_variables(&vars);
        assert!(analysis.parameter_references.contains("Stage"));
        assert!(analysis.hardcoded_values.is_empty());
    }

    #[test]
    fn project_without_variables() {
        let project: Value = serde_yaml::from_str("Properties: {}").unwrap();
        assert!(project_environment_variables(&project).is_empty());
    }
}
