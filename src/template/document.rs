//! Loaded CloudFormation template.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use super::intrinsic::{collect_strings, ref_target, Intrinsic};
use crate::error::{LinterError, Result};

/// A parsed CloudFormation template.
#[derive(Debug, Clone)]
pub struct CfnTemplate {
    path: Option<PathBuf>,
    root: Value,
}

/// Declared constraints of a template parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterConstraints {
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    #[serde(rename = "Default", default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(rename = "AllowedValues", default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<Value>>,
    #[serde(rename = "AllowedPattern", default, skip_serializing_if = "Option::is_none")]
    pub allowed_pattern: Option<String>,
    #[serde(rename = "MinLength", default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<Value>,
    #[serde(rename = "MaxLength", default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<Value>,
    #[serde(rename = "MinValue", default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<Value>,
    #[serde(rename = "MaxValue", default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<Value>,
}

/// Top-level shape of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConditionKind {
    Equals,
    And,
    Or,
    Not,
    ConditionRef,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionAnalysis {
    pub condition_name: String,
    pub definition: Value,
    pub kind: Option<ConditionKind>,
    pub parameters_referenced: Vec<String>,
    pub conditions_referenced: Vec<String>,
}

impl CfnTemplate {
    /// Load a template from disk.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(LinterError::TemplateNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path)?;
        let mut template = Self::parse(&content).map_err(|e| match e {
            LinterError::TemplateParseError { message, .. } => LinterError::TemplateParseError {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })?;
        template.path = Some(path.to_path_buf());
        Ok(template)
    }

    /// Parse template source text.
    pub fn parse(content: &str) -> Result<Self> {
        let root: Value = serde_yaml::from_str(content).map_err(|e| LinterError::TemplateParseError {
            path: PathBuf::new(),
            message: e.to_string(),
        })?;
        Ok(Self { path: None, root })
    }

    /// Wrap an already-parsed document.
    pub fn from_value(root: Value) -> Self {
        Self { path: None, root }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// A top-level section such as `Parameters` or `Resources`.
    pub fn section(&self, name: &str) -> Option<&Mapping> {
        self.root.get(name).and_then(Value::as_mapping)
    }

    /// Names declared in a section, in document order.
    pub fn section_keys(&self, name: &str) -> Vec<&str> {
        self.section(name)
            .map(|m| m.keys().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Entries of a section, in document order.
    pub fn section_entries(&self, name: &str) -> Vec<(&str, &Value)> {
        self.section(name)
            .map(|m| {
                m.iter()
                    .filter_map(|(k, v)| k.as_str().map(|k| (k, v)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// A single entry of a section.
    pub fn section_entry(&self, section: &str, name: &str) -> Option<&Value> {
        self.section(section).and_then(|m| m.get(name))
    }

    pub fn resource(&self, name: &str) -> Option<&Value> {
        self.section_entry("Resources", name)
    }

    /// Resources whose `Type` is `resource_type`.
    pub fn find_resources_by_type(&self, resource_type: &str) -> Vec<(&str, &Value)> {
        self.section_entries("Resources")
            .into_iter()
            .filter(|(_, r)| r.get("Type").and_then(Value::as_str) == Some(resource_type))
            .collect()
    }

    /// Resources created under `condition_name`, directly or inside a
    /// compound condition.
    pub fn find_resources_with_condition(&self, condition_name: &str) -> Vec<(&str, &Value)> {
        self.section_entries("Resources")
            .into_iter()
            .filter(|(_, r)| match r.get("Condition") {
                Some(Value::String(name)) => name == condition_name,
                Some(complex) => collect_strings(complex).iter().any(|s| s.contains(condition_name)),
                None => false,
            })
            .collect()
    }

    /// Constraints declared on a parameter.
    pub fn parameter_constraints(&self, name: &str) -> Result<ParameterConstraints> {
        let param = self
            .section_entry("Parameters", name)
            .ok_or_else(|| LinterError::MissingParameter {
                name: name.to_string(),
            })?;

        serde_yaml::from_value(param.clone()).map_err(|e| LinterError::TemplateParseError {
            path: self.path.clone().unwrap_or_default(),
            message: format!("parameter {}: {}", name, e),
        })
    }

    /// Shape of a condition and the parameters/conditions it depends on.
    pub fn analyze_condition(&self, name: &str) -> Result<ConditionAnalysis> {
        let definition = self
            .section_entry("Conditions", name)
            .ok_or_else(|| LinterError::MissingCondition {
                name: name.to_string(),
            })?;

        let kind = Intrinsic::parse(definition).and_then(|call| {
            if call.is("Equals") {
                Some(ConditionKind::Equals)
            } else if call.is("And") {
                Some(ConditionKind::And)
            } else if call.is("Or") {
                Some(ConditionKind::Or)
            } else if call.is("Not") {
                Some(ConditionKind::Not)
            } else if call.is("Condition") {
                Some(ConditionKind::ConditionRef)
            } else {
                None
            }
        });

        let mentioned = collect_strings(definition);
        let references = |candidates: Vec<&str>| -> Vec<String> {
            candidates
                .into_iter()
                .filter(|c| *c != name && mentioned.iter().any(|s| mentions(s, c)))
                .map(str::to_string)
                .collect()
        };

        Ok(ConditionAnalysis {
            condition_name: name.to_string(),
            definition: definition.clone(),
            kind,
            parameters_referenced: references(self.section_keys("Parameters")),
            conditions_referenced: references(self.section_keys("Conditions")),
        })
    }
}

/// `s` names `target` outright or through a `${target}` substitution.
fn mentions(s: &str, target: &str) -> bool {
    s == target || s.contains(&format!("${{{}}}", target))
}

/// Every place `value` refers to parameter `name`.
///
/// A `Ref` yields `!Ref <name>`; a bare string equal to the name yields the
/// name itself.
pub fn parameter_references(value: &Value, name: &str) -> Vec<String> {
    let mut out = Vec::new();
    find_references(value, name, &mut out);
    out
}

fn find_references(value: &Value, name: &str, out: &mut Vec<String>) {
    if ref_target(value) == Some(name) {
        out.push(format!("!Ref {}", name));
        return;
    }

    match value {
        Value::String(s) if s == name => out.push(s.clone()),
        Value::Sequence(items) => items.iter().for_each(|v| find_references(v, name, out)),
        Value::Mapping(map) => map.values().for_each(|v| find_references(v, name, out)),
        Value::Tagged(tagged) => find_references(&tagged.value, name, out),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = r#"
AWSTemplateFormatVersion: '2010-09-09'
Parameters:
  Environment:
    Type: String
    Default: dev
    AllowedValues: [dev, prod]
  EnablePostDeploy:
    Type: String
    Default: 'false'
  BuildSpec:
    Type: String
    AllowedPattern: '^$|^buildspec.*\.yml$'
    MaxLength: 256
Conditions:
  IsProd: !Equals [!Ref Environment, prod]
  HasPostDeploy: !Equals [!Ref EnablePostDeploy, 'true']
  ProdPostDeploy: !And [!Condition IsProd, !Condition HasPostDeploy]
  LongForm:
    Fn::Not: [{Condition: IsProd}]
Resources:
  Bucket:
    Type: AWS::S3::Bucket
    Properties:
      BucketName: !Sub '${Environment}-site'
  PostDeployProject:
    Type: AWS::CodeBuild::Project
    Condition: HasPostDeploy
    Properties:
      Name: !Sub '${AWS::StackName}-postdeploy'
  ProdProject:
    Type: AWS::CodeBuild::Project
    Condition: ProdPostDeploy
Outputs:
  BucketName:
    Value: !Ref Bucket
"#;

    fn template() -> CfnTemplate {
        CfnTemplate::parse(TEMPLATE).unwrap()
    }

    #[test]
    fn sections_preserve_order() {
        let t = template();
        assert_eq!(
            t.section_keys("Parameters"),
            vec!["Environment", "EnablePostDeploy", "BuildSpec"]
        );
        assert!(t.section("Mappings").is_none());
        assert!(t.section_keys("Mappings").is_empty());
    }

    #[test]
    fn finds_resources_by_type() {
        let t = template();
        let names: Vec<_> = t
            .find_resources_by_type("AWS::CodeBuild::Project")
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(names, vec!["PostDeployProject", "ProdProject"]);
    }

    #[test]
    fn finds_resources_by_condition() {
        let t = template();
        let names: Vec<_> = t
            .find_resources_with_condition("HasPostDeploy")
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(names, vec!["PostDeployProject"]);
    }

    #[test]
    fn parameter_constraints_are_extracted() {
        let t = template();
        let env = t.parameter_constraints("Environment").unwrap();
        assert_eq!(env.param_type.as_deref(), Some("String"));
        assert_eq!(env.allowed_values.unwrap().len(), 2);

        let spec = t.parameter_constraints("BuildSpec").unwrap();
        assert_eq!(spec.allowed_pattern.as_deref(), Some(r"^$|^buildspec.*\.yml$"));
        assert_eq!(spec.max_length, Some(Value::from(256)));
    }

    #[test]
    fn missing_parameter_is_error() {
        let err = template().parameter_constraints("Nope").unwrap_err();
        assert_eq!(err.to_string(), "Parameter 'Nope' not found in template");
    }

    #[test]
    fn analyzes_conditions() {
        let t = template();

        let is_prod = t.analyze_condition("IsProd").unwrap();
        assert_eq!(is_prod.kind, Some(ConditionKind::Equals));
        assert_eq!(is_prod.parameters_referenced, vec!["Environment"]);
        assert!(is_prod.conditions_referenced.is_empty());

        let combined = t.analyze_condition("ProdPostDeploy").unwrap();
        assert_eq!(combined.kind, Some(ConditionKind::And));
        assert_eq!(combined.conditions_referenced, vec!["IsProd", "HasPostDeploy"]);

        let long = t.analyze_condition("LongForm").unwrap();
        assert_eq!(long.kind, Some(ConditionKind::Not));
        assert_eq!(long.conditions_referenced, vec!["IsProd"]);
    }

    #[test]
    fn missing_condition_is_error() {
        assert!(matches!(
            template().analyze_condition("Nope"),
            Err(LinterError::MissingCondition { .. })
        ));
    }

    #[test]
    fn finds_parameter_references() {
        let t = template();
        let refs = parameter_references(t.root(), "Environment");
        assert_eq!(refs, vec!["!Ref Environment"]);

        let refs = parameter_references(t.root(), "Bucket");
        assert_eq!(refs, vec!["!Ref Bucket"]);
    }

    #[test]
    fn load_reports_missing_and_invalid_files() {
        let temp = tempfile::TempDir::new().unwrap();
        let missing = temp.path().join("missing.yml");
        assert!(matches!(
            CfnTemplate::load(&missing),
            Err(LinterError::TemplateNotFound { .. })
        ));

        let broken = temp.path().join("broken.yml");
        fs::write(&broken, "Resources: [unclosed").unwrap();
        match CfnTemplate::load(&broken) {
            Err(LinterError::TemplateParseError { path, .. }) => assert_eq!(path, broken),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
