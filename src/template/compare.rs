//! Property comparison between two resources.

use serde::Serialize;
use serde_yaml::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyDifference {
    pub property: String,
    pub resource1_value: Value,
    pub resource2_value: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PropertyComparison {
    pub matching_properties: Vec<String>,
    pub differing_properties: Vec<PropertyDifference>,
    pub missing_in_resource1: Vec<String>,
    pub missing_in_resource2: Vec<String>,
}

impl PropertyComparison {
    /// No differences and nothing missing from the second resource.
    pub fn is_preserved(&self) -> bool {
        self.differing_properties.is_empty() && self.missing_in_resource2.is_empty()
    }
}

/// Look up a dotted path (`Environment.ComputeType`) under a resource's `Properties`.
///
/// Null values count as absent.
pub fn nested_property<'a>(resource: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = resource.get("Properties")?;
    for key in path.split('.') {
        current = current.get(key)?;
    }
    (!current.is_null()).then_some(current)
}

/// Compare the listed properties of two resources.
///
/// Paths missing from both resources are skipped.
pub fn compare_resource_properties(
    resource1: &Value,
    resource2: &Value,
    properties: &[&str],
) -> PropertyComparison {
    let mut comparison = PropertyComparison::default();

    for path in properties {
        match (nested_property(resource1, path), nested_property(resource2, path)) {
            (None, None) => {}
            (None, Some(_)) => comparison.missing_in_resource1.push(path.to_string()),
            (Some(_), None) => comparison.missing_in_resource2.push(path.to_string()),
            (Some(a), Some(b)) if a == b => comparison.matching_properties.push(path.to_string()),
            (Some(a), Some(b)) => comparison.differing_properties.push(PropertyDifference {
                property: path.to_string(),
                resource1_value: a.clone(),
                resource2_value: b.clone(),
            }),
        }
    }

    comparison
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn compares_nested_paths() {
        let a = resource(
            r#"
Properties:
  Environment:
    ComputeType: BUILD_GENERAL1_SMALL
    Image: aws/codebuild/standard:7.0
  TimeoutInMinutes: 30
  ServiceRole: !GetAtt Role.Arn
"#,
        );
        let b = resource(
            r#"
Properties:
  Environment:
    ComputeType: BUILD_GENERAL1_MEDIUM
    Image: aws/codebuild/standard:7.0
  ServiceRole: !GetAtt Role.Arn
  QueuedTimeoutInMinutes: 60
"#,
        );

        let result = compare_resource_properties(
            &a,
            &b,
            &[
                "Environment.ComputeType",
                "Environment.Image",
                "TimeoutInMinutes",
                "QueuedTimeoutInMinutes",
                "ServiceRole",
                "Description",
            ],
        );

        assert_eq!(result.matching_properties, vec!["Environment.Image", "ServiceRole"]);
        assert_eq!(result.differing_properties.len(), 1);
        assert_eq!(result.differing_properties[0].property, "Environment.ComputeType");
        assert_eq!(result.missing_in_resource2, vec!["TimeoutInMinutes"]);
        assert_eq!(result.missing_in_resource1, vec!["QueuedTimeoutInMinutes"]);
        assert!(!result.is_preserved());
    }

    #[test]
    fn null_counts_as_missing() {
        let a = resource("Properties: {Description: ~}");
        let b = resource("Properties: {}");
        let result = compare_resource_properties(&a, &b, &["Description"]);
        assert_eq!(result, PropertyComparison::default());
        assert!(result.is_preserved());
    }
}
