//! Structural inspection of CloudFormation templates.
//!
//! Templates are loaded as generic YAML with CloudFormation short-form tags
//! preserved, then queried for parameters, conditions, resources, IAM
//! policies, CodeBuild environments and pipeline stages.
//!
//! # Example
//!
//! ```
//! use cfn_linter::template::CfnTemplate;
//!
//! let template = CfnTemplate::parse(
//!     "Parameters:\n  Env:\n    Type: String\nResources:\n  Bucket:\n    Type: AWS::S3::Bucket\n",
//! )
//! .unwrap();
//!
//! assert_eq!(template.find_resources_by_type("AWS::S3::Bucket").len(), 1);
//! assert_eq!(
//!     template.parameter_constraints("Env").unwrap().param_type.as_deref(),
//!     Some("String")
//! );
//! ```

pub mod codebuild;
pub mod compare;
pub mod document;
pub mod iam;
pub mod intrinsic;
pub mod patterns;
pub mod pipeline;

pub use codebuild::{
    analyze_environment_variables, project_environment_variables, EnvironmentAnalysis,
    EnvironmentVariable,
};
pub use compare::{compare_resource_properties, nested_property, PropertyComparison, PropertyDifference};
pub use document::{
    parameter_references, CfnTemplate, ConditionAnalysis, ConditionKind, ParameterConstraints,
};
pub use iam::{analyze_iam_policy, PolicyAnalysis, StatementAnalysis};
pub use intrinsic::{Intrinsic, CFN_TAGS};
pub use patterns::{matches_arn, validate_regex_pattern, PatternCheck, ARN_PATTERN};
pub use pipeline::{analyze_pipeline_stages, PipelineAnalysis};
