//! Inspect command implementation.
//!
//! The `cfn-linter inspect` command summarizes a template's parameters,
//! conditions, resources and outputs, with a closer look at IAM policies,
//! CodeBuild environments and pipeline stages.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_yaml::Value;

use crate::cli::args::InspectArgs;
use crate::error::{LinterError, Result};
use crate::template::intrinsic::render;
use crate::template::{
    analyze_environment_variables, analyze_iam_policy, analyze_pipeline_stages,
    project_environment_variables, CfnTemplate, ConditionAnalysis, EnvironmentAnalysis,
    ParameterConstraints, PipelineAnalysis, PolicyAnalysis,
};
use crate::ui::UserInterface;

use super::dispatcher::{exit_code, Command, CommandResult};

/// Resource types whose `PolicyDocument` property is analysed.
const POLICY_RESOURCE_TYPES: &[&str] = &[
    "AWS::IAM::Policy",
    "AWS::IAM::ManagedPolicy",
    "AWS::S3::BucketPolicy",
    "AWS::SNS::TopicPolicy",
    "AWS::SQS::QueuePolicy",
];

/// Everything `inspect` reports about one template.
#[derive(Debug, Default, Serialize)]
pub struct TemplateInspection {
    pub parameters: BTreeMap<String, ParameterConstraints>,
    pub conditions: Vec<ConditionAnalysis>,
    /// Resource names keyed by resource type.
    pub resources: BTreeMap<String, Vec<String>>,
    pub outputs: Vec<String>,
    pub policies: BTreeMap<String, PolicyAnalysis>,
    pub build_environments: BTreeMap<String, EnvironmentAnalysis>,
    pub pipelines: BTreeMap<String, PipelineAnalysis>,
}

impl TemplateInspection {
    pub fn from_template(template: &CfnTemplate) -> Result<Self> {
        let mut inspection = Self::default();

        for name in template.section_keys("Parameters") {
            inspection
                .parameters
                .insert(name.to_string(), template.parameter_constraints(name)?);
        }

        for name in template.section_keys("Conditions") {
            inspection.conditions.push(template.analyze_condition(name)?);
        }

        for (name, resource) in template.section_entries("Resources") {
            let resource_type = resource.get("Type").and_then(Value::as_str).unwrap_or("(untyped)");
            inspection
                .resources
                .entry(resource_type.to_string())
                .or_default()
                .push(name.to_string());

            if POLICY_RESOURCE_TYPES.contains(&resource_type) {
                if let Some(document) = resource.get("Properties").and_then(|p| p.get("PolicyDocument")) {
                    inspection
                        .policies
                        .insert(name.to_string(), analyze_iam_policy(document));
                }
            } else if resource_type == "AWS::CodeBuild::Project" {
                inspection.build_environments.insert(
                    name.to_string(),
                    analyze_environment_variables(project_environment_variables(resource)),
                );
            } else if resource_type == "AWS::CodePipeline::Pipeline" {
                inspection
                    .pipelines
                    .insert(name.to_string(), analyze_pipeline_stages(resource));
            }
        }

        inspection.outputs = template
            .section_keys("Outputs")
            .into_iter()
            .map(str::to_string)
            .collect();

        Ok(inspection)
    }

    fn render_text(&self, ui: &mut dyn UserInterface) {
        ui.report(&format!("Parameters ({}):", self.parameters.len()));
        for (name, constraints) in &self.parameters {
            let mut line = format!("  {}: {}", name, constraints.param_type.as_deref().unwrap_or("?"));
            if let Some(default) = &constraints.default {
                line.push_str(&format!(" (default: {})", render(default)));
            }
            if let Some(allowed) = &constraints.allowed_values {
                let values: Vec<String> = allowed.iter().map(render).collect();
                line.push_str(&format!(" [{}]", values.join(", ")));
            }
            ui.report(&line);
        }

        ui.report(&format!("\nConditions ({}):", self.conditions.len()));
        for condition in &self.conditions {
            let kind = condition
                .kind
                .map(|k| format!("{:?}", k))
                .unwrap_or_else(|| "Other".to_string());
            let mut refs = condition.parameters_referenced.clone();
            refs.extend(condition.conditions_referenced.iter().cloned());
            if refs.is_empty() {
                ui.report(&format!("  {}: {}", condition.condition_name, kind));
            } else {
                ui.report(&format!(
                    "  {}: {} -> {}",
                    condition.condition_name,
                    kind,
                    refs.join(", ")
                ));
            }
        }

        let resource_count: usize = self.resources.values().map(Vec::len).sum();
        ui.report(&format!("\nResources ({}):", resource_count));
        for (resource_type, names) in &self.resources {
            ui.report(&format!("  {}: {}", resource_type, names.join(", ")));
        }

        for (name, policy) in &self.policies {
            ui.report(&format!(
                "  {} policy: {} statement(s), actions: {}",
                name,
                policy.statement_count,
                policy.actions.iter().cloned().collect::<Vec<_>>().join(", ")
            ));
        }
        for (name, env) in &self.build_environments {
            ui.report(&format!(
                "  {} environment: {} variable(s), {} parameter reference(s)",
                name,
                env.variable_count,
                env.parameter_references.len()
            ));
        }
        for (name, pipeline) in &self.pipelines {
            ui.report(&format!(
                "  {} stages: {}",
                name,
                pipeline.stage_names.join(" -> ")
            ));
        }

        ui.report(&format!("\nOutputs ({}):", self.outputs.len()));
        for name in &self.outputs {
            ui.report(&format!("  {}", name));
        }
    }
}

/// The inspect command implementation.
pub struct InspectCommand {
    args: InspectArgs,
}

impl InspectCommand {
    /// Create a new inspect command.
    pub fn new(args: InspectArgs) -> Self {
        Self { args }
    }
}

impl Command for InspectCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let inspection = match CfnTemplate::load(&self.args.template)
            .and_then(|t| TemplateInspection::from_template(&t))
        {
            Ok(i) => i,
            Err(e) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(exit_code::FAILURE));
            }
        };

        if self.args.json {
            let json = serde_json::to_string_pretty(&inspection).map_err(|e| LinterError::Other(e.into()))?;
            ui.report(&json);
        } else {
            inspection.render_text(ui);
        }

        Ok(CommandResult::success())
    }
}
