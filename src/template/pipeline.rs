//! CodePipeline stage analysis.

use serde::Serialize;
use serde_yaml::Value;

use super::intrinsic::Intrinsic;

/// Name of the optional post-deployment stage.
pub const POSTDEPLOY_STAGE: &str = "PostDeploy";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineAnalysis {
    pub stage_count: usize,
    /// Stage names; stages from a conditional branch carry a ` (conditional)` suffix.
    pub stage_names: Vec<String>,
    pub conditional_stages: bool,
    pub postdeploy_stage_present: bool,
}

/// Analyse the `Stages` of a pipeline resource.
///
/// When the stage list is chosen with `If`, the branch taken when the
/// condition holds is analysed.
pub fn analyze_pipeline_stages(pipeline: &Value) -> PipelineAnalysis {
    let mut analysis = PipelineAnalysis::default();

    let Some(stages) = pipeline.get("Properties").and_then(|p| p.get("Stages")) else {
        return analysis;
    };

    if let Some(call) = Intrinsic::parse(stages).filter(|c| c.is("If")) {
        analysis.conditional_stages = true;
        let branches = call.list_argument();
        if branches.len() >= 2 {
            let staged = branches[1].as_sequence().map(|s| s.as_slice()).unwrap_or_default();
            analysis.stage_count = staged.len();
            for stage in staged {
                let name = stage_name(stage);
                analysis.postdeploy_stage_present |= name == POSTDEPLOY_STAGE;
                analysis.stage_names.push(format!("{} (conditional)", name));
            }
        }
    } else if let Some(list) = stages.as_sequence() {
        analysis.stage_count = list.len();
        for stage in list {
            let name = stage_name(stage);
            analysis.postdeploy_stage_present |= name == POSTDEPLOY_STAGE;
            analysis.stage_names.push(name.to_string());
        }
    }

    analysis
}

fn stage_name(stage: &Value) -> &str {
    stage.get("Name").and_then(Value::as_str).unwrap_or("")
}
