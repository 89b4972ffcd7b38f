//! Compat command implementation.
//!
//! The `cfn-linter compat` command checks that a new version of a template
//! can replace the original without breaking deployed stacks.

use crate::cli::args::CompatArgs;
use crate::compat::{CompatChecker, CompatOptions, PropertyRule};
use crate::error::{LinterError, Result};
use crate::template::CfnTemplate;
use crate::ui::UserInterface;

use super::dispatcher::{exit_code, Command, CommandResult};

/// The compat command implementation.
pub struct CompatCommand {
    args: CompatArgs,
}

impl CompatCommand {
    /// Create a new compat command.
    pub fn new(args: CompatArgs) -> Self {
        Self { args }
    }

    fn options(&self) -> std::result::Result<CompatOptions, String> {
        let properties = self
            .args
            .properties
            .iter()
            .map(|spec| {
                PropertyRule::parse(spec)
                    .ok_or_else(|| format!("Invalid property '{}', expected Resource.Property", spec))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(CompatOptions {
            properties,
            policies: self.args.policies.clone(),
            sids: self.args.sids.clone(),
        })
    }
}

impl Command for CompatCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let options = match self.options() {
            Ok(o) => o,
            Err(message) => {
                ui.error(&message);
                return Ok(CommandResult::failure(exit_code::CONFIGURATION));
            }
        };

        let templates = CfnTemplate::load(&self.args.original)
            .and_then(|original| Ok((original, CfnTemplate::load(&self.args.new)?)));
        let (original, updated) = match templates {
            Ok(pair) => pair,
            Err(e) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(exit_code::FAILURE));
            }
        };

        let report = CompatChecker::new(&original, &updated).run(&options);
        tracing::debug!(
            "Compared {} with {}: {} violation(s)",
            self.args.original.display(),
            self.args.new.display(),
            report.violations.len()
        );

        if self.args.json {
            let json = serde_json::to_string_pretty(&report).map_err(|e| LinterError::Other(e.into()))?;
            ui.report(&json);
        } else {
            ui.report(&report.render());
        }

        Ok(CommandResult::from_success(report.is_compatible()))
    }
}
