//! Replace-bucket command implementation.
//!
//! The `cfn-linter replace-bucket` command rewrites the
//! `s3://S3_TEMPLATE_BUCKET` placeholder in packaged templates.

use crate::cli::args::ReplaceBucketArgs;
use crate::error::Result;
use crate::rewrite::replace_bucket_placeholder;
use crate::ui::UserInterface;

use super::dispatcher::{exit_code, Command, CommandResult};

/// The replace-bucket command implementation.
pub struct ReplaceBucketCommand {
    args: ReplaceBucketArgs,
}

impl ReplaceBucketCommand {
    /// Create a new replace-bucket command.
    pub fn new(args: ReplaceBucketArgs) -> Self {
        Self { args }
    }
}

impl Command for ReplaceBucketCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let outcome = match replace_bucket_placeholder(&self.args.directory, &self.args.bucket) {
            Ok(outcome) => outcome,
            Err(e) => {
                ui.error(&format!("Error: {}", e));
                return Ok(CommandResult::failure(exit_code::FAILURE));
            }
        };

        for path in &outcome.updated {
            ui.report(&format!("Updated: {}", path.display()));
        }
        for path in &outcome.skipped {
            ui.warning(&format!("Skipped: {}", path.display()));
        }
        if outcome.updated.is_empty() {
            ui.message(&format!(
                "No files under {} reference the bucket placeholder",
                self.args.directory.display()
            ));
        }

        Ok(CommandResult::success())
    }
}
