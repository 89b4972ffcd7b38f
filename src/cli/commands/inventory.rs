//! Inventory command implementation.
//!
//! The `cfn-linter inventory` command lists every object version under a
//! bucket prefix and writes CSV, summary, JSON and text inventories.

use std::path::PathBuf;

use chrono::{DateTime, Local};

use crate::cli::args::InventoryArgs;
use crate::error::{LinterError, Result};
use crate::inventory::{
    record_failure, run_inventory, InventoryOutcome, InventoryRequest, InventorySource, S3Source,
};
use crate::ui::UserInterface;

use super::dispatcher::{exit_code, Command, CommandResult};

/// The inventory command implementation.
pub struct InventoryCommand {
    args: InventoryArgs,
}

impl InventoryCommand {
    /// Create a new inventory command.
    pub fn new(args: InventoryArgs) -> Self {
        Self { args }
    }

    fn request(&self) -> InventoryRequest {
        InventoryRequest::new(&self.args.bucket, &self.args.path, &self.args.output_dir)
    }

    /// Run against an already connected source.
    pub fn run_with<S: InventorySource>(
        &self,
        source: &S,
        ui: &mut dyn UserInterface,
        now: DateTime<Local>,
    ) -> CommandResult {
        let request = self.request();
        let mut spinner = ui.start_spinner(&format!("Listing versions in s3://{}", request.bucket));

        match run_inventory(source, &request, now) {
            Ok(InventoryOutcome::Empty { prefix }) => {
                spinner.finish_and_clear();
                ui.warning(&format!("No objects found in path: {}", prefix));
                CommandResult::success()
            }
            Ok(InventoryOutcome::Written { files, live_objects }) => {
                spinner.finish_success("Inventory complete");
                ui.report(&format!("Inventory saved to: {}", files.csv.display()));
                ui.report(&format!("Summary saved to: {}", files.summary.display()));
                ui.report(&format!("JSON inventory saved to: {}", files.json.display()));
                ui.report(&format!("Text inventory saved to: {}", files.text.display()));
                ui.success(&format!("{} live object(s) inventoried", live_objects));
                CommandResult::success()
            }
            Err(e) => {
                spinner.finish_error("Inventory failed");
                let error_log = request.files(now).error_log;
                self.report_failure(ui, &e, error_log.is_file().then_some(error_log))
            }
        }
    }

    /// Run against a source that may have failed to connect.
    ///
    /// A connection failure is logged to the error log like any other failure.
    pub fn run_connected<S: InventorySource>(
        &self,
        source: Result<S>,
        ui: &mut dyn UserInterface,
        now: DateTime<Local>,
    ) -> CommandResult {
        match source {
            Ok(source) => self.run_with(&source, ui, now),
            Err(e) => {
                let error_log = record_failure(&self.request(), now, &e.to_string());
                self.report_failure(ui, &e, error_log)
            }
        }
    }

    fn report_failure(
        &self,
        ui: &mut dyn UserInterface,
        err: &LinterError,
        error_log: Option<PathBuf>,
    ) -> CommandResult {
        ui.error(&format!("Error: {}", err));
        if let Some(path) = error_log {
            ui.message(&format!("Error details written to: {}", path.display()));
        }
        CommandResult::failure(exit_code::FAILURE)
    }
}

impl Command for InventoryCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let source = S3Source::connect(self.args.profile.as_deref());
        Ok(self.run_connected(source, ui, Local::now()))
    }
}
