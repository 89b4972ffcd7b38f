//! Discover command implementation.
//!
//! The `cfn-linter discover` command lists the templates `lint` would
//! validate, optionally grouped by category.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::cli::args::DiscoverArgs;
use crate::config::load_config;
use crate::discovery::TemplateDiscovery;
use crate::error::{LinterError, Result};
use crate::ui::UserInterface;

use super::dispatcher::{exit_code, Command, CommandResult};

/// The discover command implementation.
pub struct DiscoverCommand {
    project_root: PathBuf,
    args: DiscoverArgs,
}

impl DiscoverCommand {
    /// Create a new discover command.
    pub fn new(project_root: &Path, args: DiscoverArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
        }
    }

    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.project_root)
            .unwrap_or(path)
            .display()
            .to_string()
    }

    fn relative_all(&self, paths: &[PathBuf]) -> Vec<String> {
        paths.iter().map(|p| self.relative(p)).collect()
    }
}

impl Command for DiscoverCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut config = match load_config(&self.project_root) {
            Ok(c) => c,
            Err(e) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(exit_code::CONFIGURATION));
            }
        };
        if let Some(dir) = &self.args.templates_dir {
            config.templates_dir = Some(dir.clone());
        }

        let discovery = TemplateDiscovery::from_config(&self.project_root, &config);

        if self.args.by_category {
            let categories = match discovery.templates_by_category(None) {
                Ok(c) => c,
                Err(e) => {
                    ui.error(&format!("Template discovery failed: {}", e));
                    return Ok(CommandResult::failure(exit_code::CONFIGURATION));
                }
            };

            if self.args.json {
                let listed: BTreeMap<&str, Vec<String>> = categories
                    .iter()
                    .map(|(category, paths)| (category.as_str(), self.relative_all(paths)))
                    .collect();
                let json = serde_json::to_string_pretty(&listed).map_err(|e| LinterError::Other(e.into()))?;
                ui.report(&json);
            } else {
                for (category, paths) in &categories {
                    ui.report(&format!("{} ({}):", category, paths.len()));
                    for path in paths {
                        ui.report(&format!("  {}", self.relative(path)));
                    }
                }
            }

            return Ok(if categories.is_empty() {
                CommandResult::failure(exit_code::NO_TEMPLATES)
            } else {
                CommandResult::success()
            });
        }

        let templates = match discovery.find_templates(None) {
            Ok(t) => t,
            Err(e) => {
                ui.error(&format!("Template discovery failed: {}", e));
                return Ok(CommandResult::failure(exit_code::CONFIGURATION));
            }
        };

        if self.args.json {
            let json = serde_json::to_string_pretty(&self.relative_all(&templates))
                .map_err(|e| LinterError::Other(e.into()))?;
            ui.report(&json);
        } else if templates.is_empty() {
            ui.warning(&format!(
                "No CloudFormation templates found in {}",
                discovery.templates_base_path().display()
            ));
        } else {
            for template in &templates {
                ui.report(&self.relative(template));
            }
            ui.success(&format!("{} template(s) found", templates.len()));
        }

        Ok(if templates.is_empty() {
            CommandResult::failure(exit_code::NO_TEMPLATES)
        } else {
            CommandResult::success()
        })
    }
}
