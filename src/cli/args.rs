//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::inventory::DEFAULT_OUTPUT_DIR;
use crate::report::ReportFormat;

/// cfn-linter - CloudFormation template validation and pipeline tooling.
#[derive(Debug, Parser)]
#[command(name = "cfn-linter")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate CloudFormation templates with cfn-lint (default)
    Lint(LintArgs),

    /// List the templates that would be validated
    Discover(DiscoverArgs),

    /// Show the detected execution environment
    Env(EnvArgs),

    /// Create the virtual environment and install cfn-lint
    Setup,

    /// Show the parameters, conditions and resources of a template
    Inspect(InspectArgs),

    /// Check that a new template version is backward compatible
    Compat(CompatArgs),

    /// Replace the S3 bucket placeholder in packaged templates
    ReplaceBucket(ReplaceBucketArgs),

    /// Write a versioned inventory of an S3 bucket
    Inventory(InventoryArgs),

    /// Show the project configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `lint` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct LintArgs {
    /// Templates directory relative to the project root
    #[arg(long, env = "CFN_LINTER_TEMPLATES_DIR")]
    pub templates_dir: Option<String>,

    /// Treat warnings as failures
    #[arg(long)]
    pub fail_on_warnings: bool,

    /// Only print the summary block
    #[arg(long)]
    pub summary_only: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Human)]
    pub format: ReportFormat,

    /// cfn-lint executable to use instead of the virtual environment
    #[arg(long = "cfn-lint", env = "CFN_LINTER_CFN_LINT", value_name = "PATH")]
    pub cfn_lint: Option<PathBuf>,

    /// Run cfn-lint from PATH instead of the project's virtual environment
    #[arg(long)]
    pub no_venv: bool,

    /// Per-template timeout in seconds
    #[arg(long, env = "CFN_LINTER_TIMEOUT", value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

/// Arguments for the `discover` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DiscoverArgs {
    /// Templates directory relative to the project root
    #[arg(long, env = "CFN_LINTER_TEMPLATES_DIR")]
    pub templates_dir: Option<String>,

    /// Group templates by their first directory
    #[arg(long)]
    pub by_category: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `env` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct EnvArgs {
    /// Output the resolved configuration as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `inspect` command.
#[derive(Debug, Clone, clap::Args)]
pub struct InspectArgs {
    /// Template file
    pub template: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `compat` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompatArgs {
    /// Original template
    pub original: PathBuf,

    /// New template version
    pub new: PathBuf,

    /// Property that must be unchanged, as Resource.Property[.Nested] (repeatable)
    #[arg(long = "property", value_name = "RESOURCE.PROPERTY")]
    pub properties: Vec<String>,

    /// Resource whose policy statements must be preserved (repeatable)
    #[arg(long = "policy", value_name = "RESOURCE")]
    pub policies: Vec<String>,

    /// Only check these statement Sids (repeatable)
    #[arg(long = "sid", value_name = "SID")]
    pub sids: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `replace-bucket` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ReplaceBucketArgs {
    /// Directory of packaged templates
    pub directory: PathBuf,

    /// Bucket name to substitute
    pub bucket: String,
}

/// Arguments for the `inventory` command.
#[derive(Debug, Clone, clap::Args)]
pub struct InventoryArgs {
    /// Name of the S3 bucket
    pub bucket: String,

    /// Path prefix in the bucket to inventory
    #[arg(default_value = "")]
    pub path: String,

    /// AWS profile name
    #[arg(long)]
    pub profile: Option<String>,

    /// Output directory for inventory files
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Print the JSON Schema for .cfn-linter.yml
    #[arg(long)]
    pub schema: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
