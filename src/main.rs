//! cfn-linter CLI entry point.

use std::process::ExitCode;

use cfn_linter::cli::{Cli, CommandDispatcher};
use cfn_linter::config::find_project_root;
use cfn_linter::environment::EnvironmentDetector;
use cfn_linter::ui::{create_ui, OutputMode};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
///
/// Logs go to stderr so JSON and SARIF reports on stdout stay parseable.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("cfn_linter=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cfn_linter=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("cfn-linter starting with args: {:?}", cli);

    let output_mode = OutputMode::from_flags(cli.quiet, cli.verbose);

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    // --project wins; otherwise walk up to the nearest config file or repository.
    // cfn-lint runs from the project root, so the root must be absolute.
    let cwd = std::env::current_dir().unwrap_or_default();
    let project_root = match &cli.project {
        Some(project) => cwd.join(project),
        None => find_project_root(&cwd).unwrap_or(cwd),
    };

    let is_interactive = !EnvironmentDetector::new(&project_root).is_ci_environment();
    let mut ui = create_ui(is_interactive, output_mode);

    let dispatcher = CommandDispatcher::new(project_root);

    match dispatcher.dispatch(&cli, ui.as_mut()) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
