//! Resolution of the cfn-lint executable to run.

use std::path::PathBuf;

use super::manager::VirtualEnvManager;
use crate::error::{LinterError, Result};
use crate::shell::find_in_path;

/// Name of the linter executable.
pub const CFN_LINT: &str = "cfn-lint";

/// Where the linter comes from.
#[derive(Debug, Clone)]
pub enum LinterLocator {
    /// A path given on the command line or in `.cfn-linter.yml`.
    Explicit(PathBuf),
    /// The project's virtual environment, installed on demand.
    Venv(VirtualEnvManager),
    /// Whatever `cfn-lint` is first on `PATH`.
    SystemPath,
}

impl LinterLocator {
    /// Pick a locator: explicit path, then venv, then `PATH`.
    ///
    /// A relative explicit path is taken from the current directory, since
    /// cfn-lint itself is spawned from the project root.
    pub fn choose(explicit: Option<PathBuf>, use_venv: bool, venv: VirtualEnvManager) -> Self {
        match explicit {
            Some(path) => Self::Explicit(absolute(path)),
            None if use_venv => Self::Venv(venv),
            None => Self::SystemPath,
        }
    }

    /// Resolve the linter executable.
    pub fn resolve(&self) -> Result<PathBuf> {
        match self {
            Self::Explicit(path) => {
                if path.is_file() {
                    Ok(path.clone())
                } else {
                    Err(LinterError::CfnLintUnavailable {
                        message: format!("configured executable does not exist: {}", path.display()),
                    })
                }
            }
            Self::Venv(manager) => manager.cfn_lint_path(),
            Self::SystemPath => find_in_path(CFN_LINT).ok_or_else(|| LinterError::CfnLintUnavailable {
                message: format!("{} not found on PATH", CFN_LINT),
            }),
        }
    }

    /// Short description for logs and the environment report.
    pub fn describe(&self) -> String {
        match self {
            Self::Explicit(path) => format!("explicit ({})", path.display()),
            Self::Venv(manager) => format!("venv ({})", manager.venv_path().display()),
            Self::SystemPath => "PATH".to_string(),
        }
    }
}

fn absolute(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_path_wins() {
        let locator = LinterLocator::choose(
            Some(PathBuf::from("/opt/cfn-lint")),
            true,
            VirtualEnvManager::new("/repo"),
        );
        assert!(matches!(locator, LinterLocator::Explicit(_)));
    }

    #[test]
    fn relative_explicit_path_is_made_absolute() {
        let locator = LinterLocator::choose(
            Some(PathBuf::from("tools/cfn-lint")),
            false,
            VirtualEnvManager::new("/repo"),
        );
        let LinterLocator::Explicit(path) = locator else {
            panic!("expected explicit locator");
        };
        assert!(path.is_absolute());
        assert_eq!(path, std::env::current_dir().unwrap().join("tools/cfn-lint"));
    }

    #[test]
    fn venv_used_when_enabled() {
        let locator = LinterLocator::choose(None, true, VirtualEnvManager::new("/repo"));
        assert!(locator.describe().starts_with("venv"));

        let locator = LinterLocator::choose(None, false, VirtualEnvManager::new("/repo"));
        assert_eq!(locator.describe(), "PATH");
    }

    #[test]
    fn missing_explicit_path_is_unavailable() {
        let locator = LinterLocator::Explicit(PathBuf::from("/no/such/cfn-lint"));
        let err = locator.resolve().unwrap_err();
        assert!(err.to_string().contains("/no/such/cfn-lint"));
    }

    #[test]
    fn existing_explicit_path_resolves() {
        let temp = TempDir::new().unwrap();
        let linter = temp.path().join("cfn-lint");
        std::fs::write(&linter, "").unwrap();

        let resolved = LinterLocator::Explicit(linter.clone()).resolve().unwrap();

        assert_eq!(resolved, linter);
    }
}
