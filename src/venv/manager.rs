//! Virtual environment lifecycle.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::config::{LinterConfig, DEFAULT_CFN_LINT_REQUIREMENT};
use crate::environment::system_python;
use crate::error::{LinterError, Result};
use crate::shell::{display_command, execute, execute_check, CommandOptions};

/// Seconds allowed for `pip install` invocations.
const INSTALL_TIMEOUT: u64 = 600;

/// Seconds allowed for `cfn-lint --version`.
const VERSION_TIMEOUT: u64 = 10;

/// Directory holding executables inside a virtual environment.
pub fn venv_bin_dir(venv_path: &Path) -> PathBuf {
    if cfg!(windows) {
        venv_path.join("Scripts")
    } else {
        venv_path.join("bin")
    }
}

/// Path of an executable inside a virtual environment.
pub fn venv_executable(venv_path: &Path, name: &str) -> PathBuf {
    let bin = venv_bin_dir(venv_path);
    if cfg!(windows) {
        bin.join(format!("{}.exe", name))
    } else {
        bin.join(name)
    }
}

/// Path of the Python interpreter inside a virtual environment.
pub fn venv_python(venv_path: &Path) -> PathBuf {
    venv_executable(venv_path, "python")
}

/// Manages the project's `.venv` so cfn-lint runs isolated from system Python.
#[derive(Debug, Clone)]
pub struct VirtualEnvManager {
    project_root: PathBuf,
    venv_path: PathBuf,
    requirements_file: PathBuf,
    requirement: String,
    base_python: Option<PathBuf>,
}

impl VirtualEnvManager {
    /// Create a manager for `<project_root>/.venv`.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        Self {
            venv_path: project_root.join(".venv"),
            requirements_file: project_root.join("tests").join("requirements.txt"),
            requirement: DEFAULT_CFN_LINT_REQUIREMENT.to_string(),
            base_python: None,
            project_root,
        }
    }

    /// Create a manager honouring the project config.
    pub fn from_config(project_root: impl Into<PathBuf>, config: &LinterConfig) -> Self {
        let mut manager = Self::new(project_root);
        if let Some(file) = &config.requirements_file {
            manager.requirements_file = manager.project_root.join(file);
        }
        manager.requirement = config.cfn_lint_requirement().to_string();
        manager
    }

    /// Use a specific interpreter to create the venv.
    pub fn with_base_python(mut self, python: impl Into<PathBuf>) -> Self {
        self.base_python = Some(python.into());
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn venv_path(&self) -> &Path {
        &self.venv_path
    }

    pub fn bin_dir(&self) -> PathBuf {
        venv_bin_dir(&self.venv_path)
    }

    /// Whether the venv exists and has an interpreter.
    pub fn is_valid_venv(&self) -> bool {
        venv_python(&self.venv_path).is_file()
    }

    /// Ensure the virtual environment exists, creating it when needed.
    pub fn ensure_venv_exists(&self) -> Result<()> {
        if self.venv_path.exists() && self.is_valid_venv() {
            return Ok(());
        }

        let python = self
            .base_python
            .clone()
            .or_else(system_python)
            .ok_or_else(|| LinterError::VenvCreation {
                path: self.venv_path.clone(),
                message: "no Python interpreter found on PATH".to_string(),
            })?;

        tracing::info!("Creating virtual environment at {}", self.venv_path.display());
        let args = [OsStr::new("-m"), OsStr::new("venv"), self.venv_path.as_os_str()];
        let result = execute(&python, &args, &CommandOptions::default())?;
        if !result.success {
            return Err(LinterError::VenvCreation {
                path: self.venv_path.clone(),
                message: result.stderr.trim().to_string(),
            });
        }

        if self.is_valid_venv() {
            Ok(())
        } else {
            Err(LinterError::VenvCreation {
                path: self.venv_path.clone(),
                message: "interpreter missing after creation".to_string(),
            })
        }
    }

    /// Install cfn-lint (or the project requirements) into the venv.
    pub fn install_dependencies(&self) -> Result<()> {
        self.ensure_venv_exists()?;

        let pip = venv_executable(&self.venv_path, "pip");
        self.run_pip(&pip, &["install", "--upgrade", "pip"])?;

        if self.requirements_file.exists() {
            let file = self.requirements_file.display().to_string();
            self.run_pip(&pip, &["install", "-r", file.as_str()])
        } else {
            self.run_pip(&pip, &["install", self.requirement.as_str()])
        }
    }

    fn run_pip(&self, pip: &Path, args: &[&str]) -> Result<()> {
        tracing::debug!("{}", display_command(pip, args));
        let result = execute(pip, args, &CommandOptions::with_timeout(INSTALL_TIMEOUT))
            .map_err(|e| LinterError::DependencyInstall {
                message: e.to_string(),
            })?;

        if result.success {
            Ok(())
        } else {
            Err(LinterError::DependencyInstall {
                message: format!(
                    "{} exited with {:?}: {}",
                    display_command(pip, args),
                    result.exit_code,
                    result.stderr.trim()
                ),
            })
        }
    }

    /// Path to cfn-lint inside the venv, installing it when missing.
    pub fn cfn_lint_path(&self) -> Result<PathBuf> {
        self.ensure_venv_exists()?;

        let cfn_lint = venv_executable(&self.venv_path, "cfn-lint");
        if cfn_lint.exists() {
            return Ok(cfn_lint);
        }

        self.install_dependencies()
            .map_err(|e| LinterError::CfnLintUnavailable {
                message: format!("not installed and dependency installation failed: {}", e),
            })?;

        if cfn_lint.exists() {
            Ok(cfn_lint)
        } else {
            Err(LinterError::CfnLintUnavailable {
                message: format!("executable not found after installation: {}", cfn_lint.display()),
            })
        }
    }

    /// Path to the venv Python interpreter.
    pub fn python_path(&self) -> Result<PathBuf> {
        self.ensure_venv_exists()?;
        Ok(venv_python(&self.venv_path))
    }

    /// Whether the venv cfn-lint runs `--version` successfully.
    pub fn is_cfn_lint_available(&self) -> bool {
        match self.cfn_lint_path() {
            Ok(path) => execute_check(&path, &["--version"], Some(VERSION_TIMEOUT)),
            Err(_) => false,
        }
    }

    /// Create the venv, install dependencies and confirm cfn-lint works.
    pub fn setup_environment(&self) -> Result<()> {
        self.ensure_venv_exists()?;
        self.install_dependencies()?;

        if self.is_cfn_lint_available() {
            Ok(())
        } else {
            Err(LinterError::CfnLintUnavailable {
                message: "cfn-lint --version failed after setup".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn paths_are_rooted_in_project() {
        let manager = VirtualEnvManager::new("/repo");
        assert_eq!(manager.venv_path(), Path::new("/repo/.venv"));
        if cfg!(windows) {
            assert!(manager.bin_dir().ends_with("Scripts"));
        } else {
            assert_eq!(manager.bin_dir(), PathBuf::from("/repo/.venv/bin"));
            assert_eq!(
                venv_python(manager.venv_path()),
                PathBuf::from("/repo/.venv/bin/python")
            );
        }
    }

    #[test]
    fn config_overrides_requirements() {
        let config = LinterConfig {
            requirements_file: Some("requirements-lint.txt".into()),
            cfn_lint_requirement: Some("cfn-lint==1.0.0".into()),
            ..Default::default()
        };
        let manager = VirtualEnvManager::from_config("/repo", &config);
        assert_eq!(
            manager.requirements_file,
            PathBuf::from("/repo/requirements-lint.txt")
        );
        assert_eq!(manager.requirement, "cfn-lint==1.0.0");
    }

    #[test]
    fn empty_directory_is_not_a_venv() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join(".venv")).unwrap();
        let manager = VirtualEnvManager::new(temp.path());
        assert!(!manager.is_valid_venv());
    }

    #[cfg(unix)]
    #[test]
    fn existing_venv_is_reused() {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join(".venv/bin");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join("python"), "").unwrap();
        std::fs::write(bin.join("cfn-lint"), "").unwrap();

        let manager = VirtualEnvManager::new(temp.path());

        assert!(manager.ensure_venv_exists().is_ok());
        assert_eq!(manager.cfn_lint_path().unwrap(), bin.join("cfn-lint"));
        assert_eq!(manager.python_path().unwrap(), bin.join("python"));
    }

    #[cfg(unix)]
    #[test]
    fn failing_interpreter_reports_venv_error() {
        let temp = TempDir::new().unwrap();
        let manager = VirtualEnvManager::new(temp.path()).with_base_python("/bin/false");

        let err = manager.ensure_venv_exists().unwrap_err();

        assert!(matches!(err, LinterError::VenvCreation { .. }));
        assert!(!manager.is_cfn_lint_available());
    }

    #[cfg(unix)]
    mod install {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        const RECORDING_PIP: &str = r#"#!/bin/sh
bin="$(dirname "$0")"
echo "$*" >> "$bin/pip-calls.log"
case "$*" in
  *--upgrade*) ;;
  *) printf '#!/bin/sh\necho cfn-lint 1.0.0\n' > "$bin/cfn-lint"; chmod +x "$bin/cfn-lint" ;;
esac
"#;

        fn script(path: &Path, body: &str) {
            fs::write(path, body).unwrap();
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
        }

        /// Project with a venv whose pip records its arguments.
        fn project(pip: &str) -> (TempDir, PathBuf) {
            let temp = TempDir::new().unwrap();
            let bin = temp.path().join(".venv/bin");
            fs::create_dir_all(&bin).unwrap();
            script(&bin.join("python"), "#!/bin/sh\n");
            script(&bin.join("pip"), pip);
            (temp, bin)
        }

        fn pip_calls(bin: &Path) -> Vec<String> {
            fs::read_to_string(bin.join("pip-calls.log"))
                .unwrap_or_default()
                .lines()
                .map(String::from)
                .collect()
        }

        #[test]
        fn installs_requirements_file_when_present() {
            let (temp, bin) = project(RECORDING_PIP);
            let requirements = temp.path().join("tests/requirements.txt");
            fs::create_dir_all(requirements.parent().unwrap()).unwrap();
            fs::write(&requirements, "cfn-lint==1.2.0\n").unwrap();

            VirtualEnvManager::new(temp.path()).install_dependencies().unwrap();

            assert_eq!(
                pip_calls(&bin),
                vec![
                    "install --upgrade pip".to_string(),
                    format!("install -r {}", requirements.display()),
                ]
            );
        }

        #[test]
        fn installs_cfn_lint_without_requirements_file() {
            let (temp, bin) = project(RECORDING_PIP);

            VirtualEnvManager::new(temp.path()).install_dependencies().unwrap();

            assert_eq!(
                pip_calls(&bin),
                vec!["install --upgrade pip", "install cfn-lint>=0.83.0"]
            );
        }

        #[test]
        fn cfn_lint_is_installed_on_demand() {
            let (temp, bin) = project(RECORDING_PIP);
            let manager = VirtualEnvManager::new(temp.path());

            assert_eq!(manager.cfn_lint_path().unwrap(), bin.join("cfn-lint"));
            assert_eq!(pip_calls(&bin).len(), 2);

            // Already installed: no further pip runs.
            assert!(manager.is_cfn_lint_available());
            assert_eq!(pip_calls(&bin).len(), 2);
        }

        #[test]
        fn failed_install_is_reported() {
            let (temp, _bin) = project("#!/bin/sh\necho 'no network' >&2\nexit 1\n");
            let manager = VirtualEnvManager::new(temp.path());

            let err = manager.install_dependencies().unwrap_err();
            assert!(matches!(err, LinterError::DependencyInstall { .. }));
            assert!(err.to_string().contains("no network"));

            let err = manager.cfn_lint_path().unwrap_err();
            assert!(matches!(err, LinterError::CfnLintUnavailable { .. }));
        }
    }
}
