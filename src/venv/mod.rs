//! Python virtual environment management for cfn-lint.
//!
//! cfn-lint is installed into `<project>/.venv` so the linter version is
//! pinned per project and independent of the system Python.

pub mod locator;
pub mod manager;

pub use locator::{LinterLocator, CFN_LINT};
pub use manager::{venv_bin_dir, venv_executable, venv_python, VirtualEnvManager};
