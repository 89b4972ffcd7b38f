//! Bucket placeholder substitution in packaged templates.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{LinterError, Result};

/// Placeholder written into templates before packaging.
pub const BUCKET_PLACEHOLDER: &str = "s3://S3_TEMPLATE_BUCKET";

/// Files touched by a replacement run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplaceOutcome {
    pub updated: Vec<PathBuf>,
    /// Files that were not UTF-8 or could not be read or written.
    pub skipped: Vec<PathBuf>,
}

/// Replace [`BUCKET_PLACEHOLDER`] with `s3://<bucket>` in every file under `dir`.
///
/// Only files containing the placeholder are rewritten.
pub fn replace_bucket_placeholder(dir: &Path, bucket: &str) -> Result<ReplaceOutcome> {
    if !dir.exists() {
        return Err(LinterError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Directory {} does not exist", dir.display()),
        )));
    }

    let replacement = format!("s3://{}", bucket);
    let mut outcome = ReplaceOutcome::default();
    if dir.is_file() {
        replace_in_file(dir, &replacement, &mut outcome);
    } else {
        walk(dir, &replacement, &mut outcome)?;
    }
    outcome.updated.sort();
    outcome.skipped.sort();
    Ok(outcome)
}

fn walk(dir: &Path, replacement: &str, outcome: &mut ReplaceOutcome) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            if let Err(e) = walk(&path, replacement, outcome) {
                tracing::warn!("Skipping {}: {}", path.display(), e);
            }
        } else if !path.is_dir() {
            replace_in_file(&path, replacement, outcome);
        }
    }
    Ok(())
}

fn replace_in_file(path: &Path, replacement: &str, outcome: &mut ReplaceOutcome) {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!("Skipping {}: {}", path.display(), e);
            outcome.skipped.push(path.to_path_buf());
            return;
        }
    };

    if !content.contains(BUCKET_PLACEHOLDER) {
        return;
    }

    match fs::write(path, content.replace(BUCKET_PLACEHOLDER, replacement)) {
        Ok(()) => outcome.updated.push(path.to_path_buf()),
        Err(e) => {
            tracing::warn!("Could not write {}: {}", path.display(), e);
            outcome.skipped.push(path.to_path_buf());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn replaces_placeholder_recursively() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("stacks/app");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            nested.join("main.yml"),
            "TemplateURL: s3://S3_TEMPLATE_BUCKET/a.yml\nOther: s3://S3_TEMPLATE_BUCKET/b.yml\n",
        )
        .unwrap();
        fs::write(temp.path().join("untouched.yml"), "Resources: {}\n").unwrap();

        let outcome = replace_bucket_placeholder(temp.path(), "artifacts-123").unwrap();

        assert_eq!(outcome.updated, vec![nested.join("main.yml")]);
        assert!(outcome.skipped.is_empty());
        assert_eq!(
            fs::read_to_string(nested.join("main.yml")).unwrap(),
            "TemplateURL: s3://artifacts-123/a.yml\nOther: s3://artifacts-123/b.yml\n"
        );
    }

    #[test]
    fn binary_files_are_skipped() {
        let temp = TempDir::new().unwrap();
        let blob = temp.path().join("logo.png");
        fs::write(&blob, [0xff, 0xfe, 0x00, 0x81]).unwrap();

        let outcome = replace_bucket_placeholder(temp.path(), "b").unwrap();

        assert!(outcome.updated.is_empty());
        assert_eq!(outcome.skipped, vec![blob.clone()]);
        assert_eq!(fs::read(&blob).unwrap(), vec![0xff, 0xfe, 0x00, 0x81]);
    }

    #[cfg(unix)]
    #[test]
    fn directory_symlinks_are_not_followed() {
        let temp = TempDir::new().unwrap();
        let packaged = temp.path().join("packaged");
        fs::create_dir_all(&packaged).unwrap();
        fs::write(packaged.join("main.yml"), "TemplateURL: s3://S3_TEMPLATE_BUCKET/a.yml\n").unwrap();
        std::os::unix::fs::symlink(&packaged, packaged.join("loop")).unwrap();

        let outcome = replace_bucket_placeholder(&packaged, "b").unwrap();

        assert_eq!(outcome.updated, vec![packaged.join("main.yml")]);
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = replace_bucket_placeholder(&temp.path().join("nope"), "b").unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
