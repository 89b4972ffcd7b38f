//! CloudFormation template discovery.
//!
//! Walks the templates directory and picks out YAML files that look like
//! CloudFormation templates.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::config::{LinterConfig, DEFAULT_TEMPLATES_DIR};
use crate::error::Result;

/// Extensions accepted as templates (compared case-insensitively).
pub const TEMPLATE_EXTENSIONS: &[&str] = &["yml", "yaml"];

/// File names that are never templates.
pub const EXCLUDED_FILES: &[&str] = &[
    "README.md",
    "readme.md",
    "README.yml",
    "readme.yml",
    "README.yaml",
    "readme.yaml",
    ".gitignore",
    ".gitkeep",
];

/// Category for templates placed directly in the base directory.
pub const ROOT_CATEGORY: &str = "root";

/// Category for templates outside the base directory.
pub const OTHER_CATEGORY: &str = "other";

/// Finds CloudFormation templates under a project.
#[derive(Debug, Clone)]
pub struct TemplateDiscovery {
    project_root: PathBuf,
    templates_base_path: PathBuf,
    excluded: BTreeSet<String>,
}

impl TemplateDiscovery {
    /// Discovery rooted at `<project_root>/templates/v2`.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self::with_templates_dir(project_root, DEFAULT_TEMPLATES_DIR)
    }

    /// Discovery rooted at a templates directory relative to the project.
    pub fn with_templates_dir(project_root: impl Into<PathBuf>, templates_dir: impl AsRef<Path>) -> Self {
        let project_root = project_root.into();
        Self {
            templates_base_path: project_root.join(templates_dir),
            excluded: EXCLUDED_FILES.iter().map(|s| s.to_string()).collect(),
            project_root,
        }
    }

    /// Discovery configured from `.cfn-linter.yml`.
    pub fn from_config(project_root: impl Into<PathBuf>, config: &LinterConfig) -> Self {
        let mut discovery = Self::with_templates_dir(project_root, config.templates_dir());
        discovery.excluded.extend(config.excluded_files.iter().cloned());
        discovery
    }

    /// Exclude an additional file name.
    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.excluded.insert(name.into());
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn templates_base_path(&self) -> &Path {
        &self.templates_base_path
    }

    /// Whether `path` should be validated as a CloudFormation template.
    pub fn is_cloudformation_template(&self, path: &Path) -> bool {
        if !path.is_file() {
            return false;
        }
        self.matches_template_name(path)
    }

    /// Name-based half of [`is_cloudformation_template`](Self::is_cloudformation_template).
    pub fn matches_template_name(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
            return false;
        };

        if self.excluded.contains(name.as_ref()) {
            return false;
        }

        let has_extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .is_some_and(|e| TEMPLATE_EXTENSIONS.contains(&e.as_str()));
        if !has_extension {
            return false;
        }

        name.to_lowercase().contains("template") || path.starts_with(&self.templates_base_path)
    }

    /// Find every template under `base` (default: the templates directory).
    ///
    /// A missing base directory yields an empty list. Unreadable
    /// directories, the base included, are logged and skipped. Results
    /// are sorted.
    pub fn find_templates(&self, base: Option<&Path>) -> Result<Vec<PathBuf>> {
        let base = base.unwrap_or(&self.templates_base_path);
        if !base.exists() {
            tracing::warn!("Templates directory not found: {}", base.display());
            return Ok(Vec::new());
        }

        let mut templates = Vec::new();
        if base.is_file() {
            if self.is_cloudformation_template(base) {
                templates.push(base.to_path_buf());
            }
            return Ok(templates);
        }

        if let Err(e) = self.walk(base, &mut templates) {
            tracing::warn!("Skipping {}: {}", base.display(), e);
        }
        templates.sort();
        tracing::debug!("Found {} templates under {}", templates.len(), base.display());
        Ok(templates)
    }

    // Symlinked directories are not followed.
    fn walk(&self, dir: &Path, templates: &mut Vec<PathBuf>) -> Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();

            if entry.file_type()?.is_dir() {
                if let Err(e) = self.walk(&path, templates) {
                    tracing::warn!("Skipping {}: {}", path.display(), e);
                }
            } else if self.is_cloudformation_template(&path) {
                templates.push(path);
            }
        }
        Ok(())
    }

    /// Number of templates under `base`.
    pub fn template_count(&self, base: Option<&Path>) -> Result<usize> {
        Ok(self.find_templates(base)?.len())
    }

    /// Templates grouped by their first directory below `base`.
    pub fn templates_by_category(&self, base: Option<&Path>) -> Result<BTreeMap<String, Vec<PathBuf>>> {
        let base_path = base.unwrap_or(&self.templates_base_path).to_path_buf();
        let mut categories: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();

        for template in self.find_templates(Some(&base_path))? {
            let category = category_of(&template, &base_path);
            categories.entry(category).or_default().push(template);
        }

        Ok(categories)
    }
}

fn category_of(template: &Path, base: &Path) -> String {
    let Ok(relative) = template.strip_prefix(base) else {
        return OTHER_CATEGORY.to_string();
    };

    let components: Vec<_> = relative.components().collect();
    match components.as_slice() {
        [Component::Normal(dir), _, ..] => dir.to_string_lossy().into_owned(),
        _ => ROOT_CATEGORY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn write(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "AWSTemplateFormatVersion: '2010-09-09'\n").unwrap();
    }

    fn project() -> TempDir {
        let temp = TempDir::new().unwrap();
        let base = temp.path().join("templates/v2");
        write(&base.join("pipeline.yml"));
        write(&base.join("storage/buckets.yaml"));
        write(&base.join("storage/nested/queue.YML"));
        write(&base.join("iam/roles.yml"));
        write(&base.join("README.yml"));
        write(&base.join("notes.txt"));
        write(&base.join("storage/.gitkeep"));
        temp
    }

    #[test]
    fn finds_templates_sorted() {
        let temp = project();
        let discovery = TemplateDiscovery::new(temp.path());

        let templates = discovery.find_templates(None).unwrap();
        let names: Vec<_> = templates
            .iter()
            .map(|p| p.strip_prefix(discovery.templates_base_path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            names,
            vec![
                PathBuf::from("iam/roles.yml"),
                PathBuf::from("pipeline.yml"),
                PathBuf::from("storage/buckets.yaml"),
                PathBuf::from("storage/nested/queue.YML"),
            ]
        );
    }

    #[test]
    fn missing_base_is_empty() {
        let temp = TempDir::new().unwrap();
        let discovery = TemplateDiscovery::new(temp.path());
        assert!(discovery.find_templates(None).unwrap().is_empty());
        assert_eq!(discovery.template_count(None).unwrap(), 0);
    }

    #[test]
    fn outside_base_requires_template_in_name() {
        let temp = project();
        let discovery = TemplateDiscovery::new(temp.path());
        let other = temp.path().join("infra");
        write(&other.join("vpc.yml"));
        write(&other.join("vpc-template.yaml"));

        let found = discovery.find_templates(Some(&other)).unwrap();

        assert_eq!(found, vec![other.join("vpc-template.yaml")]);
    }

    #[test]
    fn categories_group_by_first_directory() {
        let temp = project();
        let discovery = TemplateDiscovery::new(temp.path());

        let categories = discovery.templates_by_category(None).unwrap();

        assert_eq!(
            categories.keys().collect::<Vec<_>>(),
            vec!["iam", "root", "storage"]
        );
        assert_eq!(categories["storage"].len(), 2);
        assert_eq!(categories["root"].len(), 1);
    }

    #[test]
    fn template_outside_base_is_other() {
        assert_eq!(
            category_of(Path::new("/x/other-template.yml"), Path::new("/repo/templates/v2")),
            OTHER_CATEGORY
        );
    }

    #[test]
    fn configured_exclusions_apply() {
        let temp = project();
        let config = LinterConfig {
            excluded_files: vec!["roles.yml".to_string()],
            ..Default::default()
        };
        let discovery = TemplateDiscovery::from_config(temp.path(), &config);

        let templates = discovery.find_templates(None).unwrap();

        assert_eq!(templates.len(), 3);
        assert!(!templates.iter().any(|p| p.ends_with("roles.yml")));
    }

    #[test]
    fn directories_are_not_templates() {
        let temp = project();
        let discovery = TemplateDiscovery::new(temp.path());
        let dir = temp.path().join("templates/v2/storage.yml");
        fs::create_dir_all(&dir).unwrap();
        assert!(!discovery.is_cloudformation_template(&dir));
    }

    #[cfg(unix)]
    #[test]
    fn directory_symlinks_are_not_followed() {
        let temp = TempDir::new().unwrap();
        let base = temp.path().join("templates/v2");
        write(&base.join("app/stack.yml"));
        std::os::unix::fs::symlink(&base, base.join("app/loop")).unwrap();
        std::os::unix::fs::symlink(base.join("app/stack.yml"), base.join("linked.yml")).unwrap();

        let templates = TemplateDiscovery::new(temp.path()).find_templates(None).unwrap();

        assert_eq!(templates, vec![base.join("app/stack.yml"), base.join("linked.yml")]);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_base_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let temp = project();
        let base = temp.path().join("templates/v2");
        fs::set_permissions(&base, fs::Permissions::from_mode(0o000)).unwrap();
        let readable_anyway = fs::read_dir(&base).is_ok();

        let result = TemplateDiscovery::new(temp.path()).find_templates(None);

        fs::set_permissions(&base, fs::Permissions::from_mode(0o755)).unwrap();
        // Root ignores directory permissions.
        if !readable_anyway {
            assert!(result.unwrap().is_empty());
        }
    }

    #[cfg(unix)]
    #[test]
    fn base_that_cannot_be_listed_is_empty() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("templates")).unwrap();
        std::os::unix::fs::symlink("/dev/null", temp.path().join("templates/v2")).unwrap();

        let templates = TemplateDiscovery::new(temp.path()).find_templates(None).unwrap();

        assert!(templates.is_empty());
    }

    proptest! {
        #[test]
        fn name_rule_matches_extension_and_location(
            stem in "[a-z][a-z0-9_-]{0,12}",
            ext in prop::sample::select(vec!["yml", "yaml", "YAML", "json", "txt", "md"]),
            under_base in any::<bool>(),
        ) {
            let discovery = TemplateDiscovery::new("/repo");
            let dir = if under_base { "/repo/templates/v2/app" } else { "/repo/elsewhere" };
            let path = PathBuf::from(format!("{}/{}.{}", dir, stem, ext));

            let file_name = format!("{}.{}", stem, ext);
            let expected = ["yml", "yaml"].contains(&ext.to_lowercase().as_str())
                && !EXCLUDED_FILES.contains(&file_name.as_str())
                && (under_base || stem.contains("template"));

            prop_assert_eq!(discovery.matches_template_name(&path), expected);
        }
    }
}
