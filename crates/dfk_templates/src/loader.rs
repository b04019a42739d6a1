//! Catalog loading from a templates directory.
//!
//! Layout: one sub-directory per entry, each holding a `template.yaml`
//! manifest and the template body it names.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::catalog::TemplateCatalog;
use crate::error::{DockerfileError, DockerfileResult};
use crate::image_spec::VERSION_PATTERN;
use crate::manifest::{TemplateEntry, TemplateManifest};
use crate::renderer::TemplateRenderer;
use crate::tags::TAG_COMPONENT_PATTERN;

/// Catalog loader.
pub struct CatalogLoader {
    templates_path: PathBuf,
    renderer: TemplateRenderer,
    version_pattern: Regex,
    tag_component_pattern: Regex,
}

impl CatalogLoader {
    /// Create a new catalog loader.
    pub fn new(templates_path: impl Into<PathBuf>) -> Self {
        Self {
            templates_path: templates_path.into(),
            renderer: TemplateRenderer::new(),
            version_pattern: Regex::new(VERSION_PATTERN).expect("version pattern is a valid regex"),
            tag_component_pattern: Regex::new(TAG_COMPONENT_PATTERN)
                .expect("tag pattern is a valid regex"),
        }
    }

    /// Load every entry under the templates directory.
    ///
    /// Sub-directories without a manifest are skipped; any malformed entry
    /// fails the whole load.
    pub fn load(&self) -> DockerfileResult<TemplateCatalog> {
        if !self.templates_path.is_dir() {
            return Err(DockerfileError::catalog_load(
                &self.templates_path,
                "templates directory does not exist",
            ));
        }

        let mut catalog = TemplateCatalog::with_source(self.templates_path.clone());

        for entry in WalkDir::new(&self.templates_path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                DockerfileError::catalog_load(&self.templates_path, e.to_string())
            })?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }

            match self.manifest_path(path) {
                Some(manifest_path) => {
                    let template = self.load_entry(&manifest_path)?;
                    debug!("Loaded template entry {} from {:?}", template.key(), path);
                    catalog.insert(template, path)?;
                }
                None => warn!("Skipping {:?}: no template.yaml found", path),
            }
        }

        info!(
            "Loaded {} template entries from {:?}",
            catalog.len(),
            self.templates_path
        );
        Ok(catalog)
    }

    fn manifest_path(&self, dir: &Path) -> Option<PathBuf> {
        ["template.yaml", "template.yml"]
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.is_file())
    }

    /// Load and validate a single entry from its manifest file.
    pub fn load_entry(&self, manifest_path: &Path) -> DockerfileResult<TemplateEntry> {
        let content = fs::read_to_string(manifest_path)
            .map_err(|e| DockerfileError::catalog_load(manifest_path, e.to_string()))?;
        let manifest: TemplateManifest = serde_yaml::from_str(&content)
            .map_err(|e| DockerfileError::catalog_load(manifest_path, e.to_string()))?;

        let dir = manifest_path.parent().unwrap_or_else(|| Path::new("."));
        let body_path = dir.join(&manifest.body);
        let body = fs::read_to_string(&body_path).map_err(|e| {
            DockerfileError::catalog_load(&body_path, format!("cannot read template body: {}", e))
        })?;

        let issues = self.validate(&manifest, &body);
        if !issues.is_empty() {
            return Err(DockerfileError::catalog_load(&body_path, issues.join("; ")));
        }

        Ok(manifest.into_entry(body))
    }

    /// Check a manifest and its body, returning every problem found.
    pub fn validate(&self, manifest: &TemplateManifest, body: &str) -> Vec<String> {
        let mut issues = Vec::new();

        if manifest.base_image.trim().is_empty() {
            issues.push("base_image must not be empty".to_string());
        }
        if matches!(manifest.variant.as_deref(), Some(v) if v.trim().is_empty()) {
            issues.push("variant must not be empty when present".to_string());
        }
        if body.trim().is_empty() {
            issues.push("template body is empty".to_string());
        }

        if let Some(version) = manifest.default_language_version.as_deref() {
            if !self.version_pattern.is_match(version) {
                issues.push(format!(
                    "default_language_version '{}' does not match MAJOR[.MINOR[.PATCH]]",
                    version
                ));
            }
        }
        let prefix = manifest
            .default_tag_prefix
            .as_deref()
            .unwrap_or(&manifest.base_image);
        if !prefix.trim().is_empty() && !self.tag_component_pattern.is_match(prefix) {
            issues.push(format!("tag prefix '{}' is not a valid tag component", prefix));
        }

        for placeholder in &manifest.required_placeholders {
            if !self.renderer.contains(body, *placeholder) {
                issues.push(format!("missing required placeholder {}", placeholder));
            }
        }

        let unknown = self.renderer.unknown_placeholders(body);
        if !unknown.is_empty() {
            issues.push(format!("unknown placeholders: {}", unknown.join(", ")));
        }

        let shell_form = self.renderer.shell_form_placeholders(body);
        if !shell_form.is_empty() {
            issues.push(format!(
                "placeholders written as shell variables: {}",
                shell_form.join(", ")
            ));
        }

        issues
    }
}
