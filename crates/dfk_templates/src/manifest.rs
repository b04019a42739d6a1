//! Catalog entry definitions.
//!
//! Each supported (base image, variant) combination is described by a
//! `template.yaml` manifest next to its Dockerfile template body. Loading turns
//! the pair into an immutable [`TemplateEntry`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::packages::PackageManager;
use crate::renderer::Placeholder;

fn default_body() -> String {
    "Dockerfile.tmpl".to_string()
}

/// On-disk manifest for one catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateManifest {
    /// Base image identifier (e.g., "debian", "python")
    pub base_image: String,
    /// Variant name (e.g., "slim"); absent for the plain flavor
    #[serde(default)]
    pub variant: Option<String>,
    /// Prefix for derived tags; defaults to the base image
    #[serde(default)]
    pub default_tag_prefix: Option<String>,
    /// Version substituted when a spec does not name one
    #[serde(default)]
    pub default_language_version: Option<String>,
    /// Package manager of the base image; translates generic package names
    #[serde(default)]
    pub package_manager: Option<PackageManager>,
    /// Template body file, relative to the manifest
    #[serde(default = "default_body")]
    pub body: String,
    /// Placeholders the body must contain
    #[serde(default)]
    pub required_placeholders: Vec<Placeholder>,
    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
}

impl TemplateManifest {
    /// Turn the manifest into an entry with the given body text.
    pub fn into_entry(self, template_body: String) -> TemplateEntry {
        let prefix = self
            .default_tag_prefix
            .unwrap_or_else(|| self.base_image.clone());
        TemplateEntry {
            base_image: self.base_image,
            variant: self.variant,
            template_body,
            default_tag_prefix: prefix,
            default_language_version: self.default_language_version,
            package_manager: self.package_manager,
            description: self.description,
        }
    }
}

/// Lookup key of a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CatalogKey {
    pub base_image: String,
    pub variant: Option<String>,
}

impl CatalogKey {
    pub fn new(base_image: impl Into<String>, variant: Option<&str>) -> Self {
        Self {
            base_image: base_image.into(),
            variant: variant.map(String::from),
        }
    }
}

impl fmt::Display for CatalogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.variant {
            Some(variant) => write!(f, "{}/{}", self.base_image, variant),
            None => write!(f, "{}", self.base_image),
        }
    }
}

/// One supported base image/variant combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateEntry {
    pub base_image: String,
    pub variant: Option<String>,
    pub template_body: String,
    pub default_tag_prefix: String,
    pub default_language_version: Option<String>,
    pub package_manager: Option<PackageManager>,
    pub description: Option<String>,
}

impl TemplateEntry {
    /// Create an entry whose tag prefix equals the base image.
    pub fn new(base_image: impl Into<String>, template_body: impl Into<String>) -> Self {
        let base_image = base_image.into();
        Self {
            default_tag_prefix: base_image.clone(),
            base_image,
            variant: None,
            template_body: template_body.into(),
            default_language_version: None,
            package_manager: None,
            description: None,
        }
    }

    pub fn variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    pub fn tag_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.default_tag_prefix = prefix.into();
        self
    }

    pub fn default_language_version(mut self, version: impl Into<String>) -> Self {
        self.default_language_version = Some(version.into());
        self
    }

    pub fn package_manager(mut self, manager: PackageManager) -> Self {
        self.package_manager = Some(manager);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn key(&self) -> CatalogKey {
        CatalogKey::new(self.base_image.clone(), self.variant.as_deref())
    }
}
