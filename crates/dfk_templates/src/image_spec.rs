//! The user-requested image configuration.

use serde::{Deserialize, Serialize};

/// `MAJOR[.MINOR[.PATCH]]`
pub(crate) const VERSION_PATTERN: &str = r"^\d+(\.\d+){0,2}$";

/// Environment variable names accepted in `KEY=VALUE` pairs.
pub(crate) const ENV_KEY_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

/// Requested base image, language version, packages and variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSpec {
    /// Catalog base image (e.g., "debian")
    pub base_image: String,
    /// Language/OS version (e.g., "3.9", "12")
    #[serde(default)]
    pub language_version: Option<String>,
    /// Packages to install, in request order
    #[serde(default)]
    pub extra_packages: Vec<String>,
    /// Variant (e.g., "slim")
    #[serde(default)]
    pub variant: Option<String>,
    /// `KEY=VALUE` pairs rendered as `ENV` instructions
    #[serde(default)]
    pub env_vars: Vec<String>,
    /// Whether this configuration receives the `latest` tag
    #[serde(default)]
    pub primary: bool,
}

impl ImageSpec {
    pub fn new(base_image: impl Into<String>) -> Self {
        Self {
            base_image: base_image.into(),
            ..Default::default()
        }
    }

    pub fn language_version(mut self, version: impl Into<String>) -> Self {
        self.language_version = Some(version.into());
        self
    }

    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.extra_packages.push(package.into());
        self
    }

    pub fn packages<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_packages.extend(packages.into_iter().map(Into::into));
        self
    }

    pub fn variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    /// Add a `KEY=VALUE` environment variable.
    pub fn env(mut self, pair: impl Into<String>) -> Self {
        self.env_vars.push(pair.into());
        self
    }

    pub fn primary(mut self, primary: bool) -> Self {
        self.primary = primary;
        self
    }
}
