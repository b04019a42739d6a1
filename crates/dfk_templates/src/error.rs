//! Error types for catalog loading, rendering and tag derivation.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for Dockerfile generation operations.
pub type DockerfileResult<T> = Result<T, DockerfileError>;

/// The [`ImageSpec`](crate::ImageSpec) field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecField {
    BaseImage,
    LanguageVersion,
    ExtraPackages,
    Variant,
    EnvVars,
}

impl SpecField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecField::BaseImage => "base_image",
            SpecField::LanguageVersion => "language_version",
            SpecField::ExtraPackages => "extra_packages",
            SpecField::Variant => "variant",
            SpecField::EnvVars => "env_vars",
        }
    }
}

impl fmt::Display for SpecField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur while loading templates or generating Dockerfiles.
#[derive(Error, Debug)]
pub enum DockerfileError {
    /// The catalog source is unreadable or one of its entries is malformed.
    #[error("Failed to load template catalog at {path:?}: {message}")]
    CatalogLoad { path: PathBuf, message: String },

    /// No catalog entry matches the requested base image and variant.
    #[error(
        "Unknown base image '{base_image}'{}; supported base images: {}",
        .variant.as_deref().map(|v| format!(" with variant '{}'", v)).unwrap_or_default(),
        .supported.join(", ")
    )]
    UnknownBaseImage {
        base_image: String,
        variant: Option<String>,
        supported: Vec<String>,
    },

    /// A field of the requested image spec violates its constraint.
    #[error("Invalid image spec field '{field}': {message}")]
    InvalidImageSpec { field: SpecField, message: String },

    /// A catalog template references placeholders the renderer cannot fill.
    #[error("Template {entry} left unresolved placeholders: {}", .placeholders.join(", "))]
    TemplateRender {
        entry: String,
        placeholders: Vec<String>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DockerfileError {
    pub(crate) fn catalog_load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        DockerfileError::CatalogLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_spec(field: SpecField, message: impl Into<String>) -> Self {
        DockerfileError::InvalidImageSpec {
            field,
            message: message.into(),
        }
    }

    /// Whether the error stems from user input rather than a broken catalog.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            DockerfileError::UnknownBaseImage { .. } | DockerfileError::InvalidImageSpec { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_base_image_message_lists_supported() {
        let err = DockerfileError::UnknownBaseImage {
            base_image: "plan9".to_string(),
            variant: Some("slim".to_string()),
            supported: vec!["alpine".to_string(), "debian".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("'plan9' with variant 'slim'"));
        assert!(msg.ends_with("alpine, debian"));
        assert!(err.is_user_error());
    }

    #[test]
    fn test_invalid_spec_names_field() {
        let err = DockerfileError::invalid_spec(SpecField::LanguageVersion, "bad");
        assert_eq!(
            err.to_string(),
            "Invalid image spec field 'language_version': bad"
        );
    }
}
