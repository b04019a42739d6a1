//! # dfk_templates
//!
//! Dockerfile generation and image tag derivation for dfk.
//!
//! A [`TemplateCatalog`] maps each supported (base image, variant) pair to a
//! Dockerfile template. The [`DockerfileGenerator`] validates an
//! [`ImageSpec`], substitutes its values into the matching template and
//! derives the tags the built image should carry.
//!
//! Placeholders understood in template bodies:
//!
//! - `{LANGUAGE_VERSION}`: the requested version, or the entry's default
//! - `{EXTRA_PACKAGES}`: requested packages, translated for the entry's
//!   package manager, sorted and space-joined
//! - `{ENV_VARS}`: one `ENV KEY=VALUE` line per requested variable, by key
//!
//! `${NAME}` is left alone as a shell variable, except for the names above,
//! which make the template invalid.
//!
//! ## Example
//!
//! ```rust,no_run
//! use dfk_templates::{DockerfileGenerator, ImageSpec, TemplateCatalog};
//!
//! let catalog = TemplateCatalog::load("templates").unwrap();
//! let spec = ImageSpec::new("debian")
//!     .language_version("12")
//!     .packages(["git", "curl"])
//!     .primary(true);
//!
//! let rendered = DockerfileGenerator::new().render(&spec, &catalog).unwrap();
//! assert_eq!(rendered.tags, vec!["debian-12", "latest"]);
//! ```

pub mod catalog;
pub mod error;
pub mod generator;
pub mod image_spec;
pub mod loader;
pub mod manifest;
pub mod packages;
pub mod renderer;
pub mod scan;
pub mod tags;

pub use catalog::TemplateCatalog;
pub use error::{DockerfileError, DockerfileResult, SpecField};
pub use generator::{DockerfileGenerator, RenderedDockerfile};
pub use image_spec::ImageSpec;
pub use loader::CatalogLoader;
pub use manifest::{CatalogKey, TemplateEntry, TemplateManifest};
pub use packages::PackageManager;
pub use renderer::{Placeholder, TemplateRenderer};
pub use scan::{DockerfileMetadata, DockerfileScanner, TagReport};
pub use tags::{build_tags, derive_tags, LATEST_TAG};
