//! Dockerfile generation: spec validation, template rendering and tagging.
//!
//! Generation is a pure, in-memory transform. Writing the result to disk and
//! invoking `docker build` belong to the caller.

use std::collections::HashMap;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::catalog::TemplateCatalog;
use crate::error::{DockerfileError, DockerfileResult, SpecField};
use crate::image_spec::{ImageSpec, ENV_KEY_PATTERN, VERSION_PATTERN};
use crate::manifest::TemplateEntry;
use crate::packages::resolve_packages;
use crate::renderer::{Placeholder, TemplateRenderer};
use crate::tags::{self, TAG_COMPONENT_PATTERN};

/// Output of a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedDockerfile {
    /// Full Dockerfile content
    pub text: String,
    /// Ordered, de-duplicated tags
    pub tags: Vec<String>,
}

impl RenderedDockerfile {
    /// `-t` arguments for `docker build`, one per tag, in tag order.
    pub fn docker_tag_args(&self, image_name: &str) -> Vec<String> {
        self.tags
            .iter()
            .flat_map(|tag| ["-t".to_string(), format!("{}:{}", image_name, tag)])
            .collect()
    }
}

/// Validates image specs and renders them against a catalog.
pub struct DockerfileGenerator {
    renderer: TemplateRenderer,
    version_pattern: Regex,
    tag_component_pattern: Regex,
    env_key_pattern: Regex,
}

impl Default for DockerfileGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl DockerfileGenerator {
    pub fn new() -> Self {
        Self {
            renderer: TemplateRenderer::new(),
            version_pattern: Regex::new(VERSION_PATTERN).expect("version pattern is a valid regex"),
            tag_component_pattern: Regex::new(TAG_COMPONENT_PATTERN)
                .expect("tag pattern is a valid regex"),
            env_key_pattern: Regex::new(ENV_KEY_PATTERN).expect("env key pattern is a valid regex"),
        }
    }

    /// Render the Dockerfile text and tags for `spec`.
    pub fn render(
        &self,
        spec: &ImageSpec,
        catalog: &TemplateCatalog,
    ) -> DockerfileResult<RenderedDockerfile> {
        let entry = self.resolve(spec, catalog)?;
        let text = self.render_text(spec, entry)?;
        let tags = tags::derive_tags(spec, entry);

        debug!(
            "Rendered {} ({} bytes, tags: {})",
            entry.key(),
            text.len(),
            tags.join(", ")
        );
        Ok(RenderedDockerfile { text, tags })
    }

    /// Tags a built image should receive, optionally including a dated tag.
    pub fn derive_tags(
        &self,
        spec: &ImageSpec,
        catalog: &TemplateCatalog,
        build_date: Option<NaiveDate>,
    ) -> DockerfileResult<Vec<String>> {
        let entry = self.resolve(spec, catalog)?;
        Ok(match build_date {
            Some(date) => tags::build_tags(spec, entry, date),
            None => tags::derive_tags(spec, entry),
        })
    }

    /// Validate `spec` and find its catalog entry.
    pub fn resolve<'c>(
        &self,
        spec: &ImageSpec,
        catalog: &'c TemplateCatalog,
    ) -> DockerfileResult<&'c TemplateEntry> {
        if spec.base_image.trim().is_empty() {
            return Err(DockerfileError::invalid_spec(
                SpecField::BaseImage,
                "base image must not be empty",
            ));
        }

        // Checked before lookup so a malformed variant is not reported as an unknown image.
        if let Some(variant) = spec.variant.as_deref() {
            if !self.tag_component_pattern.is_match(variant) {
                return Err(DockerfileError::invalid_spec(
                    SpecField::Variant,
                    format!("'{}' is not a valid tag component", variant),
                ));
            }
        }

        let entry = catalog.lookup(&spec.base_image, spec.variant.as_deref())?;

        if let Some(version) = spec.language_version.as_deref() {
            if !self.version_pattern.is_match(version) {
                return Err(DockerfileError::invalid_spec(
                    SpecField::LanguageVersion,
                    format!(
                        "'{}' does not match MAJOR[.MINOR[.PATCH]]",
                        version
                    ),
                ));
            }
        }

        for (index, package) in spec.extra_packages.iter().enumerate() {
            if package.is_empty() {
                return Err(DockerfileError::invalid_spec(
                    SpecField::ExtraPackages,
                    format!("package #{} is empty", index + 1),
                ));
            }
            if package.chars().any(char::is_whitespace) {
                return Err(DockerfileError::invalid_spec(
                    SpecField::ExtraPackages,
                    format!("package '{}' contains whitespace", package),
                ));
            }
        }

        let mut keys: Vec<&str> = Vec::with_capacity(spec.env_vars.len());
        for pair in &spec.env_vars {
            let Some((key, value)) = pair.split_once('=') else {
                return Err(DockerfileError::invalid_spec(
                    SpecField::EnvVars,
                    format!("'{}' is not KEY=VALUE", pair),
                ));
            };
            if !self.env_key_pattern.is_match(key) {
                return Err(DockerfileError::invalid_spec(
                    SpecField::EnvVars,
                    format!("'{}' is not a valid variable name", key),
                ));
            }
            if value.contains(['\n', '\r']) {
                return Err(DockerfileError::invalid_spec(
                    SpecField::EnvVars,
                    format!("value of {} spans multiple lines", key),
                ));
            }
            if keys.contains(&key) {
                return Err(DockerfileError::invalid_spec(
                    SpecField::EnvVars,
                    format!("{} is set more than once", key),
                ));
            }
            keys.push(key);
        }

        Ok(entry)
    }

    fn render_text(&self, spec: &ImageSpec, entry: &TemplateEntry) -> DockerfileResult<String> {
        let mut unresolved = self.renderer.unknown_placeholders(&entry.template_body);
        unresolved.extend(self.renderer.shell_form_placeholders(&entry.template_body));
        if !unresolved.is_empty() {
            return Err(DockerfileError::TemplateRender {
                entry: entry.key().to_string(),
                placeholders: unresolved,
            });
        }

        if !spec.env_vars.is_empty()
            && !self.renderer.contains(&entry.template_body, Placeholder::EnvVars)
        {
            return Err(DockerfileError::invalid_spec(
                SpecField::EnvVars,
                format!("template {} has no {} placeholder", entry.key(), Placeholder::EnvVars),
            ));
        }

        let version = spec
            .language_version
            .clone()
            .or_else(|| entry.default_language_version.clone())
            .unwrap_or_default();

        let mut values = HashMap::new();
        values.insert(Placeholder::LanguageVersion, version);
        let packages = resolve_packages(
            spec.extra_packages.iter().map(String::as_str),
            entry.package_manager,
        );
        values.insert(Placeholder::ExtraPackages, packages.join(" "));
        values.insert(Placeholder::EnvVars, env_instructions(&spec.env_vars));

        Ok(self.renderer.render_content(&entry.template_body, &values))
    }
}

/// One `ENV` line per pair, ordered by key.
fn env_instructions(pairs: &[String]) -> String {
    let mut pairs: Vec<(&str, &str)> = pairs.iter().filter_map(|p| p.split_once('=')).collect();
    pairs.sort_unstable();
    pairs
        .into_iter()
        .map(|(key, value)| format!("ENV {}={}", key, quote_env_value(value)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn quote_env_value(value: &str) -> String {
    if value.chars().any(|c| c.is_whitespace() || c == '"' || c == '\\') {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packages::PackageManager;

    fn catalog() -> TemplateCatalog {
        TemplateCatalog::from_entries(vec![
            TemplateEntry::new(
                "debian",
                "FROM debian:{LANGUAGE_VERSION}\nRUN apt-get install -y {EXTRA_PACKAGES}\n",
            ),
            TemplateEntry::new("python", "FROM python:{LANGUAGE_VERSION}-slim\n")
                .variant("slim")
                .default_language_version("3.12"),
            TemplateEntry::new("broken", "FROM broken:{RELEASE}\n"),
            TemplateEntry::new(
                "alpine",
                "FROM alpine:{LANGUAGE_VERSION}\n{ENV_VARS}\nRUN apk add {EXTRA_PACKAGES}\n",
            )
            .package_manager(PackageManager::Apk),
            TemplateEntry::new(
                "shellform",
                "FROM debian:${LANGUAGE_VERSION}\nENV PATH=${PATH}\nRUN apt-get install -y ${EXTRA_PACKAGES}\n",
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_render_round_trip() {
        let spec = ImageSpec::new("debian")
            .language_version("12")
            .packages(["git", "curl"]);
        let rendered = DockerfileGenerator::new().render(&spec, &catalog()).unwrap();

        assert_eq!(rendered.text, "FROM debian:12\nRUN apt-get install -y curl git\n");
        assert_eq!(rendered.tags, vec!["debian-12"]);
    }

    #[test]
    fn test_default_language_version() {
        let spec = ImageSpec::new("python").variant("slim");
        let rendered = DockerfileGenerator::new().render(&spec, &catalog()).unwrap();

        assert_eq!(rendered.text, "FROM python:3.12-slim\n");
        assert_eq!(rendered.tags, vec!["python", "python-slim"]);
    }

    #[test]
    fn test_missing_version_without_default_renders_empty() {
        let spec = ImageSpec::new("debian");
        let rendered = DockerfileGenerator::new().render(&spec, &catalog()).unwrap();
        assert_eq!(rendered.text, "FROM debian:\nRUN apt-get install -y \n");
    }

    #[test]
    fn test_unresolved_placeholder_is_render_error() {
        let spec = ImageSpec::new("broken");
        match DockerfileGenerator::new().render(&spec, &catalog()) {
            Err(DockerfileError::TemplateRender { entry, placeholders }) => {
                assert_eq!(entry, "broken");
                assert_eq!(placeholders, vec!["{RELEASE}"]);
            }
            other => panic!("expected TemplateRender, got {:?}", other),
        }
    }

    #[test]
    fn test_shell_form_placeholder_is_render_error() {
        let spec = ImageSpec::new("shellform").language_version("12").package("curl");
        match DockerfileGenerator::new().render(&spec, &catalog()) {
            Err(DockerfileError::TemplateRender { entry, placeholders }) => {
                assert_eq!(entry, "shellform");
                assert_eq!(placeholders, vec!["${LANGUAGE_VERSION}", "${EXTRA_PACKAGES}"]);
            }
            other => panic!("expected TemplateRender, got {:?}", other),
        }
    }

    #[test]
    fn test_env_vars_render_sorted() {
        let spec = ImageSpec::new("alpine")
            .language_version("3.20")
            .env("TZ=UTC")
            .env("APP_HOME=/srv/app")
            .env("GREETING=hello \"world\"")
            .env("EMPTY=");
        let rendered = DockerfileGenerator::new().render(&spec, &catalog()).unwrap();

        assert_eq!(
            rendered.text,
            "FROM alpine:3.20\n\
             ENV APP_HOME=/srv/app\n\
             ENV EMPTY=\n\
             ENV GREETING=\"hello \\\"world\\\"\"\n\
             ENV TZ=UTC\n\
             RUN apk add \n"
        );
    }

    #[test]
    fn test_env_order_does_not_change_output() {
        let generator = DockerfileGenerator::new();
        let forward = ImageSpec::new("alpine").env("A=1").env("B=2");
        let backward = ImageSpec::new("alpine").env("B=2").env("A=1");
        assert_eq!(
            generator.render(&forward, &catalog()).unwrap().text,
            generator.render(&backward, &catalog()).unwrap().text
        );
    }

    #[test]
    fn test_packages_use_entry_package_manager() {
        let spec = ImageSpec::new("alpine")
            .language_version("3.20")
            .packages(["python3-pip", "build-essential", "git"]);
        let rendered = DockerfileGenerator::new().render(&spec, &catalog()).unwrap();
        assert!(rendered.text.ends_with("RUN apk add build-base git py3-pip\n"));
    }

    #[test]
    fn test_invalid_fields() {
        let generator = DockerfileGenerator::new();
        let cases = [
            (ImageSpec::new(""), SpecField::BaseImage),
            (ImageSpec::new("debian").variant("has space"), SpecField::Variant),
            (ImageSpec::new("debian").language_version("12.1.2.3"), SpecField::LanguageVersion),
            (ImageSpec::new("debian").language_version("v12"), SpecField::LanguageVersion),
            (ImageSpec::new("debian").package(""), SpecField::ExtraPackages),
            (ImageSpec::new("debian").package("curl git"), SpecField::ExtraPackages),
            (ImageSpec::new("alpine").env("NOEQUALS"), SpecField::EnvVars),
            (ImageSpec::new("alpine").env("1BAD=x"), SpecField::EnvVars),
            (ImageSpec::new("alpine").env("=x"), SpecField::EnvVars),
            (ImageSpec::new("alpine").env("A=1").env("A=2"), SpecField::EnvVars),
            (ImageSpec::new("alpine").env("A=line\nbreak"), SpecField::EnvVars),
            (ImageSpec::new("debian").env("TZ=UTC"), SpecField::EnvVars),
        ];

        for (spec, expected) in cases {
            match generator.render(&spec, &catalog()) {
                Err(DockerfileError::InvalidImageSpec { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected InvalidImageSpec({}), got {:?}", expected, other),
            }
        }
    }

    #[test]
    fn test_valid_version_forms() {
        let generator = DockerfileGenerator::new();
        for version in ["3", "3.9", "3.9.18"] {
            let spec = ImageSpec::new("debian").language_version(version);
            assert!(generator.render(&spec, &catalog()).is_ok(), "{}", version);
        }
    }

    #[test]
    fn test_derive_tags_with_date() {
        let spec = ImageSpec::new("debian").language_version("12").primary(true);
        let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let tags = DockerfileGenerator::new()
            .derive_tags(&spec, &catalog(), Some(date))
            .unwrap();
        assert_eq!(tags, vec!["debian-12", "debian-12-20250131", "latest"]);
    }

    #[test]
    fn test_docker_tag_args() {
        let rendered = RenderedDockerfile {
            text: String::new(),
            tags: vec!["debian-12".to_string(), "latest".to_string()],
        };
        assert_eq!(
            rendered.docker_tag_args("me/debian"),
            vec!["-t", "me/debian:debian-12", "-t", "me/debian:latest"]
        );
    }
}
