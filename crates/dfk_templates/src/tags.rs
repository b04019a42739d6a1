//! Image tag derivation.
//!
//! Tag order is significant: it is the order of `-t` flags handed to
//! `docker build`.

use chrono::NaiveDate;

use crate::image_spec::ImageSpec;
use crate::manifest::TemplateEntry;

/// Tag applied to the primary configuration of a base image.
pub const LATEST_TAG: &str = "latest";

/// Date format of dated build tags.
pub const DATE_TAG_FORMAT: &str = "%Y%m%d";

/// Docker tag grammar, applied to variants and tag prefixes.
pub(crate) const TAG_COMPONENT_PATTERN: &str = r"^[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}$";

/// Tags for a rendered image: versioned tag, variant tag, then `latest`.
pub fn derive_tags(spec: &ImageSpec, entry: &TemplateEntry) -> Vec<String> {
    let mut tags = qualified_tags(spec, entry);
    if spec.primary {
        tags.push(LATEST_TAG.to_string());
    }
    dedup_preserving_order(tags)
}

/// Tags for a built image, adding `{most-qualified}-{YYYYMMDD}` before `latest`.
pub fn build_tags(spec: &ImageSpec, entry: &TemplateEntry, date: NaiveDate) -> Vec<String> {
    let mut tags = qualified_tags(spec, entry);
    if let Some(most_qualified) = tags.last().cloned() {
        tags.push(format!("{}-{}", most_qualified, date.format(DATE_TAG_FORMAT)));
    }
    if spec.primary {
        tags.push(LATEST_TAG.to_string());
    }
    dedup_preserving_order(tags)
}

fn qualified_tags(spec: &ImageSpec, entry: &TemplateEntry) -> Vec<String> {
    let base = match spec.language_version.as_deref() {
        Some(version) => format!("{}-{}", entry.default_tag_prefix, version),
        None => entry.default_tag_prefix.clone(),
    };

    let mut tags = vec![base.clone()];
    if let Some(variant) = spec.variant.as_deref() {
        tags.push(format!("{}-{}", base, variant));
    }
    tags
}

/// Drop repeated tags, keeping the first occurrence.
pub fn dedup_preserving_order(tags: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(tags.len());
    for tag in tags {
        if !seen.contains(&tag) {
            seen.push(tag);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn debian() -> TemplateEntry {
        TemplateEntry::new("debian", "FROM debian:{LANGUAGE_VERSION}\n")
    }

    #[test]
    fn test_versioned_tag() {
        let spec = ImageSpec::new("debian").language_version("12");
        assert_eq!(derive_tags(&spec, &debian()), vec!["debian-12"]);
    }

    #[test]
    fn test_unversioned_tag_uses_prefix() {
        let spec = ImageSpec::new("debian");
        assert_eq!(derive_tags(&spec, &debian()), vec!["debian"]);
    }

    #[test]
    fn test_variant_without_version() {
        let spec = ImageSpec::new("debian").variant("slim");
        assert_eq!(derive_tags(&spec, &debian()), vec!["debian", "debian-slim"]);
    }

    #[test]
    fn test_custom_prefix_and_latest() {
        let entry = debian().tag_prefix("deb");
        let spec = ImageSpec::new("debian")
            .language_version("12")
            .variant("slim")
            .primary(true);
        assert_eq!(
            derive_tags(&spec, &entry),
            vec!["deb-12", "deb-12-slim", "latest"]
        );
    }

    #[test]
    fn test_build_tags_add_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let spec = ImageSpec::new("debian")
            .language_version("12")
            .variant("slim")
            .primary(true);
        assert_eq!(
            build_tags(&spec, &debian(), date),
            vec!["debian-12", "debian-12-slim", "debian-12-slim-20240309", "latest"]
        );
    }

    #[test]
    fn test_dedup_preserving_order() {
        let tags = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        assert_eq!(dedup_preserving_order(tags), vec!["a", "b"]);
    }

    #[test]
    fn test_prefix_equal_to_latest_is_deduplicated() {
        let entry = debian().tag_prefix("latest");
        let spec = ImageSpec::new("debian").primary(true);
        assert_eq!(derive_tags(&spec, &entry), vec!["latest"]);
    }
}
