//! The immutable catalog of supported base images.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{DockerfileError, DockerfileResult};
use crate::loader::CatalogLoader;
use crate::manifest::{CatalogKey, TemplateEntry};

/// Mapping from (base image, variant) to template entry.
///
/// Built once, then only read. Entries iterate in key order.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    entries: BTreeMap<CatalogKey, TemplateEntry>,
    source: Option<PathBuf>,
}

impl TemplateCatalog {
    /// Load a catalog from a templates directory.
    pub fn load(source: impl AsRef<Path>) -> DockerfileResult<Self> {
        CatalogLoader::new(source.as_ref()).load()
    }

    /// Build a catalog from in-memory entries.
    ///
    /// Fails on a duplicate (base image, variant) pair.
    pub fn from_entries(entries: impl IntoIterator<Item = TemplateEntry>) -> DockerfileResult<Self> {
        let mut catalog = Self::default();
        for entry in entries {
            catalog.insert(entry, Path::new("<memory>"))?;
        }
        Ok(catalog)
    }

    pub(crate) fn with_source(source: PathBuf) -> Self {
        Self {
            entries: BTreeMap::new(),
            source: Some(source),
        }
    }

    pub(crate) fn insert(&mut self, entry: TemplateEntry, origin: &Path) -> DockerfileResult<()> {
        let key = entry.key();
        if self.entries.contains_key(&key) {
            return Err(DockerfileError::catalog_load(
                origin,
                format!("duplicate catalog entry for {}", key),
            ));
        }
        self.entries.insert(key, entry);
        Ok(())
    }

    /// Find the entry for a base image and optional variant.
    pub fn lookup(&self, base_image: &str, variant: Option<&str>) -> DockerfileResult<&TemplateEntry> {
        self.entries
            .get(&CatalogKey::new(base_image, variant))
            .ok_or_else(|| DockerfileError::UnknownBaseImage {
                base_image: base_image.to_string(),
                variant: variant.map(String::from),
                supported: self.base_images(),
            })
    }

    pub fn contains(&self, base_image: &str, variant: Option<&str>) -> bool {
        self.entries.contains_key(&CatalogKey::new(base_image, variant))
    }

    /// All entries in key order.
    pub fn entries(&self) -> impl Iterator<Item = &TemplateEntry> {
        self.entries.values()
    }

    /// Distinct base images, sorted.
    pub fn base_images(&self) -> Vec<String> {
        let mut images: Vec<String> = self.entries.keys().map(|k| k.base_image.clone()).collect();
        images.dedup();
        images
    }

    /// Variants registered for a base image (`None` is the plain flavor).
    pub fn variants_of(&self, base_image: &str) -> Vec<Option<&str>> {
        self.entries
            .keys()
            .filter(|k| k.base_image == base_image)
            .map(|k| k.variant.as_deref())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Directory the catalog was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TemplateCatalog {
        TemplateCatalog::from_entries(vec![
            TemplateEntry::new("debian", "FROM debian:{LANGUAGE_VERSION}\n"),
            TemplateEntry::new("debian", "FROM debian:{LANGUAGE_VERSION}-slim\n").variant("slim"),
            TemplateEntry::new("alpine", "FROM alpine:{LANGUAGE_VERSION}\n"),
        ])
        .unwrap()
    }

    #[test]
    fn test_lookup_exact_variant() {
        let catalog = sample();
        assert_eq!(catalog.len(), 3);
        assert_eq!(
            catalog.lookup("debian", Some("slim")).unwrap().variant.as_deref(),
            Some("slim")
        );
        assert!(catalog.lookup("debian", None).unwrap().variant.is_none());
    }

    #[test]
    fn test_lookup_unknown_lists_supported() {
        let catalog = sample();
        match catalog.lookup("alpine", Some("slim")) {
            Err(DockerfileError::UnknownBaseImage { supported, .. }) => {
                assert_eq!(supported, vec!["alpine", "debian"]);
            }
            other => panic!("expected UnknownBaseImage, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_entries_rejected() {
        let result = TemplateCatalog::from_entries(vec![
            TemplateEntry::new("debian", "FROM debian\n"),
            TemplateEntry::new("debian", "FROM debian:12\n"),
        ]);
        assert!(matches!(result, Err(DockerfileError::CatalogLoad { .. })));
    }

    #[test]
    fn test_variants_of() {
        let catalog = sample();
        assert_eq!(catalog.variants_of("debian"), vec![None, Some("slim")]);
        assert!(catalog.variants_of("ubuntu").is_empty());
    }

    #[test]
    fn test_catalog_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TemplateCatalog>();
    }
}
