//! Distribution-specific package names.
//!
//! Specs name packages generically (`build-essential`, `go`); a catalog entry
//! that declares its package manager gets them translated to the names that
//! manager installs.

use serde::{Deserialize, Serialize};

/// Package manager used by a template's base image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Apt,
    Apk,
    Yum,
}

impl PackageManager {
    /// Names to install for a generic package; unknown names pass through.
    pub fn install_names<'a>(&self, package: &'a str) -> &'a str {
        match (self, package) {
            (PackageManager::Apt, "go") => "golang-go",
            (PackageManager::Apt, "rust") => "rustc cargo",
            (PackageManager::Apk, "build-essential") => "build-base",
            (PackageManager::Apk, "python3-pip") => "py3-pip",
            (PackageManager::Apk, "rust") => "rust cargo",
            (PackageManager::Yum, "build-essential") => "gcc gcc-c++ make",
            (PackageManager::Yum, "go") => "golang",
            (PackageManager::Yum, "rust") => "rust cargo",
            _ => package,
        }
    }
}

/// Final install list: translated, split into single names, sorted, de-duplicated.
pub fn resolve_packages<'a>(
    packages: impl IntoIterator<Item = &'a str>,
    manager: Option<PackageManager>,
) -> Vec<&'a str> {
    let mut names: Vec<&str> = packages
        .into_iter()
        .map(|package| match manager {
            Some(manager) => manager.install_names(package),
            None => package,
        })
        .flat_map(str::split_whitespace)
        .collect();
    names.sort_unstable();
    names.dedup();
    names
}
