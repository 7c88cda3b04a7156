// src/manifest/mod.rs
//! Bucket manifest schema and per-architecture property selection
//!
//! Manifests are JSON documents. Only the properties that influence
//! dependency resolution are modelled; everything else is ignored at
//! parse time.

mod info;
mod query;

pub use info::ManifestInformation;
pub use query::AppQuery;

use crate::error::Result;
use serde::Deserialize;
use std::path::Path;
use strum_macros::{AsRefStr, Display, EnumString};

/// A property that may be written either as a single value or as a list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(value) => std::slice::from_ref(value),
            OneOrMany::Many(values) => values,
        }
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.as_slice().to_vec()
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(values: Vec<T>) -> Self {
        OneOrMany::Many(values)
    }
}

/// Target architecture of an installation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, AsRefStr)]
pub enum Architecture {
    #[default]
    #[strum(serialize = "64bit")]
    X64,
    #[strum(serialize = "32bit")]
    X86,
    #[strum(serialize = "arm64")]
    Arm64,
}

impl Architecture {
    /// Architecture of the running process
    pub fn host() -> Self {
        match std::env::consts::ARCH {
            "x86" => Self::X86,
            "aarch64" => Self::Arm64,
            _ => Self::X64,
        }
    }
}

/// The `installer` block of a manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Installer {
    #[serde(default)]
    pub script: Option<OneOrMany<String>>,
}

/// Properties that may be overridden per architecture
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ArchOverride {
    #[serde(default)]
    pub url: Option<OneOrMany<String>>,

    #[serde(default)]
    pub pre_install: Option<OneOrMany<String>>,

    #[serde(default)]
    pub installer: Option<Installer>,

    #[serde(default)]
    pub post_install: Option<OneOrMany<String>>,
}

/// The `architecture` table of a manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ArchitectureTable {
    #[serde(rename = "64bit", default)]
    pub x64: Option<ArchOverride>,

    #[serde(rename = "32bit", default)]
    pub x86: Option<ArchOverride>,

    #[serde(default)]
    pub arm64: Option<ArchOverride>,
}

impl ArchitectureTable {
    pub fn get(&self, arch: Architecture) -> Option<&ArchOverride> {
        match arch {
            Architecture::X64 => self.x64.as_ref(),
            Architecture::X86 => self.x86.as_ref(),
            Architecture::Arm64 => self.arm64.as_ref(),
        }
    }
}

/// A parsed bucket manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub depends: OneOrMany<String>,

    #[serde(default)]
    pub url: Option<OneOrMany<String>>,

    #[serde(default)]
    pub pre_install: Option<OneOrMany<String>>,

    #[serde(default)]
    pub installer: Option<Installer>,

    #[serde(default)]
    pub post_install: Option<OneOrMany<String>>,

    #[serde(default)]
    pub innosetup: bool,

    #[serde(default)]
    pub architecture: Option<ArchitectureTable>,
}

impl Manifest {
    /// Parse a manifest from JSON text
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Manifest = serde_json::from_str(content)?;
        Ok(manifest)
    }

    /// Load a manifest from a file path
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    fn arch_override(&self, arch: Architecture) -> Option<&ArchOverride> {
        self.architecture.as_ref().and_then(|table| table.get(arch))
    }

    /// Declared dependency identifiers, verbatim
    pub fn depends(&self) -> &[String] {
        self.depends.as_slice()
    }

    /// Download URLs for `arch`, falling back to the top-level `url`
    pub fn urls(&self, arch: Architecture) -> Vec<String> {
        self.arch_override(arch)
            .and_then(|o| o.url.as_ref())
            .or(self.url.as_ref())
            .map(OneOrMany::to_vec)
            .unwrap_or_default()
    }

    pub fn pre_install(&self, arch: Architecture) -> Vec<String> {
        self.arch_override(arch)
            .and_then(|o| o.pre_install.as_ref())
            .or(self.pre_install.as_ref())
            .map(OneOrMany::to_vec)
            .unwrap_or_default()
    }

    /// Installer script lines for `arch`
    ///
    /// An architecture-level `installer` replaces the top-level one entirely,
    /// even when it carries no script.
    pub fn installer_script(&self, arch: Architecture) -> Vec<String> {
        self.arch_override(arch)
            .and_then(|o| o.installer.as_ref())
            .or(self.installer.as_ref())
            .and_then(|installer| installer.script.as_ref())
            .map(OneOrMany::to_vec)
            .unwrap_or_default()
    }

    pub fn post_install(&self, arch: Architecture) -> Vec<String> {
        self.arch_override(arch)
            .and_then(|o| o.post_install.as_ref())
            .or(self.post_install.as_ref())
            .map(OneOrMany::to_vec)
            .unwrap_or_default()
    }

    /// pre_install, installer script and post_install joined into one text blob
    pub fn install_script(&self, arch: Architecture) -> String {
        let mut lines = self.pre_install(arch);
        lines.extend(self.installer_script(arch));
        lines.extend(self.post_install(arch));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const MANIFEST: &str = r#"{
        "version": "22.01",
        "description": "A file archiver",
        "depends": "extras/vcredist2022",
        "url": "https://example.com/7z-x64.msi",
        "pre_install": ["Write-Host 'one'", "Write-Host 'two'"],
        "installer": { "script": "Expand-7zipArchive \"$dir\\a.7z\"" },
        "architecture": {
            "32bit": {
                "url": ["https://example.com/7z-x86.msi", "https://example.com/extra.zst"],
                "installer": { "file": "setup.exe" }
            },
            "arm64": {
                "post_install": "Expand-ZstdArchive \"$dir\\b.zst\""
            }
        }
    }"#;

    #[test]
    fn test_parse_scalar_or_list_properties() {
        let manifest = Manifest::parse(MANIFEST).unwrap();
        assert_eq!(manifest.version, "22.01");
        assert_eq!(manifest.depends(), ["extras/vcredist2022"]);
        assert_eq!(manifest.pre_install(Architecture::X64).len(), 2);
        assert!(!manifest.innosetup);
    }

    #[test]
    fn test_urls_fall_back_to_top_level() {
        let manifest = Manifest::parse(MANIFEST).unwrap();
        assert_eq!(
            manifest.urls(Architecture::X64),
            vec!["https://example.com/7z-x64.msi".to_string()]
        );
        assert_eq!(manifest.urls(Architecture::X86).len(), 2);
        assert_eq!(
            manifest.urls(Architecture::Arm64),
            vec!["https://example.com/7z-x64.msi".to_string()]
        );
    }

    #[test]
    fn test_arch_installer_replaces_top_level() {
        let manifest = Manifest::parse(MANIFEST).unwrap();
        assert_eq!(manifest.installer_script(Architecture::X64).len(), 1);
        assert!(manifest.installer_script(Architecture::X86).is_empty());
    }

    #[test]
    fn test_install_script_concatenation_order() {
        let manifest = Manifest::parse(MANIFEST).unwrap();
        let script = manifest.install_script(Architecture::Arm64);
        let lines: Vec<&str> = script.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Write-Host 'one'");
        assert!(lines[2].starts_with("Expand-7zipArchive"));
        assert!(lines[3].starts_with("Expand-ZstdArchive"));
    }

    #[test]
    fn test_empty_manifest_defaults() {
        let manifest = Manifest::parse("{}").unwrap();
        assert!(manifest.depends().is_empty());
        assert!(manifest.urls(Architecture::X64).is_empty());
        assert!(manifest.install_script(Architecture::X64).is_empty());
    }

    #[test]
    fn test_architecture_strings() {
        assert_eq!(Architecture::X64.to_string(), "64bit");
        assert_eq!(Architecture::from_str("32bit").unwrap(), Architecture::X86);
        assert_eq!(Architecture::from_str("arm64").unwrap(), Architecture::Arm64);
        assert!(Architecture::from_str("ia64").is_err());
    }
}
