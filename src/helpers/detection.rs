// src/helpers/detection.rs

//! Helper requirement detection
//!
//! Detection is textual: download URLs are matched by extension and install
//! scripts by the extraction cmdlets they call. Nothing is executed.

use super::{Helper, HelperProbe};
use crate::config::HelperConfig;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use tracing::debug;

/// Archive formats 7-Zip unpacks, with an optional rename suffix (`.tar.gz`, `.7z.custom`)
static SEVENZIP_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(gz|tar|t[abgpx]z2?|lzma|bz2?|7z|001|rar|iso|xz|lzh|nupkg)(\.[^\d.]+)?$")
        .unwrap()
});
static ZSTD_URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\.zst$").unwrap());
static MSI_URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\.msi$").unwrap());

/// Any extraction cmdlet at all
static EXPAND_ANY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bExpand-\w+Archive\b").unwrap());
static EXPAND_7ZIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bExpand-7zipArchive\b").unwrap());
static EXPAND_MSI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bExpand-MsiArchive\b").unwrap());
static EXPAND_INNO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bExpand-InnoArchive\b").unwrap());
static EXPAND_ZSTD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bExpand-ZstdArchive\b").unwrap());
/// Inline per-call switch selecting innoextract
static INNOEXTRACT_SWITCH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bExpand-InnoArchive\b[^\r\n]*\s-UseInnoextract\b").unwrap());

/// Capabilities referenced by a manifest, before policy is applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Capabilities {
    sevenzip: bool,
    msi: bool,
    inno: bool,
    /// An inline `-UseInnoextract` switch was seen
    inno_override: bool,
    zstd: bool,
}

impl Capabilities {
    fn is_empty(&self) -> bool {
        !(self.sevenzip || self.msi || self.inno || self.zstd)
    }

    fn union(self, other: Capabilities) -> Capabilities {
        Capabilities {
            sevenzip: self.sevenzip || other.sevenzip,
            msi: self.msi || other.msi,
            inno: self.inno || other.inno,
            inno_override: self.inno_override || other.inno_override,
            zstd: self.zstd || other.zstd,
        }
    }
}

/// Helper Requirement Detector
///
/// Turns URLs, script text and the `innosetup` flag into the set of helpers
/// that still have to be installed.
pub struct HelperDetector<'a> {
    config: &'a HelperConfig,
    probe: &'a dyn HelperProbe,
}

impl<'a> HelperDetector<'a> {
    pub fn new(config: &'a HelperConfig, probe: &'a dyn HelperProbe) -> Self {
        Self { config, probe }
    }

    /// Helpers implied by the download format of `urls`
    pub fn from_urls(&self, urls: &[String]) -> BTreeSet<Helper> {
        self.finish(Self::scan_urls(urls))
    }

    /// Helpers implied by extraction calls in an install script
    pub fn from_script(&self, script: &str) -> BTreeSet<Helper> {
        self.finish(Self::scan_script(script))
    }

    /// Helpers implied by a manifest-level `innosetup: true` flag
    pub fn from_innosetup_flag(&self, innosetup: bool) -> BTreeSet<Helper> {
        self.finish(Self::scan_flag(innosetup))
    }

    /// Helpers for a whole manifest: its URLs, `innosetup` flag and install script
    ///
    /// Policy runs once over the combined evidence, so an inline
    /// `-UseInnoextract` also applies to the `innosetup` flag.
    pub fn for_manifest(&self, urls: &[String], innosetup: bool, script: &str) -> BTreeSet<Helper> {
        let caps = Self::scan_urls(urls)
            .union(Self::scan_flag(innosetup))
            .union(Self::scan_script(script));
        self.finish(caps)
    }

    fn scan_flag(innosetup: bool) -> Capabilities {
        Capabilities {
            inno: innosetup,
            ..Default::default()
        }
    }

    fn scan_urls(urls: &[String]) -> Capabilities {
        let mut caps = Capabilities::default();
        for url in urls {
            caps.sevenzip |= SEVENZIP_URL_RE.is_match(url);
            caps.zstd |= ZSTD_URL_RE.is_match(url);
            caps.msi |= MSI_URL_RE.is_match(url);
        }
        caps
    }

    fn scan_script(script: &str) -> Capabilities {
        if !EXPAND_ANY_RE.is_match(script) {
            return Capabilities::default();
        }

        Capabilities {
            sevenzip: EXPAND_7ZIP_RE.is_match(script),
            msi: EXPAND_MSI_RE.is_match(script),
            inno: EXPAND_INNO_RE.is_match(script),
            inno_override: INNOEXTRACT_SWITCH_RE.is_match(script),
            zstd: EXPAND_ZSTD_RE.is_match(script),
        }
    }

    /// Apply configuration and installed-state policy to raw capabilities
    fn finish(&self, caps: Capabilities) -> BTreeSet<Helper> {
        let mut helpers = BTreeSet::new();
        if caps.is_empty() {
            return helpers;
        }

        if caps.sevenzip {
            helpers.insert(Helper::SevenZip);
        }
        if caps.msi {
            helpers.insert(Helper::Lessmsi);
        }
        if caps.zstd {
            // Zstandard archives usually wrap a tarball that 7-Zip unpacks
            helpers.insert(Helper::Zstd);
            helpers.insert(Helper::SevenZip);
        }
        if caps.inno {
            if self.config.innosetup_use_innoextract || caps.inno_override {
                helpers.insert(Helper::Innoextract);
            } else {
                helpers.insert(Helper::Innounp);
            }
        }

        if self.config.use_external_7zip {
            helpers.remove(&Helper::SevenZip);
        }

        helpers.retain(|helper| {
            let installed = self.probe.is_installed(*helper);
            if installed {
                debug!("Helper {} already installed", helper);
            }
            !installed
        });

        helpers
    }
}
