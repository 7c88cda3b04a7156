// src/helpers/mod.rs

//! Extraction and installer helper tools
//!
//! Some download formats and install scripts cannot be handled without an
//! external helper (7-Zip for most archives, lessmsi for MSI packages,
//! innounp or innoextract for Inno Setup installers, zstd for Zstandard
//! archives). Helpers are ordinary applications, so a helper that is
//! required but missing becomes a dependency of the manifest that needs it.

mod detection;

pub use detection::HelperDetector;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Known helper tools, named by their application identifier
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    IntoStaticStr,
    EnumIter,
)]
pub enum Helper {
    #[strum(serialize = "7zip")]
    SevenZip,
    #[strum(serialize = "lessmsi")]
    Lessmsi,
    #[strum(serialize = "innounp")]
    Innounp,
    #[strum(serialize = "innoextract")]
    Innoextract,
    #[strum(serialize = "zstd")]
    Zstd,
}

impl Helper {
    /// Application identifier used for lookup and queueing
    pub fn app_name(&self) -> &'static str {
        (*self).into()
    }

    /// Executable the helper puts on `PATH`
    pub fn executable(&self) -> &'static str {
        match self {
            Self::SevenZip => "7z",
            Self::Lessmsi => "lessmsi",
            Self::Innounp => "innounp",
            Self::Innoextract => "innoextract",
            Self::Zstd => "zstd",
        }
    }
}

/// Reports whether a helper is already available
pub trait HelperProbe {
    fn is_installed(&self, helper: Helper) -> bool;
}

/// A fixed set of installed helpers
#[derive(Debug, Clone, Default)]
pub struct InstalledSet {
    installed: BTreeSet<Helper>,
}

impl InstalledSet {
    pub fn new(helpers: impl IntoIterator<Item = Helper>) -> Self {
        Self {
            installed: helpers.into_iter().collect(),
        }
    }

    /// Nothing installed
    pub fn none() -> Self {
        Self::default()
    }
}

impl HelperProbe for InstalledSet {
    fn is_installed(&self, helper: Helper) -> bool {
        self.installed.contains(&helper)
    }
}

/// Finds helper executables on `PATH`
#[derive(Debug, Clone, Copy, Default)]
pub struct PathProbe;

impl HelperProbe for PathProbe {
    fn is_installed(&self, helper: Helper) -> bool {
        which::which(helper.executable()).is_ok()
    }
}

/// Treats a helper as installed when `<root>/apps/<helper>/current` exists
#[derive(Debug, Clone)]
pub struct AppsDirProbe {
    apps_dir: PathBuf,
}

impl AppsDirProbe {
    /// Probe the `apps` directory below `root`
    pub fn new(root: &Path) -> Self {
        Self {
            apps_dir: root.join("apps"),
        }
    }
}

impl HelperProbe for AppsDirProbe {
    fn is_installed(&self, helper: Helper) -> bool {
        self.apps_dir.join(helper.app_name()).join("current").exists()
    }
}

/// Installed if any inner probe says so
pub struct AnyProbe {
    probes: Vec<Box<dyn HelperProbe>>,
}

impl AnyProbe {
    pub fn new(probes: Vec<Box<dyn HelperProbe>>) -> Self {
        Self { probes }
    }
}

impl HelperProbe for AnyProbe {
    fn is_installed(&self, helper: Helper) -> bool {
        self.probes.iter().any(|probe| probe.is_installed(helper))
    }
}
