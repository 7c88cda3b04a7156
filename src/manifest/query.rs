// src/manifest/query.rs

//! Application queries of the form `[bucket/]name[@version]`

use crate::error::{Error, Result};
use std::fmt;

/// A parsed application query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppQuery {
    pub bucket: Option<String>,
    pub name: String,
    pub version: Option<String>,
}

impl AppQuery {
    /// Parse a query string
    ///
    /// Examples:
    /// - "git" → name=git
    /// - "extras/vscode" → bucket=extras, name=vscode
    /// - "main/python@3.11.4" → bucket=main, name=python, version=3.11.4
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidQuery("empty application query".to_string()));
        }

        let (rest, version) = match s.split_once('@') {
            Some((rest, version)) => {
                let version = version.trim();
                if version.is_empty() {
                    return Err(Error::InvalidQuery(format!("missing version after '@' in '{}'", s)));
                }
                (rest, Some(version.to_string()))
            }
            None => (s, None),
        };

        let (bucket, name) = match rest.rsplit_once('/') {
            Some((bucket, name)) => {
                let bucket = bucket.trim();
                if bucket.is_empty() {
                    return Err(Error::InvalidQuery(format!("empty bucket name in '{}'", s)));
                }
                (Some(bucket.to_string()), name.trim())
            }
            None => (None, rest.trim()),
        };

        if name.is_empty() {
            return Err(Error::InvalidQuery(format!("missing application name in '{}'", s)));
        }
        if let Some(ref bucket) = bucket
            && !is_plain_component(bucket)
        {
            return Err(Error::InvalidQuery(format!("invalid bucket name in '{}'", s)));
        }
        if !is_plain_component(name) {
            return Err(Error::InvalidQuery(format!("invalid application name in '{}'", s)));
        }

        Ok(Self {
            bucket,
            name: name.to_string(),
            version,
        })
    }

    /// Application name of a dependency identifier, or the identifier itself
    /// when it does not parse
    pub fn app_name(identifier: &str) -> String {
        Self::parse(identifier)
            .map(|q| q.name)
            .unwrap_or_else(|_| identifier.trim().to_string())
    }
}

/// Bucket and application names become single path components
fn is_plain_component(part: &str) -> bool {
    part != "." && part != ".." && !part.contains(['/', '\\'])
}

impl fmt::Display for AppQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref bucket) = self.bucket {
            write!(f, "{}/", bucket)?;
        }
        write!(f, "{}", self.name)?;
        if let Some(ref version) = self.version {
            write!(f, "@{}", version)?;
        }
        Ok(())
    }
}
