use std::fs;
use std::path::{Path, PathBuf};

use semver::Version;
use serde::Deserialize;

use crate::domain::parse_version;
use crate::error::{PublishError, Result};

/// The fields of package.json this tool reads; everything else is ignored
#[derive(Debug, Deserialize)]
struct PackageFields {
    name: Option<String>,
    version: Option<String>,
}

/// Read-only view of the package manifest (package.json)
///
/// Every call re-reads the file, so a version written by the registry tool
/// is observed by the next read.
#[derive(Debug, Clone)]
pub struct PackageManifest {
    path: PathBuf,
}

impl PackageManifest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PackageManifest { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and validate the manifest's version
    pub fn read_version(&self) -> Result<Version> {
        let raw = self.read_fields()?.version.ok_or_else(|| {
            PublishError::manifest(format!("{} has no version field", self.path.display()))
        })?;

        parse_version(&raw).map_err(|_| {
            PublishError::manifest(format!("Unable to parse semver from '{}'", raw))
        })
    }

    /// Read the package name, if the manifest declares one
    pub fn read_name(&self) -> Result<Option<String>> {
        Ok(self.read_fields()?.name)
    }

    fn read_fields(&self) -> Result<PackageFields> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            PublishError::manifest(format!("Cannot read {}: {}", self.path.display(), e))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            PublishError::manifest(format!("Cannot parse {}: {}", self.path.display(), e))
        })
    }
}
