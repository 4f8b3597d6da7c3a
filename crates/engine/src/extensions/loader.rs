//! Extension discovery
//!
//! Finds extension scripts directly inside the extensions directory.

use crate::system::System;
use crate::{AbsPath, Result};

/// A discovered extension script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionScript {
    /// File name, used for ordering and reporting
    pub name: String,
    /// Absolute path of the script
    pub path: AbsPath,
}

/// Discover extension scripts in a directory
pub struct ExtensionLoader {
    dir: AbsPath,
    suffix: String,
}

impl ExtensionLoader {
    /// Create a loader for `dir`, accepting file names ending in `suffix`
    pub fn new(dir: AbsPath, suffix: impl Into<String>) -> Self {
        Self {
            dir,
            suffix: suffix.into(),
        }
    }

    /// List runnable scripts, ordered by file name
    ///
    /// Only entries directly inside the directory are considered. An entry
    /// qualifies when its name ends with the suffix and it is, or links to, an
    /// executable regular file. A missing directory yields no scripts.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be listed
    pub fn discover(&self, system: &dyn System) -> Result<Vec<ExtensionScript>> {
        if !system.exists(&self.dir) {
            tracing::debug!(dir = %self.dir, "Extensions directory does not exist");
            return Ok(Vec::new());
        }

        let mut scripts: Vec<ExtensionScript> = system
            .read_dir(&self.dir)?
            .into_iter()
            .filter_map(|path| {
                let Some(name) = path.file_name() else {
                    tracing::debug!(path = %path, "Skipping entry with non UTF-8 name");
                    return None;
                };
                if !name.ends_with(self.suffix.as_str()) {
                    return None;
                }
                if !system.is_executable_file(&path) {
                    tracing::warn!(path = %path, "Skipping non-executable extension");
                    return None;
                }
                Some(ExtensionScript {
                    name: name.to_string(),
                    path,
                })
            })
            .collect();

        // Byte order of the name, never directory order
        scripts.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));

        tracing::debug!(dir = %self.dir, count = scripts.len(), "Discovered extensions");
        Ok(scripts)
    }
}
