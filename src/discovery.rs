//! Root module discovery.
//!
//! A directory is a root module when it directly contains at least one file
//! with the module extension (`.tf`). Directories named in the skip set are
//! pruned wherever they appear.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const DEFAULT_SKIP_DIRS: &[&str] = &[
    // local terraform cache
    ".terraform",
    // conventional testing directory
    "testdata",
    // reusable child modules, not root modules
    "modules",
];

pub const DEFAULT_MODULE_EXTENSION: &str = "tf";

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("unable to walk {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverConfig {
    pub skip_dirs: Vec<String>,
    pub extension: String,
}

impl Default for DiscoverConfig {
    fn default() -> Self {
        Self {
            skip_dirs: DEFAULT_SKIP_DIRS.iter().map(|s| s.to_string()).collect(),
            extension: DEFAULT_MODULE_EXTENSION.to_string(),
        }
    }
}

impl DiscoverConfig {
    /// Default skip set extended with `extra` names.
    pub fn with_extra_skip_dirs<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = Self::default();
        for name in extra {
            let name = name.into();
            if !config.skip_dirs.contains(&name) {
                config.skip_dirs.push(name);
            }
        }
        config
    }

    fn is_skipped(&self, base_name: &OsStr) -> bool {
        self.skip_dirs.iter().any(|s| OsStr::new(s) == base_name)
    }

    fn is_module_file(&self, path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext == OsStr::new(&self.extension))
    }
}

/// Returns every root module under `start_dir`, sorted and deduplicated.
///
/// A `start_dir` whose own base name is in the skip set yields nothing. Any
/// I/O error during the walk aborts discovery; no partial list is returned.
pub fn find_root_modules(
    start_dir: &Path,
    config: &DiscoverConfig,
) -> Result<Vec<PathBuf>, DiscoveryError> {
    if start_dir
        .file_name()
        .is_some_and(|name| config.is_skipped(name))
    {
        tracing::debug!(start = %start_dir.display(), "start directory is in the skip set");
        return Ok(Vec::new());
    }

    let mut found = BTreeSet::new();
    walk(start_dir, config, &mut found)?;

    tracing::debug!(
        start = %start_dir.display(),
        count = found.len(),
        "root module discovery complete"
    );

    Ok(found.into_iter().collect())
}

fn walk(
    dir: &Path,
    config: &DiscoverConfig,
    found: &mut BTreeSet<PathBuf>,
) -> Result<(), DiscoveryError> {
    let walk_err = |path: &Path, source: io::Error| DiscoveryError::Walk {
        path: path.to_path_buf(),
        source,
    };

    let entries = fs::read_dir(dir).map_err(|e| walk_err(dir, e))?;
    let mut has_module_file = false;

    for entry in entries {
        let entry = entry.map_err(|e| walk_err(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| walk_err(&path, e))?;

        if file_type.is_dir() {
            if config.is_skipped(&entry.file_name()) {
                tracing::trace!(path = %path.display(), "skipping directory");
                continue;
            }
            walk(&path, config, found)?;
        } else if file_type.is_symlink() {
            // NOTE: links are resolved so a dangling one fails the walk, but
            // linked directories are never descended into.
            let target = fs::metadata(&path).map_err(|e| walk_err(&path, e))?;
            if target.is_file() && config.is_module_file(&path) {
                has_module_file = true;
            }
        } else if config.is_module_file(&path) {
            has_module_file = true;
        }
    }

    if has_module_file {
        found.insert(dir.to_path_buf());
    }

    Ok(())
}
