//! Change entry fragments
//!
//! A fragment is a small YAML file authored per change, holding a list of
//! `{type, description}` records. Fragments accumulate in a directory while
//! a release is in progress and are merged into the changelog at release
//! time.

mod aggregate;

pub use aggregate::aggregate;

use std::path::Path;

use serde::Deserialize;
use tracing::debug;
use walkdir::WalkDir;

use keepachange_core::error::EntriesError;

/// A raw change entry parsed from a fragment file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEntry {
    /// Change category, free-form ("Added", "fixed", ...)
    pub category: String,
    /// Single line of prose, may contain markdown links
    pub description: String,
}

/// Fragment record shape. Fields are validated separately so a missing one
/// can be reported by name.
#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(rename = "type")]
    category: Option<String>,
    description: Option<String>,
}

/// Load change entries from a fragment file or a directory tree of
/// fragment files.
///
/// Directories are walked recursively; every file in the tree is parsed as
/// a fragment. Traversal sorts by file name at each level so the resulting
/// entry order is stable across platforms.
pub fn load(path: &Path) -> Result<Vec<ChangeEntry>, EntriesError> {
    if path.is_dir() {
        let mut entries = Vec::new();
        for walked in WalkDir::new(path).sort_by_file_name() {
            let walked = walked.map_err(|e| walk_error(path, e))?;
            if walked.file_type().is_file() {
                entries.extend(load_file(walked.path())?);
            }
        }
        debug!(path = %path.display(), count = entries.len(), "loaded change entries from directory");
        Ok(entries)
    } else {
        load_file(path)
    }
}

fn load_file(path: &Path) -> Result<Vec<ChangeEntry>, EntriesError> {
    let content = std::fs::read_to_string(path).map_err(|source| EntriesError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let raw: Vec<RawEntry> =
        serde_yaml::from_str(&content).map_err(|source| EntriesError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;

    raw.into_iter()
        .map(|entry| {
            let category = entry.category.ok_or(EntriesError::Malformed {
                path: path.to_path_buf(),
                field: "type",
            })?;
            let description = entry.description.ok_or(EntriesError::Malformed {
                path: path.to_path_buf(),
                field: "description",
            })?;
            Ok(ChangeEntry {
                category,
                description,
            })
        })
        .collect()
}

fn walk_error(root: &Path, err: walkdir::Error) -> EntriesError {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other("directory traversal failed"));
    EntriesError::Read { path, source }
}
