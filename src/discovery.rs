use std::path::{Path, PathBuf};

use glob::Pattern;
use log::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Recursively collects files under `root` whose file name matches `pattern`.
///
/// Directories never match. Symlinks are listed like the files they point to
/// but never traversed, so link cycles can't trap the walk. Results are
/// sorted so the menu order is stable.
pub fn find_files(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let glob = Pattern::new(pattern).map_err(|source| Error::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut matches = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|source| Error::Discovery {
            pattern: pattern.to_string(),
            source,
        })?;

        // The entry's own type is the link's, so resolve it to skip links
        // to directories too.
        if entry.file_type().is_dir() || entry.path().is_dir() {
            continue;
        }

        if glob.matches(&entry.file_name().to_string_lossy()) {
            matches.push(entry.into_path());
        }
    }

    matches.sort();
    debug!(
        "Found {} file(s) matching `{}` under {}",
        matches.len(),
        pattern,
        root.display()
    );
    Ok(matches)
}
