//! Post-render cleanup of the destination directory.

use std::path::Path;

use tracing::{debug, info, instrument};

use weekmerge_shared::{Result, WeekMergeError};

/// Delete every entry in `dest` except the file named `keep`.
///
/// Subdirectories are removed recursively, whatever their name. Returns the
/// number of top-level entries removed. Running this before rendering
/// leaves `dest` empty.
#[instrument(skip_all, fields(dest = %dest.display(), keep = %keep))]
pub fn clean(dest: &Path, keep: &str) -> Result<usize> {
    let entries = std::fs::read_dir(dest).map_err(|e| WeekMergeError::io(dest, e))?;

    let mut removed = 0;
    for entry in entries {
        let entry = entry.map_err(|e| WeekMergeError::io(dest, e))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| WeekMergeError::io(&path, e))?;

        if file_type.is_dir() {
            std::fs::remove_dir_all(&path).map_err(|e| WeekMergeError::io(&path, e))?;
        } else if entry.file_name() == keep {
            continue;
        } else {
            std::fs::remove_file(&path).map_err(|e| WeekMergeError::io(&path, e))?;
        }

        debug!(path = %path.display(), "removed");
        removed += 1;
    }

    info!(removed, "destination cleaned");
    Ok(removed)
}
