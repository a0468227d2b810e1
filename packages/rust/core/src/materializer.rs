//! Destination directory materialization.
//!
//! Resets the destination and merges the contents of every selected week
//! directory into it. Later weeks overwrite same-named files from earlier ones.

use std::path::Path;

use tracing::{debug, info, instrument};

use weekmerge_shared::{Result, WeekDirectory, WeekMergeError};

/// Remove `path` entirely (if present) and create it again, empty.
pub fn recreate_dir(path: &Path) -> Result<()> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => debug!(path = %path.display(), "removed existing directory"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(WeekMergeError::io(path, e)),
    }

    std::fs::create_dir_all(path).map_err(|e| WeekMergeError::io(path, e))
}

/// Reset `dest` and copy the contents of each week directory into it.
///
/// Weeks are copied in the given order. Returns the number of files copied,
/// counting overwritten files once per copy.
#[instrument(skip_all, fields(source = %source.display(), dest = %dest.display(), weeks = weeks.len()))]
pub fn materialize(source: &Path, dest: &Path, weeks: &[WeekDirectory]) -> Result<usize> {
    materialize_with(source, dest, weeks, |_, _| {})
}

/// Like [`materialize`], calling `on_week(week, files_copied)` after each directory.
pub fn materialize_with(
    source: &Path,
    dest: &Path,
    weeks: &[WeekDirectory],
    mut on_week: impl FnMut(&WeekDirectory, usize),
) -> Result<usize> {
    recreate_dir(dest)?;

    let mut total = 0;
    for week in weeks {
        let week_dir = source.join(&week.name);
        let copied = copy_dir_contents(&week_dir, dest)?;
        debug!(week = %week, copied, "merged week directory");
        on_week(week, copied);
        total += copied;
    }

    info!(files = total, "destination materialized");
    Ok(total)
}

/// Recursively copy everything inside `from` into `to`, keeping nested structure.
///
/// Existing files in `to` are overwritten. An empty `from` copies nothing.
fn copy_dir_contents(from: &Path, to: &Path) -> Result<usize> {
    let entries = std::fs::read_dir(from).map_err(|e| WeekMergeError::io(from, e))?;

    let mut copied = 0;
    for entry in entries {
        let entry = entry.map_err(|e| WeekMergeError::io(from, e))?;
        let src_path = entry.path();
        let dest_path = to.join(entry.file_name());

        // Follows symlinks: linked folders are copied as real directories.
        let metadata =
            std::fs::metadata(&src_path).map_err(|e| WeekMergeError::io(&src_path, e))?;

        if metadata.is_dir() {
            std::fs::create_dir_all(&dest_path)
                .map_err(|e| WeekMergeError::io(&dest_path, e))?;
            copied += copy_dir_contents(&src_path, &dest_path)?;
        } else {
            std::fs::copy(&src_path, &dest_path)
                .map_err(|e| WeekMergeError::io(&src_path, e))?;
            copied += 1;
        }
    }

    Ok(copied)
}
