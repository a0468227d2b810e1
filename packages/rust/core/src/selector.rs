//! Week directory selection.
//!
//! Scans the source root for `Week<NN>` directories and keeps the ones
//! inside the requested range, in ascending week order.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, instrument};

use weekmerge_shared::{Result, WeekDirectory, WeekMergeError, WeekRange};

static WEEK_DIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Week(\d{2})$").expect("valid regex"));

/// Parse the week number out of a `Week<NN>` entry name.
///
/// Returns `None` for anything other than `Week` followed by exactly two digits.
pub fn parse_week_dir_name(name: &str) -> Option<u32> {
    WEEK_DIR_RE
        .captures(name)
        .and_then(|caps| caps[1].parse().ok())
}

/// List the week directories under `source` whose number lies in `range`.
///
/// Non-matching entries, including plain files, are skipped. An inverted
/// range yields an empty list rather than an error.
#[instrument(skip_all, fields(source = %source.display(), range = %range))]
pub fn select_weeks(source: &Path, range: WeekRange) -> Result<Vec<WeekDirectory>> {
    if range.is_empty() {
        debug!("inverted week range, nothing to select");
    }

    let entries = std::fs::read_dir(source).map_err(|e| WeekMergeError::io(source, e))?;

    let mut selected = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| WeekMergeError::io(source, e))?;

        let Some(name) = entry.file_name().to_str().map(String::from) else {
            continue;
        };
        let Some(week) = parse_week_dir_name(&name) else {
            continue;
        };
        if !range.contains(week) {
            debug!(%name, "week outside range");
            continue;
        }

        // Follows symlinks, so a linked week folder counts as a directory.
        let path = entry.path();
        let metadata = std::fs::metadata(&path).map_err(|e| WeekMergeError::io(&path, e))?;
        if !metadata.is_dir() {
            debug!(%name, "skipping non-directory week entry");
            continue;
        }

        selected.push(WeekDirectory { name, week });
    }

    // Names are zero-padded, so name order is week order.
    selected.sort();

    info!(count = selected.len(), "selected week directories");
    Ok(selected)
}
