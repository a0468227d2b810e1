//! Aggregate document assembler.
//!
//! Concatenates every Markdown document directly inside the destination into
//! a single `notes.md`, preceded by a renderer configuration block and
//! optionally a `# Lecture <n>` heading per document.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, instrument, warn};

use weekmerge_shared::{
    AGGREGATE_FILE_NAME, AssembleOptions, NOTE_EXTENSION, Result, WeekMergeError,
};

/// Delimiter line opening and closing the configuration block.
const PREAMBLE_MARKER: &str = "---\n";

/// Header that lets the renderer break long lines inside code blocks.
const WRAP_HEADER: &str = r"header-includes:
 - \usepackage{fvextra}
 - \DefineVerbatimEnvironment{Highlighting}{Verbatim}{breaklines,commandchars=\\\{\}}
";

/// Separator appended after every document body.
const DOCUMENT_SEPARATOR: &str = "\n\n";

static LECTURE_FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^lecture_(\d{2})\.md$").expect("valid regex"));

/// Output from a successful assembly.
#[derive(Debug, Clone)]
pub struct AssembleResult {
    /// Path of the written aggregate document.
    pub path: PathBuf,
    /// Documents concatenated, in order.
    pub documents: Vec<String>,
}

/// Parse the lecture number from a `lecture_<NN>.md` file name.
pub fn parse_lecture_file_name(name: &str) -> Option<u32> {
    LECTURE_FILE_RE
        .captures(name)
        .and_then(|caps| caps[1].parse().ok())
}

/// Build the delimited configuration block that opens the aggregate document.
///
/// The markers are always present, even when no directive is requested.
pub fn build_preamble(options: &AssembleOptions) -> String {
    let mut preamble = String::from(PREAMBLE_MARKER);
    if options.page_margin {
        preamble.push_str(&format!("geometry: margin={}\n", options.margin));
    }
    if options.wrap_code {
        preamble.push_str(WRAP_HEADER);
    }
    preamble.push_str(PREAMBLE_MARKER);
    preamble
}

/// Assemble `dest/notes.md` from the Markdown documents directly in `dest`.
///
/// Any existing aggregate document is overwritten, after its old content
/// has been read like any other document.
#[instrument(skip_all, fields(dest = %dest.display(), headings = options.lecture_headings))]
pub fn assemble(dest: &Path, options: &AssembleOptions) -> Result<AssembleResult> {
    let documents = list_documents(dest)?;

    let mut aggregate = build_preamble(options);
    let mut headings = LectureCounter::new(options.start_week);

    for name in &documents {
        if options.lecture_headings {
            let week = headings.next_for(name);
            aggregate.push_str(&format!("# Lecture {week}\n\n"));
            debug!(document = %name, week, "inserted lecture heading");
        }

        let path = dest.join(name);
        let content =
            std::fs::read_to_string(&path).map_err(|e| WeekMergeError::io(&path, e))?;
        aggregate.push_str(&content);
        aggregate.push_str(DOCUMENT_SEPARATOR);
    }

    let path = dest.join(AGGREGATE_FILE_NAME);
    std::fs::write(&path, aggregate).map_err(|e| WeekMergeError::io(&path, e))?;

    info!(
        documents = documents.len(),
        path = %path.display(),
        "aggregate document written"
    );

    Ok(AssembleResult { path, documents })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Running lecture number used for headings.
///
/// A number parsed from the file name replaces the running value. Either
/// way the counter advances by one per document.
struct LectureCounter {
    current: u32,
}

impl LectureCounter {
    fn new(start: u32) -> Self {
        Self { current: start }
    }

    fn next_for(&mut self, name: &str) -> u32 {
        if let Some(week) = parse_lecture_file_name(name) {
            self.current = week;
        }
        let week = self.current;
        self.current = self.current.saturating_add(1);
        week
    }
}

/// Names of the Markdown files directly inside `dir`, sorted.
fn list_documents(dir: &Path) -> Result<Vec<String>> {
    let suffix = format!(".{NOTE_EXTENSION}");
    let entries = std::fs::read_dir(dir).map_err(|e| WeekMergeError::io(dir, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| WeekMergeError::io(dir, e))?;
        let name = match entry.file_name().into_string() {
            Ok(name) if name.ends_with(&suffix) => name,
            Ok(_) => continue,
            Err(raw) => {
                warn!(name = ?raw, "skipping file with non UTF-8 name");
                continue;
            }
        };

        // Regular files only, symlinks to them included. Pipes, sockets and
        // dangling links are never read.
        match std::fs::metadata(entry.path()) {
            Ok(metadata) if metadata.is_file() => names.push(name),
            Ok(_) => debug!(%name, "skipping non-regular document entry"),
            Err(e) => warn!(%name, error = %e, "skipping unreadable document entry"),
        }
    }

    names.sort();
    Ok(names)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
