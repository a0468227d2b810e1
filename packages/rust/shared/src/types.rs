//! Core domain types for merging weekly lecture notes.

use std::fmt;

/// Fixed name of the aggregate document written into the destination.
pub const AGGREGATE_FILE_NAME: &str = "notes.md";

/// Default name of the rendered output artifact.
pub const DEFAULT_OUTPUT_NAME: &str = "notes.pdf";

/// File extension (without the dot) of the text documents that get assembled.
pub const NOTE_EXTENSION: &str = "md";

/// Default page margin passed to the renderer's `geometry` option.
pub const DEFAULT_MARGIN: &str = "2cm";

// ---------------------------------------------------------------------------
// WeekRange
// ---------------------------------------------------------------------------

/// Inclusive range of week numbers, `[start, end]`.
///
/// An inverted range (`start > end`) is allowed and simply contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRange {
    pub start: u32,
    pub end: u32,
}

impl WeekRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Whether `week` lies within the range, bounds included.
    pub fn contains(&self, week: u32) -> bool {
        self.start <= week && week <= self.end
    }

    /// True when no week number can satisfy the range.
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

impl fmt::Display for WeekRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// WeekDirectory
// ---------------------------------------------------------------------------

/// A `Week<NN>` directory found directly under the source root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct WeekDirectory {
    /// Entry name, e.g. `Week03`.
    pub name: String,
    /// Week number parsed from the name.
    pub week: u32,
}

impl fmt::Display for WeekDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ---------------------------------------------------------------------------
// AssembleOptions
// ---------------------------------------------------------------------------

/// Controls what the assembler writes around each document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembleOptions {
    /// Emit a `# Lecture <n>` heading before every document.
    pub lecture_headings: bool,
    /// Inject the `geometry: margin=...` renderer directive.
    pub page_margin: bool,
    /// Margin value used when `page_margin` is set.
    pub margin: String,
    /// Inject the header that makes code blocks wrap long lines.
    pub wrap_code: bool,
    /// Starting value of the fallback lecture counter.
    pub start_week: u32,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            lecture_headings: false,
            page_margin: false,
            margin: DEFAULT_MARGIN.into(),
            wrap_code: false,
            start_week: 1,
        }
    }
}
