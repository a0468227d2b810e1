//! End-to-end merge pipeline: select → materialize → assemble → render → clean.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{info, instrument};

use weekmerge_shared::{MergeConfig, Result, WeekDirectory};

use crate::renderer::RenderConfig;
use crate::{assembler, cleanup, materializer, renderer, selector};

/// Result of the `merge_notes` pipeline.
#[derive(Debug)]
pub struct MergeResult {
    /// Week directories that were merged, ascending.
    pub weeks: Vec<WeekDirectory>,
    /// Files copied into the destination.
    pub files_copied: usize,
    /// Markdown documents concatenated into the aggregate document.
    pub documents: usize,
    /// Path of the rendered artifact.
    pub output_path: PathBuf,
    /// Whether the destination was cleaned after rendering.
    pub cleaned: bool,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after a week directory has been copied.
    fn week_copied(&self, week: &WeekDirectory, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &MergeResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn week_copied(&self, _week: &WeekDirectory, _current: usize, _total: usize) {}
    fn done(&self, _result: &MergeResult) {}
}

/// Run the full merge pipeline.
///
/// 1. Select the `Week<NN>` directories in range
/// 2. Reset the destination and copy their contents into it
/// 3. Assemble `notes.md`
/// 4. Render it with the external renderer
/// 5. Optionally remove everything but the rendered artifact
///
/// Any failure aborts the run. The destination may then be partially populated.
#[instrument(skip_all, fields(source = %config.source.display(), dest = %config.dest.display(), range = %config.range))]
pub fn merge_notes(config: &MergeConfig, progress: &dyn ProgressReporter) -> Result<MergeResult> {
    let start = Instant::now();
    info!("starting merge pipeline");

    // --- Phase 1: Select ---
    progress.phase("Selecting week directories");
    let weeks = selector::select_weeks(&config.source, config.range)?;

    // --- Phase 2: Materialize ---
    progress.phase("Copying notes");
    let total = weeks.len();
    let mut current = 0;
    let files_copied =
        materializer::materialize_with(&config.source, &config.dest, &weeks, |week, _| {
            current += 1;
            progress.week_copied(week, current, total);
        })?;

    // --- Phase 3: Assemble ---
    progress.phase("Assembling notes.md");
    let assembled = assembler::assemble(&config.dest, &config.assemble)?;

    // --- Phase 4: Render ---
    progress.phase("Rendering");
    let render_config = RenderConfig {
        command: config.renderer_command.clone(),
        args: config.renderer_args.clone(),
        output: config.output.clone(),
    };
    let output_path = renderer::render(&config.dest, &render_config)?;

    // --- Phase 5: Clean ---
    if config.clean {
        progress.phase("Cleaning destination");
        cleanup::clean(&config.dest, &config.output)?;
    }

    let result = MergeResult {
        weeks,
        files_copied,
        documents: assembled.documents.len(),
        output_path,
        cleaned: config.clean,
        elapsed: start.elapsed(),
    };

    info!(
        weeks = result.weeks.len(),
        files = result.files_copied,
        documents = result.documents,
        elapsed_ms = result.elapsed.as_millis() as u64,
        "merge pipeline complete"
    );

    progress.done(&result);
    Ok(result)
}
