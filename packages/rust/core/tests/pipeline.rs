//! End-to-end pipeline tests against a stand-in renderer.
#![cfg(unix)]

use std::cell::RefCell;
use std::path::Path;

use weekmerge_core::{MergeResult, ProgressReporter, SilentProgress, merge_notes};
use weekmerge_shared::{
    AppConfig, MergeConfig, MergeOverrides, WeekDirectory, WeekMergeError, WeekRange,
};

/// Renderer that copies `notes.md` to the requested output name.
fn copy_renderer(config: &mut MergeConfig) {
    config.renderer_command = "sh".into();
    config.renderer_args = vec!["-c".into(), r#"cp "$1" "$3""#.into(), "render".into()];
}

fn write(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn sample_source() -> tempfile::TempDir {
    let src = tempfile::tempdir().unwrap();
    write(&src.path().join("Week01/notes.md"), "A");
    write(&src.path().join("Week02/notes.md"), "B");
    write(&src.path().join("Week05/x.md"), "C");
    src
}

fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn config(src: &Path, dest: &Path, range: WeekRange, overrides: MergeOverrides) -> MergeConfig {
    let mut config = MergeConfig::resolve(
        &AppConfig::default(),
        src.to_path_buf(),
        dest.to_path_buf(),
        range,
        overrides,
    );
    copy_renderer(&mut config);
    config
}

#[test]
fn later_week_overwrites_and_renders() {
    let src = sample_source();
    let out = tempfile::tempdir().unwrap();
    let dest = out.path().join("merged");
    let config = config(src.path(), &dest, WeekRange::new(1, 2), MergeOverrides::default());

    let result = merge_notes(&config, &SilentProgress).unwrap();

    let names: Vec<_> = result.weeks.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, ["Week01", "Week02"]);
    assert_eq!(result.files_copied, 2);
    assert_eq!(result.documents, 1);
    assert!(!result.cleaned);

    assert_eq!(entries(&dest), vec!["notes.md", "notes.pdf"]);
    let aggregate = std::fs::read_to_string(dest.join("notes.md")).unwrap();
    assert_eq!(aggregate, "---\n---\nB\n\n");
    assert_eq!(std::fs::read_to_string(&result.output_path).unwrap(), aggregate);
}

#[test]
fn clean_leaves_only_artifact() {
    let src = sample_source();
    write(&src.path().join("Week02/img/fig.png"), "png");
    let out = tempfile::tempdir().unwrap();
    let dest = out.path().join("merged");
    let config = config(
        src.path(),
        &dest,
        WeekRange::new(1, 5),
        MergeOverrides {
            clean: true,
            output: Some("review.pdf".into()),
            ..Default::default()
        },
    );

    let result = merge_notes(&config, &SilentProgress).unwrap();

    assert!(result.cleaned);
    assert_eq!(entries(&dest), vec!["review.pdf"]);
}

#[test]
fn headings_and_preamble_reach_the_aggregate() {
    let src = tempfile::tempdir().unwrap();
    write(&src.path().join("Week03/lecture_03.md"), "three");
    write(&src.path().join("Week04/extra.md"), "extra");
    let out = tempfile::tempdir().unwrap();
    let dest = out.path().join("merged");
    let config = config(
        src.path(),
        &dest,
        WeekRange::new(3, 4),
        MergeOverrides {
            lecture_headings: true,
            page_margin: true,
            ..Default::default()
        },
    );

    merge_notes(&config, &SilentProgress).unwrap();

    let aggregate = std::fs::read_to_string(dest.join("notes.md")).unwrap();
    assert_eq!(
        aggregate,
        "---\ngeometry: margin=2cm\n---\n\
         # Lecture 3\n\nextra\n\n\
         # Lecture 3\n\nthree\n\n"
    );
}

#[test]
fn empty_selection_still_renders_preamble() {
    let src = sample_source();
    let out = tempfile::tempdir().unwrap();
    let dest = out.path().join("merged");
    let config = config(src.path(), &dest, WeekRange::new(9, 3), MergeOverrides::default());

    let result = merge_notes(&config, &SilentProgress).unwrap();

    assert!(result.weeks.is_empty());
    assert_eq!(std::fs::read_to_string(dest.join("notes.md")).unwrap(), "---\n---\n");
}

#[test]
fn renderer_failure_aborts_before_clean() {
    let src = sample_source();
    let out = tempfile::tempdir().unwrap();
    let dest = out.path().join("merged");
    let mut config = config(
        src.path(),
        &dest,
        WeekRange::new(1, 2),
        MergeOverrides {
            clean: true,
            ..Default::default()
        },
    );
    config.renderer_command = "false".into();
    config.renderer_args.clear();

    let err = merge_notes(&config, &SilentProgress).unwrap_err();

    assert!(matches!(err, WeekMergeError::Render(_)));
    assert_eq!(entries(&dest), vec!["notes.md"]);
}

#[test]
fn missing_source_is_io_error() {
    let out = tempfile::tempdir().unwrap();
    let config = config(
        &out.path().join("no-such-source"),
        &out.path().join("merged"),
        WeekRange::new(1, 2),
        MergeOverrides::default(),
    );

    let err = merge_notes(&config, &SilentProgress).unwrap_err();

    assert!(matches!(err, WeekMergeError::Io { .. }));
}

#[derive(Default)]
struct RecordingProgress {
    events: RefCell<Vec<String>>,
}

impl ProgressReporter for RecordingProgress {
    fn phase(&self, name: &str) {
        self.events.borrow_mut().push(format!("phase:{name}"));
    }

    fn week_copied(&self, week: &WeekDirectory, current: usize, total: usize) {
        self.events
            .borrow_mut()
            .push(format!("week:{week}:{current}/{total}"));
    }

    fn done(&self, result: &MergeResult) {
        self.events
            .borrow_mut()
            .push(format!("done:{}", result.weeks.len()));
    }
}

#[test]
fn progress_reports_phases_in_order() {
    let src = sample_source();
    let out = tempfile::tempdir().unwrap();
    let dest = out.path().join("merged");
    let config = config(src.path(), &dest, WeekRange::new(1, 2), MergeOverrides::default());
    let progress = RecordingProgress::default();

    merge_notes(&config, &progress).unwrap();

    assert_eq!(
        progress.events.into_inner(),
        vec![
            "phase:Selecting week directories",
            "phase:Copying notes",
            "week:Week01:1/2",
            "week:Week02:2/2",
            "phase:Assembling notes.md",
            "phase:Rendering",
            "done:2",
        ]
    );
}
