//! External renderer invocation.
//!
//! Runs the document converter (pandoc by default) on the aggregate document,
//! with the destination as the child's working directory. The parent
//! process's working directory is never touched.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{info, instrument};

use weekmerge_shared::{AGGREGATE_FILE_NAME, Result, WeekMergeError};

/// How to invoke the external renderer.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Executable name or path.
    pub command: String,
    /// Arguments placed before the input file.
    pub args: Vec<String>,
    /// Output artifact file name, relative to the working directory.
    pub output: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            command: "pandoc".into(),
            args: Vec::new(),
            output: weekmerge_shared::DEFAULT_OUTPUT_NAME.into(),
        }
    }
}

impl RenderConfig {
    /// Full argument list: `<args...> notes.md -o <output>`.
    pub fn command_args(&self) -> Vec<String> {
        let mut args = self.args.clone();
        args.push(AGGREGATE_FILE_NAME.to_string());
        args.push("-o".to_string());
        args.push(self.output.clone());
        args
    }
}

/// Render `dest/notes.md` into `dest/<output>` and wait for the renderer to finish.
///
/// A renderer that cannot be spawned or exits unsuccessfully is reported as
/// [`WeekMergeError::Render`]. Returns the path of the output artifact.
#[instrument(skip_all, fields(dest = %dest.display(), command = %config.command, output = %config.output))]
pub fn render(dest: &Path, config: &RenderConfig) -> Result<PathBuf> {
    let args = config.command_args();
    info!(args = ?args, "running renderer");

    let status = Command::new(&config.command)
        .args(&args)
        .current_dir(dest)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit()) // Renderer diagnostics go to parent stderr
        .status()
        .map_err(|e| {
            WeekMergeError::render(format!(
                "failed to run `{}`: {e}. Is it installed?",
                config.command
            ))
        })?;

    if !status.success() {
        return Err(WeekMergeError::render(match status.code() {
            Some(code) => format!("`{}` exited with status {code}", config.command),
            None => format!("`{}` was terminated by a signal", config.command),
        }));
    }

    let output = dest.join(&config.output);
    info!(?status, path = %output.display(), "renderer finished");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_put_input_and_output_last() {
        let config = RenderConfig {
            command: "pandoc".into(),
            args: vec!["--pdf-engine=xelatex".into()],
            output: "week1-4.pdf".into(),
        };
        assert_eq!(
            config.command_args(),
            vec!["--pdf-engine=xelatex", "notes.md", "-o", "week1-4.pdf"]
        );
    }

    #[test]
    fn default_is_pandoc_to_notes_pdf() {
        let config = RenderConfig::default();
        assert_eq!(config.command, "pandoc");
        assert_eq!(config.command_args(), vec!["notes.md", "-o", "notes.pdf"]);
    }

    #[test]
    fn missing_executable_is_render_error() {
        let tmp = tempfile::tempdir().unwrap();
        let config = RenderConfig {
            command: "weekmerge-test-no-such-renderer".into(),
            ..Default::default()
        };

        let err = render(tmp.path(), &config).unwrap_err();

        assert!(matches!(err, WeekMergeError::Render(_)));
        assert!(err.to_string().contains("weekmerge-test-no-such-renderer"));
    }

    #[cfg(unix)]
    #[test]
    fn runs_in_destination_without_changing_cwd() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(AGGREGATE_FILE_NAME), "# Hi\n").unwrap();
        let cwd_before = std::env::current_dir().unwrap();

        let config = RenderConfig {
            command: "sh".into(),
            args: vec!["-c".into(), r#"cp "$1" "$3""#.into(), "render".into()],
            output: "out.pdf".into(),
        };
        let output = render(tmp.path(), &config).unwrap();

        assert_eq!(output, tmp.path().join("out.pdf"));
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "# Hi\n");
        assert_eq!(std::env::current_dir().unwrap(), cwd_before);
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_render_error() {
        let tmp = tempfile::tempdir().unwrap();
        let config = RenderConfig {
            command: "sh".into(),
            args: vec!["-c".into(), "exit 3".into()],
            ..Default::default()
        };

        let err = render(tmp.path(), &config).unwrap_err();

        assert!(err.to_string().contains("exited with status 3"));
    }
}
