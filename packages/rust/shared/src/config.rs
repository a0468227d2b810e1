//! Application configuration for weekmerge.
//!
//! User config lives at `~/.weekmerge/weekmerge.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, WeekMergeError};
use crate::types::{AssembleOptions, DEFAULT_MARGIN, DEFAULT_OUTPUT_NAME, WeekRange};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "weekmerge.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".weekmerge";

// ---------------------------------------------------------------------------
// Config structs (matching weekmerge.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Defaults for the merge flags.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// External renderer settings.
    #[serde(default)]
    pub renderer: RendererConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultsConfig {
    /// Output artifact file name.
    #[serde(default = "default_output")]
    pub output: String,

    /// Remove everything but the output artifact after rendering.
    #[serde(default)]
    pub clean: bool,

    /// Insert `# Lecture <n>` headings.
    #[serde(default)]
    pub lecture_headings: bool,

    /// Make code blocks wrap long lines.
    #[serde(default)]
    pub wrap_code: bool,

    /// Add a page margin to the rendered document.
    #[serde(default)]
    pub page_margin: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            clean: false,
            lecture_headings: false,
            wrap_code: false,
            page_margin: false,
        }
    }
}

fn default_output() -> String {
    DEFAULT_OUTPUT_NAME.into()
}

/// `[renderer]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RendererConfig {
    /// Executable invoked to turn the aggregate document into the artifact.
    #[serde(default = "default_command")]
    pub command: String,

    /// Extra arguments placed before the input file name.
    #[serde(default)]
    pub args: Vec<String>,

    /// Margin value for `geometry: margin=<value>`.
    #[serde(default = "default_margin")]
    pub margin: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            args: Vec::new(),
            margin: default_margin(),
        }
    }
}

fn default_command() -> String {
    "pandoc".into()
}
fn default_margin() -> String {
    DEFAULT_MARGIN.into()
}

// ---------------------------------------------------------------------------
// Merge config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Flags as given on the command line. `None`/`false` defers to the config file.
#[derive(Debug, Clone, Default)]
pub struct MergeOverrides {
    pub output: Option<String>,
    pub renderer: Option<String>,
    pub clean: bool,
    pub lecture_headings: bool,
    pub wrap_code: bool,
    pub page_margin: bool,
}

/// Runtime merge configuration: config file + CLI flags.
#[derive(Debug, Clone)]
pub struct MergeConfig {
    /// Root holding the `Week<NN>` directories.
    pub source: PathBuf,
    /// Directory that is reset and filled on every run.
    pub dest: PathBuf,
    /// Weeks to include.
    pub range: WeekRange,
    /// Output artifact file name, relative to `dest`.
    pub output: String,
    /// Whether to clean `dest` after rendering.
    pub clean: bool,
    /// Assembler options.
    pub assemble: AssembleOptions,
    /// Renderer executable.
    pub renderer_command: String,
    /// Renderer arguments placed before the input file.
    pub renderer_args: Vec<String>,
}

impl MergeConfig {
    /// Resolve the runtime config. Flags take precedence over `config`.
    pub fn resolve(
        config: &AppConfig,
        source: PathBuf,
        dest: PathBuf,
        range: WeekRange,
        overrides: MergeOverrides,
    ) -> Self {
        let defaults = &config.defaults;
        Self {
            source,
            dest,
            range,
            output: overrides.output.unwrap_or_else(|| defaults.output.clone()),
            clean: overrides.clean || defaults.clean,
            assemble: AssembleOptions {
                lecture_headings: overrides.lecture_headings || defaults.lecture_headings,
                page_margin: overrides.page_margin || defaults.page_margin,
                margin: config.renderer.margin.clone(),
                wrap_code: overrides.wrap_code || defaults.wrap_code,
                start_week: range.start,
            },
            renderer_command: overrides
                .renderer
                .unwrap_or_else(|| config.renderer.command.clone()),
            renderer_args: config.renderer.args.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.weekmerge/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| WeekMergeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.weekmerge/weekmerge.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = match config_file_path() {
        Ok(path) => path,
        Err(e) => {
            tracing::debug!(error = %e, "no home directory, using default config");
            return Ok(AppConfig::default());
        }
    };

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        WeekMergeError::config(format!("failed to read {}: {e}", path.display()))
    })?;

    let config = toml::from_str(&content).map_err(|e| {
        WeekMergeError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    tracing::debug!(?path, "loaded config file");

    Ok(config)
}
