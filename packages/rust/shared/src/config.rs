//! Application configuration for inkport.
//!
//! User config lives at `~/.inkport/inkport.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{InkportError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "inkport.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".inkport";

/// Number of FAQ question/answer column pairs in an export.
pub const FAQ_SLOTS: usize = 5;

// ---------------------------------------------------------------------------
// Config structs (matching inkport.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Source column names.
    #[serde(default)]
    pub columns: ColumnsConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Directory the generated documents are written into.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// File extension of generated documents (without the dot).
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Author display name used when a row has no author.
    #[serde(default = "default_author")]
    pub default_author: String,

    /// Placeholder the site generator expands into the promo banner.
    #[serde(default = "default_cta_marker")]
    pub cta_marker: String,

    /// Report progress every N created documents.
    #[serde(default = "default_progress_every")]
    pub progress_every: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            extension: default_extension(),
            default_author: default_author(),
            cta_marker: default_cta_marker(),
            progress_every: default_progress_every(),
        }
    }
}

fn default_output_dir() -> String {
    "src/blog".into()
}
fn default_extension() -> String {
    "md".into()
}
fn default_author() -> String {
    "Colossyan Team".into()
}
fn default_cta_marker() -> String {
    "{% cta %}".into()
}
fn default_progress_every() -> usize {
    50
}

/// `[columns]` section: header names in the export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnsConfig {
    #[serde(default = "col_name")]
    pub name: String,
    #[serde(default = "col_slug")]
    pub slug: String,
    #[serde(default = "col_archived")]
    pub archived: String,
    #[serde(default = "col_draft")]
    pub draft: String,
    #[serde(default = "col_meta_title")]
    pub meta_title: String,
    /// Candidate spellings, first present wins.
    #[serde(default = "col_author")]
    pub author: Vec<String>,
    #[serde(default = "col_summary")]
    pub summary: String,
    #[serde(default = "col_main_image")]
    pub main_image: String,
    #[serde(default = "col_publish_date")]
    pub publish_date: String,
    #[serde(default = "col_rich_text")]
    pub rich_text: String,
    #[serde(default = "col_meta_description")]
    pub meta_description: String,
    #[serde(default = "col_category")]
    pub category: String,
    /// Prefix of the numbered FAQ question columns (`FAQ Question 1`..`5`).
    #[serde(default = "col_faq_question_prefix")]
    pub faq_question_prefix: String,
    /// Prefix of the numbered FAQ answer columns.
    #[serde(default = "col_faq_answer_prefix")]
    pub faq_answer_prefix: String,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            name: col_name(),
            slug: col_slug(),
            archived: col_archived(),
            draft: col_draft(),
            meta_title: col_meta_title(),
            author: col_author(),
            summary: col_summary(),
            main_image: col_main_image(),
            publish_date: col_publish_date(),
            rich_text: col_rich_text(),
            meta_description: col_meta_description(),
            category: col_category(),
            faq_question_prefix: col_faq_question_prefix(),
            faq_answer_prefix: col_faq_answer_prefix(),
        }
    }
}

impl ColumnsConfig {
    /// Header name of the n-th (1-based) FAQ question column.
    pub fn faq_question(&self, n: usize) -> String {
        format!("{}{n}", self.faq_question_prefix)
    }

    /// Header name of the n-th (1-based) FAQ answer column.
    pub fn faq_answer(&self, n: usize) -> String {
        format!("{}{n}", self.faq_answer_prefix)
    }
}

fn col_name() -> String {
    "Name".into()
}
fn col_slug() -> String {
    "Slug".into()
}
fn col_archived() -> String {
    "Archived".into()
}
fn col_draft() -> String {
    "Draft".into()
}
fn col_meta_title() -> String {
    "Meta Title".into()
}
fn col_author() -> Vec<String> {
    vec!["Authorr".into(), "Author".into()]
}
fn col_summary() -> String {
    "Post Summary".into()
}
fn col_main_image() -> String {
    "Main Image".into()
}
fn col_publish_date() -> String {
    "Publish date".into()
}
fn col_rich_text() -> String {
    "Rich text".into()
}
fn col_meta_description() -> String {
    "Meta Description".into()
}
fn col_category() -> String {
    "What is the Category?".into()
}
fn col_faq_question_prefix() -> String {
    "FAQ Question ".into()
}
fn col_faq_answer_prefix() -> String {
    "FAQ Answer ".into()
}

// ---------------------------------------------------------------------------
// Import config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime import configuration, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Path of the delimited-text export.
    pub input_path: PathBuf,
    /// Directory generated documents are written into.
    pub output_dir: PathBuf,
    /// Import rows whose draft flag is set.
    pub include_drafts: bool,
    /// Replace documents that already exist on disk.
    pub overwrite: bool,
    /// Output file extension (without the dot).
    pub extension: String,
    /// Author used when a row has none.
    pub default_author: String,
    /// Promotional-content placeholder injected into each body.
    pub cta_marker: String,
    /// Progress milestone interval, in created documents.
    pub progress_every: usize,
    /// Source column names.
    pub columns: ColumnsConfig,
}

impl ImportConfig {
    /// Build a runtime config for `input_path` from file-level settings.
    ///
    /// Both flags start off; the caller flips them from the command line.
    pub fn new(input_path: impl Into<PathBuf>, config: &AppConfig) -> Self {
        Self {
            input_path: input_path.into(),
            output_dir: PathBuf::from(&config.defaults.output_dir),
            include_drafts: false,
            overwrite: false,
            extension: config.defaults.extension.clone(),
            default_author: config.defaults.default_author.clone(),
            cta_marker: config.defaults.cta_marker.clone(),
            progress_every: config.defaults.progress_every,
            columns: config.columns.clone(),
        }
    }

    /// Reject settings that cannot produce a sane run.
    pub fn validate(&self) -> Result<()> {
        if self.progress_every == 0 {
            return Err(InkportError::validation(
                "progress_every must be at least 1",
            ));
        }
        let ext = self.extension.trim();
        if ext.is_empty() || ext.contains(['/', '\\', '.']) {
            return Err(InkportError::validation(format!(
                "invalid output extension '{}'",
                self.extension
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.inkport/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| InkportError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.inkport/inkport.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| InkportError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        InkportError::config(format!("failed to parse {}: {e}", path.display()))
    })
}
