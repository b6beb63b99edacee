//! Operator configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::entry::{EntryOptions, DEFAULT_CANCEL_LITERAL, DEFAULT_MAX_ATTEMPTS};
use crate::error::GradebookError;
use crate::grading::{default_thresholds, GradeScale, GradeThreshold};
use crate::model::DEFAULT_DESCRIPTION;
use crate::parser::ParseOptions;
use crate::presentation::DisplayMode;

/// Environment variable overriding `display_mode`.
pub const DISPLAY_MODE_ENV: &str = "GRADEBOOK_DISPLAY_MODE";

/// Top-level gradebook configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradebookConfig {
    /// Grade thresholds; must include one at 0.
    #[serde(default = "default_thresholds")]
    pub grades: Vec<GradeThreshold>,
    /// Input that cancels the current student's entry.
    #[serde(default = "default_cancel_literal")]
    pub cancel_literal: String,
    /// Inputs at the student prompt that end the session.
    #[serde(default = "default_quit_words")]
    pub quit_words: Vec<String>,
    /// Invalid inputs tolerated per task before entry is aborted.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Initial display mode.
    #[serde(default)]
    pub display_mode: DisplayMode,
    /// Description for definition nodes without one.
    #[serde(default = "default_description_placeholder")]
    pub description_placeholder: String,
}

fn default_cancel_literal() -> String {
    DEFAULT_CANCEL_LITERAL.to_string()
}
fn default_quit_words() -> Vec<String> {
    ["q", "quit", "bye", "exit"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}
fn default_description_placeholder() -> String {
    DEFAULT_DESCRIPTION.to_string()
}

impl Default for GradebookConfig {
    fn default() -> Self {
        Self {
            grades: default_thresholds(),
            cancel_literal: default_cancel_literal(),
            quit_words: default_quit_words(),
            max_attempts: default_max_attempts(),
            display_mode: DisplayMode::default(),
            description_placeholder: default_description_placeholder(),
        }
    }
}

impl GradebookConfig {
    pub fn grade_scale(&self) -> Result<GradeScale, GradebookError> {
        GradeScale::new(self.grades.clone())
    }

    pub fn entry_options(&self) -> EntryOptions {
        EntryOptions {
            cancel_literal: self.cancel_literal.trim().to_string(),
            max_attempts: self.max_attempts,
        }
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            description_placeholder: self.description_placeholder.clone(),
        }
    }

    /// Returns `true` if `input` ends the student prompt loop.
    pub fn is_quit_word(&self, input: &str) -> bool {
        let input = input.trim();
        self.quit_words.iter().any(|w| w == input)
    }

    /// Check values that would make entry ambiguous.
    pub fn validate(&self) -> Result<()> {
        let cancel = self.cancel_literal.trim();
        anyhow::ensure!(!cancel.is_empty(), "cancel_literal must not be empty");
        anyhow::ensure!(
            cancel.parse::<i64>().is_err(),
            "cancel_literal '{cancel}' would be read as a score"
        );
        anyhow::ensure!(self.max_attempts >= 1, "max_attempts must be at least 1");
        self.grade_scale()?;
        Ok(())
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `gradebook.toml` in the current directory
/// 2. `~/.config/gradebook/config.toml`
///
/// `GRADEBOOK_DISPLAY_MODE` overrides the display mode.
pub fn load_config() -> Result<GradebookConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<GradebookConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("gradebook.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => GradebookConfig::default(),
    };

    if let Ok(mode) = std::env::var(DISPLAY_MODE_ENV) {
        config.display_mode = mode
            .parse()
            .map_err(|e: String| anyhow::anyhow!("{DISPLAY_MODE_ENV}: {e}"))?;
    }

    config.validate()?;
    Ok(config)
}

/// Parse a TOML string into a config.
pub fn parse_config_str(content: &str) -> Result<GradebookConfig> {
    Ok(toml::from_str::<GradebookConfig>(content)?)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("gradebook"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = GradebookConfig::default();
        assert_eq!(config.cancel_literal, "q");
        assert_eq!(config.max_attempts, 10);
        assert_eq!(config.display_mode, DisplayMode::Raw);
        assert!(config.is_quit_word("bye"));
        assert!(config.is_quit_word(" exit "));
        assert!(!config.is_quit_word("alice"));
        assert_eq!(config.grade_scale().unwrap(), GradeScale::default());
        config.validate().unwrap();
    }

    #[test]
    fn parse_partial_config() {
        let config = parse_config_str(
            r#"
cancel_literal = "x"
display_mode = "weighted"

[[grades]]
min_percent = 50
label = "pass"

[[grades]]
min_percent = 0
label = "fail"
"#,
        )
        .unwrap();
        assert_eq!(config.cancel_literal, "x");
        assert_eq!(config.display_mode, DisplayMode::Weighted);
        assert_eq!(config.quit_words.len(), 4);
        let scale = config.grade_scale().unwrap();
        assert_eq!(scale.grade(50.0), "pass");
        assert_eq!(scale.grade(49.0), "fail");
        assert_eq!(config.entry_options().cancel_literal, "x");
    }

    #[test]
    fn padded_cancel_literal_still_cancels() {
        use crate::entry::read_task;
        use crate::error::EntryError;
        use crate::model::tests::two_task_exam;
        use crate::traits::{NoopReporter, ScriptedReader};

        let config = GradebookConfig {
            cancel_literal: " x ".into(),
            ..Default::default()
        };
        config.validate().unwrap();
        let options = config.entry_options();
        assert_eq!(options.cancel_literal, "x");

        let exam = two_task_exam();
        let task = exam.tasks().next().unwrap();
        let mut reader = ScriptedReader::new(["x"]);
        let err = read_task(task, &mut reader, &options, &NoopReporter).unwrap_err();
        assert!(matches!(err, EntryError::Cancelled));
    }

    #[test]
    fn validate_rejects_numeric_cancel_literal() {
        let config = GradebookConfig {
            cancel_literal: "0".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_scale_without_catch_all() {
        let config = GradebookConfig {
            grades: vec![GradeThreshold::new(50.0, "pass")],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config_from(Some(&dir.path().join("missing.toml"))).is_err());

        let path = dir.path().join("gradebook.toml");
        std::fs::write(&path, "max_attempts = 3\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.max_attempts, 3);
    }
}
