// SPDX-License-Identifier: MIT
//
// Configuration file discovery, loading and CLI overrides.
//
// Every section and key is optional. A file only has to name what it
// changes; everything else keeps the defaults baked into the settings
// types.
//
//   [animator]          geometry, timing, message, colors
//   [animator.glyphs]   characters used for the field
//   [run]               frame rate and start-up toggles for `run`
//   [overlay]           text of the landing panel

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use bf_anim::overlay::OverlayContent;
use bf_anim::settings::AnimatorSettings;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_FILE: &str = "boxfield.toml";

/// Accepted frame rates.
pub const FPS_RANGE: std::ops::RangeInclusive<u32> = 1..=240;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(
        "config validation failed:\n{}",
        .0.iter().map(|e| format!("  - {e}")).collect::<Vec<_>>().join("\n")
    )]
    Validation(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub animator: AnimatorSettings,
    pub run: RunConfig,
    pub overlay: OverlayContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub fps: u32,
    /// Start with the landing panel shown.
    pub overlay: bool,
    /// Start with the checkerboard only.
    pub static_mode: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            overlay: false,
            static_mode: false,
        }
    }
}

impl Config {
    /// Every problem in the file, as messages. Empty when valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors: Vec<String> = self
            .animator
            .validate()
            .iter()
            .map(|e| format!("animator.{e}"))
            .collect();
        if !FPS_RANGE.contains(&self.run.fps) {
            errors.push(format!(
                "run.fps: {} is outside {}..={}",
                self.run.fps,
                FPS_RANGE.start(),
                FPS_RANGE.end()
            ));
        }
        errors
    }

    /// Render back to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Values from the command line that win over the file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CliOverrides {
    pub fps: Option<u32>,
    pub overlay: Option<bool>,
    pub static_mode: Option<bool>,
    pub show_positions: Option<bool>,
}

impl CliOverrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some(fps) = self.fps {
            config.run.fps = fps;
        }
        if let Some(overlay) = self.overlay {
            config.run.overlay = overlay;
        }
        if let Some(static_mode) = self.static_mode {
            config.run.static_mode = static_mode;
        }
        if let Some(show) = self.show_positions {
            config.animator.show_positions = show;
        }
    }
}

// ─── Discovery ───────────────────────────────────────────────────────────────

/// `./boxfield.toml`, then the XDG config directory.
#[must_use]
pub fn find_config() -> Option<PathBuf> {
    env::current_dir()
        .ok()
        .and_then(|cwd| find_config_in(&cwd))
        .or_else(find_xdg_config)
}

/// `boxfield.toml` directly inside `dir`.
#[must_use]
pub fn find_config_in(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(CONFIG_FILE);
    path.is_file().then_some(path)
}

/// `$XDG_CONFIG_HOME/boxfield/boxfield.toml` or
/// `~/.config/boxfield/boxfield.toml`, if it exists.
#[must_use]
pub fn find_xdg_config() -> Option<PathBuf> {
    xdg_config_path(env::var_os("XDG_CONFIG_HOME"), env::var_os("HOME")).filter(|p| p.is_file())
}

/// Where the XDG config file would live. Empty variables count as unset.
#[must_use]
pub fn xdg_config_path(xdg_config_home: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    let base = xdg_config_home
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            home.filter(|v| !v.is_empty())
                .map(|h| PathBuf::from(h).join(".config"))
        })?;
    Some(base.join("boxfield").join(CONFIG_FILE))
}

// ─── Loading ─────────────────────────────────────────────────────────────────

/// Load `path`, or the discovered file, or the defaults. Also returns the
/// file that was read.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read, parsed or
/// validated. A missing explicit `path` is an error; a missing
/// discovered file is not.
pub fn load_config(path: Option<&Path>) -> Result<(Config, Option<PathBuf>), ConfigError> {
    let source = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match source {
        Some(p) => {
            let config = load_config_file(&p)?;
            tracing::debug!(path = %p.display(), "loaded config");
            Ok((config, Some(p)))
        }
        None => {
            tracing::debug!("no config file, using defaults");
            Ok((Config::default(), None))
        }
    }
}

/// Read, parse and validate one file.
///
/// # Errors
///
/// See [`load_config`].
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parse and validate TOML text.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] or [`ConfigError::Validation`].
pub fn parse_config(contents: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(contents)?;
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors));
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn sections_override_their_keys_only() {
        let config = parse_config(
            r##"
            [animator]
            message = "HELLO"
            ink = "#112233"

            [animator.glyphs]
            shadow = "▒"

            [run]
            fps = 30

            [overlay]
            links = ["/docs"]
            "##,
        )
        .unwrap();

        assert_eq!(config.animator.message, "HELLO");
        assert_eq!(config.animator.ink, "#112233");
        assert_eq!(config.animator.box_width, 15);
        assert_eq!(config.animator.glyphs.shadow, "▒");
        assert_eq!(config.run.fps, 30);
        assert!(!config.run.overlay);
        assert_eq!(config.overlay.links, vec!["/docs"]);
        assert_eq!(config.overlay.title, "investigating the edge");
    }

    #[test]
    fn invalid_values_are_collected() {
        let err = parse_config(
            r#"
            [animator]
            cell_width = 0
            message = ""

            [run]
            fps = 0
            "#,
        )
        .unwrap_err();

        let ConfigError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(errors.len(), 3);
        assert!(errors[0].starts_with("animator.cell size"));
        assert!(errors.iter().any(|e| e.contains("message must not be empty")));
        assert!(errors.iter().any(|e| e.starts_with("run.fps: 0")));
    }

    #[test]
    fn validation_error_lists_each_problem() {
        let err = ConfigError::Validation(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "config validation failed:\n  - a\n  - b");
    }

    #[test]
    fn syntax_and_unknown_keys_are_parse_errors() {
        assert!(matches!(parse_config("[run"), Err(ConfigError::Parse(_))));
        assert!(matches!(
            parse_config("[run]\nspeed = 2"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn loads_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[run]\noverlay = true").unwrap();

        let (config, source) = load_config(Some(&path)).unwrap();
        assert!(config.run.overlay);
        assert_eq!(source, Some(path));
    }

    #[test]
    fn missing_explicit_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(load_config(Some(&missing)), Err(ConfigError::Io(_))));
    }

    #[test]
    fn finds_file_in_directory() {
        let dir = TempDir::new().unwrap();
        assert_eq!(find_config_in(dir.path()), None);
        fs::write(dir.path().join(CONFIG_FILE), "").unwrap();
        assert_eq!(find_config_in(dir.path()), Some(dir.path().join(CONFIG_FILE)));
    }

    #[test]
    fn xdg_path_prefers_xdg_config_home() {
        assert_eq!(
            xdg_config_path(Some("/xdg".into()), Some("/home/u".into())),
            Some(PathBuf::from("/xdg/boxfield/boxfield.toml"))
        );
        assert_eq!(
            xdg_config_path(Some("".into()), Some("/home/u".into())),
            Some(PathBuf::from("/home/u/.config/boxfield/boxfield.toml"))
        );
        assert_eq!(xdg_config_path(None, None), None);
    }

    #[test]
    fn cli_overrides_win() {
        let mut config = Config::default();
        CliOverrides {
            fps: Some(24),
            overlay: Some(true),
            static_mode: None,
            show_positions: Some(false),
        }
        .apply(&mut config);
        assert_eq!(config.run.fps, 24);
        assert!(config.run.overlay);
        assert!(!config.run.static_mode);
        assert!(!config.animator.show_positions);
    }

    #[test]
    fn toml_output_round_trips() {
        let mut config = Config::default();
        config.animator.message = "BOX".to_owned();
        let text = config.to_toml().unwrap();
        assert!(text.contains("[animator.glyphs]"));
        assert_eq!(parse_config(&text).unwrap(), config);
    }
}
