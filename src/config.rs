//! Configuration for the client
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/mudview/config.toml)
//! 3. Built-in defaults (lowest priority)

use crate::tui::scrollback::DEFAULT_CAPACITY;
use serde::Deserialize;
use std::path::PathBuf;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Anchor slack for the terminal view, in rows. The browser-era default of
/// 250 layout units is pixel-scale; a couple of text rows is the
/// equivalent tolerance here.
const DEFAULT_SCROLL_SLACK_ROWS: u32 = 2;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Theme name, resolved through ~/.config/mudview/themes
    pub theme: String,

    /// Scrollback capacity in lines (0 = unbounded)
    pub scrollback: usize,

    /// How close to the bottom (in rows) still counts as "following"
    pub scroll_slack_rows: u32,

    /// Transcript to replay instead of the built-in demo script
    pub replay: Option<PathBuf>,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "default".to_string(),
            scrollback: DEFAULT_CAPACITY,
            scroll_slack_rows: DEFAULT_SCROLL_SLACK_ROWS,
            replay: None,
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default level filter when RUST_LOG is unset
    pub level: String,
    /// Also write JSON logs to rotating files
    pub file_enabled: bool,
    pub file_dir: PathBuf,
    pub file_prefix: String,
    pub file_rotation: LogRotation,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            file_dir: PathBuf::from("./logs"),
            file_prefix: "mudview".to_string(),
            file_rotation: LogRotation::Daily,
        }
    }
}

/// File log rotation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Hourly,
    Daily,
    Never,
}

// ─────────────────────────────────────────────────────────────────────────────
// File configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure: every field optional, missing values keep their
/// defaults.
#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    theme: Option<String>,
    scrollback: Option<usize>,
    scroll_slack_rows: Option<u32>,
    replay: Option<String>,

    /// Optional [logging] section
    logging: Option<FileLogging>,
}

#[derive(Debug, Deserialize, Default)]
struct FileLogging {
    level: Option<String>,
    file_enabled: Option<bool>,
    file_dir: Option<String>,
    file_prefix: Option<String>,
    file_rotation: Option<LogRotation>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/mudview/config.toml
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("mudview").join("config.toml"))
    }

    /// Create the config file with defaults if it doesn't exist, so users
    /// can discover the options.
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };
        if path.exists() {
            return;
        }
        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return;
            }
        }
        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Load configuration: defaults, then config file, then env vars.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(path) = Self::config_path() {
            if let Ok(contents) = std::fs::read_to_string(&path) {
                match toml::from_str::<FileConfig>(&contents) {
                    Ok(file) => config.apply_file(file),
                    Err(e) => {
                        eprintln!("Warning: ignoring malformed config {}: {}", path.display(), e);
                    }
                }
            }
        }

        config.apply_env(|name| std::env::var(name).ok());
        config
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(theme) = file.theme {
            self.theme = theme;
        }
        if let Some(scrollback) = file.scrollback {
            self.scrollback = scrollback;
        }
        if let Some(slack) = file.scroll_slack_rows {
            self.scroll_slack_rows = slack;
        }
        if let Some(replay) = file.replay {
            self.replay = Some(PathBuf::from(replay));
        }
        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(enabled) = logging.file_enabled {
                self.logging.file_enabled = enabled;
            }
            if let Some(dir) = logging.file_dir {
                self.logging.file_dir = PathBuf::from(dir);
            }
            if let Some(prefix) = logging.file_prefix {
                self.logging.file_prefix = prefix;
            }
            if let Some(rotation) = logging.file_rotation {
                self.logging.file_rotation = rotation;
            }
        }
    }

    /// Overlay environment variables. The lookup is injected so tests
    /// don't mutate process state.
    fn apply_env(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(theme) = get("MUDVIEW_THEME") {
            self.theme = theme;
        }
        if let Some(scrollback) = get("MUDVIEW_SCROLLBACK") {
            match scrollback.parse() {
                Ok(n) => self.scrollback = n,
                Err(_) => eprintln!("Warning: MUDVIEW_SCROLLBACK is not a number, ignoring"),
            }
        }
        if let Some(replay) = get("MUDVIEW_REPLAY") {
            self.replay = Some(PathBuf::from(replay));
        }
        if let Some(level) = get("MUDVIEW_LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    /// Render the config as a commented TOML template. Single source of
    /// truth for `ensure_config_exists` and `config --reset`.
    pub fn to_toml(&self) -> String {
        let rotation = match self.logging.file_rotation {
            LogRotation::Hourly => "hourly",
            LogRotation::Daily => "daily",
            LogRotation::Never => "never",
        };
        let replay = match &self.replay {
            Some(path) => format!("replay = {:?}\n", path.display().to_string()),
            None => "# replay = \"session.jsonl\"\n".to_string(),
        };

        format!(
            "# mudview configuration\n\
             # Precedence: environment variables > this file > defaults\n\
             \n\
             # Theme name, looked up in ~/.config/mudview/themes/<name>.toml\n\
             theme = {theme:?}\n\
             \n\
             # Scrollback capacity in lines (0 = unbounded)\n\
             scrollback = {scrollback}\n\
             \n\
             # Rows from the bottom that still count as \"following\" output\n\
             scroll_slack_rows = {slack}\n\
             \n\
             # Transcript to replay instead of the demo script\n\
             {replay}\
             \n\
             [logging]\n\
             # Level filter when RUST_LOG is unset: trace, debug, info, warn, error\n\
             level = {level:?}\n\
             # Write JSON logs to rotating files as well\n\
             file_enabled = {file_enabled}\n\
             file_dir = {file_dir:?}\n\
             file_prefix = {file_prefix:?}\n\
             # Rotation: hourly, daily, never\n\
             file_rotation = {rotation:?}\n",
            theme = self.theme,
            scrollback = self.scrollback,
            slack = self.scroll_slack_rows,
            replay = replay,
            level = self.logging.level,
            file_enabled = self.logging.file_enabled,
            file_dir = self.logging.file_dir.display().to_string(),
            file_prefix = self.logging.file_prefix,
            rotation = rotation,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.theme, "default");
        assert_eq!(config.scrollback, DEFAULT_CAPACITY);
        assert!(config.replay.is_none());
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.file_enabled);
    }

    #[test]
    fn file_values_override_defaults() {
        let file: FileConfig = toml::from_str(
            r#"
            theme = "ember"
            scrollback = 200

            [logging]
            level = "debug"
            file_rotation = "hourly"
            "#,
        )
        .unwrap();

        let mut config = Config::default();
        config.apply_file(file);

        assert_eq!(config.theme, "ember");
        assert_eq!(config.scrollback, 200);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file_rotation, LogRotation::Hourly);
        // Untouched values keep their defaults.
        assert_eq!(config.scroll_slack_rows, DEFAULT_SCROLL_SLACK_ROWS);
    }

    #[test]
    fn env_overrides_file() {
        let mut config = Config::default();
        config.theme = "from-file".to_string();

        config.apply_env(|name| match name {
            "MUDVIEW_THEME" => Some("from-env".to_string()),
            "MUDVIEW_SCROLLBACK" => Some("42".to_string()),
            _ => None,
        });

        assert_eq!(config.theme, "from-env");
        assert_eq!(config.scrollback, 42);
    }

    #[test]
    fn bad_env_number_is_ignored() {
        let mut config = Config::default();
        config.apply_env(|name| {
            (name == "MUDVIEW_SCROLLBACK").then(|| "lots".to_string())
        });
        assert_eq!(config.scrollback, DEFAULT_CAPACITY);
    }

    #[test]
    fn template_round_trips_through_the_parser() {
        let config = Config::default();
        let file: FileConfig = toml::from_str(&config.to_toml()).unwrap();

        let mut reloaded = Config::default();
        reloaded.apply_file(file);
        assert_eq!(reloaded.theme, config.theme);
        assert_eq!(reloaded.scrollback, config.scrollback);
        assert_eq!(reloaded.logging.level, config.logging.level);
        assert_eq!(
            reloaded.logging.file_rotation,
            config.logging.file_rotation
        );
    }
}
