// Theme system - the injected color lookup used by the renderer
//
// A theme is two palettes (foreground and background) mapping color names
// to concrete values, plus the echo color used for the player's own input.
// Name lookup happens before any literal interpretation, so a theme can
// alias a reserved word like "red" to whatever it wants.
//
// Theme loading priority:
// 1. External TOML themes from ~/.config/mudview/themes/*.toml
// 2. Built-in default palette

use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Default foreground palette, the eight ANSI names every server assumes.
const DEFAULT_COLORS: [(&str, &str); 8] = [
    ("black", "#373737"),
    ("red", "#d71e00"),
    ("green", "#5da602"),
    ("yellow", "#cfad00"),
    ("blue", "#417ab3"),
    ("magenta", "#88658d"),
    ("cyan", "#00a7aa"),
    ("white", "#dbded8"),
];

/// Background palette differs only in black: a true black backdrop instead
/// of the softened foreground black.
const DEFAULT_BACKGROUND_COLORS: [(&str, &str); 8] = [
    ("black", "#000000"),
    ("red", "#d71e00"),
    ("green", "#5da602"),
    ("yellow", "#cfad00"),
    ("blue", "#417ab3"),
    ("magenta", "#88658d"),
    ("cyan", "#00a7aa"),
    ("white", "#dbded8"),
];

/// Resolved theme handed to the renderer.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    /// Foreground palette: color name -> value (hex, triple, or anything
    /// the resolution chain understands).
    pub colors: HashMap<String, String>,
    /// Background palette. May differ from `colors` per name.
    pub background_colors: HashMap<String, String>,
    /// Palette name the player's echoed input renders in.
    pub echo_color: String,
}

impl Theme {
    /// Built-in default palette.
    pub fn default_dark() -> Self {
        Theme {
            name: "default".to_string(),
            colors: DEFAULT_COLORS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            background_colors: DEFAULT_BACKGROUND_COLORS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            echo_color: "white".to_string(),
        }
    }

    /// Load a theme by name, falling back to the built-in default.
    pub fn by_name(name: &str) -> Self {
        if name == "default" {
            return Self::default_dark();
        }

        match Self::load_toml(name) {
            Some(theme) => theme,
            None => {
                tracing::debug!("theme {:?} not found, using default", name);
                Self::default_dark()
            }
        }
    }

    /// Theme directory: ~/.config/mudview/themes
    fn themes_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("mudview").join("themes"))
    }

    fn load_toml(name: &str) -> Option<Self> {
        let path = Self::themes_dir()?.join(format!("{name}.toml"));
        let contents = std::fs::read_to_string(&path).ok()?;
        match FileTheme::from_str(&contents) {
            Ok(file) => Some(file.into_theme(name)),
            Err(e) => {
                tracing::warn!("ignoring malformed theme {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Foreground palette lookup.
    pub fn lookup_foreground(&self, name: &str) -> Option<&str> {
        self.colors.get(name).map(String::as_str)
    }

    /// Background palette lookup.
    pub fn lookup_background(&self, name: &str) -> Option<&str> {
        self.background_colors.get(name).map(String::as_str)
    }

    /// The echo color as a raw palette value (the configured name resolved
    /// through the foreground palette, or passed through as-is).
    pub fn echo_value(&self) -> &str {
        self.lookup_foreground(&self.echo_color)
            .unwrap_or(&self.echo_color)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_dark()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TOML theme files
// ─────────────────────────────────────────────────────────────────────────────

/// On-disk theme format.
///
/// ```toml
/// name = "ember"
/// echo_color = "yellow"
///
/// [colors]
/// red = "#ff5555"
///
/// [background_colors]
/// red = "40,0,0"
/// ```
#[derive(Debug, Deserialize)]
struct FileTheme {
    name: Option<String>,
    echo_color: Option<String>,
    #[serde(default)]
    colors: HashMap<String, String>,
    /// Defaults to the foreground table when omitted.
    background_colors: Option<HashMap<String, String>>,
}

impl FileTheme {
    fn from_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// A file theme overlays the default palette: unnamed slots keep their
    /// built-in values so a three-line theme file is still complete.
    fn into_theme(self, fallback_name: &str) -> Theme {
        let mut theme = Theme::default_dark();
        theme.name = self.name.unwrap_or_else(|| fallback_name.to_string());
        if let Some(echo) = self.echo_color {
            theme.echo_color = echo;
        }

        let background = self.background_colors.unwrap_or_else(|| self.colors.clone());
        theme.colors.extend(self.colors);
        theme.background_colors.extend(background);
        theme
    }
}
