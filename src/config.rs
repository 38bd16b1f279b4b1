//! User settings stored as JSON in `~/.ytrc`

use crate::error::TubeError;
use crate::platform::formats::DEFAULT_MAX_HEIGHT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings file name inside the home directory
pub const SETTINGS_FILE: &str = ".ytrc";

/// Player used when none is configured
pub const DEFAULT_PLAYER: &str = "mpv";

/// Supported players and their default argument templates
const PLAYER_TEMPLATES: [(&str, &[&str]); 4] = [
    ("vlc", &["%url", "--meta-title", "%title"]),
    ("mpv", &["--loop", "%url", "--title=%title"]),
    ("mplayer", &["-vo", "fbdev2", "%url"]),
    ("omxplayer", &["%url"]),
];

/// Check if `player` names a supported player
pub fn is_supported_player(player: &str) -> bool {
    player_template(player).is_some()
}

/// Default argument template of a supported player
pub fn player_template(player: &str) -> Option<&'static [&'static str]> {
    PLAYER_TEMPLATES
        .iter()
        .find(|(name, _)| *name == player)
        .map(|(_, template)| *template)
}

/// Player setting: a bare player name or a full command line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlayerSetting {
    Name(String),
    Command(Vec<String>),
}

impl Default for PlayerSetting {
    fn default() -> Self {
        PlayerSetting::Name(DEFAULT_PLAYER.to_string())
    }
}

impl PlayerSetting {
    /// Expand into the argument vector used to launch the player
    pub fn command(&self) -> Result<Vec<String>, TubeError> {
        match self {
            PlayerSetting::Name(name) => {
                let template = player_template(name).ok_or_else(|| unsupported(name))?;
                Ok(std::iter::once(name.as_str())
                    .chain(template.iter().copied())
                    .map(str::to_string)
                    .collect())
            }
            PlayerSetting::Command(args) => match args.first() {
                Some(binary) if is_supported_player(binary) => Ok(args.clone()),
                _ => Err(unsupported(&args.join(" "))),
            },
        }
    }
}

fn unsupported(player: &str) -> TubeError {
    TubeError::Config(format!("Unsupported player '{}'", player))
}

/// Persistent user preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Exclusive ceiling for stream height in pixels
    pub pref_maxres: u32,
    /// Print progress messages
    pub verbose: bool,
    /// Record watched videos
    pub history: bool,
    /// Pipe yt-dlp output into the player instead of passing it a URL
    pub use_ytdlp: bool,
    pub player: PlayerSetting,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pref_maxres: DEFAULT_MAX_HEIGHT,
            verbose: true,
            history: true,
            use_ytdlp: true,
            player: PlayerSetting::default(),
        }
    }
}

impl Settings {
    /// Load settings from `path`; a missing file yields the defaults.
    ///
    /// The player setting is validated eagerly so a bad file fails before any
    /// network work starts.
    pub fn load(path: &Path) -> Result<Self, TubeError> {
        if !path.exists() {
            debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)
            .map_err(|_| TubeError::Config("Unable to parse .ytrc".to_string()))?;
        settings.player_command()?;
        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Player argument vector
    pub fn player_command(&self) -> Result<Vec<String>, TubeError> {
        self.player.command()
    }

    /// Write the default settings to `path`, refusing to overwrite
    pub fn make_dotfile(path: &Path) -> Result<(), TubeError> {
        if path.exists() {
            return Err(TubeError::Config(format!(
                "{} already exists",
                path.display()
            )));
        }
        let content = serde_json::to_string_pretty(&Settings::default())?;
        fs::write(path, content + "\n")?;
        Ok(())
    }

    /// Default settings location
    pub fn default_path() -> Result<PathBuf, TubeError> {
        home_file(SETTINGS_FILE)
    }
}

/// Path of `name` inside the user's home directory
pub fn home_file(name: &str) -> Result<PathBuf, TubeError> {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(name))
        .ok_or_else(|| TubeError::Config("Unable to locate home directory".to_string()))
}
