use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::scroll::Cooldowns;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub lyrics: LyricsConfig,
    pub input: InputConfig,
    pub paths: PathsConfig,
    pub player: PlayerConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Media backend serving `/api/get_mp3/*` and `/api/get_lrc/*`.
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LyricsConfig {
    /// Extensions treated as audio; only audio gets lyrics.
    pub audio_extensions: Vec<String>,
    /// Auto-scroll resumes this long after the last manual scroll.
    pub scroll_cooldown_ms: u64,
    /// Auto-scroll resumes this long after the pointer is released.
    pub release_cooldown_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub mouse: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// mpv audio device name (see `mpv --audio-device=help`)
    pub audio_device: Option<String>,
    /// Volume level (0-100)
    pub volume: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Redraw interval while animating or waiting on a cooldown
    pub frame_ms: u64,
}

impl LyricsConfig {
    pub fn cooldowns(&self) -> Cooldowns {
        Cooldowns {
            scroll: Duration::from_millis(self.scroll_cooldown_ms),
            release: Duration::from_millis(self.release_cooldown_ms),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:41004".to_string(),
        }
    }
}

impl Default for LyricsConfig {
    fn default() -> Self {
        let cooldowns = Cooldowns::default();
        Self {
            audio_extensions: vec!["mp3".to_string()],
            scroll_cooldown_ms: cooldowns.scroll.as_millis() as u64,
            release_cooldown_ms: cooldowns.release.as_millis() as u64,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { mouse: true }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let proj = ProjectDirs::from("dev", "lyricview", "lyricview");
        let data_dir = proj
            .as_ref()
            .map(|p| p.data_dir().to_path_buf())
            .unwrap_or_else(|| std::env::temp_dir().join("lyricview"));
        Self { data_dir }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            audio_device: None,
            volume: 80,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { frame_ms: 50 }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let proj = ProjectDirs::from("dev", "lyricview", "lyricview")
        .context("ProjectDirs unavailable")?;
    Ok(proj.config_dir().join("config.toml"))
}

pub fn load(override_path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if !path.exists() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }
        let cfg = Config::default();
        let raw = toml::to_string_pretty(&cfg).context("serialize default config")?;
        fs::write(&path, raw).with_context(|| format!("write {}", path.display()))?;
        return Ok(cfg);
    }

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    parse(&raw).with_context(|| format!("parse {}", path.display()))
}

fn parse(raw: &str) -> anyhow::Result<Config> {
    Ok(toml::from_str::<Config>(raw)?)
}
