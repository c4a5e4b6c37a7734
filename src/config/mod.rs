use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rectangle::handles::HANDLE_MAX_SIZE;
use crate::rectangle::{GuideOverlay, RectangleOptions};

const APP_DIR: &str = "marquee";
const APP_CONFIG_FILE: &str = "config.json";

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing HOME environment variable")]
    MissingHomeDirectory,
    #[error("failed to read config: {path}")]
    ReadConfig { path: PathBuf, source: io::Error },
    #[error("failed to write config: {path}")]
    WriteConfig { path: PathBuf, source: io::Error },
    #[error("failed to parse config")]
    ParseConfig(#[from] serde_json::Error),
}

/// Rectangle tool settings restored at startup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectangleDefaults {
    pub fixed_aspect: bool,
    pub aspect_numerator: f64,
    pub aspect_denominator: f64,
    pub fixed_center: bool,
    pub guide: GuideOverlay,
    pub clamp_moves: bool,
    pub handle_size: f64,
    pub snap_distance: i32,
}

impl Default for RectangleDefaults {
    fn default() -> Self {
        Self {
            fixed_aspect: false,
            aspect_numerator: 1.0,
            aspect_denominator: 1.0,
            fixed_center: false,
            guide: GuideOverlay::None,
            clamp_moves: false,
            handle_size: HANDLE_MAX_SIZE,
            snap_distance: 0,
        }
    }
}

impl RectangleDefaults {
    /// Remembered option values; tool-level settings are carried over from `self`.
    pub fn with_options(&self, options: &RectangleOptions) -> Self {
        Self {
            fixed_aspect: options.fixed_aspect,
            aspect_numerator: options.aspect_numerator,
            aspect_denominator: options.aspect_denominator,
            fixed_center: options.fixed_center,
            guide: options.guide,
            clamp_moves: options.clamp_moves,
            handle_size: self.handle_size,
            snap_distance: self.snap_distance,
        }
    }

    pub fn apply_to(&self, options: &mut RectangleOptions) {
        options.fixed_aspect = self.fixed_aspect;
        options.aspect_numerator = self.aspect_numerator.max(0.0);
        options.aspect_denominator = self.aspect_denominator.max(0.0);
        options.fixed_center = self.fixed_center;
        options.guide = self.guide;
        options.clamp_moves = self.clamp_moves;
    }

    pub fn options(&self) -> RectangleOptions {
        let mut options = RectangleOptions::default();
        self.apply_to(&mut options);
        options
    }
}

/// Application-level settings from `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub remember_last_used: bool,
    pub rectangle: RectangleDefaults,
}

pub(crate) fn load_app_config() -> AppConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_app_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_app_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> AppConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return AppConfig::default(),
    };
    if !path.exists() {
        return AppConfig::default();
    }
    match fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            AppConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            AppConfig::default()
        }
    }
}

pub(crate) fn save_app_config(config: &AppConfig) -> ConfigResult<PathBuf> {
    let (xdg_config_home, home) = config_env_dirs();
    save_app_config_with(config, xdg_config_home.as_deref(), home.as_deref())
}

fn save_app_config_with(
    config: &AppConfig,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> ConfigResult<PathBuf> {
    let path = app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::WriteConfig {
            path: path.clone(),
            source,
        })?;
    }
    let serialized = serde_json::to_string_pretty(config)?;
    fs::write(&path, serialized).map_err(|source| ConfigError::WriteConfig {
        path: path.clone(),
        source,
    })?;
    tracing::debug!(?path, "saved config.json");
    Ok(path)
}

fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> ConfigResult<PathBuf> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(xdg_config_home: Option<&Path>, home: Option<&Path>) -> ConfigResult<PathBuf> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
