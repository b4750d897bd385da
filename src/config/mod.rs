use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::geometry::DEFAULT_FIT_MARGIN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPathError {
    MissingHomeDirectory,
}

const APP_DIR: &str = "captionkit";
const APP_CONFIG_FILE: &str = "config.json";

pub const DEFAULT_RESIZE_DEBOUNCE_MS: u64 = 200;
const MIN_RESIZE_DEBOUNCE_MS: u64 = 150;
const MAX_RESIZE_DEBOUNCE_MS: u64 = 250;
pub const DEFAULT_INITIAL_LAYOUT_DELAY_MS: u64 = 300;
pub const DEFAULT_MAX_SURFACE_WIDTH: u32 = 1200;
pub const DEFAULT_MAX_SURFACE_HEIGHT: u32 = 800;
pub const DEFAULT_TOOLBAR_WIDTH: u32 = 220;
pub const DEFAULT_COMPACT_BREAKPOINT: u32 = 768;
pub const DEFAULT_SEARCH_PER_PAGE: u32 = 12;
pub const DEFAULT_UNSPLASH_API_BASE: &str = "https://api.unsplash.com";

/// Application-level settings from `config.json`. Every field is optional on disk.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub fit_margin: f64,
    pub resize_debounce_ms: u64,
    pub initial_layout_delay_ms: u64,
    pub max_surface_width: u32,
    pub max_surface_height: u32,
    pub toolbar_width: u32,
    pub compact_breakpoint: u32,
    pub search_per_page: u32,
    pub unsplash_access_key: Option<String>,
    pub unsplash_api_base: String,
    pub download_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fit_margin: DEFAULT_FIT_MARGIN,
            resize_debounce_ms: DEFAULT_RESIZE_DEBOUNCE_MS,
            initial_layout_delay_ms: DEFAULT_INITIAL_LAYOUT_DELAY_MS,
            max_surface_width: DEFAULT_MAX_SURFACE_WIDTH,
            max_surface_height: DEFAULT_MAX_SURFACE_HEIGHT,
            toolbar_width: DEFAULT_TOOLBAR_WIDTH,
            compact_breakpoint: DEFAULT_COMPACT_BREAKPOINT,
            search_per_page: DEFAULT_SEARCH_PER_PAGE,
            unsplash_access_key: None,
            unsplash_api_base: DEFAULT_UNSPLASH_API_BASE.to_string(),
            download_dir: None,
        }
    }
}

impl AppConfig {
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(
            self.resize_debounce_ms
                .clamp(MIN_RESIZE_DEBOUNCE_MS, MAX_RESIZE_DEBOUNCE_MS),
        )
    }

    pub fn initial_layout_delay(&self) -> Duration {
        Duration::from_millis(self.initial_layout_delay_ms)
    }

    /// Margin used when fitting the background; out-of-range values fall back to the default.
    pub fn fit_margin(&self) -> f64 {
        if self.fit_margin.is_finite() && self.fit_margin > 0.0 && self.fit_margin <= 1.0 {
            self.fit_margin
        } else {
            DEFAULT_FIT_MARGIN
        }
    }

    /// Access key from the config file, then `UNSPLASH_ACCESS_KEY`.
    pub fn resolve_unsplash_key(&self) -> Option<String> {
        self.unsplash_access_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                std::env::var("UNSPLASH_ACCESS_KEY")
                    .ok()
                    .filter(|key| !key.trim().is_empty())
            })
    }
}

pub fn load_app_config() -> AppConfig {
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
    match std::fs::read_to_string(&path) {
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

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
