//! Workspace settings persistence: a single JSON file under the user's home
//! directory holding layout preferences, the last root and saved remote
//! connection records.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::kernel::services::ports::remote::RemoteConnection;

const SETTINGS_DIR: &str = ".atelier";
const SETTINGS_FILE: &str = "workspace.json";
const LOG_DIR: &str = "logs";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PersistedState {
    pub root_path: Option<PathBuf>,
    pub sidebar_visible: bool,
    pub sidebar_width: u16,
    pub terminal_height: u16,
    pub word_wrap: bool,
    pub font_size: u8,
    pub connections: Vec<RemoteConnection>,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            root_path: None,
            sidebar_visible: true,
            sidebar_width: 20,
            terminal_height: 30,
            word_wrap: true,
            font_size: 14,
            connections: Vec::new(),
        }
    }
}

pub fn get_settings_path() -> Option<PathBuf> {
    home_dir().map(|home| home.join(SETTINGS_DIR).join(SETTINGS_FILE))
}

pub fn ensure_log_dir() -> Option<PathBuf> {
    let dir = home_dir()?.join(SETTINGS_DIR).join(LOG_DIR);
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

pub fn ensure_settings_file() -> std::io::Result<PathBuf> {
    let path = get_settings_path().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Cannot determine settings directory",
        )
    })?;
    ensure_settings_file_at(&path)?;
    Ok(path)
}

pub fn ensure_settings_file_at(path: &std::path::Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    if !path.exists() {
        let content = serde_json::to_string_pretty(&PersistedState::default())
            .unwrap_or_else(|_| "{}".to_string());
        std::fs::write(path, content)?;
    }
    Ok(())
}

pub fn load_settings() -> Option<PersistedState> {
    load_settings_from(&get_settings_path()?)
}

/// Unreadable or malformed settings yield `None`; callers fall back to
/// defaults rather than refusing to start.
pub fn load_settings_from(path: &std::path::Path) -> Option<PersistedState> {
    let data = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&data).ok()
}

pub fn save_settings(state: &PersistedState) -> std::io::Result<()> {
    let path = ensure_settings_file()?;
    save_settings_to(&path, state)
}

pub fn save_settings_to(path: &std::path::Path, state: &PersistedState) -> std::io::Result<()> {
    let content = serde_json::to_string_pretty(state)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(path, content)
}

pub fn home_dir() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        return std::env::var("USERPROFILE").ok().map(PathBuf::from);
    }

    #[cfg(not(windows))]
    {
        std::env::var("HOME").ok().map(PathBuf::from)
    }
}
