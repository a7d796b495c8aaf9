use codeshot_core::Settings;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::{env, fs};

/// Loads settings from `path`, else from the user settings file when it
/// exists, else defaults.
pub(crate) fn load_settings(path: Option<&Path>) -> Result<Settings, Box<dyn Error>> {
    if let Some(path) = path {
        return read_settings(path);
    }
    match user_settings_path() {
        Some(path) if path.exists() => read_settings(&path),
        _ => Ok(Settings::default()),
    }
}

fn read_settings(path: &Path) -> Result<Settings, Box<dyn Error>> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("failed to read settings {}: {err}", path.display()))?;
    let settings = serde_json::from_str(&contents)
        .map_err(|err| format!("invalid settings {}: {err}", path.display()))?;
    Ok(settings)
}

/// `CODESHOT_CONFIG_PATH`, else `<CODESHOT_HOME or ~/.codeshot>/config.json`.
pub(crate) fn user_settings_path() -> Option<PathBuf> {
    if let Ok(path) = env::var("CODESHOT_CONFIG_PATH") {
        return Some(PathBuf::from(path));
    }
    default_app_dir().map(|dir| dir.join("config.json"))
}

fn default_app_dir() -> Option<PathBuf> {
    if let Ok(path) = env::var("CODESHOT_HOME") {
        return Some(PathBuf::from(path));
    }
    let home = if cfg!(windows) {
        env::var_os("USERPROFILE").map(PathBuf::from)
    } else {
        env::var_os("HOME").map(PathBuf::from)
    };
    home.map(|home| home.join(".codeshot"))
}
