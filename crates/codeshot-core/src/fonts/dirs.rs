use crate::{Error, Result, Settings};
use std::env;
use std::path::PathBuf;

pub(crate) fn resolve_font_dirs(settings: &Settings) -> Result<Vec<PathBuf>> {
    if let Ok(raw) = env::var("CODESHOT_FONT_DIRS") {
        return Ok(parse_font_dir_list(&raw));
    }
    if !settings.font_dirs.is_empty() {
        return Ok(settings
            .font_dirs
            .iter()
            .filter_map(|value| expand_home_dir(value))
            .collect());
    }
    Ok(vec![default_font_dir()?])
}

pub(crate) fn parse_font_dir_list(raw: &str) -> Vec<PathBuf> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(expand_home_dir)
        .collect()
}

pub(crate) fn expand_home_dir(value: &str) -> Option<PathBuf> {
    if value == "~" || value.starts_with("~/") || value.starts_with("~\\") {
        let home = home_dir()?;
        let rest = value.trim_start_matches('~');
        return Some(if rest.is_empty() {
            home
        } else {
            home.join(rest.trim_start_matches(['/', '\\']))
        });
    }
    Some(PathBuf::from(value))
}

fn default_font_dir() -> Result<PathBuf> {
    if let Ok(path) = env::var("CODESHOT_HOME") {
        return Ok(PathBuf::from(path).join("fonts"));
    }
    let home = home_dir()
        .ok_or_else(|| Error::InvalidInput("unable to resolve home directory".to_string()))?;
    Ok(home.join(".codeshot").join("fonts"))
}

fn home_dir() -> Option<PathBuf> {
    if cfg!(windows) {
        if let Some(path) = env::var_os("USERPROFILE") {
            return Some(PathBuf::from(path));
        }
        if let (Some(drive), Some(path)) = (env::var_os("HOMEDRIVE"), env::var_os("HOMEPATH")) {
            return Some(PathBuf::from(drive).join(path));
        }
        None
    } else {
        env::var_os("HOME").map(PathBuf::from)
    }
}
