use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::theme::{ThemeColors, ThemeMode};

const APP_DIR: &str = "screenglow";
const APP_CONFIG_FILE: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing HOME environment variable")]
    MissingHomeDirectory,
    #[error("failed to read app config: {path}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse app config")]
    Parse(#[from] serde_json::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Application-level settings from `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppConfig {
    /// Where exported PNGs are written; `$HOME/Pictures` when unset.
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
    /// Color mode of the control panel.
    #[serde(default)]
    pub theme: ThemeMode,
    #[serde(default)]
    pub colors: Option<ThemeColors>,
}

pub fn load_app_config() -> AppConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_app_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_app_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> AppConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(path) => path,
        Err(err) => {
            tracing::warn!(%err, "cannot locate config.json; using defaults");
            return AppConfig::default();
        }
    };
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config.json; using defaults");
        return AppConfig::default();
    }
    match read_app_config(&path) {
        Ok(config) => {
            tracing::info!(path = %path.display(), theme = ?config.theme, "loaded app config");
            config
        }
        Err(err) => {
            tracing::warn!(%err, path = %path.display(), "failed to load config.json; using defaults");
            AppConfig::default()
        }
    }
}

pub fn read_app_config(path: &Path) -> ConfigResult<AppConfig> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&contents)?)
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture_root() -> PathBuf {
        let mut path = std::env::temp_dir();
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::SystemTime::UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        let pid = std::process::id();
        path.push(format!("screenglow-config-{pid}-{nanos}"));
        path
    }

    fn with_config_file<F: FnOnce(&Path)>(contents: &str, f: F) {
        let root = fixture_root();
        let dir = root.join(APP_DIR);
        fs::create_dir_all(&dir).expect("create config dir");
        fs::write(dir.join(APP_CONFIG_FILE), contents).expect("write config");
        f(&root);
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn app_config_path_prefers_xdg_config_home() {
        let path = app_config_path(
            "screenglow",
            "config.json",
            Some(Path::new("/tmp/config-root")),
            Some(Path::new("/tmp/home")),
        )
        .expect("path should resolve");

        assert_eq!(path, PathBuf::from("/tmp/config-root/screenglow/config.json"));
    }

    #[test]
    fn app_config_path_falls_back_to_home_dot_config() {
        let path = app_config_path("screenglow", "config.json", None, Some(Path::new("/tmp/home")))
            .expect("path should resolve");

        assert_eq!(path, PathBuf::from("/tmp/home/.config/screenglow/config.json"));
    }

    #[test]
    fn app_config_path_errors_when_home_missing_and_xdg_unset() {
        let error = app_config_path("screenglow", "config.json", None, None)
            .expect_err("path should not resolve");
        assert!(matches!(error, ConfigError::MissingHomeDirectory));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let root = fixture_root();
        assert_eq!(load_app_config_with(Some(&root), None), AppConfig::default());
    }

    #[test]
    fn config_file_sets_export_dir_and_theme() {
        with_config_file(
            r#"{ "export_dir": "/tmp/shots", "theme": "light" }"#,
            |root| {
                let config = load_app_config_with(Some(root), None);
                assert_eq!(config.export_dir, Some(PathBuf::from("/tmp/shots")));
                assert_eq!(config.theme, ThemeMode::Light);
                assert!(config.colors.is_none());
            },
        );
    }

    #[test]
    fn invalid_config_falls_back_to_defaults() {
        with_config_file("{ not json", |root| {
            let path = app_config_path(APP_DIR, APP_CONFIG_FILE, Some(root), None)
                .expect("path should resolve");
            assert!(matches!(read_app_config(&path), Err(ConfigError::Parse(_))));
            assert_eq!(load_app_config_with(Some(root), None), AppConfig::default());
        });
    }
}
