use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{IconError, Result};

pub const DEFAULT_FALLBACK_CLASS: &str = "text-icon";
pub const DEFAULT_DIRECTORY_CLASS: &str = "icon-file-directory";
pub const DEFAULT_COLOUR_MODE: usize = 1;

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    fallback_class: Option<String>,
    directory_fallback_class: Option<String>,
    colour_mode: Option<usize>,
    database: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Class used when no file rule matches.
    pub fallback_class: String,
    /// Class used when no directory rule matches.
    pub directory_fallback_class: String,
    pub colour_mode: usize,
    /// JSON database to load instead of the bundled one.
    pub database: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            fallback_class: DEFAULT_FALLBACK_CLASS.to_string(),
            directory_fallback_class: DEFAULT_DIRECTORY_CLASS.to_string(),
            colour_mode: DEFAULT_COLOUR_MODE,
            database: None,
        }
    }
}

impl RawConfig {
    fn into_config(self, base: Option<&Path>) -> Config {
        let defaults = Config::default();
        Config {
            fallback_class: self.fallback_class.unwrap_or(defaults.fallback_class),
            directory_fallback_class: self
                .directory_fallback_class
                .unwrap_or(defaults.directory_fallback_class),
            colour_mode: self.colour_mode.unwrap_or(defaults.colour_mode),
            // Relative database paths are resolved against the config file's directory
            database: self.database.map(|p| match base {
                Some(base) if p.is_relative() => base.join(p),
                _ => p,
            }),
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)?;
        Ok(raw.into_config(None))
    }

    /// Read a config file. A missing file yields the defaults; any other
    /// read failure is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(IconError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let raw: RawConfig = toml::from_str(&content)?;
        Ok(raw.into_config(path.parent()))
    }

    /// `<config dir>/file-icons/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("file-icons").join("config.toml"))
    }

    pub fn from_config_dir() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn partial_config_overrides() {
        let config = Config::from_toml(
            r#"
            fallback_class = "default-icon"
            colour_mode = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.fallback_class, "default-icon");
        assert_eq!(config.colour_mode, 0);
        assert_eq!(config.directory_fallback_class, DEFAULT_DIRECTORY_CLASS);
        assert_eq!(config.database, None);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(matches!(
            Config::from_toml("colour_mode = \"blue\""),
            Err(IconError::Toml(_))
        ));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn unreadable_file_is_an_error() {
        // A directory exists at the path but cannot be read as a file.
        let dir = tempfile::tempdir().unwrap();
        match Config::load(dir.path()) {
            Err(IconError::Io { path, .. }) => assert_eq!(path, dir.path()),
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn relative_database_resolved_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "database = \"icons.json\"\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.database, Some(dir.path().join("icons.json")));
    }

    #[test]
    fn absolute_database_kept() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("elsewhere").join("db.json");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, format!("database = {:?}\n", db.to_string_lossy())).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.database, Some(db));
    }
}
