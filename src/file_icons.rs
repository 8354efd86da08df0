use std::path::Path;

use tracing::debug;

use crate::config::Config;
use crate::db::RawDatabase;
use crate::error::Result;
use crate::icon::Icon;
use crate::tables::IconTables;

/// Resolves CSS icon classes for file names, falling back to a generic icon.
pub struct FileIcons {
    tables: IconTables,
    config: Config,
}

impl FileIcons {
    pub fn new(tables: IconTables, config: Config) -> Self {
        FileIcons { tables, config }
    }

    pub fn builtin() -> Result<Self> {
        Ok(Self::new(IconTables::builtin()?, Config::default()))
    }

    /// Build from the user's config file, loading its database if one is set.
    pub fn from_config() -> Result<Self> {
        Self::with_config(Config::from_config_dir()?)
    }

    pub fn with_config(config: Config) -> Result<Self> {
        let db = match &config.database {
            Some(path) => RawDatabase::load(path)?,
            None => RawDatabase::builtin()?,
        };
        Ok(Self::new(IconTables::new(db)?, config))
    }

    pub fn tables(&self) -> &IconTables {
        &self.tables
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn render(&self, icon: Option<&Icon>, colour_mode: Option<usize>, fallback: &str) -> String {
        let Some(icon) = icon else {
            return fallback.to_string();
        };
        icon.render_class(colour_mode).unwrap_or_else(|e| {
            debug!("falling back to {fallback}: {e}");
            fallback.to_string()
        })
    }

    /// Class for a file name, or the fallback class.
    pub fn class_for(&self, name: &str) -> String {
        self.render(
            self.tables.match_name(name, false),
            None,
            &self.config.fallback_class,
        )
    }

    /// Like [`class_for`](Self::class_for), with the configured colour class appended.
    pub fn class_with_colour(&self, name: &str) -> String {
        self.render(
            self.tables.match_name(name, false),
            Some(self.config.colour_mode),
            &self.config.fallback_class,
        )
    }

    pub fn class_for_dir(&self, name: &str) -> String {
        self.render(
            self.tables.match_name(name, true),
            None,
            &self.config.directory_fallback_class,
        )
    }

    /// Class for a full path: path rules first, then the basename.
    pub fn class_for_path(&self, path: &Path) -> String {
        let full = path.to_string_lossy();
        let icon = self.tables.match_path(&full, false).or_else(|| {
            path.file_name()
                .and_then(|n| self.tables.match_name(&n.to_string_lossy(), false))
        });
        self.render(icon, None, &self.config.fallback_class)
    }
}
