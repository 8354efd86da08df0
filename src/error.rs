use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IconError {
    #[error("invalid icon database: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An index definition points past the end of its rule list.
    #[error("{table} table: index {index} references rule {offset}, but only {len} rules exist")]
    OffsetOutOfRange {
        table: &'static str,
        index: &'static str,
        offset: usize,
        len: usize,
    },

    #[error("colour mode {mode} out of range for {class} ({available} variants)")]
    ColourModeOutOfRange {
        class: String,
        mode: usize,
        available: usize,
    },
}

pub type Result<T> = std::result::Result<T, IconError>;
