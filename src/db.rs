//! Shape of the icon database asset.
//!
//! The asset is a JSON array `[directoryTable, fileTable]`, each table being
//! `[rules, indexDefs]`. Rules are positional arrays and the five index
//! definitions hold offsets into the rule list:
//! `[interpreter, language, path, scope, signature]`.

use std::path::Path;

use serde::Deserialize;

use crate::error::{IconError, Result};

const BUILTIN_DB: &str = include_str!("../assets/icondb.json");

/// One rule row: `[class, colours, match, priority?, matchPath?,
/// interpreter?, scope?, language?, signature?]`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRule {
    pub class: String,
    #[serde(default)]
    pub colours: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub priority: Option<i32>,
    #[serde(default)]
    pub match_path: Option<bool>,
    #[serde(default)]
    pub interpreter: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawIndexDefs {
    pub interpreter: Vec<usize>,
    pub language: Vec<usize>,
    pub path: Vec<usize>,
    pub scope: Vec<usize>,
    pub signature: Vec<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTable {
    pub rules: Vec<RawRule>,
    pub indices: RawIndexDefs,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDatabase {
    pub directories: RawTable,
    pub files: RawTable,
}

impl RawDatabase {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| IconError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// The database bundled with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_DB)
    }
}
