//! File-specific icon classes.
//!
//! Resolves a CSS icon class for a file or directory from its name, path,
//! hashbang interpreter, language name or grammar scope, using an indexed
//! rule database in the format of the Atom file-icons package.
//!
//! ```
//! let icons = file_icons::FileIcons::builtin()?;
//! assert_eq!(icons.class_for("main.rs"), "rust-icon");
//! assert_eq!(icons.class_for("notes"), "text-icon");
//! # Ok::<(), file_icons::IconError>(())
//! ```

mod cache;
mod config;
mod db;
mod error;
mod file_icons;
mod icon;
mod pattern;
mod signature;
mod tables;

pub use cache::QueryKind;
pub use config::Config;
pub use db::{RawDatabase, RawIndexDefs, RawRule, RawTable};
pub use error::{IconError, Result};
pub use file_icons::FileIcons;
pub use icon::{ClassName, Icon};
pub use pattern::{Pattern, try_match};
pub use signature::{NoSignatures, PrefixSignatures, SignatureMatcher};
pub use tables::{IconTables, SIGNATURE_WINDOW};
