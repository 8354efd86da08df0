use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, trace, warn};

use crate::cache::{Lookup, MatchCache, QueryKind};
use crate::db::{RawDatabase, RawTable};
use crate::error::{IconError, Result};
use crate::icon::Icon;
use crate::pattern::try_match;
use crate::signature::{self, NoSignatures, SignatureMatcher};

const BINARY_SCOPE: &str = "source.asm";
const EXECUTABLE_INTERPRETER: &str = "bash";

/// Signatures are tested against, and cached by, at most this many leading bytes.
pub const SIGNATURE_WINDOW: usize = 64;

/// Icons of one table plus their per-attribute indices.
///
/// Every index holds positions into `icons`; order is match priority.
#[derive(Debug)]
struct IconSet {
    icons: Vec<Icon>,
    by_interpreter: Vec<usize>,
    by_language: Vec<usize>,
    by_path: Vec<usize>,
    by_scope: Vec<usize>,
    by_signature: Vec<usize>,
}

impl IconSet {
    fn read(table_name: &'static str, table: RawTable) -> Result<Self> {
        let icons: Vec<Icon> = table
            .rules
            .into_iter()
            .enumerate()
            .map(|(index, raw)| Icon::new(index, raw))
            .collect();

        for icon in &icons {
            for (field, pattern) in icon.patterns() {
                if !pattern.is_valid() {
                    warn!(
                        "{table_name} rule {} ({}): invalid {field} pattern {pattern:?}",
                        icon.index(),
                        icon.class()
                    );
                }
            }
        }

        let len = icons.len();
        let check = |index: &'static str, offsets: Vec<usize>| -> Result<Vec<usize>> {
            match offsets.iter().find(|&&offset| offset >= len) {
                Some(&offset) => Err(IconError::OffsetOutOfRange {
                    table: table_name,
                    index,
                    offset,
                    len,
                }),
                None => Ok(offsets),
            }
        };

        let defs = table.indices;
        Ok(IconSet {
            by_interpreter: check("interpreter", defs.interpreter)?,
            by_language: check("language", defs.language)?,
            by_path: check("path", defs.path)?,
            by_scope: check("scope", defs.scope)?,
            by_signature: check("signature", defs.signature)?,
            icons,
        })
    }

    /// The by-name index is the full rule list in table order.
    fn by_name(&self) -> impl Iterator<Item = usize> {
        0..self.icons.len()
    }
}

/// Indexed icon rules for directories and files, with memoised lookups.
pub struct IconTables {
    directories: IconSet,
    files: IconSet,
    binary_icon: Option<usize>,
    executable_icon: Option<usize>,
    cache: MatchCache,
    signatures: Box<dyn SignatureMatcher>,
    scans: AtomicUsize,
}

impl IconTables {
    pub fn new(db: RawDatabase) -> Result<Self> {
        Self::with_signature_matcher(db, NoSignatures)
    }

    pub fn with_signature_matcher(
        db: RawDatabase,
        signatures: impl SignatureMatcher + 'static,
    ) -> Result<Self> {
        let mut tables = IconTables {
            directories: IconSet::read("directory", db.directories)?,
            files: IconSet::read("file", db.files)?,
            binary_icon: None,
            executable_icon: None,
            cache: MatchCache::new(),
            signatures: Box::new(signatures),
            scans: AtomicUsize::new(0),
        };
        tables.binary_icon = tables.match_scope(BINARY_SCOPE).map(Icon::index);
        tables.executable_icon = tables.match_interpreter(EXECUTABLE_INTERPRETER).map(Icon::index);

        debug!(
            "icon tables ready: {} directory rules, {} file rules",
            tables.directories.icons.len(),
            tables.files.icons.len()
        );
        Ok(tables)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(RawDatabase::from_json(json)?)
    }

    pub fn builtin() -> Result<Self> {
        Self::new(RawDatabase::builtin()?)
    }

    fn set(&self, directory: bool) -> &IconSet {
        if directory {
            &self.directories
        } else {
            &self.files
        }
    }

    pub fn directory_icons(&self) -> &[Icon] {
        &self.directories.icons
    }

    pub fn file_icons(&self) -> &[Icon] {
        &self.files.icons
    }

    /// Icon for binary files, resolved from the `source.asm` scope.
    pub fn binary_icon(&self) -> Option<&Icon> {
        self.binary_icon.map(|i| &self.files.icons[i])
    }

    /// Icon for executables, resolved from the `bash` interpreter.
    pub fn executable_icon(&self) -> Option<&Icon> {
        self.executable_icon.map(|i| &self.files.icons[i])
    }

    /// Memoised first-match scan shared by every query kind.
    fn lookup<'a, I>(
        &'a self,
        kind: QueryKind,
        key: &str,
        set: &'a IconSet,
        order: I,
        test: impl Fn(&Icon) -> bool,
    ) -> Option<&'a Icon>
    where
        I: IntoIterator<Item = usize>,
    {
        if let Lookup::Cached(hit) = self.cache.get(kind, key) {
            trace!("{kind:?} cache hit for {key:?}");
            return hit.map(|i| &set.icons[i]);
        }

        self.scans.fetch_add(1, Ordering::Relaxed);
        let found = order.into_iter().find(|&i| test(&set.icons[i]));
        trace!("{kind:?} scanned for {key:?}: {found:?}");

        self.cache.insert(kind, key, found).map(|i| &set.icons[i])
    }

    /// Match an icon using a resource's basename.
    pub fn match_name(&self, name: &str, directory: bool) -> Option<&Icon> {
        let set = self.set(directory);
        self.lookup(QueryKind::for_name(directory), name, set, set.by_name(), |icon| {
            try_match(icon.pattern(), name)
        })
    }

    /// Match an icon using a resource's full path.
    pub fn match_path(&self, path: &str, directory: bool) -> Option<&Icon> {
        let set = self.set(directory);
        self.lookup(
            QueryKind::for_path(directory),
            path,
            set,
            set.by_path.iter().copied(),
            |icon| try_match(icon.pattern(), path),
        )
    }

    /// Match an icon using the name or alias of its language, e.g. `"JavaScript"`.
    pub fn match_language(&self, name: &str) -> Option<&Icon> {
        let set = &self.files;
        self.lookup(
            QueryKind::Language,
            name,
            set,
            set.by_language.iter().copied(),
            |icon| try_match(icon.language(), name),
        )
    }

    /// Match an icon using a grammar scope, e.g. `"source.js"`.
    pub fn match_scope(&self, scope: &str) -> Option<&Icon> {
        let set = &self.files;
        self.lookup(
            QueryKind::Scope,
            scope,
            set,
            set.by_scope.iter().copied(),
            |icon| try_match(icon.scope(), scope),
        )
    }

    /// Match an icon using the interpreter named in a hashbang, e.g. `"bash"`.
    pub fn match_interpreter(&self, name: &str) -> Option<&Icon> {
        let set = &self.files;
        self.lookup(
            QueryKind::Interpreter,
            name,
            set,
            set.by_interpreter.iter().copied(),
            |icon| try_match(icon.interpreter(), name),
        )
    }

    /// Match an icon using the leading bytes of a file.
    ///
    /// Only the first [`SIGNATURE_WINDOW`] bytes are considered. Always a
    /// miss unless a [`SignatureMatcher`] other than the default was installed.
    pub fn match_signature(&self, data: &[u8]) -> Option<&Icon> {
        let set = &self.files;
        let data = &data[..data.len().min(SIGNATURE_WINDOW)];
        let key = signature::cache_key(data);
        self.lookup(
            QueryKind::Signature,
            &key,
            set,
            set.by_signature.iter().copied(),
            |icon| {
                icon
                    .signature()
                    .is_some_and(|sig| self.signatures.matches(sig, data))
            },
        )
    }

    /// Number of index scans performed, i.e. lookups not served from cache.
    pub fn scan_count(&self) -> usize {
        self.scans.load(Ordering::Relaxed)
    }

    pub fn cache_len(&self, kind: QueryKind) -> usize {
        self.cache.len(kind)
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
