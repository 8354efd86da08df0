use std::collections::HashMap;

use parking_lot::RwLock;

/// Which memo bucket a query lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    DirectoryName,
    DirectoryPath,
    FileName,
    FilePath,
    Interpreter,
    Scope,
    Language,
    Signature,
}

impl QueryKind {
    pub const ALL: [QueryKind; 8] = [
        QueryKind::DirectoryName,
        QueryKind::DirectoryPath,
        QueryKind::FileName,
        QueryKind::FilePath,
        QueryKind::Interpreter,
        QueryKind::Scope,
        QueryKind::Language,
        QueryKind::Signature,
    ];

    pub fn for_name(directory: bool) -> Self {
        if directory {
            Self::DirectoryName
        } else {
            Self::FileName
        }
    }

    pub fn for_path(directory: bool) -> Self {
        if directory {
            Self::DirectoryPath
        } else {
            Self::FilePath
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Outcome of a cache lookup. `Cached(None)` is a remembered miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Uncached,
    Cached(Option<usize>),
}

/// Per-kind memo of query string to rule position.
#[derive(Debug, Default)]
pub struct MatchCache {
    buckets: [RwLock<HashMap<String, Option<usize>>>; 8],
}

impl MatchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: QueryKind, key: &str) -> Lookup {
        match self.buckets[kind.slot()].read().get(key) {
            Some(hit) => Lookup::Cached(*hit),
            None => Lookup::Uncached,
        }
    }

    /// Store a result, keeping any value another thread stored first.
    pub fn insert(&self, kind: QueryKind, key: &str, value: Option<usize>) -> Option<usize> {
        *self.buckets[kind.slot()]
            .write()
            .entry(key.to_string())
            .or_insert(value)
    }

    pub fn len(&self, kind: QueryKind) -> usize {
        self.buckets[kind.slot()].read().len()
    }

    pub fn clear(&self) {
        for bucket in &self.buckets {
            bucket.write().clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinguishes_miss_from_unqueried() {
        let cache = MatchCache::new();
        assert_eq!(cache.get(QueryKind::FileName, "a.js"), Lookup::Uncached);
        cache.insert(QueryKind::FileName, "a.js", None);
        assert_eq!(cache.get(QueryKind::FileName, "a.js"), Lookup::Cached(None));
    }

    #[test]
    fn buckets_are_independent() {
        let cache = MatchCache::new();
        cache.insert(QueryKind::FileName, "src", Some(4));
        assert_eq!(cache.get(QueryKind::DirectoryName, "src"), Lookup::Uncached);
        assert_eq!(cache.get(QueryKind::FilePath, "src"), Lookup::Uncached);
        assert_eq!(cache.get(QueryKind::FileName, "src"), Lookup::Cached(Some(4)));
        assert_eq!(cache.len(QueryKind::FileName), 1);
        assert_eq!(cache.len(QueryKind::Scope), 0);
    }

    #[test]
    fn first_insert_wins() {
        let cache = MatchCache::new();
        assert_eq!(cache.insert(QueryKind::Scope, "source.js", Some(1)), Some(1));
        assert_eq!(cache.insert(QueryKind::Scope, "source.js", Some(2)), Some(1));
    }

    #[test]
    fn clear_empties_all_buckets() {
        let cache = MatchCache::new();
        for kind in QueryKind::ALL {
            cache.insert(kind, "x", None);
        }
        cache.clear();
        for kind in QueryKind::ALL {
            assert_eq!(cache.len(kind), 0);
        }
    }

    #[test]
    fn name_and_path_helpers() {
        assert_eq!(QueryKind::for_name(true), QueryKind::DirectoryName);
        assert_eq!(QueryKind::for_path(false), QueryKind::FilePath);
    }
}
