use std::collections::HashMap;

use super::SearchResult;

#[derive(Debug, Clone, PartialEq)]
pub struct CachedSearch {
    pub summary: String,
    pub results: Vec<SearchResult>,
}

/// Search digests keyed by the exact query string. Lives as long as the session.
// TODO: fold case and whitespace in keys and bound the map with LRU eviction for long-running use.
#[derive(Debug, Default)]
pub struct SearchCache {
    entries: HashMap<String, CachedSearch>,
}

impl SearchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, query: &str) -> Option<&CachedSearch> {
        self.entries.get(query)
    }

    pub fn insert(&mut self, query: impl Into<String>, entry: CachedSearch) {
        self.entries.insert(query.into(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_exact() {
        let mut cache = SearchCache::new();
        cache.insert(
            "Reichenbach Falls",
            CachedSearch {
                summary: "digest".into(),
                results: vec![],
            },
        );
        assert!(cache.get("Reichenbach Falls").is_some());
        assert!(cache.get("reichenbach falls").is_none());
        assert!(cache.get("Reichenbach Falls ").is_none());
    }
}
