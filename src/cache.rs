//! Content-addressed memoization of the latest parsed upload.
//!
//! The key is the blake3 hash of the raw bytes. Re-uploading identical content
//! skips parsing, while different bytes replace the cached table.

use std::sync::Arc;

use crate::{
    config::ParseConfig,
    error::Result,
    ingest::{read_table, RawTable},
};

#[derive(Debug, Default)]
pub struct IngestCache {
    entry: Option<(blake3::Hash, Arc<RawTable>)>,
}

impl IngestCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the parsed table for `bytes`, parsing only on a miss
    ///
    /// A successful parse replaces the cached table; failed parses leave it in place.
    pub fn get_or_parse(&mut self, bytes: &[u8], config: &ParseConfig) -> Result<Arc<RawTable>> {
        let key = blake3::hash(bytes);
        if let Some((cached, table)) = &self.entry {
            if *cached == key {
                log::debug!("ingest cache hit for {}", key.to_hex());
                return Ok(Arc::clone(table));
            }
        }
        log::debug!("ingest cache miss for {}", key.to_hex());
        let table = Arc::new(read_table(bytes, config)?);
        self.entry = Some((key, Arc::clone(&table)));
        Ok(table)
    }

    pub fn contains(&self, bytes: &[u8]) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|(key, _)| *key == blake3::hash(bytes))
    }

    /// Number of cached uploads, at most one.
    pub fn len(&self) -> usize {
        usize::from(self.entry.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UPLOAD: &[u8] = b"log2FoldChange\tpadj\n1.0\t0.01\n";

    #[test]
    fn test_hit_returns_same_table() -> anyhow::Result<()> {
        let mut cache = IngestCache::new();
        let config = ParseConfig::default();
        let first = cache.get_or_parse(UPLOAD, &config)?;
        let second = cache.get_or_parse(UPLOAD, &config)?;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        Ok(())
    }

    #[test]
    fn test_different_bytes_miss() -> anyhow::Result<()> {
        let mut cache = IngestCache::new();
        let config = ParseConfig::default();
        let first = cache.get_or_parse(UPLOAD, &config)?;
        let second = cache.get_or_parse(b"log2FoldChange\tpadj\n2.0\t0.01\n", &config)?;
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert!(!cache.contains(UPLOAD));

        let third = cache.get_or_parse(UPLOAD, &config)?;
        assert!(!Arc::ptr_eq(&first, &third));
        assert!(cache.contains(UPLOAD));
        assert_eq!(cache.len(), 1);
        Ok(())
    }

    #[test]
    fn test_errors_not_cached() {
        let mut cache = IngestCache::new();
        let bytes = b"baseMean\n1.0\n";
        assert!(cache.get_or_parse(bytes, &ParseConfig::default()).is_err());
        assert!(!cache.contains(bytes));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_failed_parse_keeps_previous_table() -> anyhow::Result<()> {
        let mut cache = IngestCache::new();
        let config = ParseConfig::default();
        let first = cache.get_or_parse(UPLOAD, &config)?;
        assert!(cache.get_or_parse(b"baseMean\n1.0\n", &config).is_err());
        assert!(cache.contains(UPLOAD));
        assert!(Arc::ptr_eq(&first, &cache.get_or_parse(UPLOAD, &config)?));
        Ok(())
    }

    #[test]
    fn test_clear() -> anyhow::Result<()> {
        let mut cache = IngestCache::new();
        cache.get_or_parse(UPLOAD, &ParseConfig::default())?;
        assert!(cache.contains(UPLOAD));
        cache.clear();
        assert!(cache.is_empty());
        Ok(())
    }
}
