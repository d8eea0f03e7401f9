use std::{path::Path, sync::Arc};

use crate::{
    cache::IngestCache,
    config::{ParseConfig, Thresholds},
    error::Result,
    ingest::RawTable,
    table::AnnotatedTable,
};

/// Classifies already-ingested records
///
/// Pure: identical inputs always give an identical table, so it is safe to
/// call again on every threshold change.
pub fn recompute(raw: &RawTable, thresholds: &Thresholds) -> AnnotatedTable {
    log::debug!(
        "classifying {} records (padj < {}, log2FC >= {} or <= {})",
        raw.len(),
        thresholds.padj,
        thresholds.log2fc_up,
        thresholds.log2fc_down
    );
    AnnotatedTable::from_raw(raw, thresholds)
}

/// Ingestion and classification of differential expression uploads
///
/// The pipeline runs in two stages:
/// 1. Parse the upload into gene records, dropping incomplete rows (cached by content)
/// 2. Classify every record against the thresholds
pub struct DatasetPipeline {
    config: ParseConfig,
    cache: IngestCache,
}

impl Default for DatasetPipeline {
    fn default() -> Self {
        Self::new(ParseConfig::default())
    }
}

impl DatasetPipeline {
    pub fn new(config: ParseConfig) -> Self {
        Self {
            config,
            cache: IngestCache::new(),
        }
    }

    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    pub fn cache(&self) -> &IngestCache {
        &self.cache
    }

    /// Parses an upload, reusing the previous parse of identical bytes
    pub fn ingest(&mut self, bytes: &[u8]) -> Result<Arc<RawTable>> {
        self.cache.get_or_parse(bytes, &self.config)
    }

    pub fn ingest_path(&mut self, path: impl AsRef<Path>) -> Result<Arc<RawTable>> {
        let bytes = std::fs::read(path)?;
        self.ingest(&bytes)
    }

    /// Ingests and classifies in one pass
    pub fn run(&mut self, bytes: &[u8], thresholds: &Thresholds) -> Result<AnnotatedTable> {
        let raw = self.ingest(bytes)?;
        Ok(recompute(&raw, thresholds))
    }
}

/// State of a single interactive session
///
/// Each session owns its pipeline, upload and annotated table. Any change of
/// upload or thresholds rebuilds the annotated table from scratch.
#[derive(Default)]
pub struct Session {
    pipeline: DatasetPipeline,
    raw: Option<Arc<RawTable>>,
    thresholds: Thresholds,
    table: Option<AnnotatedTable>,
}

impl Session {
    pub fn new(config: ParseConfig, thresholds: Thresholds) -> Self {
        Self {
            pipeline: DatasetPipeline::new(config),
            raw: None,
            thresholds,
            table: None,
        }
    }

    /// Replaces the upload; on failure the previous state is kept
    pub fn upload(&mut self, bytes: &[u8]) -> Result<&AnnotatedTable> {
        let raw = self.pipeline.ingest(bytes)?;
        let table = recompute(&raw, &self.thresholds);
        self.raw = Some(raw);
        Ok(self.table.insert(table))
    }

    /// Replaces the thresholds and reclassifies the current upload, if any
    pub fn set_thresholds(&mut self, thresholds: Thresholds) -> Option<&AnnotatedTable> {
        self.thresholds = thresholds;
        let raw = self.raw.as_ref()?;
        let table = recompute(raw, &self.thresholds);
        Some(self.table.insert(table))
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn raw(&self) -> Option<&RawTable> {
        self.raw.as_deref()
    }

    pub fn table(&self) -> Option<&AnnotatedTable> {
        self.table.as_ref()
    }
}
