//! degscope: Significance Classification for Differential Expression Tables
//!
//! This library turns the per-gene statistics of an RNA-seq differential
//! expression comparison (e.g. DESeq2 output) into an annotated table: each gene
//! is labeled upregulated, downregulated or not significant under adjustable
//! thresholds, and carries the derived metrics needed by volcano, MA, box,
//! heatmap and p-value plots.
//!
//! The main components of this library are:
//! - `parse_attributes`: Extracts gene names and locus tags from annotation strings
//! - `Significance::classify` / `classify`: Threshold-based classification
//! - `DatasetPipeline`: Cached ingestion of uploads followed by classification
//! - `AnnotatedTable`: The classified table and its read-only views and exports

mod attributes;
mod cache;
mod classify;
mod config;
mod error;
mod export;
mod ingest;
mod math;
mod pipeline;
mod record;
mod table;
mod utils;
mod views;

pub use attributes::{parse_attributes, GeneLabel, UNKNOWN};
pub use cache::IngestCache;
pub use classify::{annotate, classify};
pub use config::{CountColumns, ParseConfig, Thresholds};
pub use error::{IngestWarning, PipelineError, Result};
pub use export::export_header;
pub use ingest::{read_table, RawTable};
pub use math::{neg_log10_pvalue, BASE_MEAN_FLOOR, PVALUE_FLOOR};
pub use pipeline::{recompute, DatasetPipeline, Session};
pub use record::{AnnotatedRecord, GeneRecord, Significance};
pub use table::{AnnotatedTable, Heatmap, Summary, TableView, DEFAULT_TOP_N};
pub use views::{Histogram, PlotPoint, QqPlot, DEFAULT_HISTOGRAM_BINS};
