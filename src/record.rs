use std::{fmt, str::FromStr};

use bon::Builder;
use derive_new::new;

use crate::{
    attributes::GeneLabel,
    error::PipelineError,
    math::{floored_log10, BASE_MEAN_FLOOR},
};

/// One ingested row of a differential expression table
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct GeneRecord {
    /// 0-based position of the row in the upload, counted before any row is dropped
    pub index: usize,
    /// Raw annotation text, when the upload has an annotation column
    #[builder(into)]
    pub attributes: Option<String>,
    #[builder(into)]
    pub gene_name: String,
    #[builder(into)]
    pub locus_tag: String,
    pub log2_fold_change: f64,
    pub padj: f64,
    pub base_mean: Option<f64>,
    /// Per-sample normalized counts, aligned with the table's count columns
    #[builder(default)]
    pub counts: Vec<Option<f64>>,
    /// Raw text of the table's unrecognized columns, aligned with its extra columns
    #[builder(default)]
    pub extra: Vec<Option<String>>,
}

impl GeneRecord {
    pub fn label(&self) -> GeneLabel {
        GeneLabel::new(self.gene_name.clone(), self.locus_tag.clone())
    }

    /// `log10(baseMean)` with zero floored to `1e-10`
    pub fn log10_base_mean(&self) -> Option<f64> {
        self.base_mean.map(|x| floored_log10(x, BASE_MEAN_FLOOR))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Significance {
    Upregulated,
    Downregulated,
    NotSignificant,
}

impl Significance {
    pub const ALL: [Significance; 3] = [
        Significance::Upregulated,
        Significance::Downregulated,
        Significance::NotSignificant,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Significance::Upregulated => "Upregulated",
            Significance::Downregulated => "Downregulated",
            Significance::NotSignificant => "Not Significant",
        }
    }
}

impl fmt::Display for Significance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Significance {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Upregulated" => Ok(Significance::Upregulated),
            "Downregulated" => Ok(Significance::Downregulated),
            "Not Significant" | "NotSignificant" => Ok(Significance::NotSignificant),
            other => Err(PipelineError::malformed(format!(
                "unknown significance category `{other}`"
            ))),
        }
    }
}

/// A gene record with its classification attached
#[derive(new, Debug, Clone, PartialEq)]
pub struct AnnotatedRecord {
    pub record: GeneRecord,
    pub significance: Significance,
    /// `-log10(padj)` with zero p-values floored to `1e-300`
    pub neg_log10_padj: f64,
}

impl AnnotatedRecord {
    pub fn gene_name(&self) -> &str {
        &self.record.gene_name
    }

    pub fn locus_tag(&self) -> &str {
        &self.record.locus_tag
    }

    pub fn log2_fold_change(&self) -> f64 {
        self.record.log2_fold_change
    }

    pub fn padj(&self) -> f64 {
        self.record.padj
    }
}
