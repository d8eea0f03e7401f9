use bon::Builder;

use crate::error::{PipelineError, Result};

pub const DEFAULT_PADJ_THRESHOLD: f64 = 0.05;
pub const DEFAULT_LOG2FC_UP: f64 = 1.0;
pub const DEFAULT_LOG2FC_DOWN: f64 = -1.0;

/// Significance cutoffs applied by the classifier
///
/// Nothing here is enforced during classification: out-of-range values simply
/// yield a degenerate labeling. Use [`Thresholds::validate`] on the caller side.
#[derive(Debug, Clone, Copy, PartialEq, Builder)]
pub struct Thresholds {
    /// Adjusted p-values strictly below this are significant
    #[builder(default = DEFAULT_PADJ_THRESHOLD)]
    pub padj: f64,
    /// Minimum log2 fold change (inclusive) for upregulation
    #[builder(default = DEFAULT_LOG2FC_UP)]
    pub log2fc_up: f64,
    /// Maximum log2 fold change (inclusive) for downregulation
    #[builder(default = DEFAULT_LOG2FC_DOWN)]
    pub log2fc_down: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Thresholds {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.padj) {
            return Err(PipelineError::InvalidThreshold {
                reason: format!("padj threshold {} outside [0, 1]", self.padj),
            });
        }
        if self.log2fc_up.is_nan() || self.log2fc_up < 0.0 {
            return Err(PipelineError::InvalidThreshold {
                reason: format!("upregulation threshold {} is negative", self.log2fc_up),
            });
        }
        if self.log2fc_down.is_nan() || self.log2fc_down > 0.0 {
            return Err(PipelineError::InvalidThreshold {
                reason: format!(
                    "downregulation threshold {} is positive",
                    self.log2fc_down
                ),
            });
        }
        Ok(())
    }

    /// Height of the padj cutoff on a `-log10(padj)` axis
    pub fn neg_log10_padj(&self) -> f64 {
        -self.padj.log10()
    }
}

/// How per-sample count columns are recognized in the header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountColumns {
    /// Every column whose name contains the pattern, ignoring case
    Containing(String),
    /// Exactly these columns, in this order
    Named(Vec<String>),
}

impl Default for CountColumns {
    fn default() -> Self {
        Self::Containing("countings".to_string())
    }
}

impl CountColumns {
    /// Resolves the selector against a header into `(column index, name)` pairs
    pub fn select(&self, header: &[String]) -> Result<Vec<(usize, String)>> {
        match self {
            Self::Containing(pattern) => {
                let pattern = pattern.to_lowercase();
                Ok(header
                    .iter()
                    .enumerate()
                    .filter(|(_, name)| name.to_lowercase().contains(&pattern))
                    .map(|(i, name)| (i, name.clone()))
                    .collect())
            }
            Self::Named(names) => names
                .iter()
                .map(|name| {
                    header
                        .iter()
                        .position(|h| h == name)
                        .map(|i| (i, name.clone()))
                        .ok_or_else(|| PipelineError::MissingColumn {
                            column: name.clone(),
                        })
                })
                .collect(),
        }
    }
}

/// Settings for reading the delimited upload
#[derive(Debug, Clone, Builder)]
pub struct ParseConfig {
    #[builder(default = b'\t')]
    pub delimiter: u8,
    #[builder(default = b'#')]
    pub comment: u8,
    #[builder(default = default_null_tokens())]
    pub null_tokens: Vec<String>,
    #[builder(default = "Attributes".to_string(), into)]
    pub annotation_column: String,
    #[builder(default)]
    pub count_columns: CountColumns,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ParseConfig {
    pub fn is_null(&self, field: &str) -> bool {
        self.null_tokens.iter().any(|token| token == field)
    }
}

fn default_null_tokens() -> Vec<String> {
    ["", "NA", "NaN"].iter().map(|s| s.to_string()).collect()
}
