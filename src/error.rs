use std::fmt;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Failures surfaced to the caller while ingesting a table
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("malformed input: {reason}")]
    MalformedInput { reason: String },

    #[error("required column `{column}` not found in header")]
    MissingColumn { column: String },

    #[error("row {row}: column `{column}` holds non-numeric value `{value}`")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("invalid threshold: {reason}")]
    InvalidThreshold { reason: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            reason: reason.into(),
        }
    }

    /// Whether the failure means the upload could not be read as a table at all
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Self::MalformedInput { .. }
                | Self::MissingColumn { .. }
                | Self::InvalidNumber { .. }
                | Self::Csv(_)
        )
    }
}

/// Irregularities that degrade the output but never stop ingestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestWarning {
    /// No annotation column; row indices are used as gene labels
    MissingAnnotationColumn { column: String },
    /// No per-sample count columns were found
    NoCountColumns,
}

impl fmt::Display for IngestWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAnnotationColumn { column } => write!(
                f,
                "'{column}' column not found. Using row indices for labels."
            ),
            Self::NoCountColumns => write!(f, "No count columns found in the dataset."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_grouping() {
        assert!(PipelineError::malformed("empty").is_malformed_input());
        assert!(PipelineError::MissingColumn {
            column: "padj".into()
        }
        .is_malformed_input());
        assert!(!PipelineError::InvalidThreshold {
            reason: "padj".into()
        }
        .is_malformed_input());
    }

    #[test]
    fn test_messages() {
        let err = PipelineError::InvalidNumber {
            row: 3,
            column: "padj".into(),
            value: "abc".into(),
        };
        assert_eq!(
            err.to_string(),
            "row 3: column `padj` holds non-numeric value `abc`"
        );
        let warning = IngestWarning::MissingAnnotationColumn {
            column: "Attributes".into(),
        };
        assert_eq!(
            warning.to_string(),
            "'Attributes' column not found. Using row indices for labels."
        );
    }
}
