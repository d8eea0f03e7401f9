use rayon::prelude::*;

use crate::{
    config::Thresholds,
    math::neg_log10_pvalue,
    record::{AnnotatedRecord, GeneRecord, Significance},
};

impl Significance {
    /// Assigns the category of a single gene
    ///
    /// Significance needs `padj < threshold` (strict) and a fold change at or past
    /// one of the log2 cutoffs (inclusive). Upregulation is tested first, so it wins
    /// when malformed thresholds let both conditions hold.
    pub fn classify(log2_fold_change: f64, padj: f64, thresholds: &Thresholds) -> Self {
        let significant = padj < thresholds.padj;
        if significant && log2_fold_change >= thresholds.log2fc_up {
            Significance::Upregulated
        } else if significant && log2_fold_change <= thresholds.log2fc_down {
            Significance::Downregulated
        } else {
            Significance::NotSignificant
        }
    }
}

/// Annotates a single record without touching the input
pub fn annotate(record: &GeneRecord, thresholds: &Thresholds) -> AnnotatedRecord {
    let significance =
        Significance::classify(record.log2_fold_change, record.padj, thresholds);
    let neg_log10_padj = neg_log10_pvalue(record.padj);
    AnnotatedRecord::new(record.clone(), significance, neg_log10_padj)
}

/// Classifies every record in parallel
///
/// Rows are independent, and the output keeps the input order.
pub fn classify(records: &[GeneRecord], thresholds: &Thresholds) -> Vec<AnnotatedRecord> {
    records
        .par_iter()
        .map(|record| annotate(record, thresholds))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn record(index: usize, log2_fold_change: f64, padj: f64) -> GeneRecord {
        GeneRecord::builder()
            .index(index)
            .gene_name(format!("g{index}"))
            .locus_tag(format!("l{index}"))
            .log2_fold_change(log2_fold_change)
            .padj(padj)
            .build()
    }

    #[test]
    fn test_upregulated() {
        let annotated = annotate(&record(0, 2.5, 0.001), &Thresholds::default());
        assert_eq!(annotated.significance, Significance::Upregulated);
        assert_relative_eq!(annotated.neg_log10_padj, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_downregulated() {
        let annotated = annotate(&record(0, -3.0, 0.0001), &Thresholds::default());
        assert_eq!(annotated.significance, Significance::Downregulated);
    }

    #[test]
    fn test_not_significant() {
        let annotated = annotate(&record(0, 0.2, 0.2), &Thresholds::default());
        assert_eq!(annotated.significance, Significance::NotSignificant);
    }

    #[test]
    fn test_significant_padj_small_fold_change() {
        let annotated = annotate(&record(0, 0.5, 1e-10), &Thresholds::default());
        assert_eq!(annotated.significance, Significance::NotSignificant);
    }

    #[test]
    fn test_padj_boundary_is_strict() {
        let thresholds = Thresholds::default();
        assert_eq!(
            Significance::classify(5.0, thresholds.padj, &thresholds),
            Significance::NotSignificant
        );
        assert_eq!(
            Significance::classify(-5.0, thresholds.padj, &thresholds),
            Significance::NotSignificant
        );
    }

    #[test]
    fn test_fold_change_boundaries_are_inclusive() {
        let thresholds = Thresholds::default();
        assert_eq!(
            Significance::classify(thresholds.log2fc_up, 0.01, &thresholds),
            Significance::Upregulated
        );
        assert_eq!(
            Significance::classify(thresholds.log2fc_down, 0.01, &thresholds),
            Significance::Downregulated
        );
    }

    #[test]
    fn test_upregulated_wins_on_overlapping_thresholds() {
        let thresholds = Thresholds::builder().log2fc_up(0.0).log2fc_down(1.0).build();
        assert_eq!(
            Significance::classify(0.5, 0.01, &thresholds),
            Significance::Upregulated
        );
    }

    #[test]
    fn test_degenerate_padj_threshold() {
        let thresholds = Thresholds::builder().padj(0.0).build();
        assert_eq!(
            Significance::classify(10.0, 0.0, &thresholds),
            Significance::NotSignificant
        );
    }

    #[test]
    fn test_zero_padj() {
        let annotated = annotate(&record(0, 4.0, 0.0), &Thresholds::default());
        assert_eq!(annotated.significance, Significance::Upregulated);
        assert!(annotated.neg_log10_padj.is_finite());
        assert_relative_eq!(annotated.neg_log10_padj, 300.0, epsilon = 1e-9);
    }

    #[test]
    fn test_classify_preserves_order_and_input() {
        let records = (0..1000)
            .map(|i| record(i, (i as f64 - 500.0) / 100.0, (i % 10) as f64 / 100.0))
            .collect::<Vec<_>>();
        let before = records.clone();
        let annotated = classify(&records, &Thresholds::default());

        assert_eq!(records, before);
        assert_eq!(annotated.len(), records.len());
        for (annotated, record) in annotated.iter().zip(records.iter()) {
            assert_eq!(&annotated.record, record);
            assert_eq!(
                annotated.significance,
                Significance::classify(record.log2_fold_change, record.padj, &Thresholds::default())
            );
        }
    }

    #[test]
    fn test_classify_is_deterministic() {
        let records = vec![record(0, 2.0, 0.01), record(1, -2.0, 0.5), record(2, 0.0, 0.0)];
        let thresholds = Thresholds::default();
        assert_eq!(classify(&records, &thresholds), classify(&records, &thresholds));
    }
}
