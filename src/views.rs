//! Plot-ready projections of an annotated table.
//!
//! Every projection borrows the table and leaves it untouched; rendering is left
//! to whichever plotting layer consumes these values.

use itertools::Itertools;

use crate::{
    math::{histogram, linear_fit, uniform_order_statistic_medians},
    record::Significance,
    table::AnnotatedTable,
};

/// Bin count of the p-value histogram when the caller has no preference
pub const DEFAULT_HISTOGRAM_BINS: usize = 50;

/// Category order of the fold change box plot
pub const BOX_PLOT_ORDER: [Significance; 3] = [
    Significance::Upregulated,
    Significance::NotSignificant,
    Significance::Downregulated,
];

/// A labeled scatter point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotPoint<'a> {
    pub gene_name: &'a str,
    pub locus_tag: &'a str,
    pub x: f64,
    pub y: f64,
    pub significance: Significance,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` bin edges
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

/// Sample quantiles against uniform theoretical quantiles
#[derive(Debug, Clone, PartialEq)]
pub struct QqPlot {
    pub theoretical: Vec<f64>,
    pub ordered: Vec<f64>,
    pub slope: f64,
    pub intercept: f64,
    pub r: f64,
}

impl AnnotatedTable {
    /// log2 fold change against `-log10(padj)`
    pub fn volcano_points(&self) -> Vec<PlotPoint<'_>> {
        self.records
            .iter()
            .map(|r| PlotPoint {
                gene_name: r.gene_name(),
                locus_tag: r.locus_tag(),
                x: r.log2_fold_change(),
                y: r.neg_log10_padj,
                significance: r.significance,
            })
            .collect()
    }

    /// `log10(baseMean)` against log2 fold change
    ///
    /// `None` without a baseMean column; rows missing a baseMean are skipped.
    pub fn ma_points(&self) -> Option<Vec<PlotPoint<'_>>> {
        if !self.has_base_mean {
            return None;
        }
        let points = self
            .records
            .iter()
            .filter_map(|r| {
                r.record.log10_base_mean().map(|x| PlotPoint {
                    gene_name: r.gene_name(),
                    locus_tag: r.locus_tag(),
                    x,
                    y: r.log2_fold_change(),
                    significance: r.significance,
                })
            })
            .collect();
        Some(points)
    }

    /// log2 fold changes grouped per category in [`BOX_PLOT_ORDER`]
    pub fn fold_change_groups(&self) -> Vec<(Significance, Vec<f64>)> {
        let groups = self
            .records
            .iter()
            .map(|r| (r.significance, r.log2_fold_change()))
            .into_group_map();
        BOX_PLOT_ORDER
            .iter()
            .map(|category| {
                let values = groups.get(category).cloned().unwrap_or_default();
                (*category, values)
            })
            .collect()
    }

    /// Distribution of adjusted p-values in equal-width bins
    pub fn padj_histogram(&self, bins: usize) -> Histogram {
        let padj = self.records.iter().map(|r| r.padj()).collect::<Vec<_>>();
        let (edges, counts) = histogram(&padj, bins);
        Histogram { edges, counts }
    }

    /// Uniform Q-Q plot of the adjusted p-values
    ///
    /// `None` for fewer than two genes, where no line can be fit.
    pub fn padj_qq(&self) -> Option<QqPlot> {
        let ordered = self
            .records
            .iter()
            .map(|r| r.padj())
            .sorted_by(f64::total_cmp)
            .collect::<Vec<_>>();
        if ordered.len() < 2 {
            return None;
        }
        let theoretical = uniform_order_statistic_medians(ordered.len());
        let (slope, intercept, r) = linear_fit(&theoretical, &ordered);
        Some(QqPlot {
            theoretical,
            ordered,
            slope,
            intercept,
            r,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{ParseConfig, Thresholds},
        ingest::read_table,
    };
    use approx::assert_relative_eq;

    const UPLOAD: &str = "\
baseMean\tlog2FoldChange\tpadj\tAttributes
100\t2.5\t0.001\tgene=dnaA;locus_tag=b0001
0\t-3.0\t0.0001\tgene=dnaN;locus_tag=b0002
\t0.2\t0.2\tgene=recF;locus_tag=b0003
1000\t1.2\t0.01\tgene=gyrB;locus_tag=b0004
";

    fn table() -> AnnotatedTable {
        let raw = read_table(UPLOAD.as_bytes(), &ParseConfig::default()).unwrap();
        AnnotatedTable::from_raw(&raw, &Thresholds::default())
    }

    #[test]
    fn test_volcano_points() {
        let table = table();
        let points = table.volcano_points();
        assert_eq!(points.len(), 4);
        assert_eq!(points[0].gene_name, "dnaA");
        assert_eq!(points[0].x, 2.5);
        assert_relative_eq!(points[0].y, 3.0, epsilon = 1e-12);
        assert_eq!(points[1].significance, Significance::Downregulated);
    }

    #[test]
    fn test_ma_points_skip_missing_base_mean() {
        let table = table();
        let points = table.ma_points().unwrap();
        assert_eq!(points.len(), 3);
        assert_relative_eq!(points[0].x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(points[1].x, -10.0, epsilon = 1e-12);
        assert_eq!(points[2].gene_name, "gyrB");
    }

    #[test]
    fn test_ma_points_without_base_mean() {
        let raw = read_table(b"log2FoldChange\tpadj\n1\t0.5\n", &ParseConfig::default()).unwrap();
        let table = AnnotatedTable::from_raw(&raw, &Thresholds::default());
        assert!(table.ma_points().is_none());
    }

    #[test]
    fn test_fold_change_groups() {
        let groups = table().fold_change_groups();
        assert_eq!(
            groups,
            vec![
                (Significance::Upregulated, vec![2.5, 1.2]),
                (Significance::NotSignificant, vec![0.2]),
                (Significance::Downregulated, vec![-3.0]),
            ]
        );
    }

    #[test]
    fn test_padj_histogram() {
        let histogram = table().padj_histogram(DEFAULT_HISTOGRAM_BINS);
        assert_eq!(histogram.counts.len(), DEFAULT_HISTOGRAM_BINS);
        assert_eq!(histogram.edges.len(), DEFAULT_HISTOGRAM_BINS + 1);
        assert_eq!(histogram.counts.iter().sum::<usize>(), 4);
        assert_eq!(histogram.counts[DEFAULT_HISTOGRAM_BINS - 1], 1);
    }

    #[test]
    fn test_padj_qq() {
        let qq = table().padj_qq().unwrap();
        assert_eq!(qq.ordered, vec![0.0001, 0.001, 0.01, 0.2]);
        assert_eq!(qq.theoretical.len(), 4);
        assert!(qq.theoretical.windows(2).all(|w| w[0] < w[1]));
        assert!(qq.slope > 0.0);
        assert!(qq.r > 0.0 && qq.r <= 1.0);
    }
}
