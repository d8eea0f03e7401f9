use std::io::Write;

use derive_new::new;
use itertools::Itertools;

use crate::{
    classify::classify,
    config::Thresholds,
    error::Result,
    export::write_delimited,
    ingest::RawTable,
    record::{AnnotatedRecord, Significance},
    utils::{index_mask, select_indices},
};

/// Number of genes shown in a heatmap when the caller has no preference
pub const DEFAULT_TOP_N: usize = 20;

/// Classified genes plus the column layout needed to present them
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedTable {
    pub records: Vec<AnnotatedRecord>,
    pub count_columns: Vec<String>,
    pub annotation_column: Option<String>,
    pub has_base_mean: bool,
    pub extra_columns: Vec<String>,
    /// Thresholds the records were classified with
    pub thresholds: Thresholds,
}

impl AnnotatedTable {
    /// Classifies every record of an ingested table
    pub fn from_raw(raw: &RawTable, thresholds: &Thresholds) -> Self {
        Self {
            records: classify(&raw.records, thresholds),
            count_columns: raw.count_columns.clone(),
            annotation_column: raw.annotation_column.clone(),
            has_base_mean: raw.has_base_mean,
            extra_columns: raw.extra_columns.clone(),
            thresholds: *thresholds,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn summary(&self) -> Summary {
        let counts = self.records.iter().map(|r| r.significance).counts();
        let count = |category: Significance| counts.get(&category).copied().unwrap_or(0);
        Summary::new(
            self.len(),
            count(Significance::Upregulated),
            count(Significance::Downregulated),
            count(Significance::NotSignificant),
        )
    }

    /// A view over every row
    pub fn view(&self) -> TableView<'_> {
        TableView::new(self, self.records.iter().collect())
    }

    /// Rows matching a category (all when `None`) whose gene name contains `search`, ignoring case
    pub fn filter(&self, category: Option<Significance>, search: &str) -> TableView<'_> {
        let candidates = self
            .records
            .iter()
            .filter(|r| category.map_or(true, |c| r.significance == c))
            .collect::<Vec<_>>();
        let rows = if search.is_empty() {
            candidates
        } else {
            let matches = index_mask(search, candidates.iter().map(|r| r.gene_name()));
            select_indices(&matches, &candidates)
        };
        TableView::new(self, rows)
    }

    /// The `n` rows with the smallest adjusted p-values, ties kept in table order
    pub fn top_by_padj(&self, n: usize) -> TableView<'_> {
        let rows = self
            .records
            .iter()
            .sorted_by(|a, b| a.padj().total_cmp(&b.padj()))
            .take(n)
            .collect();
        TableView::new(self, rows)
    }

    /// Count matrix of the top `n` genes by adjusted p-value
    ///
    /// Returns `None` when the table has no count columns.
    pub fn heatmap(&self, n: usize) -> Option<Heatmap> {
        if self.count_columns.is_empty() {
            return None;
        }
        Some(self.top_by_padj(n).heatmap())
    }

    /// `log10(baseMean)` per row when the table has a baseMean column
    pub fn log10_base_mean(&self) -> Option<Vec<Option<f64>>> {
        self.has_base_mean.then(|| {
            self.records
                .iter()
                .map(|r| r.record.log10_base_mean())
                .collect()
        })
    }

    pub fn write_delimited<W: Write>(&self, writer: W, delimiter: u8) -> Result<()> {
        self.view().write_delimited(writer, delimiter)
    }
}

/// A read-only subset of an annotated table
#[derive(new, Debug, Clone)]
pub struct TableView<'a> {
    table: &'a AnnotatedTable,
    rows: Vec<&'a AnnotatedRecord>,
}

impl<'a> TableView<'a> {
    pub fn rows(&self) -> &[&'a AnnotatedRecord] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a AnnotatedRecord> + '_ {
        self.rows.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn gene_names(&self) -> Vec<&'a str> {
        self.rows.iter().map(|r| r.gene_name()).collect()
    }

    /// Counts of the view's genes, one row per sample column
    pub fn heatmap(&self) -> Heatmap {
        let values = (0..self.table.count_columns.len())
            .map(|sample| {
                self.rows
                    .iter()
                    .map(|r| r.record.counts.get(sample).copied().flatten())
                    .collect()
            })
            .collect();
        Heatmap {
            genes: self.gene_names().into_iter().map(str::to_string).collect(),
            samples: self.table.count_columns.clone(),
            values,
        }
    }

    /// Writes the view with the table's column layout
    pub fn write_delimited<W: Write>(&self, writer: W, delimiter: u8) -> Result<()> {
        write_delimited(writer, delimiter, self.table, self.iter())
    }
}

/// Number of genes per significance category
#[derive(new, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub upregulated: usize,
    pub downregulated: usize,
    pub not_significant: usize,
}

impl Summary {
    pub fn count(&self, category: Significance) -> usize {
        match category {
            Significance::Upregulated => self.upregulated,
            Significance::Downregulated => self.downregulated,
            Significance::NotSignificant => self.not_significant,
        }
    }

    pub fn pprint(&self) {
        println!("Total Genes\t{}", self.total);
        for category in Significance::ALL {
            println!("{}\t{}", category, self.count(category));
        }
    }
}

/// Normalized counts laid out samples by genes
#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    /// Column labels
    pub genes: Vec<String>,
    /// Row labels
    pub samples: Vec<String>,
    /// `values[sample][gene]`
    pub values: Vec<Vec<Option<f64>>>,
}
