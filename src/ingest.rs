use csv::{ReaderBuilder, StringRecord};

use crate::{
    attributes::{parse_attributes, GeneLabel},
    config::ParseConfig,
    error::{IngestWarning, PipelineError, Result},
    record::GeneRecord,
};

pub const LOG2FC_COLUMN: &str = "log2FoldChange";
pub const PADJ_COLUMN: &str = "padj";
pub const BASE_MEAN_COLUMN: &str = "baseMean";

/// Rows of an upload that survived missing-value filtering
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub records: Vec<GeneRecord>,
    /// Names of the per-sample count columns, aligned with `GeneRecord::counts`
    pub count_columns: Vec<String>,
    /// Name of the annotation column, when the upload has one
    pub annotation_column: Option<String>,
    pub has_base_mean: bool,
    /// Unrecognized columns carried through verbatim, aligned with `GeneRecord::extra`
    pub extra_columns: Vec<String>,
    /// Number of data rows in the upload before filtering
    pub total_rows: usize,
    pub warnings: Vec<IngestWarning>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows dropped for a missing fold change or adjusted p-value
    pub fn dropped_rows(&self) -> usize {
        self.total_rows - self.records.len()
    }
}

/// Header positions of the columns the pipeline reads
struct Columns {
    log2_fold_change: usize,
    padj: usize,
    base_mean: Option<usize>,
    attributes: Option<usize>,
    counts: Vec<(usize, String)>,
    extra: Vec<(usize, String)>,
}

impl Columns {
    fn resolve(header: &[String], config: &ParseConfig) -> Result<Self> {
        let position = |name: &str| header.iter().position(|h| h == name);
        let required = |name: &str| {
            position(name).ok_or_else(|| PipelineError::MissingColumn {
                column: name.to_string(),
            })
        };
        let log2_fold_change = required(LOG2FC_COLUMN)?;
        let padj = required(PADJ_COLUMN)?;
        let base_mean = position(BASE_MEAN_COLUMN);
        let attributes = position(&config.annotation_column);
        let counts = config.count_columns.select(header)?;

        let known = [Some(log2_fold_change), Some(padj), base_mean, attributes];
        let extra = header
            .iter()
            .enumerate()
            .filter(|(i, _)| !known.contains(&Some(*i)) && !counts.iter().any(|(c, _)| c == i))
            .map(|(i, name)| (i, name.clone()))
            .collect();

        Ok(Self {
            log2_fold_change,
            padj,
            base_mean,
            attributes,
            counts,
            extra,
        })
    }
}

/// Parses a numeric field, mapping NaN to missing
fn parse_number(field: Option<&str>, row: usize, column: &str) -> Result<Option<f64>> {
    let Some(field) = field else {
        return Ok(None);
    };
    let value = field
        .trim()
        .parse::<f64>()
        .map_err(|_| PipelineError::InvalidNumber {
            row,
            column: column.to_string(),
            value: field.to_string(),
        })?;
    Ok((!value.is_nan()).then_some(value))
}

/// Reads a delimited differential expression table
///
/// Comment lines are skipped and null tokens become missing values. Rows
/// missing `log2FoldChange` or `padj` are dropped. Without an annotation column
/// each row is labeled by its positional index and a warning is attached.
pub fn read_table(bytes: &[u8], config: &ParseConfig) -> Result<RawTable> {
    let mut reader = ReaderBuilder::new()
        .delimiter(config.delimiter)
        .comment(Some(config.comment))
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let header = reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    if header.iter().all(|name| name.is_empty()) {
        return Err(PipelineError::malformed("no header line found"));
    }
    let columns = Columns::resolve(&header, config)?;

    let mut warnings = Vec::new();
    if columns.attributes.is_none() {
        log::warn!(
            "'{}' column not found, using row indices for labels",
            config.annotation_column
        );
        warnings.push(IngestWarning::MissingAnnotationColumn {
            column: config.annotation_column.clone(),
        });
    }
    if columns.counts.is_empty() {
        log::warn!("no count columns found");
        warnings.push(IngestWarning::NoCountColumns);
    }

    let mut records = Vec::new();
    let mut total_rows = 0;
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        total_rows += 1;
        if let Some(record) = read_row(&row, index, &header, &columns, config)? {
            records.push(record);
        }
    }

    log::info!("{} genes found", total_rows);
    if records.len() < total_rows {
        log::info!(
            "dropped {} rows missing {} or {}",
            total_rows - records.len(),
            LOG2FC_COLUMN,
            PADJ_COLUMN
        );
    }

    Ok(RawTable {
        records,
        count_columns: columns.counts.into_iter().map(|(_, name)| name).collect(),
        annotation_column: columns
            .attributes
            .map(|_| config.annotation_column.clone()),
        has_base_mean: columns.base_mean.is_some(),
        extra_columns: columns.extra.into_iter().map(|(_, name)| name).collect(),
        total_rows,
        warnings,
    })
}

/// Builds the record of one data row, or `None` if a required value is missing
fn read_row(
    row: &StringRecord,
    index: usize,
    header: &[String],
    columns: &Columns,
    config: &ParseConfig,
) -> Result<Option<GeneRecord>> {
    if row.len() > header.len() {
        return Err(PipelineError::malformed(format!(
            "row {} has {} fields but the header has {}",
            index + 1,
            row.len(),
            header.len()
        )));
    }

    // short rows are padded with missing values
    let field = |i: usize| row.get(i).filter(|f| !config.is_null(f));
    let number = |i: usize| parse_number(field(i), index + 1, &header[i]);

    let attributes = columns.attributes.and_then(field).map(str::to_string);
    let label = if columns.attributes.is_some() {
        parse_attributes(attributes.as_deref())
    } else {
        GeneLabel::from_index(index)
    };

    let log2_fold_change = number(columns.log2_fold_change)?;
    let padj = number(columns.padj)?;
    let base_mean = columns.base_mean.map(number).transpose()?.flatten();
    let counts = columns
        .counts
        .iter()
        .map(|(i, _)| number(*i))
        .collect::<Result<Vec<_>>>()?;
    let extra = columns
        .extra
        .iter()
        .map(|(i, _)| field(*i).map(str::to_string))
        .collect::<Vec<_>>();

    let (Some(log2_fold_change), Some(padj)) = (log2_fold_change, padj) else {
        return Ok(None);
    };

    Ok(Some(
        GeneRecord::builder()
            .index(index)
            .maybe_attributes(attributes)
            .gene_name(label.gene_name)
            .locus_tag(label.locus_tag)
            .log2_fold_change(log2_fold_change)
            .padj(padj)
            .maybe_base_mean(base_mean)
            .counts(counts)
            .extra(extra)
            .build(),
    ))
}
