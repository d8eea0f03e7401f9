use std::io::Write;

use csv::WriterBuilder;

use crate::{
    error::Result,
    ingest::{BASE_MEAN_COLUMN, LOG2FC_COLUMN, PADJ_COLUMN},
    record::AnnotatedRecord,
    table::AnnotatedTable,
    utils::format_float,
};

pub const SIGNIFICANCE_COLUMN: &str = "Significance";
pub const NEG_LOG10_PADJ_COLUMN: &str = "-log10(padj)";

/// Header of an exported table; optional columns follow the table layout
pub fn export_header(table: &AnnotatedTable) -> Vec<String> {
    let mut header = vec!["gene_name".to_string(), "locus_tag".to_string()];
    if let Some(column) = &table.annotation_column {
        header.push(column.clone());
    }
    header.push(LOG2FC_COLUMN.to_string());
    header.push(PADJ_COLUMN.to_string());
    if table.has_base_mean {
        header.push(BASE_MEAN_COLUMN.to_string());
    }
    header.extend(table.extra_columns.iter().cloned());
    header.extend(table.count_columns.iter().cloned());
    header.push(SIGNIFICANCE_COLUMN.to_string());
    header.push(NEG_LOG10_PADJ_COLUMN.to_string());
    header
}

fn export_row(table: &AnnotatedTable, row: &AnnotatedRecord) -> Vec<String> {
    let record = &row.record;
    let mut fields = vec![record.gene_name.clone(), record.locus_tag.clone()];
    if table.annotation_column.is_some() {
        fields.push(record.attributes.clone().unwrap_or_default());
    }
    fields.push(format_float(Some(record.log2_fold_change)));
    fields.push(format_float(Some(record.padj)));
    if table.has_base_mean {
        fields.push(format_float(record.base_mean));
    }
    fields.extend(
        (0..table.extra_columns.len())
            .map(|i| record.extra.get(i).cloned().flatten().unwrap_or_default()),
    );
    fields.extend(
        (0..table.count_columns.len())
            .map(|i| format_float(record.counts.get(i).copied().flatten())),
    );
    fields.push(row.significance.to_string());
    fields.push(format_float(Some(row.neg_log10_padj)));
    fields
}

/// Writes rows of `table` as delimiter-separated text with a header line
pub fn write_delimited<'a, W: Write>(
    writer: W,
    delimiter: u8,
    table: &AnnotatedTable,
    rows: impl IntoIterator<Item = &'a AnnotatedRecord>,
) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);
    writer.write_record(export_header(table))?;
    for row in rows {
        writer.write_record(export_row(table, row))?;
    }
    writer.flush()?;
    Ok(())
}
