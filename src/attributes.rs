use derive_new::new;

pub const UNKNOWN: &str = "Unknown";

/// Maximum number of characters kept when a product description stands in for a gene name
pub const PRODUCT_NAME_LIMIT: usize = 30;

/// Display identifiers of a gene
#[derive(new, Debug, Clone, PartialEq, Eq)]
pub struct GeneLabel {
    pub gene_name: String,
    pub locus_tag: String,
}

impl Default for GeneLabel {
    fn default() -> Self {
        Self::new(UNKNOWN.to_string(), UNKNOWN.to_string())
    }
}

impl GeneLabel {
    /// Uses a positional index as both name and locus tag
    pub fn from_index(index: usize) -> Self {
        Self::new(index.to_string(), index.to_string())
    }
}

/// Returns the value of the first `key=value` token with a non-empty value
///
/// Tokens are separated by `;` and the value runs to the next `;` without escaping.
/// Whitespace around the key is ignored.
fn find_token<'a>(attributes: &'a str, key: &str) -> Option<&'a str> {
    attributes
        .split(';')
        .filter_map(|token| token.split_once('='))
        .find(|(k, v)| k.trim() == key && !v.is_empty())
        .map(|(_, v)| v)
}

/// Extracts the gene name and locus tag from a GFF-style annotation string
///
/// The gene name is taken from `gene=`, then `Name=`, then the first 30
/// characters of `product=`. Anything unparseable falls back to `"Unknown"`.
pub fn parse_attributes(attributes: Option<&str>) -> GeneLabel {
    let Some(attributes) = attributes else {
        return GeneLabel::default();
    };

    let gene_name = find_token(attributes, "gene")
        .or_else(|| find_token(attributes, "Name"))
        .map(str::to_string)
        .or_else(|| {
            find_token(attributes, "product")
                .map(|product| product.chars().take(PRODUCT_NAME_LIMIT).collect())
        })
        .unwrap_or_else(|| UNKNOWN.to_string());

    let locus_tag = find_token(attributes, "locus_tag")
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN.to_string());

    GeneLabel::new(gene_name, locus_tag)
}
