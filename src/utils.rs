/// Returns the positions of all haystack entries containing `needle`, ignoring case
pub fn index_mask<'a>(needle: &str, haystack: impl IntoIterator<Item = &'a str>) -> Vec<usize> {
    let needle = needle.to_lowercase();
    haystack
        .into_iter()
        .enumerate()
        .filter(|(_, target)| target.to_lowercase().contains(&needle))
        .map(|(i, _)| i)
        .collect()
}

pub fn select_indices<T: Copy>(indices: &[usize], data: &[T]) -> Vec<T> {
    indices.iter().map(|i| data[*i]).collect()
}

/// Formats a value for delimited export; missing values are written empty
///
/// Uses the shortest representation that round-trips, switching to scientific
/// notation for very small or large magnitudes.
pub fn format_float(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:?}"),
        None => String::new(),
    }
}
