use super::model::Dataset;

/// Return indices of series whose country name contains `query`,
/// ignoring case. An empty or blank query matches every series.
pub fn matching_countries(dataset: &Dataset, query: &str) -> Vec<usize> {
    let needle = query.trim().to_lowercase();
    dataset
        .series()
        .iter()
        .enumerate()
        .filter(|(_, s)| needle.is_empty() || s.country.to_lowercase().contains(&needle))
        .map(|(i, _)| i)
        .collect()
}
