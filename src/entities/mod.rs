pub mod artist;
pub mod show;
pub mod venue;

/// Splits a comma-joined genres column into its entries.
pub(crate) fn split_genres(genres: Option<&str>) -> Vec<String> {
    genres
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|genre| !genre.is_empty())
        .map(str::to_string)
        .collect()
}
