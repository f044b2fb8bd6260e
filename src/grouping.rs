use crate::model::Series;

/// Identity keys of a series, highest priority first.
///
/// TVDB id, then IMDB id, then the series' own id. Blank provider ids are
/// skipped and repeats (ignoring case) collapse to their first occurrence.
pub fn identity_keys(series: &Series) -> Vec<String> {
    let candidates = [
        series.provider_ids.tvdb().map(String::from),
        series.provider_ids.imdb().map(String::from),
        Some(series.id.simple()),
    ];

    let mut keys: Vec<String> = Vec::with_capacity(candidates.len());
    for key in candidates.into_iter().flatten() {
        if !keys.iter().any(|k| k.eq_ignore_ascii_case(&key)) {
            keys.push(key);
        }
    }
    keys
}

/// Builds the key the catalog uses to merge one series across libraries
#[derive(Debug, Clone, Default)]
pub struct GroupingKeyBuilder {
    pub enable_automatic_grouping: bool,
    pub preferred_language: Option<String>,
}

impl GroupingKeyBuilder {
    pub fn new(enable_automatic_grouping: bool, preferred_language: Option<String>) -> Self {
        Self {
            enable_automatic_grouping,
            preferred_language,
        }
    }

    /// Compute the grouping key. `library_roots` are the ids of the library
    /// roots holding the series, in any order.
    pub fn build_key<S: AsRef<str>>(&self, series: &Series, library_roots: &[S]) -> String {
        if !self.enable_automatic_grouping {
            return series.presentation_key.clone();
        }

        let mut keys = identity_keys(series);
        if keys.len() <= 1 {
            return series.presentation_key.clone();
        }

        let mut key = keys.swap_remove(0);

        if let Some(lang) = self
            .preferred_language
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
        {
            key.push('-');
            key.push_str(lang);
        }

        let mut roots: Vec<&str> = library_roots.iter().map(AsRef::as_ref).collect();
        if roots.is_empty() {
            return key;
        }

        roots.sort_unstable();
        roots.dedup();
        key.push('-');
        key.push_str(&roots.join("-"));
        key
    }
}
