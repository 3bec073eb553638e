use std::collections::BTreeSet;

use super::model::{ShowRecord, ShowTable};

// ---------------------------------------------------------------------------
// Selection: the six sidebar predicates
// ---------------------------------------------------------------------------

/// Rating threshold the dashboard opens with.
pub const DEFAULT_MIN_RATING: f64 = 7.0;
pub const DEFAULT_NETWORK: &str = "Netflix";
pub const DEFAULT_LANGUAGE: &str = "English";

/// Parameters of the filter engine.
///
/// The multi-select sets are literal: an empty set matches nothing. There is
/// no "nothing selected means everything" fallback.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selection {
    pub genres: BTreeSet<String>,
    pub min_seasons: u32,
    pub statuses: BTreeSet<String>,
    pub min_rating: f64,
    pub networks: BTreeSet<String>,
    pub languages: BTreeSet<String>,
}

/// Round to one decimal, the precision of the rating slider.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

impl Selection {
    /// Initial control state: no genres, the smallest season count, every
    /// status, rating 7.0, Netflix, English.
    pub fn initial(table: &ShowTable) -> Self {
        let domains = &table.domains;
        let pick = |set: &BTreeSet<String>, value: &str| -> BTreeSet<String> {
            set.iter().filter(|v| *v == value).cloned().collect()
        };
        let min_rating = match domains.rating_range {
            Some((lo, hi)) => DEFAULT_MIN_RATING.clamp(round1(lo), round1(hi).max(round1(lo))),
            None => DEFAULT_MIN_RATING,
        };

        Selection {
            genres: BTreeSet::new(),
            min_seasons: domains.seasons.first().copied().unwrap_or(0),
            statuses: domains.statuses.clone(),
            min_rating,
            networks: pick(&domains.networks, DEFAULT_NETWORK),
            languages: pick(&domains.languages, DEFAULT_LANGUAGE),
        }
    }

    /// Whether a row satisfies all six predicates.
    pub fn matches(&self, row: &ShowRecord) -> bool {
        self.genres.contains(&row.genre_name)
            && row.number_of_seasons >= self.min_seasons
            && self.statuses.contains(&row.status_name)
            && row.vote_average >= self.min_rating
            && self.networks.contains(&row.network_name)
            && row
                .spoken_language_name
                .as_ref()
                .is_some_and(|lang| self.languages.contains(lang))
    }
}

/// Return indices of rows that pass all predicates.
pub fn filtered_indices(table: &ShowTable, selection: &Selection) -> Vec<usize> {
    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| selection.matches(row))
        .map(|(i, _)| i)
        .collect()
}
