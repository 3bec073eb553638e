//! Views derived from a filtered subset.
//!
//! Every function here takes the filtered rows in table order and is total:
//! an empty subset yields an empty view (or NaN means), never an error.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use super::model::{ShowRecord, ShowTable, Value};
use super::view::View;

/// Rows kept by [`top_popularity`].
pub const TOP_POPULARITY: usize = 20;
/// Rows of [`network_counts`] shown by the dashboard.
pub const TOP_NETWORKS: usize = 20;
/// Bin count of [`rating_histogram`].
pub const HISTOGRAM_BINS: usize = 20;

/// Every column of a show record, in file order.
pub const ALL_FIELDS: [&str; 10] = super::model::REQUIRED_COLUMNS;

/// Halves go to the even neighbour, so 74.5 votes shows as 74.
fn round_to(v: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (v * scale).round_ties_even() / scale
}

/// Group by a key, count distinct `show_id`, sort descending by count.
/// Ties keep ascending key order.
fn distinct_show_counts<'a, F>(
    rows: &[&'a ShowRecord],
    key: F,
    key_column: &str,
    count_column: &str,
) -> View
where
    F: Fn(&'a ShowRecord) -> Option<&'a str>,
{
    let mut groups: BTreeMap<&str, HashSet<i64>> = BTreeMap::new();
    for &row in rows {
        if let Some(k) = key(row) {
            groups.entry(k).or_default().insert(row.show_id);
        }
    }

    let mut counts: Vec<(&str, usize)> = groups.into_iter().map(|(k, ids)| (k, ids.len())).collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let mut view = View::new(&[key_column, count_column]);
    for (k, n) in counts {
        view.push(vec![Value::from(k), Value::Integer(n as i64)]);
    }
    view
}

// ---------------------------------------------------------------------------
// 1. Genre counts
// ---------------------------------------------------------------------------

/// Distinct shows per genre. Columns: `genre_name`, `show_id`.
pub fn genre_counts(rows: &[&ShowRecord]) -> View {
    distinct_show_counts(rows, |r| Some(r.genre_name.as_str()), "genre_name", "show_id")
}

// ---------------------------------------------------------------------------
// 2. Summary metrics
// ---------------------------------------------------------------------------

/// The four headline numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryMetrics {
    pub unique_shows: usize,
    pub unique_genres: usize,
    /// Mean `vote_average`, one decimal. NaN for an empty subset.
    pub avg_rating: f64,
    /// Mean `vote_count`, no decimals. NaN for an empty subset.
    pub avg_votes: f64,
}

/// Means are taken over rows, sentinel zeros included.
pub fn summary_metrics(rows: &[&ShowRecord], genre_counts: &View) -> SummaryMetrics {
    let unique_shows = rows.iter().map(|r| r.show_id).collect::<HashSet<_>>().len();
    let unique_genres = genre_counts
        .column("genre_name")
        .map(|col| col.collect::<BTreeSet<_>>().len())
        .unwrap_or(0);

    let n = rows.len() as f64;
    let mean = |sum: f64| if rows.is_empty() { f64::NAN } else { sum / n };
    let avg_rating = mean(rows.iter().map(|r| r.vote_average).sum());
    let avg_votes = mean(rows.iter().map(|r| r.vote_count as f64).sum());

    SummaryMetrics {
        unique_shows,
        unique_genres,
        avg_rating: round_to(avg_rating, 1),
        avg_votes: round_to(avg_votes, 0),
    }
}

// ---------------------------------------------------------------------------
// 3. Top shows by popularity
// ---------------------------------------------------------------------------

/// Most popular `limit` distinct (`name`, `popularity`) pairs, popularity
/// rounded to two decimals. Columns: `name`, `popularity`.
pub fn top_popularity(rows: &[&ShowRecord], limit: usize) -> View {
    let mut sorted: Vec<&ShowRecord> = rows.to_vec();
    sorted.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));

    let mut seen: HashSet<(&str, u64)> = HashSet::new();
    let mut view = View::new(&["name", "popularity"]);
    for row in sorted {
        if view.len() == limit {
            break;
        }
        if seen.insert((row.name.as_str(), row.popularity.to_bits())) {
            view.push(vec![
                Value::from(row.name.as_str()),
                Value::Float(round_to(row.popularity, 2)),
            ]);
        }
    }
    view
}

// ---------------------------------------------------------------------------
// 4. Rating distribution by genre
// ---------------------------------------------------------------------------

/// The filtered rows unchanged; the box chart computes quartiles per genre.
pub fn rating_distribution(rows: &[&ShowRecord]) -> View {
    View::from_records(rows.iter().copied(), &ALL_FIELDS)
}

// ---------------------------------------------------------------------------
// 5. Network counts
// ---------------------------------------------------------------------------

/// Distinct shows per network, all networks. Columns: `network_name`,
/// `show_id`. The dashboard displays `head(TOP_NETWORKS)`.
pub fn network_counts(rows: &[&ShowRecord]) -> View {
    distinct_show_counts(rows, |r| Some(r.network_name.as_str()), "network_name", "show_id")
}

// ---------------------------------------------------------------------------
// 6. Language counts
// ---------------------------------------------------------------------------

/// Distinct shows per spoken language, missing languages dropped.
/// Columns: `spoken_language_name`, `count`.
pub fn language_counts(rows: &[&ShowRecord]) -> View {
    distinct_show_counts(
        rows,
        |r| r.spoken_language_name.as_deref(),
        "spoken_language_name",
        "count",
    )
}

// ---------------------------------------------------------------------------
// 7. Per-show mean rating, exploded by language
// ---------------------------------------------------------------------------

/// One row per (rated show, language): the show's mean `vote_average` over
/// its rated rows, repeated for every language it has. Names come from the
/// full table. Sorted by rating, highest first.
///
/// Columns: `show_id`, `vote_average`, `spoken_language_name`, `name`.
pub fn rating_by_language(rows: &[&ShowRecord], table: &ShowTable) -> View {
    struct Group<'a> {
        sum: f64,
        n: usize,
        languages: Vec<Option<&'a str>>,
    }

    // Insertion order of show ids keeps the sort below deterministic.
    let mut order: Vec<i64> = Vec::new();
    let mut groups: HashMap<i64, Group> = HashMap::new();
    for row in rows.iter().filter(|r| r.is_rated()) {
        let group = groups.entry(row.show_id).or_insert_with(|| {
            order.push(row.show_id);
            Group { sum: 0.0, n: 0, languages: Vec::new() }
        });
        group.sum += row.vote_average;
        group.n += 1;
        let lang = row.spoken_language_name.as_deref();
        if !group.languages.contains(&lang) {
            group.languages.push(lang);
        }
    }

    let mut names: HashMap<i64, &str> = HashMap::new();
    for row in &table.rows {
        names.entry(row.show_id).or_insert(row.name.as_str());
    }

    let mut exploded: Vec<(i64, f64, Option<&str>)> = Vec::new();
    for id in order {
        let group = &groups[&id];
        let mean = group.sum / group.n as f64;
        for lang in &group.languages {
            exploded.push((id, mean, *lang));
        }
    }
    exploded.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut view = View::new(&["show_id", "vote_average", "spoken_language_name", "name"]);
    for (id, mean, lang) in exploded {
        view.push(vec![
            Value::Integer(id),
            Value::Float(mean),
            Value::from(lang),
            Value::from(names.get(&id).copied()),
        ]);
    }
    view
}

// ---------------------------------------------------------------------------
// 8. Rating histogram by genre
// ---------------------------------------------------------------------------

/// Equal-width `bins` over the rated `vote_average` range, counted per genre.
/// The maximum falls in the last bin. Genres appear in first-seen order.
///
/// Columns: `genre_name`, `bin_start`, `bin_end`, `count`.
pub fn rating_histogram(rows: &[&ShowRecord], bins: usize) -> View {
    let mut view = View::new(&["genre_name", "bin_start", "bin_end", "count"]);
    let rated: Vec<&ShowRecord> = rows.iter().copied().filter(|r| r.is_rated()).collect();
    if rated.is_empty() || bins == 0 {
        return view;
    }

    let (mut lo, mut hi) = rated.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
        (lo.min(r.vote_average), hi.max(r.vote_average))
    });
    if hi - lo < f64::EPSILON {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut genres: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, Vec<i64>> = HashMap::new();
    for row in &rated {
        let bin = (((row.vote_average - lo) / width) as usize).min(bins - 1);
        let slot = counts.entry(row.genre_name.as_str()).or_insert_with(|| {
            genres.push(row.genre_name.as_str());
            vec![0; bins]
        });
        slot[bin] += 1;
    }

    for genre in genres {
        for (i, n) in counts[genre].iter().enumerate() {
            view.push(vec![
                Value::from(genre),
                Value::Float(lo + width * i as f64),
                Value::Float(lo + width * (i + 1) as f64),
                Value::Integer(*n),
            ]);
        }
    }
    view
}

// ---------------------------------------------------------------------------
// 9. Votes against rating
// ---------------------------------------------------------------------------

/// Rows with at least one vote. Columns: `vote_count`, `vote_average`,
/// `genre_name`, `name`.
pub fn votes_vs_rating(rows: &[&ShowRecord]) -> View {
    View::from_records(
        rows.iter().copied().filter(|r| r.vote_count != 0),
        &["vote_count", "vote_average", "genre_name", "name"],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{abc, show};

    fn refs(rows: &[ShowRecord]) -> Vec<&ShowRecord> {
        rows.iter().collect()
    }

    fn counts_of(view: &View, key: &str, count: &str) -> Vec<(String, i64)> {
        let keys = view.column(key).unwrap().map(|v| v.to_string());
        let counts = view.column(count).unwrap().map(|v| match v {
            Value::Integer(n) => *n,
            other => panic!("non-integer count {other:?}"),
        });
        keys.zip(counts).collect()
    }

    fn assert_descending(pairs: &[(String, i64)]) {
        assert!(pairs.windows(2).all(|w| w[0].1 >= w[1].1), "{pairs:?}");
    }

    #[test]
    fn genre_counts_use_distinct_shows() {
        let rows = vec![
            // One show flattened over three languages in the same genre.
            show(1, "Dark", "Drama", Some("German"), 8.4, 6000),
            show(1, "Dark", "Drama", Some("English"), 8.4, 6000),
            show(1, "Dark", "Drama", Some("French"), 8.4, 6000),
            show(2, "Lost", "Drama", Some("English"), 8.0, 300),
            show(3, "Friends", "Comedy", Some("English"), 8.9, 7000),
            show(1, "Dark", "Mystery", Some("German"), 8.4, 6000),
        ];
        let pairs = counts_of(&genre_counts(&refs(&rows)), "genre_name", "show_id");
        assert_eq!(
            pairs,
            vec![
                ("Drama".to_string(), 2),
                ("Comedy".to_string(), 1),
                ("Mystery".to_string(), 1)
            ]
        );
    }

    #[test]
    fn network_and_language_counts_sorted_descending() {
        let mut rows = vec![
            show(1, "A", "Drama", Some("English"), 8.0, 10),
            show(1, "A", "Drama", Some("Spanish"), 8.0, 10),
            show(2, "B", "Drama", Some("English"), 7.0, 10),
            show(3, "C", "Drama", None, 7.0, 10),
            show(4, "D", "Drama", Some("English"), 7.0, 10),
        ];
        rows[2].network_name = "HBO".to_string();
        rows[3].network_name = "HBO".to_string();

        let networks = counts_of(&network_counts(&refs(&rows)), "network_name", "show_id");
        assert_descending(&networks);
        assert_eq!(networks[0], ("HBO".to_string(), 2));
        assert_eq!(networks[1], ("Netflix".to_string(), 2));

        let langs = counts_of(&language_counts(&refs(&rows)), "spoken_language_name", "count");
        assert_descending(&langs);
        assert_eq!(langs, vec![("English".to_string(), 3), ("Spanish".to_string(), 1)]);
    }

    #[test]
    fn abc_example() {
        let rows = abc();
        let subset = refs(&rows);
        let table = ShowTable::from_rows(rows.clone());

        let genres = counts_of(&genre_counts(&subset), "genre_name", "show_id");
        assert_eq!(genres[0], ("Drama".to_string(), 2));

        let by_lang = rating_by_language(&subset, &table);
        let names: Vec<String> = by_lang.column("name").unwrap().map(|v| v.to_string()).collect();
        assert_eq!(names, vec!["A", "C"]);

        let hist = rating_histogram(&subset, HISTOGRAM_BINS);
        let total: f64 = hist.column("count").unwrap().filter_map(Value::as_f64).sum();
        assert_eq!(total, 2.0);
        let hist_genres: BTreeSet<&Value> = hist.column("genre_name").unwrap().collect();
        assert_eq!(hist_genres.len(), 2);

        let scatter = votes_vs_rating(&subset);
        assert_eq!(scatter.len(), 2);
    }

    #[test]
    fn explode_repeats_mean_per_language() {
        let rows = vec![
            show(9, "Money Heist", "Crime", Some("English"), 8.0, 100),
            show(9, "Money Heist", "Crime", Some("Spanish"), 8.0, 100),
            show(9, "Money Heist", "Drama", Some("Spanish"), 9.0, 100),
            show(4, "Quiet", "Drama", Some("English"), 5.0, 10),
        ];
        let table = ShowTable::from_rows(rows.clone());
        let view = rating_by_language(&refs(&rows), &table);

        let heist: Vec<&Vec<Value>> = view.rows.iter().filter(|r| r[0] == Value::Integer(9)).collect();
        assert_eq!(heist.len(), 2);
        let expected = (8.0 + 8.0 + 9.0) / 3.0;
        for row in &heist {
            assert_eq!(row[1], Value::Float(expected));
            assert_eq!(row[3], Value::from("Money Heist"));
        }
        let langs: BTreeSet<String> = heist.iter().map(|r| r[2].to_string()).collect();
        assert_eq!(langs.len(), 2);
        // Highest mean first.
        assert_eq!(view.rows.last().unwrap()[0], Value::Integer(4));
    }

    #[test]
    fn show_without_language_explodes_to_null() {
        let rows = vec![show(1, "Mute", "Drama", None, 7.0, 5)];
        let table = ShowTable::from_rows(rows.clone());
        let view = rating_by_language(&refs(&rows), &table);
        assert_eq!(view.len(), 1);
        assert_eq!(view.rows[0][2], Value::Null);
    }

    #[test]
    fn top_popularity_caps_and_dedupes() {
        let mut rows = Vec::new();
        for i in 0..30 {
            let mut rec = show(i, &format!("Show {i}"), "Drama", Some("English"), 7.0, 10);
            rec.popularity = i as f64 + 0.456;
            rows.push(rec.clone());
            rec.genre_name = "Comedy".to_string();
            rows.push(rec);
        }
        let view = top_popularity(&refs(&rows), TOP_POPULARITY);
        assert_eq!(view.len(), 20);

        let pairs: HashSet<(String, u64)> = view
            .rows
            .iter()
            .map(|r| (r[0].to_string(), r[1].as_f64().unwrap().to_bits()))
            .collect();
        assert_eq!(pairs.len(), 20);
        assert_eq!(view.rows[0][0], Value::from("Show 29"));
        assert_eq!(view.rows[0][1], Value::Float(29.46));
    }

    #[test]
    fn empty_subset_is_not_an_error() {
        let table = ShowTable::from_rows(abc());
        let empty: Vec<&ShowRecord> = Vec::new();

        let genres = genre_counts(&empty);
        let metrics = summary_metrics(&empty, &genres);
        assert_eq!(metrics.unique_shows, 0);
        assert_eq!(metrics.unique_genres, 0);
        assert!(metrics.avg_rating.is_nan());
        assert!(metrics.avg_votes.is_nan());

        assert!(top_popularity(&empty, TOP_POPULARITY).is_empty());
        assert!(rating_distribution(&empty).is_empty());
        assert!(network_counts(&empty).is_empty());
        assert!(language_counts(&empty).is_empty());
        assert!(rating_by_language(&empty, &table).is_empty());
        assert!(rating_histogram(&empty, HISTOGRAM_BINS).is_empty());
        assert!(votes_vs_rating(&empty).is_empty());
    }

    #[test]
    fn metrics_include_sentinel_rows() {
        let rows = abc();
        let subset = refs(&rows);
        let metrics = summary_metrics(&subset, &genre_counts(&subset));
        assert_eq!(metrics.unique_shows, 3);
        assert_eq!(metrics.unique_genres, 2);
        // (8.5 + 0 + 6.0) / 3 = 4.83
        assert_eq!(metrics.avg_rating, 4.8);
        // (100 + 0 + 50) / 3 = 50
        assert_eq!(metrics.avg_votes, 50.0);
    }

    #[test]
    fn metric_halves_round_to_even() {
        let rows = vec![
            show(1, "A", "Drama", Some("English"), 7.0, 100),
            show(2, "B", "Drama", Some("English"), 8.0, 49),
        ];
        let subset = refs(&rows);
        let metrics = summary_metrics(&subset, &genre_counts(&subset));
        assert_eq!(metrics.avg_votes, 74.0);
        assert_eq!(metrics.avg_rating, 7.5);

        let odd = vec![
            show(1, "A", "Drama", Some("English"), 7.0, 3),
            show(2, "B", "Drama", Some("English"), 8.0, 2),
        ];
        let subset = refs(&odd);
        assert_eq!(summary_metrics(&subset, &genre_counts(&subset)).avg_votes, 2.0);
        assert_eq!(round_to(3.5, 0), 4.0);
    }

    #[test]
    fn full_table_preserves_show_cardinality() {
        let mut rows = abc();
        rows.push(show(1, "A", "Thriller", Some("Spanish"), 8.5, 100));
        let table = ShowTable::from_rows(rows);
        let all: Vec<&ShowRecord> = table.rows.iter().collect();

        let metrics = summary_metrics(&all, &genre_counts(&all));
        assert_eq!(metrics.unique_shows, table.show_count());

        let distribution = rating_distribution(&all);
        assert_eq!(distribution.len(), table.len());
        let ids: BTreeSet<_> = distribution.column("show_id").unwrap().collect();
        assert_eq!(ids.len(), table.show_count());

        assert!(!network_counts(&all).is_empty());
        assert!(!language_counts(&all).is_empty());
        assert!(!rating_by_language(&all, &table).is_empty());
        assert!(!rating_histogram(&all, HISTOGRAM_BINS).is_empty());
    }

    #[test]
    fn histogram_bins_span_rated_range() {
        let rows = vec![
            show(1, "A", "Drama", None, 2.0, 1),
            show(2, "B", "Drama", None, 4.0, 1),
            show(3, "C", "Comedy", None, 12.0, 1),
        ];
        let view = rating_histogram(&refs(&rows), 20);
        // Two genres, twenty bins each.
        assert_eq!(view.len(), 40);
        assert_eq!(view.rows[0][1], Value::Float(2.0));
        assert_eq!(view.rows[19][2].as_f64().unwrap(), 12.0);
        // The maximum lands in the last bin.
        assert_eq!(view.rows[39][3], Value::Integer(1));
        // 4.0 is exactly the start of bin 4 (width 0.5).
        assert_eq!(view.rows[4][3], Value::Integer(1));
    }

    #[test]
    fn histogram_single_value_range() {
        let rows = vec![show(1, "A", "Drama", None, 7.0, 1), show(2, "B", "Drama", None, 7.0, 3)];
        let view = rating_histogram(&refs(&rows), 20);
        let total: i64 = view.rows.iter().map(|r| r[3].as_f64().unwrap() as i64).sum();
        assert_eq!(total, 2);
    }
}
