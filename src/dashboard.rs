use crate::chart::{
    Chart, ChartError, box_by_category, plain_bar, stacked_histogram, styled_bar,
    styled_scatter, violin_by_category,
};
use crate::data::aggregate::{
    self, HISTOGRAM_BINS, SummaryMetrics, TOP_NETWORKS, TOP_POPULARITY,
};
use crate::data::filter::{Selection, filtered_indices};
use crate::data::model::ShowTable;
use crate::data::view::View;

// ---------------------------------------------------------------------------
// Dashboard: one full recomputation for a selection
// ---------------------------------------------------------------------------

/// Everything the central panel shows for one selection.
#[derive(Debug, Clone)]
pub struct Dashboard {
    /// Indices into the table of rows passing the selection.
    pub visible_indices: Vec<usize>,
    pub metrics: SummaryMetrics,
    /// The filtered rows, all columns, for the raw-data table.
    pub filtered: View,
    /// Charts in display order.
    pub charts: Vec<Chart>,
}

impl Dashboard {
    /// Filter, aggregate and chart in one pass.
    pub fn build(table: &ShowTable, selection: &Selection) -> Result<Self, ChartError> {
        let visible_indices = filtered_indices(table, selection);
        let shows: Vec<_> = visible_indices.iter().map(|&i| &table.rows[i]).collect();

        let genre_counts = aggregate::genre_counts(&shows);
        let metrics = aggregate::summary_metrics(&shows, &genre_counts);
        let popularity = aggregate::top_popularity(&shows, TOP_POPULARITY);
        let distribution = aggregate::rating_distribution(&shows);
        let networks = aggregate::network_counts(&shows);
        let votes = aggregate::votes_vs_rating(&shows);
        let languages = aggregate::language_counts(&shows);
        let by_language = aggregate::rating_by_language(&shows, table);
        let histogram = aggregate::rating_histogram(&shows, HISTOGRAM_BINS);

        let charts = vec![
            plain_bar(&popularity, "name", "popularity", "Top 20 Shows by Popularity", "popularity")?,
            styled_bar(&genre_counts, "genre_name", "show_id", "Number of Shows By Genre", "show_id")?,
            box_by_category(&distribution, "genre_name", "vote_average", "Avg Rating Distribution by Genre")?,
            styled_bar(&networks.head(TOP_NETWORKS), "network_name", "show_id", "Network Count", "show_id")?,
            styled_scatter(
                &votes,
                "vote_count",
                "vote_average",
                "genre_name",
                "Number of Votes and Average Rating",
                "Number of Votes",
                "Average Rating",
            )?,
            styled_bar(&languages, "spoken_language_name", "count", "TV Shows by Language", "count")?,
            violin_by_category(&by_language, "spoken_language_name", "vote_average", "Rating Distribution by Language")?,
            stacked_histogram(&histogram, "genre_name", "vote_average", "Rating Distribution by Genre")?,
        ];

        log::debug!(
            "dashboard: {} rows, {} shows, {} charts",
            visible_indices.len(),
            metrics.unique_shows,
            charts.len()
        );

        Ok(Dashboard {
            visible_indices,
            metrics,
            filtered: distribution,
            charts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartKind;
    use crate::data::model::fixtures::{abc, show};

    fn select_all(table: &ShowTable) -> Selection {
        Selection {
            genres: table.domains.genres.clone(),
            min_seasons: 0,
            statuses: table.domains.statuses.clone(),
            min_rating: 0.0,
            networks: table.domains.networks.clone(),
            languages: table.domains.languages.clone(),
        }
    }

    #[test]
    fn builds_every_chart_for_full_table() {
        let table = ShowTable::from_rows(abc());
        let dash = Dashboard::build(&table, &select_all(&table)).unwrap();

        assert_eq!(dash.charts.len(), 8);
        assert_eq!(dash.metrics.unique_shows, 3);
        assert_eq!(dash.filtered.len(), 3);
        assert_eq!(dash.charts[1].categories(), vec!["Drama", "Comedy"]);

        // Popularity labels keep their two decimals.
        let ChartKind::Bar(top) = &dash.charts[0].kind else {
            panic!("expected bar");
        };
        assert!(top.iter().all(|b| b.label == b.value.to_string()));

        // The unrated show is absent from both rating distributions.
        let ChartKind::Violin(violins) = &dash.charts[6].kind else {
            panic!("expected violin");
        };
        assert_eq!(violins.len(), 1);
        let ChartKind::Histogram(series) = &dash.charts[7].kind else {
            panic!("expected histogram");
        };
        let total: f64 = series.iter().flat_map(|s| s.bins.iter().map(|b| b.count)).sum();
        assert_eq!(total, 2.0);
    }

    #[test]
    fn empty_selection_builds_empty_charts() {
        let table = ShowTable::from_rows(abc());
        let dash = Dashboard::build(&table, &Selection::initial(&table)).unwrap();
        assert!(dash.visible_indices.is_empty());
        assert_eq!(dash.metrics.unique_shows, 0);
        assert!(dash.metrics.avg_rating.is_nan());
        assert!(dash.charts.iter().all(Chart::is_empty));
    }

    #[test]
    fn network_chart_shows_top_twenty() {
        let rows: Vec<_> = (0..30)
            .map(|i| {
                let mut rec = show(i, &format!("S{i}"), "Drama", Some("English"), 7.5, 10);
                rec.network_name = format!("Net {i:02}");
                rec
            })
            .collect();
        let table = ShowTable::from_rows(rows);
        let dash = Dashboard::build(&table, &select_all(&table)).unwrap();
        assert_eq!(dash.charts[3].categories().len(), 20);
        assert_eq!(dash.charts[0].categories().len(), 20);
    }
}
