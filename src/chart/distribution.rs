//! Box, violin and histogram charts over rating views.

use crate::data::view::View;

use super::stats::{KDE_POINTS, box_stats, kde};
use super::style::{BOX_TITLE_FONT_SIZE, Layout, Margin, VIOLIN_HALF_WIDTH, axis_title};
use super::{
    BoxMark, Chart, ChartError, ChartKind, HistogramBin, HistogramSeries, ViolinMark, field_index,
    group_rows, number_at,
};

fn grouped_values(
    view: &View,
    x_field: &str,
    y_field: &str,
) -> Result<Vec<(String, Vec<f64>)>, ChartError> {
    let x = field_index(view, x_field)?;
    let y = field_index(view, y_field)?;
    group_rows(view, x)
        .into_iter()
        .map(|(name, rows)| {
            let values = rows
                .into_iter()
                .map(|row| number_at(view, row, y))
                .collect::<Result<Vec<_>, _>>()?;
            Ok((name, values))
        })
        .collect()
}

/// One box per distinct `x_field` value, summarising `y_field`.
/// Canvas 1100×600, 22pt title, rotated category labels.
pub fn box_by_category(
    view: &View,
    x_field: &str,
    y_field: &str,
    title: &str,
) -> Result<Chart, ChartError> {
    let boxes = grouped_values(view, x_field, y_field)?
        .into_iter()
        .filter_map(|(category, values)| {
            let (stats, outliers) = box_stats(&values)?;
            Some(BoxMark { category, stats, outliers })
        })
        .collect();

    let mut layout = Layout::standard(axis_title(x_field), axis_title(y_field))
        .with_size(1100.0, 600.0)
        .with_margin(Margin::BOX)
        .with_category_axis();
    layout.title_font_size = BOX_TITLE_FONT_SIZE;

    Ok(Chart {
        title: title.to_string(),
        layout,
        kind: ChartKind::Box(boxes),
    })
}

/// One violin per distinct `x_field` value with an embedded box. Outlines
/// share one density scale so violin widths are comparable.
pub fn violin_by_category(
    view: &View,
    x_field: &str,
    y_field: &str,
    title: &str,
) -> Result<Chart, ChartError> {
    let curves: Vec<(String, Vec<[f64; 2]>, _)> = grouped_values(view, x_field, y_field)?
        .into_iter()
        .filter_map(|(category, values)| {
            let (stats, _) = box_stats(&values)?;
            Some((category, kde(&values, KDE_POINTS), stats))
        })
        .collect();

    let peak = curves
        .iter()
        .flat_map(|(_, curve, _)| curve.iter().map(|p| p[1]))
        .fold(0.0_f64, f64::max);
    let scale = if peak > 0.0 { VIOLIN_HALF_WIDTH / peak } else { 0.0 };

    let violins = curves
        .into_iter()
        .map(|(category, curve, stats)| ViolinMark {
            category,
            outline: curve.into_iter().map(|[v, d]| [v, d * scale]).collect(),
            stats,
        })
        .collect();

    Ok(Chart {
        title: title.to_string(),
        layout: Layout::standard(axis_title(x_field), axis_title(y_field))
            .with_category_axis()
            .with_legend(),
        kind: ChartKind::Violin(violins),
    })
}

/// Stacked histogram from a binned view with columns `group_field`,
/// `bin_start`, `bin_end`, `count`. Canvas 1000×600.
pub fn stacked_histogram(
    view: &View,
    group_field: &str,
    value_title: &str,
    title: &str,
) -> Result<Chart, ChartError> {
    let group = field_index(view, group_field)?;
    let start = field_index(view, "bin_start")?;
    let end = field_index(view, "bin_end")?;
    let count = field_index(view, "count")?;

    let series = group_rows(view, group)
        .into_iter()
        .map(|(name, rows)| {
            let bins = rows
                .into_iter()
                .map(|row| {
                    Ok(HistogramBin {
                        start: number_at(view, row, start)?,
                        end: number_at(view, row, end)?,
                        count: number_at(view, row, count)?,
                    })
                })
                .collect::<Result<Vec<_>, ChartError>>()?;
            Ok(HistogramSeries { name, bins })
        })
        .collect::<Result<Vec<_>, ChartError>>()?;

    Ok(Chart {
        title: title.to_string(),
        layout: Layout::standard(value_title, "Count")
            .with_size(1000.0, 600.0)
            .with_legend(),
        kind: ChartKind::Histogram(series),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::{HISTOGRAM_BINS, rating_distribution, rating_histogram};
    use crate::data::model::Value;
    use crate::data::model::fixtures::show;

    fn ratings() -> View {
        let rows = vec![
            show(1, "A", "Drama", Some("English"), 8.0, 10),
            show(2, "B", "Drama", Some("English"), 6.0, 10),
            show(3, "C", "Drama", Some("Spanish"), 7.0, 10),
            show(4, "D", "Comedy", Some("English"), 5.0, 10),
        ];
        rating_distribution(&rows.iter().collect::<Vec<_>>())
    }

    #[test]
    fn box_per_genre() {
        let chart = box_by_category(&ratings(), "genre_name", "vote_average", "Box").unwrap();
        let ChartKind::Box(boxes) = &chart.kind else {
            panic!("expected box chart");
        };
        assert_eq!(chart.categories(), vec!["Drama", "Comedy"]);
        assert_eq!(boxes[0].stats.median, 7.0);
        assert_eq!(boxes[1].stats.q1, 5.0);
        assert_eq!(chart.layout.width, 1100.0);
        assert_eq!(chart.layout.margin.top, 5.0);
        assert_eq!(chart.layout.x_title, "Genre");
    }

    #[test]
    fn box_rejects_missing_field() {
        assert!(box_by_category(&ratings(), "genre", "vote_average", "Box").is_err());
    }

    #[test]
    fn violins_share_a_scale() {
        let chart =
            violin_by_category(&ratings(), "spoken_language_name", "vote_average", "Violin")
                .unwrap();
        let ChartKind::Violin(violins) = &chart.kind else {
            panic!("expected violin chart");
        };
        assert_eq!(violins.len(), 2);
        let widest = violins
            .iter()
            .flat_map(|v| v.outline.iter().map(|p| p[1]))
            .fold(0.0_f64, f64::max);
        assert!((widest - VIOLIN_HALF_WIDTH).abs() < 1e-9);
        assert_eq!(violins[1].stats.median, 7.0);
    }

    #[test]
    fn histogram_layers_per_genre() {
        let rows = vec![
            show(1, "A", "Drama", None, 8.0, 10),
            show(2, "B", "Comedy", None, 6.0, 10),
            show(3, "C", "Comedy", None, 0.0, 0),
        ];
        let view = rating_histogram(&rows.iter().collect::<Vec<_>>(), HISTOGRAM_BINS);
        let chart = stacked_histogram(&view, "genre_name", "vote_average", "Hist").unwrap();
        let ChartKind::Histogram(series) = &chart.kind else {
            panic!("expected histogram");
        };
        assert_eq!(chart.series_names(), vec!["Drama", "Comedy"]);
        assert!(series.iter().all(|s| s.bins.len() == HISTOGRAM_BINS));
        let total: f64 = series.iter().flat_map(|s| s.bins.iter().map(|b| b.count)).sum();
        assert_eq!(total, 2.0);
        assert_eq!(chart.layout.height, 600.0);
    }

    #[test]
    fn histogram_needs_bin_columns() {
        let mut view = View::new(&["genre_name", "count"]);
        view.push(vec![Value::from("Drama"), Value::Integer(1)]);
        assert!(matches!(
            stacked_histogram(&view, "genre_name", "x", "t"),
            Err(ChartError::MissingField { .. })
        ));
    }
}
