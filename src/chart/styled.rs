use crate::data::view::View;

use super::style::{Layout, Margin, axis_title};
use super::{BarMark, Chart, ChartError, ChartKind, MarkerGroup, field_index, group_rows, label_at, number_at};

// ---------------------------------------------------------------------------
// Bar chart
// ---------------------------------------------------------------------------

/// Bar per row of `view`, in row order.
///
/// Each bar carries an outside label taken from `text_field` and formatted
/// with three significant digits and an SI suffix. Category labels are
/// rotated 90°, canvas 1000×500.
pub fn styled_bar(
    view: &View,
    x_field: &str,
    y_field: &str,
    title: &str,
    text_field: &str,
) -> Result<Chart, ChartError> {
    bar_chart(view, x_field, y_field, title, text_field, true)
}

/// Same as [`styled_bar`], but labels show the `text_field` value as stored,
/// so an already rounded `45.67` reads `45.67`.
pub fn plain_bar(
    view: &View,
    x_field: &str,
    y_field: &str,
    title: &str,
    text_field: &str,
) -> Result<Chart, ChartError> {
    bar_chart(view, x_field, y_field, title, text_field, false)
}

fn bar_chart(
    view: &View,
    x_field: &str,
    y_field: &str,
    title: &str,
    text_field: &str,
    si_labels: bool,
) -> Result<Chart, ChartError> {
    let x = field_index(view, x_field)?;
    let y = field_index(view, y_field)?;
    let text = field_index(view, text_field)?;

    let bars = (0..view.len())
        .map(|row| {
            let label = match view.rows[row][text].as_f64() {
                Some(v) if si_labels => format_si(v),
                _ => label_at(view, row, text),
            };
            Ok(BarMark {
                category: label_at(view, row, x),
                value: number_at(view, row, y)?,
                label,
            })
        })
        .collect::<Result<Vec<_>, ChartError>>()?;

    Ok(Chart {
        title: title.to_string(),
        layout: Layout::standard(axis_title(x_field), axis_title(y_field))
            .with_margin(Margin::BAR)
            .with_category_axis(),
        kind: ChartKind::Bar(bars),
    })
}

// ---------------------------------------------------------------------------
// Scatter chart
// ---------------------------------------------------------------------------

/// Scatter of `y_field` against `x_field`, one marker group per distinct
/// value of `color_field` (first-seen order). Markers are size 11 at 50%
/// opacity on a 1000×500 canvas.
pub fn styled_scatter(
    view: &View,
    x_field: &str,
    y_field: &str,
    color_field: &str,
    title: &str,
    x_axis_label: &str,
    y_axis_label: &str,
) -> Result<Chart, ChartError> {
    let x = field_index(view, x_field)?;
    let y = field_index(view, y_field)?;
    let color = field_index(view, color_field)?;

    let groups = group_rows(view, color)
        .into_iter()
        .map(|(name, rows)| {
            let points = rows
                .into_iter()
                .map(|row| Ok([number_at(view, row, x)?, number_at(view, row, y)?]))
                .collect::<Result<Vec<_>, ChartError>>()?;
            Ok(MarkerGroup { name, points })
        })
        .collect::<Result<Vec<_>, ChartError>>()?;

    Ok(Chart {
        title: title.to_string(),
        layout: Layout::standard(x_axis_label, y_axis_label).with_legend(),
        kind: ChartKind::Scatter(groups),
    })
}

// ---------------------------------------------------------------------------
// Value labels
// ---------------------------------------------------------------------------

const SI_PREFIXES: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "µ", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];

/// Three significant digits with an SI prefix: `1234.0` → `1.23k`,
/// `42.0` → `42.0`, `0.5` → `500m`.
pub fn format_si(v: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    if v == 0.0 {
        return "0.00".to_string();
    }

    // Round to three significant digits first so 999.6 becomes 1.00k.
    let magnitude = v.abs().log10().floor() as i32;
    let shift = 2 - magnitude;
    let rounded = if shift >= 0 {
        let scale = 10f64.powi(shift);
        (v * scale).round() / scale
    } else {
        let scale = 10f64.powi(-shift);
        (v / scale).round() * scale
    };

    let exponent = rounded.abs().log10().floor() as i32;
    let group = exponent.div_euclid(3).clamp(-8, 8);
    let scaled = rounded / 10f64.powi(group * 3);
    let decimals = (2 - (exponent - group * 3)).max(0) as usize;
    let prefix = SI_PREFIXES[(group + 8) as usize];

    format!("{scaled:.decimals$}{prefix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Value;

    fn counts() -> View {
        let mut view = View::new(&["genre_name", "show_id"]);
        view.push(vec![Value::from("Drama"), Value::Integer(1520)]);
        view.push(vec![Value::from("Comedy"), Value::Integer(7)]);
        view
    }

    #[test]
    fn bar_labels_and_layout() {
        let chart = styled_bar(&counts(), "genre_name", "show_id", "By Genre", "show_id").unwrap();
        let ChartKind::Bar(bars) = &chart.kind else {
            panic!("expected bar chart");
        };
        assert_eq!(bars[0].category, "Drama");
        assert_eq!(bars[0].value, 1520.0);
        assert_eq!(bars[0].label, "1.52k");
        assert_eq!(bars[1].label, "7.00");
        assert_eq!(chart.layout.width, 1000.0);
        assert_eq!(chart.layout.height, 500.0);
        assert_eq!(chart.layout.x_tick_angle, 90.0);
        assert_eq!(chart.layout.x_title, "Genre");
        assert_eq!(chart.layout.y_title, "Count");
        assert_eq!(chart.categories(), vec!["Drama", "Comedy"]);
    }

    #[test]
    fn plain_bar_keeps_rounded_values() {
        let mut view = View::new(&["name", "popularity"]);
        view.push(vec![Value::from("Dark"), Value::Float(123.45)]);
        view.push(vec![Value::from("Lupin"), Value::Float(45.67)]);

        let chart = plain_bar(&view, "name", "popularity", "Top", "popularity").unwrap();
        let ChartKind::Bar(bars) = &chart.kind else {
            panic!("expected bar chart");
        };
        assert_eq!(bars[0].label, "123.45");
        assert_eq!(bars[1].label, "45.67");
        assert_eq!(bars[1].value, 45.67);
        assert_eq!(chart.layout.x_tick_angle, 90.0);

        let si = styled_bar(&view, "name", "popularity", "Top", "popularity").unwrap();
        let ChartKind::Bar(bars) = &si.kind else {
            panic!("expected bar chart");
        };
        assert_eq!(bars[0].label, "123");
    }

    #[test]
    fn bar_rejects_missing_field() {
        let err = styled_bar(&counts(), "network_name", "show_id", "t", "show_id").unwrap_err();
        assert!(matches!(err, ChartError::MissingField { ref field, .. } if field == "network_name"));
        assert!(styled_bar(&counts(), "genre_name", "show_id", "t", "label").is_err());
    }

    #[test]
    fn bar_rejects_text_as_value() {
        let err = styled_bar(&counts(), "genre_name", "genre_name", "t", "show_id").unwrap_err();
        assert!(matches!(err, ChartError::NotNumeric { .. }));
    }

    #[test]
    fn empty_view_gives_empty_chart() {
        let view = View::new(&["genre_name", "show_id"]);
        let chart = styled_bar(&view, "genre_name", "show_id", "t", "show_id").unwrap();
        assert!(chart.is_empty());
    }

    #[test]
    fn scatter_groups_by_color_field() {
        let mut view = View::new(&["vote_count", "vote_average", "genre_name"]);
        view.push(vec![Value::Integer(10), Value::Float(7.5), Value::from("Drama")]);
        view.push(vec![Value::Integer(3), Value::Float(6.0), Value::from("Comedy")]);
        view.push(vec![Value::Integer(40), Value::Float(8.1), Value::from("Drama")]);

        let chart = styled_scatter(&view, "vote_count", "vote_average", "genre_name", "Votes", "Number of Votes", "Average Rating").unwrap();
        let ChartKind::Scatter(groups) = &chart.kind else {
            panic!("expected scatter chart");
        };
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].points, vec![[10.0, 7.5], [40.0, 8.1]]);
        assert_eq!(chart.layout.marker_size, 11.0);
        assert_eq!(chart.layout.marker_opacity, 0.5);
        assert_eq!(chart.layout.x_title, "Number of Votes");
        assert!(chart.layout.show_legend);

        assert!(styled_scatter(&view, "vote_count", "vote_average", "status_name", "t", "x", "y").is_err());
    }

    #[test]
    fn si_format() {
        assert_eq!(format_si(1234.0), "1.23k");
        assert_eq!(format_si(42.0), "42.0");
        assert_eq!(format_si(999.6), "1.00k");
        assert_eq!(format_si(123.456), "123");
        assert_eq!(format_si(0.5), "500m");
        assert_eq!(format_si(2_500_000.0), "2.50M");
        assert_eq!(format_si(-15.0), "-15.0");
        assert_eq!(format_si(0.0), "0.00");
    }
}
