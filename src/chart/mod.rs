/// Chart construction: views in, renderable chart descriptions out.
///
/// ```text
///   View ──► styled_bar / styled_scatter ──┐
///   View ──► box / violin / histogram ─────┴──► Chart ──► ui::plot
/// ```
///
/// Nothing here touches egui; a [`Chart`] is plain data so the dashboard can
/// build and test it without a window.
pub mod distribution;
pub mod stats;
pub mod style;
pub mod styled;

use std::collections::HashMap;

use thiserror::Error;

use crate::data::model::Value;
use crate::data::view::View;

pub use distribution::{box_by_category, stacked_histogram, violin_by_category};
pub use stats::BoxStats;
pub use style::Layout;
pub use styled::{plain_bar, styled_bar, styled_scatter};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A chart was asked for something its input view does not have.
#[derive(Debug, Error, PartialEq)]
pub enum ChartError {
    #[error("field '{field}' not in view (available: {})", .available.join(", "))]
    MissingField { field: String, available: Vec<String> },

    #[error("field '{field}' row {row}: expected a number, got {value}")]
    NotNumeric { field: String, row: usize, value: String },
}

/// Column position of `field`, or [`ChartError::MissingField`].
pub(crate) fn field_index(view: &View, field: &str) -> Result<usize, ChartError> {
    view.column_index(field).ok_or_else(|| ChartError::MissingField {
        field: field.to_string(),
        available: view.columns.clone(),
    })
}

/// Numeric cell, or [`ChartError::NotNumeric`].
pub(crate) fn number_at(view: &View, row: usize, col: usize) -> Result<f64, ChartError> {
    let cell = &view.rows[row][col];
    cell.as_f64().ok_or_else(|| ChartError::NotNumeric {
        field: view.columns[col].clone(),
        row,
        value: cell.to_string(),
    })
}

/// Category label of a cell; missing values read as `"<null>"`.
pub(crate) fn label_at(view: &View, row: usize, col: usize) -> String {
    match &view.rows[row][col] {
        Value::Text(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Chart description
// ---------------------------------------------------------------------------

/// One bar with its outside label.
#[derive(Debug, Clone, PartialEq)]
pub struct BarMark {
    pub category: String,
    pub value: f64,
    pub label: String,
}

/// All markers sharing a colour category.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerGroup {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxMark {
    pub category: String,
    pub stats: BoxStats,
    /// Points beyond the whiskers.
    pub outliers: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViolinMark {
    pub category: String,
    /// `(value, half_width)` pairs along the value axis, half widths scaled so
    /// the widest violin spans [`style::VIOLIN_HALF_WIDTH`].
    pub outline: Vec<[f64; 2]>,
    pub stats: BoxStats,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: f64,
}

/// One stacked layer of a histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSeries {
    pub name: String,
    pub bins: Vec<HistogramBin>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartKind {
    Bar(Vec<BarMark>),
    Scatter(Vec<MarkerGroup>),
    Box(Vec<BoxMark>),
    Violin(Vec<ViolinMark>),
    Histogram(Vec<HistogramSeries>),
}

/// A fully styled chart ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub layout: Layout,
    pub kind: ChartKind,
}

impl Chart {
    /// Category names along the x axis, for charts that have them.
    pub fn categories(&self) -> Vec<&str> {
        match &self.kind {
            ChartKind::Bar(bars) => bars.iter().map(|b| b.category.as_str()).collect(),
            ChartKind::Box(boxes) => boxes.iter().map(|b| b.category.as_str()).collect(),
            ChartKind::Violin(violins) => violins.iter().map(|v| v.category.as_str()).collect(),
            ChartKind::Scatter(_) | ChartKind::Histogram(_) => Vec::new(),
        }
    }

    /// Legend entries, for charts coloured by category.
    pub fn series_names(&self) -> Vec<&str> {
        match &self.kind {
            ChartKind::Scatter(groups) => groups.iter().map(|g| g.name.as_str()).collect(),
            ChartKind::Violin(violins) => violins.iter().map(|v| v.category.as_str()).collect(),
            ChartKind::Histogram(series) => series.iter().map(|s| s.name.as_str()).collect(),
            ChartKind::Bar(_) | ChartKind::Box(_) => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match &self.kind {
            ChartKind::Bar(v) => v.is_empty(),
            ChartKind::Scatter(v) => v.is_empty(),
            ChartKind::Box(v) => v.is_empty(),
            ChartKind::Violin(v) => v.is_empty(),
            ChartKind::Histogram(v) => v.is_empty(),
        }
    }
}

/// Distinct labels of a column in first-seen order, with the rows of each.
pub(crate) fn group_rows(view: &View, col: usize) -> Vec<(String, Vec<usize>)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
    for row in 0..view.len() {
        let label = label_at(view, row, col);
        match index.get(&label) {
            Some(&slot) => groups[slot].1.push(row),
            None => {
                index.insert(label.clone(), groups.len());
                groups.push((label, vec![row]));
            }
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> View {
        let mut view = View::new(&["genre_name", "score"]);
        view.push(vec![Value::from("Drama"), Value::Float(1.0)]);
        view.push(vec![Value::from("Comedy"), Value::from("high")]);
        view.push(vec![Value::Null, Value::Integer(2)]);
        view.push(vec![Value::from("Drama"), Value::Integer(3)]);
        view
    }

    #[test]
    fn missing_field_lists_available_columns() {
        let err = field_index(&sample(), "rating").unwrap_err();
        assert_eq!(
            err.to_string(),
            "field 'rating' not in view (available: genre_name, score)"
        );
    }

    #[test]
    fn non_numeric_cell_is_reported() {
        let view = sample();
        assert_eq!(number_at(&view, 0, 1), Ok(1.0));
        assert!(matches!(
            number_at(&view, 1, 1),
            Err(ChartError::NotNumeric { row: 1, .. })
        ));
    }

    #[test]
    fn groups_in_first_seen_order() {
        let groups = group_rows(&sample(), 0);
        let names: Vec<&str> = groups.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Drama", "Comedy", "<null>"]);
        assert_eq!(groups[0].1, vec![0, 3]);
    }
}
