use eframe::egui::{self, Align2, Color32, FontId, RichText, Stroke, TextStyle, Ui, vec2};
use eframe::epaint::TextShape;
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot, PlotPoint, PlotPoints, PlotTransform,
    PlotUi, Points, Polygon, Text,
};

use crate::chart::style::{BOX_WIDTH, Layout};
use crate::chart::{BarMark, BoxMark, BoxStats, Chart, ChartKind, HistogramSeries, MarkerGroup, ViolinMark};
use crate::color::ColorMap;

/// Plotly's default trace colour, used for single-series charts.
const BAR_COLOR: Color32 = Color32::from_rgb(99, 110, 250);

// ---------------------------------------------------------------------------
// Chart rendering
// ---------------------------------------------------------------------------

/// Render one chart: centred title, then the plot at its fixed canvas size.
pub fn chart(ui: &mut Ui, id: &str, chart: &Chart) {
    let layout = &chart.layout;
    let margin = egui::Margin {
        left: layout.margin.left as i8,
        right: layout.margin.right as i8,
        top: (layout.margin.top / 4.0) as i8,
        bottom: layout.margin.bottom as i8,
    };

    egui::Frame::new().inner_margin(margin).show(ui, |ui: &mut Ui| {
        ui.style_mut()
            .text_styles
            .insert(TextStyle::Small, FontId::proportional(layout.tick_font_size));

        ui.vertical_centered(|ui: &mut Ui| {
            ui.label(RichText::new(&chart.title).size(layout.title_font_size).strong());
        });

        if chart.is_empty() {
            ui.vertical_centered(|ui: &mut Ui| {
                ui.label(RichText::new("No shows match the current selection.").weak());
            });
        }

        let colors = ColorMap::new(chart.series_names());
        let categories = chart.categories();
        let rotated = layout.x_tick_angle != 0.0;
        let response = plot_frame(id, layout, &categories, rotated).show(ui, |plot_ui| match &chart.kind {
            ChartKind::Bar(bars) => bar_marks(plot_ui, layout, bars),
            ChartKind::Scatter(groups) => scatter_marks(plot_ui, layout, &colors, groups),
            ChartKind::Box(boxes) => box_marks(plot_ui, boxes),
            ChartKind::Violin(violins) => violin_marks(plot_ui, &colors, violins),
            ChartKind::Histogram(series) => histogram_marks(plot_ui, &colors, series),
        });

        if rotated && !categories.is_empty() {
            rotated_labels(ui, &response.transform, layout, &categories);
        }
    });
}

/// Paint category names under the plot, turned by the layout's tick angle.
fn rotated_labels(ui: &mut Ui, transform: &PlotTransform, layout: &Layout, categories: &[&str]) {
    let font = FontId::proportional(layout.tick_font_size);
    let color = ui.visuals().text_color();
    let galleys: Vec<_> = categories
        .iter()
        .map(|c| ui.painter().layout_no_wrap(c.to_string(), font.clone(), color))
        .collect();
    let longest = galleys.iter().map(|g| g.size().x).fold(0.0_f32, f32::max);

    let (rect, _) = ui.allocate_exact_size(vec2(layout.width, longest + 4.0), egui::Sense::hover());
    let bounds = transform.frame();
    let angle = layout.x_tick_angle.to_radians();

    for (i, galley) in galleys.into_iter().enumerate() {
        let x = transform.position_from_point(&PlotPoint::new(i as f64, 0.0)).x;
        if x < bounds.left() || x > bounds.right() {
            continue;
        }
        // Rotation turns the text clockwise about its top-left corner.
        let pos = egui::pos2(x + galley.size().y / 2.0, rect.top() + 2.0);
        ui.painter()
            .add(TextShape::new(pos, galley, color).with_angle(angle));
    }
}

/// Axis titles, size and category tick labels.
fn plot_frame<'a>(id: &str, layout: &Layout, categories: &[&str], rotated: bool) -> Plot<'a> {
    let mut plot = Plot::new(id)
        .width(layout.width)
        .height(layout.height)
        .x_axis_label(layout.x_title.clone())
        .y_axis_label(layout.y_title.clone())
        .allow_scroll(false);

    if layout.show_legend {
        plot = plot.legend(Legend::default());
    }

    if !categories.is_empty() {
        // Rotated labels are painted separately below the plot.
        let names: Vec<String> = if rotated {
            Vec::new()
        } else {
            categories.iter().map(|c| c.to_string()).collect()
        };
        plot = plot
            .x_axis_formatter(move |mark, _range| category_tick(&names, mark.value))
            .show_x(false);
    }
    plot
}

/// Label for an integer grid mark on a category axis, blank elsewhere.
fn category_tick(names: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    names.get(idx as usize).cloned().unwrap_or_default()
}

fn bar_marks(plot_ui: &mut PlotUi, layout: &Layout, marks: &[BarMark]) {
    let bars: Vec<Bar> = marks
        .iter()
        .enumerate()
        .map(|(i, m)| Bar::new(i as f64, m.value).name(&m.category).width(0.8).fill(BAR_COLOR))
        .collect();
    plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR));

    for (i, m) in marks.iter().enumerate() {
        let label = RichText::new(&m.label).size(layout.text_font_size);
        plot_ui.text(Text::new(PlotPoint::new(i as f64, m.value), label).anchor(Align2::CENTER_BOTTOM));
    }
}

fn scatter_marks(plot_ui: &mut PlotUi, layout: &Layout, colors: &ColorMap, groups: &[MarkerGroup]) {
    for group in groups {
        let points = Points::new(PlotPoints::from(group.points.clone()))
            .radius(layout.marker_size / 2.0)
            .color(colors.translucent(&group.name, layout.marker_opacity))
            .name(&group.name);
        plot_ui.points(points);
    }
}

fn box_elem(x: f64, mark_name: &str, stats: &BoxStats, width: f64) -> BoxElem {
    BoxElem::new(
        x,
        BoxSpread::new(stats.lower_whisker, stats.q1, stats.median, stats.q3, stats.upper_whisker),
    )
    .name(mark_name)
    .box_width(width)
    .whisker_width(width / 2.0)
}

fn box_marks(plot_ui: &mut PlotUi, marks: &[BoxMark]) {
    let elems: Vec<BoxElem> = marks
        .iter()
        .enumerate()
        .map(|(i, m)| box_elem(i as f64, &m.category, &m.stats, BOX_WIDTH).fill(BAR_COLOR.gamma_multiply(0.4)))
        .collect();
    plot_ui.box_plot(BoxPlot::new(elems).color(BAR_COLOR));

    let outliers: Vec<[f64; 2]> = marks
        .iter()
        .enumerate()
        .flat_map(|(i, m)| m.outliers.iter().map(move |&v| [i as f64, v]))
        .collect();
    if !outliers.is_empty() {
        plot_ui.points(Points::new(PlotPoints::from(outliers)).radius(2.5).color(BAR_COLOR));
    }
}

fn violin_marks(plot_ui: &mut PlotUi, colors: &ColorMap, marks: &[ViolinMark]) {
    for (i, m) in marks.iter().enumerate() {
        let x = i as f64;
        // Right edge bottom to top, then left edge top to bottom.
        let outline: Vec<[f64; 2]> = m
            .outline
            .iter()
            .map(|&[v, w]| [x + w, v])
            .chain(m.outline.iter().rev().map(|&[v, w]| [x - w, v]))
            .collect();

        let color = colors.color_for(&m.category);
        plot_ui.polygon(
            Polygon::new(PlotPoints::from(outline))
                .name(&m.category)
                .fill_color(colors.translucent(&m.category, 0.5))
                .stroke(Stroke::new(1.0, color)),
        );
        plot_ui.box_plot(
            BoxPlot::new(vec![box_elem(x, &m.category, &m.stats, 0.1)])
                .name(&m.category)
                .color(color),
        );
    }
}

fn histogram_marks(plot_ui: &mut PlotUi, colors: &ColorMap, series: &[HistogramSeries]) {
    let mut layers: Vec<BarChart> = Vec::with_capacity(series.len());
    for s in series {
        let color = colors.color_for(&s.name);
        let bars: Vec<Bar> = s
            .bins
            .iter()
            .map(|b| {
                Bar::new((b.start + b.end) / 2.0, b.count)
                    .width(b.end - b.start)
                    .fill(color)
            })
            .collect();
        let below: Vec<&BarChart> = layers.iter().collect();
        let layer = BarChart::new(bars).name(&s.name).color(color).stack_on(&below);
        layers.push(layer);
    }
    for layer in layers {
        plot_ui.bar_chart(layer);
    }
}
