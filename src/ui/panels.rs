use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::dashboard::Dashboard;
use crate::data::filter::round1;
use crate::state::{AppState, SetControl};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the six sidebar controls.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Choose your Options");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            multi_select(ui, state, SetControl::Genre);
            seasons_combo(ui, state);
            ui.separator();
            multi_select(ui, state, SetControl::Status);
            rating_slider(ui, state);
            ui.separator();
            multi_select(ui, state, SetControl::Network);
            multi_select(ui, state, SetControl::Language);
        });
}

/// Collapsible checkbox list with All/None buttons.
fn multi_select(ui: &mut Ui, state: &mut AppState, control: SetControl) {
    // Clone what we need so we can mutate state inside the loop.
    let choices = state.choices(control).clone();
    let selected = state.selected(control).clone();

    let header_text = format!("{}  ({}/{})", control.label(), selected.len(), choices.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(control.label())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(control);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(control);
                }
            });

            for value in &choices {
                let mut checked = selected.contains(value);
                if ui.checkbox(&mut checked, value).changed() {
                    state.toggle(control, value);
                }
            }
        });
}

fn seasons_combo(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Select Minimum Seasons");
    let seasons: Vec<u32> = state.table.domains.seasons.iter().copied().collect();
    let current = state.selection.min_seasons;

    egui::ComboBox::from_id_salt("min_seasons")
        .selected_text(current.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            for n in seasons {
                if ui.selectable_label(current == n, n.to_string()).clicked() {
                    state.set_min_seasons(n);
                }
            }
        });
}

fn rating_slider(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Select Minimum Show Rating");
    let Some((lo, hi)) = state.table.domains.rating_range else {
        ui.label("No ratings.");
        return;
    };
    let (lo, hi) = (round1(lo), round1(hi));

    let mut rating = state.selection.min_rating;
    let slider = egui::Slider::new(&mut rating, lo..=hi.max(lo))
        .step_by(0.1)
        .fixed_decimals(1);
    ui.add(slider);
    state.set_min_rating(rating);
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title and the row counts.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading(RichText::new("TV Show Database").color(Color32::from_rgb(28, 131, 225)));
        ui.separator();

        let visible = state
            .dashboard
            .as_ref()
            .map_or(0, |d| d.visible_indices.len());
        ui.label(format!(
            "{} rows loaded ({} shows), {} visible",
            state.table.len(),
            state.table.show_count(),
            visible
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel – metrics and raw data
// ---------------------------------------------------------------------------

fn format_metric(v: f64, decimals: usize) -> String {
    if v.is_nan() {
        "n/a".to_string()
    } else {
        format!("{v:.decimals$}")
    }
}

/// Four metric tiles in a row.
pub fn metrics(ui: &mut Ui, dashboard: &Dashboard) {
    let m = &dashboard.metrics;
    let tiles = [
        ("Unique Shows", m.unique_shows.to_string()),
        ("Unique Genres", m.unique_genres.to_string()),
        ("Average Rating", format_metric(m.avg_rating, 1)),
        ("Average Number of Votes", format_metric(m.avg_votes, 0)),
    ];

    ui.columns(tiles.len(), |cols| {
        for (col, (label, value)) in cols.iter_mut().zip(tiles) {
            col.label(RichText::new(label).weak());
            col.label(RichText::new(value).size(28.0));
        }
    });
}

/// Collapsible table of the filtered rows.
pub fn raw_data(ui: &mut Ui, dashboard: &Dashboard) {
    let view = &dashboard.filtered;
    let header = format!(
        "Your Selections yielded {} shows. Click here to see raw data",
        dashboard.metrics.unique_shows
    );

    egui::CollapsingHeader::new(header)
        .id_salt("raw_data")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .max_scroll_height(300.0)
                .columns(Column::auto().at_least(60.0), view.columns.len())
                .header(20.0, |mut header| {
                    for name in &view.columns {
                        header.col(|ui: &mut Ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(18.0, view.len(), |mut row| {
                        let cells = &view.rows[row.index()];
                        for cell in cells {
                            row.col(|ui: &mut Ui| {
                                ui.label(cell.to_string());
                            });
                        }
                    });
                });
        });
}
