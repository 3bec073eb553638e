use std::collections::BTreeSet;
use std::sync::Arc;

use crate::dashboard::Dashboard;
use crate::data::filter::Selection;
use crate::data::model::ShowTable;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which multi-select a toggle applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetControl {
    Genre,
    Status,
    Network,
    Language,
}

impl SetControl {
    pub fn label(self) -> &'static str {
        match self {
            SetControl::Genre => "Select Genre",
            SetControl::Status => "Show Status",
            SetControl::Network => "Select Network",
            SetControl::Language => "Select Languages",
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded once at startup, never mutated.
    pub table: Arc<ShowTable>,

    /// Current sidebar selection.
    pub selection: Selection,

    /// Last computed dashboard; `None` if building it failed.
    pub dashboard: Option<Dashboard>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Start with the default selection and compute the first dashboard.
    pub fn new(table: Arc<ShowTable>) -> Self {
        let selection = Selection::initial(&table);
        let mut state = AppState {
            table,
            selection,
            dashboard: None,
            status_message: None,
        };
        state.recompute();
        state
    }

    /// Rebuild the dashboard after a selection change.
    pub fn recompute(&mut self) {
        match Dashboard::build(&self.table, &self.selection) {
            Ok(dashboard) => {
                self.dashboard = Some(dashboard);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to build dashboard: {e}");
                self.dashboard = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// All choices of a multi-select, from the table's value domains.
    pub fn choices(&self, control: SetControl) -> &BTreeSet<String> {
        let domains = &self.table.domains;
        match control {
            SetControl::Genre => &domains.genres,
            SetControl::Status => &domains.statuses,
            SetControl::Network => &domains.networks,
            SetControl::Language => &domains.languages,
        }
    }

    pub fn selected(&self, control: SetControl) -> &BTreeSet<String> {
        match control {
            SetControl::Genre => &self.selection.genres,
            SetControl::Status => &self.selection.statuses,
            SetControl::Network => &self.selection.networks,
            SetControl::Language => &self.selection.languages,
        }
    }

    fn selected_mut(&mut self, control: SetControl) -> &mut BTreeSet<String> {
        match control {
            SetControl::Genre => &mut self.selection.genres,
            SetControl::Status => &mut self.selection.statuses,
            SetControl::Network => &mut self.selection.networks,
            SetControl::Language => &mut self.selection.languages,
        }
    }

    /// Toggle a single value in a multi-select.
    pub fn toggle(&mut self, control: SetControl, value: &str) {
        let selected = self.selected_mut(control);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.recompute();
    }

    /// Select every choice of a multi-select.
    pub fn select_all(&mut self, control: SetControl) {
        let all = self.choices(control).clone();
        *self.selected_mut(control) = all;
        self.recompute();
    }

    /// Clear a multi-select, which empties the result.
    pub fn select_none(&mut self, control: SetControl) {
        self.selected_mut(control).clear();
        self.recompute();
    }

    pub fn set_min_seasons(&mut self, seasons: u32) {
        if self.selection.min_seasons != seasons {
            self.selection.min_seasons = seasons;
            self.recompute();
        }
    }

    pub fn set_min_rating(&mut self, rating: f64) {
        if self.selection.min_rating != rating {
            self.selection.min_rating = rating;
            self.recompute();
        }
    }
}
