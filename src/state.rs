use std::path::PathBuf;
use std::sync::Arc;

use crate::data::filter::{segment_names, Scenario};
use crate::data::{DatasetCache, Datasets};
use crate::view::{render, RenderedView, UserSelections, ViewKey};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Load-once cache for the current data directory.
    pub cache: DatasetCache,

    /// Loaded tables (None when loading failed).
    pub datasets: Option<Arc<Datasets>>,

    /// Header logo, if the file exists.
    pub logo: Option<PathBuf>,

    /// Selected navigation entry.
    pub view: ViewKey,

    /// Scenario multi-select and segment single-select.
    pub selections: UserSelections,

    /// Output of the router for the current view and selections (cached).
    pub rendered: Option<RenderedView>,

    /// Fatal load error; while set no view is rendered.
    pub load_error: Option<String>,
}

impl AppState {
    /// Build the state and load the data directory straight away.
    pub fn new(data_dir: PathBuf, logo: PathBuf) -> Self {
        let mut state = Self {
            cache: DatasetCache::new(data_dir),
            datasets: None,
            logo: logo.is_file().then_some(logo),
            view: ViewKey::default(),
            selections: UserSelections {
                scenarios: vec![Scenario::BaseForecast.column().to_string()],
                segment: None,
            },
            rendered: None,
            load_error: None,
        };
        state.load();
        state
    }

    /// Fetch tables from the cache (reads disk only when the cache is cold).
    pub fn load(&mut self) {
        match self.cache.load() {
            Ok(data) => {
                self.datasets = Some(data);
                self.load_error = None;
                self.rerender();
            }
            Err(e) => {
                log::error!("Failed to load datasets: {e}");
                self.datasets = None;
                self.rendered = None;
                self.load_error = Some(e.to_string());
            }
        }
    }

    /// Drop the cached tables and read the files again.
    pub fn reload(&mut self) {
        self.cache.clear();
        self.load();
    }

    /// Switch to another data directory with a fresh cache.
    pub fn open_dir(&mut self, dir: PathBuf) {
        log::info!("Switching data directory to {}", dir.display());
        self.cache = DatasetCache::new(dir);
        self.selections.segment = None;
        self.load();
    }

    pub fn set_view(&mut self, view: ViewKey) {
        if self.view != view {
            self.view = view;
            self.rerender();
        }
    }

    /// Add or remove a scenario, keeping the order in which they were picked.
    pub fn toggle_scenario(&mut self, scenario: Scenario) {
        let name = scenario.column();
        let picked = &mut self.selections.scenarios;
        if let Some(pos) = picked.iter().position(|s| s == name) {
            picked.remove(pos);
        } else {
            picked.push(name.to_string());
        }
        self.rerender();
    }

    pub fn is_scenario_selected(&self, scenario: Scenario) -> bool {
        self.selections.scenarios.iter().any(|s| s == scenario.column())
    }

    pub fn select_segment(&mut self, segment: String) {
        self.selections.segment = Some(segment);
        self.rerender();
    }

    /// Segment picker options, in table order.
    pub fn segment_options(&self) -> Vec<String> {
        self.datasets
            .as_ref()
            .map(|d| segment_names(&d.roi).into_iter().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Segment currently shown in the deep dive.
    pub fn current_segment(&self) -> Option<String> {
        self.selections
            .segment
            .clone()
            .or_else(|| self.segment_options().into_iter().next())
    }

    /// Recompute `rendered` after a view or selection change.
    pub fn rerender(&mut self) {
        self.rendered = self
            .datasets
            .as_ref()
            .map(|d| render(self.view, d, &self.selections));
    }
}
