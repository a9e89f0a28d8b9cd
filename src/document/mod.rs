//! In-memory model of the dashboard page.
//!
//! The controller writes into a [`Document`] the way the page script writes
//! into the DOM: filter controls, rendered containers, visibility flags, the
//! modal and notifications. `output::report` turns it into a standalone page.

use crate::model::{DashboardStats, FilterDimension};
use crate::state::{Notification, SortIndicator, ViewMode};
use crate::view::modal::{ModalTab, ModalView};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterControl {
    pub dimension: FilterDimension,
    /// Options after the leading "all" option.
    pub options: Vec<String>,
    /// Empty string selects the leading "all" option.
    pub selected: String,
}

#[derive(Clone, Debug)]
pub struct Document {
    pub filter_controls: Vec<FilterControl>,
    pub search_value: String,
    pub search_focused: bool,
    pub filters_open: bool,
    pub overlay_visible: bool,
    pub loading: bool,
    pub load_more_visible: bool,
    pub sort_indicators: Vec<(&'static str, SortIndicator)>,
    pub active_view: ViewMode,
    pub table_body: String,
    pub cards_body: String,
    pub table_visible: bool,
    pub cards_visible: bool,
    pub no_results_visible: bool,
    pub stats: DashboardStats,
    pub modal: Option<ModalView>,
    pub modal_visible: bool,
    pub active_tab: ModalTab,
    pub notifications: Vec<Notification>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            filter_controls: FilterDimension::ALL
                .iter()
                .map(|d| FilterControl {
                    dimension: *d,
                    options: Vec::new(),
                    selected: String::new(),
                })
                .collect(),
            search_value: String::new(),
            search_focused: false,
            filters_open: false,
            overlay_visible: false,
            loading: false,
            load_more_visible: false,
            sort_indicators: crate::view::TABLE_COLUMNS
                .iter()
                .map(|(_, field)| (*field, SortIndicator::Neutral))
                .collect(),
            active_view: ViewMode::Table,
            table_body: String::new(),
            cards_body: String::new(),
            table_visible: false,
            cards_visible: false,
            no_results_visible: false,
            stats: DashboardStats::default(),
            modal: None,
            modal_visible: false,
            active_tab: ModalTab::General,
            notifications: Vec::new(),
        }
    }

    /// A page whose markup lacks the control for `dimension`.
    pub fn without_filter_control(mut self, dimension: FilterDimension) -> Self {
        self.filter_controls.retain(|c| c.dimension != dimension);
        self
    }

    pub fn filter_control(&self, dimension: FilterDimension) -> Option<&FilterControl> {
        self.filter_controls.iter().find(|c| c.dimension == dimension)
    }

    fn filter_control_mut(&mut self, dimension: FilterDimension) -> Option<&mut FilterControl> {
        self.filter_controls
            .iter_mut()
            .find(|c| c.dimension == dimension)
    }

    pub fn has_filter_control(&self, dimension: FilterDimension) -> bool {
        self.filter_control(dimension).is_some()
    }

    /// Replaces the options of a control, keeping the leading "all" option.
    pub fn populate_filter(&mut self, dimension: FilterDimension, options: &[String]) {
        if let Some(control) = self.filter_control_mut(dimension) {
            control.options = options.to_vec();
        }
    }

    pub fn set_filter_value(&mut self, dimension: FilterDimension, value: &str) -> bool {
        match self.filter_control_mut(dimension) {
            Some(control) => {
                control.selected = value.to_string();
                true
            }
            None => false,
        }
    }

    pub fn reset_controls(&mut self) {
        self.search_value.clear();
        for control in self.filter_controls.iter_mut() {
            control.selected.clear();
        }
    }

    pub fn clear_devices(&mut self) {
        self.table_body.clear();
        self.cards_body.clear();
    }

    /// Recomputes which container is shown once loading finishes.
    pub fn set_loading(&mut self, loading: bool, has_devices: bool) {
        self.loading = loading;
        if !loading {
            self.table_visible = self.active_view == ViewMode::Table && has_devices;
            self.cards_visible = self.active_view == ViewMode::Card && has_devices;
            self.no_results_visible = !has_devices;
        }
    }

    pub fn show_empty(&mut self) {
        self.no_results_visible = true;
        self.table_visible = false;
        self.cards_visible = false;
    }

    pub fn show_table(&mut self, body: String) {
        self.no_results_visible = false;
        self.table_body = body;
        self.table_visible = true;
        self.cards_visible = false;
    }

    pub fn show_cards(&mut self, body: String) {
        self.no_results_visible = false;
        self.cards_body = body;
        self.table_visible = false;
        self.cards_visible = true;
    }

    pub fn open_modal(&mut self, view: ModalView) {
        self.modal = Some(view);
        self.modal_visible = true;
        self.overlay_visible = true;
    }

    pub fn close_modal(&mut self) {
        self.modal_visible = false;
        self.overlay_visible = false;
    }

    pub fn toggle_filters(&mut self) {
        self.filters_open = !self.filters_open;
        self.overlay_visible = !self.overlay_visible;
    }

    pub fn close_filters(&mut self) {
        self.filters_open = false;
        self.overlay_visible = false;
    }

    pub fn active_sort_headers(&self) -> usize {
        self.sort_indicators
            .iter()
            .filter(|(_, i)| i.is_active())
            .count()
    }
}
