//! Drives the dashboard: user interactions go through [`DashboardState`],
//! the resulting effects are carried out here against a [`Backend`] and the
//! in-memory [`Document`].

use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::api::{Backend, DevicePage};
use crate::debounce::{Debouncer, SEARCH_DEBOUNCE};
use crate::document::Document;
use crate::model::{FilterDimension, FilterOptions, SummaryCard};
use crate::output::csv::{export_file_name, render_csv};
use crate::state::{
    DashboardState, DeviceQuery, Effect, FetchOutcome, Notification, NotificationKind, ViewMode,
};
use crate::view::modal::{ModalTab, ModalView};
use crate::view::{header_indicators, render_cards, render_table};

pub struct DeviceListController<B: Backend> {
    backend: B,
    state: DashboardState,
    document: Document,
    catalog: FilterOptions,
    search: Debouncer<()>,
    search_rx: mpsc::UnboundedReceiver<()>,
}

impl<B: Backend> DeviceListController<B> {
    /// Must be called inside a tokio runtime: the search debouncer spawns
    /// its timers there.
    pub fn new(backend: B, document: Document) -> Self {
        let (search, search_rx) = Debouncer::new(SEARCH_DEBOUNCE);
        Self {
            backend,
            state: DashboardState::default(),
            document,
            catalog: FilterOptions::default(),
            search,
            search_rx,
        }
    }

    /// Starts from a preset selection, mirroring it into the controls.
    pub fn with_state(mut self, state: DashboardState) -> Self {
        self.document.search_value = state.filters().search.clone();
        for dimension in FilterDimension::ALL {
            let value = state.filters().get(dimension).to_string();
            self.document.set_filter_value(dimension, &value);
        }
        self.document.active_view = state.view();
        self.state = state;
        self.update_sort_indicators();
        self
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn catalog(&self) -> &FilterOptions {
        &self.catalog
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Page startup: filter options, first page, then the summary counts.
    pub async fn start(&mut self) {
        self.load_filter_options().await;
        self.apply_filters().await;
        self.load_dashboard_stats().await;
    }

    pub async fn load_filter_options(&mut self) {
        match self.backend.filter_options().await {
            Ok(options) => {
                for dimension in FilterDimension::ALL {
                    self.document
                        .populate_filter(dimension, options.values(dimension));
                }
                debug!(
                    categories = options.categories.len(),
                    state_cities = options.state_cities.len(),
                    "filter options loaded"
                );
                self.catalog = options;
            }
            Err(e) => {
                error!(error = %e, "error loading filter options");
                self.notify(Notification::error("Error loading filter options"));
            }
        }
    }

    pub async fn load_devices(&mut self, page: usize) {
        let effects = self.state.load_devices(page);
        self.run(effects).await;
    }

    pub async fn load_more_devices(&mut self) {
        let effects = self.state.load_more();
        self.run(effects).await;
    }

    pub async fn apply_filters(&mut self) {
        let effects = self.state.apply_filters();
        self.run(effects).await;
    }

    /// A change event on one of the six filter controls.
    pub async fn set_filter(&mut self, dimension: FilterDimension, value: &str) {
        if !self.document.set_filter_value(dimension, value) {
            warn!(control = dimension.control_id(), "filter control not found");
            return;
        }
        let effects = self.state.set_filter(dimension, value);
        self.run(effects).await;
    }

    /// Keystroke in the search box. The reload happens once typing pauses.
    pub fn search_input(&mut self, text: &str) {
        self.document.search_value = text.to_string();
        self.state.set_search(text);
        while self.search_rx.try_recv().is_ok() {}
        self.search.call(());
    }

    /// Waits out a pending search debounce and applies it.
    /// Returns `false` when nothing was pending.
    pub async fn settle_search(&mut self) -> bool {
        let fired = match self.search_rx.try_recv() {
            Ok(()) => true,
            Err(_) if self.search.is_pending() => self.search_rx.recv().await.is_some(),
            Err(_) => false,
        };
        if fired {
            self.apply_filters().await;
        }
        fired
    }

    pub async fn clear_all_filters(&mut self) {
        self.document.reset_controls();
        self.search.cancel();
        while self.search_rx.try_recv().is_ok() {}
        let effects = self.state.clear_filters();
        self.run(effects).await;
    }

    /// Allocation-status shortcut used by the summary cards.
    pub async fn filter_by_allocation_status(&mut self, status: &str) {
        if !self
            .document
            .set_filter_value(FilterDimension::AllocationStatus, status)
        {
            error!("allocation status filter element not found");
            self.notify(Notification::error(
                "Unable to apply allocation status filter",
            ));
            return;
        }
        let effects = self
            .state
            .set_filter(FilterDimension::AllocationStatus, status);
        self.run(effects).await;
    }

    pub async fn click_summary_card(&mut self, card: SummaryCard) {
        self.filter_by_allocation_status(card.allocation_filter())
            .await;
    }

    pub async fn sort_by_column(&mut self, field: &str) {
        let effects = self.state.select_sort(field);
        if effects.is_empty() {
            debug!(field, "ignoring sort on unsupported column");
        }
        self.run(effects).await;
    }

    pub async fn switch_view(&mut self, view: ViewMode) {
        self.document.active_view = view;
        let effects = self.state.switch_view(view);
        self.run(effects).await;
    }

    pub async fn refresh_data(&mut self) {
        let effects = self.state.refresh();
        self.run(effects).await;
    }

    /// Counts for the summary cards. Failures are only logged.
    pub async fn load_dashboard_stats(&mut self) {
        match self.backend.dashboard_stats().await {
            Ok(stats) => self.document.stats = stats,
            Err(e) => error!(error = %e, "error loading dashboard stats"),
        }
    }

    /// Opens the detail modal on the General tab. Unknown ids are ignored.
    pub fn show_device_modal(&mut self, id: &str) -> bool {
        let view = match self.state.find_device(id) {
            Some(device) => ModalView::from_device(device),
            None => {
                debug!(id, "no loaded device with this id");
                return false;
            }
        };
        self.document.open_modal(view);
        self.document.active_tab = ModalTab::General;
        true
    }

    pub fn switch_tab(&mut self, tab: ModalTab) {
        self.document.active_tab = tab;
    }

    pub fn close_modal(&mut self) {
        self.document.close_modal();
    }

    /// A click inside the modal container. Only the backdrop itself closes it.
    pub fn click_modal_backdrop(&mut self, on_backdrop: bool) {
        if on_backdrop {
            self.close_modal();
        }
    }

    pub fn toggle_filters(&mut self) {
        self.document.toggle_filters();
    }

    pub fn close_filters(&mut self) {
        self.document.close_filters();
    }

    pub fn click_overlay(&mut self) {
        self.close_filters();
        self.close_modal();
    }

    /// Global shortcuts. Returns `true` when the key's default action
    /// should be suppressed.
    pub fn handle_key(&mut self, key: &str, ctrl: bool, meta: bool) -> bool {
        if key == "Escape" {
            self.close_modal();
            self.close_filters();
            return false;
        }
        if (ctrl || meta) && key.eq_ignore_ascii_case("f") {
            self.document.search_focused = true;
            return true;
        }
        false
    }

    /// Writes the loaded devices to `cpe_devices_<date>.csv` inside `dir`.
    pub async fn export_csv(&mut self, dir: &Path, date: NaiveDate) -> io::Result<PathBuf> {
        let path = dir.join(export_file_name(date));
        tokio::fs::write(&path, render_csv(self.state.devices())).await?;
        info!(path = %path.display(), devices = self.state.devices().len(), "exported csv");
        self.notify(Notification::success("Data exported successfully"));
        Ok(path)
    }

    pub fn notify(&mut self, notification: Notification) {
        match notification.kind {
            NotificationKind::Error => error!(message = %notification.message, "notification"),
            NotificationKind::Success | NotificationKind::Info => {
                info!(message = %notification.message, "notification")
            }
        }
        self.document.notifications.push(notification);
    }

    async fn run(&mut self, effects: Vec<Effect>) {
        let mut queue: VecDeque<Effect> = effects.into();
        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::FetchDevices { generation, query } => {
                    let follow_up = self.fetch_devices(generation, query).await;
                    queue.extend(follow_up);
                }
                Effect::FetchDashboardStats => self.load_dashboard_stats().await,
                other => {
                    if let Some(rest) = self.apply_local(other) {
                        queue.push_back(rest);
                    }
                }
            }
        }
    }

    /// Runs one device request with the loading indicator up. Effects that
    /// need the network again are handed back to the caller.
    async fn fetch_devices(&mut self, generation: u64, query: DeviceQuery) -> Vec<Effect> {
        let page = query.page;
        self.document.set_loading(true, !self.state.devices().is_empty());
        let outcome = match self.backend.devices(&query).await {
            Ok(DevicePage::Devices(devices)) => FetchOutcome::Devices(devices),
            Ok(DevicePage::Malformed(value)) => {
                debug!(payload = %value, "unexpected device payload");
                FetchOutcome::Malformed
            }
            Err(e) => FetchOutcome::Failed(e.to_string()),
        };

        let mut deferred = Vec::new();
        for effect in self.state.devices_loaded(generation, page, outcome) {
            if let Some(rest) = self.apply_local(effect) {
                deferred.push(rest);
            }
        }
        self.document
            .set_loading(false, !self.state.devices().is_empty());
        deferred
    }

    /// Applies an effect that only touches the document. Anything else is
    /// returned untouched.
    fn apply_local(&mut self, effect: Effect) -> Option<Effect> {
        match effect {
            Effect::ClearRendered => self.document.clear_devices(),
            Effect::Render => self.render(),
            Effect::SetLoadMoreVisible(visible) => self.document.load_more_visible = visible,
            Effect::UpdateSortIndicators => self.update_sort_indicators(),
            Effect::Notify(notification) => self.notify(notification),
            other => return Some(other),
        }
        None
    }

    fn render(&mut self) {
        self.document.clear_devices();
        let devices = self.state.devices();
        if devices.is_empty() {
            self.document.show_empty();
            return;
        }
        match self.state.view() {
            ViewMode::Table => self.document.show_table(render_table(devices)),
            ViewMode::Card => self.document.show_cards(render_cards(devices)),
        }
    }

    fn update_sort_indicators(&mut self) {
        self.document.sort_indicators = header_indicators(self.state.sort());
    }
}
