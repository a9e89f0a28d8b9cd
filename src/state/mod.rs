//! Filter, sort and pagination state for the device list.
//!
//! Every transition mutates [`DashboardState`] and returns the [`Effect`]s the
//! controller has to carry out (fetches, renders, notifications). Nothing in
//! here touches the network or the document.

use crate::model::{self, Device, FilterDimension};

/// Fixed page size requested from `/api/devices/paginated`.
pub const PER_PAGE: usize = 50;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub search: String,
    pub category: String,
    pub acceptance_status: String,
    pub allocation_status: String,
    pub state_city: String,
    pub flow_type: String,
    pub ticket_type: String,
}

impl FilterSelection {
    pub fn get(&self, dimension: FilterDimension) -> &str {
        match dimension {
            FilterDimension::Category => &self.category,
            FilterDimension::AcceptanceStatus => &self.acceptance_status,
            FilterDimension::AllocationStatus => &self.allocation_status,
            FilterDimension::StateCity => &self.state_city,
            FilterDimension::FlowType => &self.flow_type,
            FilterDimension::TicketType => &self.ticket_type,
        }
    }

    pub fn set(&mut self, dimension: FilterDimension, value: impl Into<String>) {
        let slot = match dimension {
            FilterDimension::Category => &mut self.category,
            FilterDimension::AcceptanceStatus => &mut self.acceptance_status,
            FilterDimension::AllocationStatus => &mut self.allocation_status,
            FilterDimension::StateCity => &mut self.state_city,
            FilterDimension::FlowType => &mut self.flow_type,
            FilterDimension::TicketType => &mut self.ticket_type,
        };
        *slot = value.into();
    }

    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty()
            && FilterDimension::ALL
                .iter()
                .all(|d| self.get(*d).trim().is_empty())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Wire form used for `sort_order`.
    pub fn as_param(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortIndicator {
    Neutral,
    Ascending,
    Descending,
}

impl SortIndicator {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Neutral => "fas fa-sort sort-icon",
            Self::Ascending => "fas fa-sort-up sort-icon active",
            Self::Descending => "fas fa-sort-down sort-icon active",
        }
    }

    pub fn is_active(self) -> bool {
        !matches!(self, Self::Neutral)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortState {
    field: Option<String>,
    direction: SortDirection,
}

impl SortState {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: Some(field.into()),
            direction,
        }
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Same field flips the direction, a new field starts ascending.
    pub fn select(&mut self, field: &str) {
        if self.field.as_deref() == Some(field) {
            self.direction = self.direction.toggled();
        } else {
            self.field = Some(field.to_string());
            self.direction = SortDirection::Asc;
        }
    }

    pub fn indicator(&self, field: &str) -> SortIndicator {
        match self.field.as_deref() {
            Some(active) if active == field => match self.direction {
                SortDirection::Asc => SortIndicator::Ascending,
                SortDirection::Desc => SortIndicator::Descending,
            },
            _ => SortIndicator::Neutral,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Table,
    Card,
}

impl ViewMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "table" => Some(Self::Table),
            "card" | "cards" => Some(Self::Card),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Card => "card",
        }
    }
}

/// Parameters of one `/api/devices/paginated` request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceQuery {
    pub filters: FilterSelection,
    pub page: usize,
    pub per_page: usize,
    pub sort: Option<(String, SortDirection)>,
}

impl DeviceQuery {
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("search", self.filters.search.trim().to_string())];
        for dimension in FilterDimension::ALL {
            let value = self.filters.get(dimension);
            let value = if dimension == FilterDimension::StateCity {
                value.trim()
            } else {
                value
            };
            pairs.push((dimension.query_key(), value.to_string()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("per_page", self.per_page.to_string()));
        if let Some((field, direction)) = self.sort.as_ref() {
            pairs.push(("sort_by", field.clone()));
            pairs.push(("sort_order", direction.as_param().to_string()));
        }
        pairs
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

/// Side effects requested by a state transition, in execution order.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    FetchDevices {
        generation: u64,
        query: DeviceQuery,
    },
    FetchDashboardStats,
    ClearRendered,
    Render,
    SetLoadMoreVisible(bool),
    UpdateSortIndicators,
    Notify(Notification),
}

/// Result of a device fetch as seen by the state machine.
#[derive(Clone, Debug, PartialEq)]
pub enum FetchOutcome {
    Devices(Vec<Device>),
    /// The payload was valid JSON but not a list of records.
    Malformed,
    Failed(String),
}

#[derive(Clone, Debug)]
pub struct DashboardState {
    filters: FilterSelection,
    sort: SortState,
    view: ViewMode,
    page: usize,
    has_more: bool,
    devices: Vec<Device>,
    generation: u64,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(FilterSelection::default(), SortState::default())
    }
}

impl DashboardState {
    pub fn new(filters: FilterSelection, sort: SortState) -> Self {
        Self {
            filters,
            sort,
            view: ViewMode::Table,
            page: 1,
            has_more: true,
            devices: Vec::new(),
            generation: 0,
        }
    }

    /// Presets the display mode before anything is rendered.
    pub fn with_view(mut self, view: ViewMode) -> Self {
        self.view = view;
        self
    }

    pub fn filters(&self) -> &FilterSelection {
        &self.filters
    }

    /// Edits the selection without reloading, like typing into a control
    /// before the change event fires.
    pub fn filters_mut(&mut self) -> &mut FilterSelection {
        &mut self.filters
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn no_more_data(&self) -> bool {
        !self.has_more
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn find_device(&self, id: &str) -> Option<&Device> {
        self.devices
            .iter()
            .find(|d| d.id().as_deref() == Some(id))
    }

    pub fn query(&self, page: usize) -> DeviceQuery {
        DeviceQuery {
            filters: self.filters.clone(),
            page,
            per_page: PER_PAGE,
            sort: self
                .sort
                .field()
                .map(|f| (f.to_string(), self.sort.direction())),
        }
    }

    fn reset_pagination(&mut self) {
        self.page = 1;
        self.has_more = true;
        self.devices.clear();
    }

    pub fn load_devices(&mut self, page: usize) -> Vec<Effect> {
        if !self.has_more && page > 1 {
            return Vec::new();
        }
        self.generation += 1;
        vec![Effect::FetchDevices {
            generation: self.generation,
            query: self.query(page),
        }]
    }

    pub fn load_more(&mut self) -> Vec<Effect> {
        if !self.has_more {
            return Vec::new();
        }
        self.page += 1;
        self.load_devices(self.page)
    }

    pub fn apply_filters(&mut self) -> Vec<Effect> {
        self.reset_pagination();
        let mut effects = vec![Effect::ClearRendered];
        effects.extend(self.load_devices(1));
        effects
    }

    pub fn set_filter(&mut self, dimension: FilterDimension, value: &str) -> Vec<Effect> {
        self.filters.set(dimension, value);
        self.apply_filters()
    }

    pub fn set_search(&mut self, text: &str) {
        self.filters.search = text.to_string();
    }

    pub fn clear_filters(&mut self) -> Vec<Effect> {
        self.filters = FilterSelection::default();
        self.apply_filters()
    }

    /// Returns no effects for a column the backend cannot sort by.
    pub fn select_sort(&mut self, field: &str) -> Vec<Effect> {
        if !model::is_sortable_field(field) {
            return Vec::new();
        }
        self.sort.select(field);
        let mut effects = vec![Effect::UpdateSortIndicators];
        effects.extend(self.apply_filters());
        effects
    }

    pub fn switch_view(&mut self, view: ViewMode) -> Vec<Effect> {
        self.view = view;
        vec![Effect::Render]
    }

    pub fn refresh(&mut self) -> Vec<Effect> {
        let mut effects = self.apply_filters();
        effects.push(Effect::FetchDashboardStats);
        effects.push(Effect::Notify(Notification::success("Data refreshed")));
        effects
    }

    /// Folds a completed fetch into the list. Completions whose generation
    /// is older than the latest request are dropped.
    pub fn devices_loaded(
        &mut self,
        generation: u64,
        page: usize,
        outcome: FetchOutcome,
    ) -> Vec<Effect> {
        if generation != self.generation {
            tracing::debug!(
                generation,
                latest = self.generation,
                "dropping stale device page"
            );
            return Vec::new();
        }
        let batch = match outcome {
            FetchOutcome::Devices(devices) => devices,
            FetchOutcome::Malformed => {
                tracing::error!(page, "invalid response from /api/devices/paginated");
                Vec::new()
            }
            FetchOutcome::Failed(message) => {
                tracing::error!(page, error = %message, "error loading devices");
                // Nothing to append to until page 1 is fetched again.
                self.reset_pagination();
                self.has_more = false;
                return vec![
                    Effect::Notify(Notification::error("Error loading devices")),
                    Effect::ClearRendered,
                    Effect::SetLoadMoreVisible(false),
                    Effect::Render,
                ];
            }
        };

        self.has_more = batch.len() >= PER_PAGE;
        if page == 1 {
            self.devices = batch;
        } else {
            self.devices.extend(batch);
        }
        vec![Effect::SetLoadMoreVisible(self.has_more), Effect::Render]
    }
}
