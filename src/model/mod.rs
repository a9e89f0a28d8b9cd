use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEVICE_ID: &str = "DEVICE_ID";
pub const DEVICE_SERIAL_NO: &str = "DEVICE_SERIAL_NO";
pub const MODEL_MAKE: &str = "MODEL_MAKE";
pub const CATEGORY: &str = "CATEGORY";
pub const FROM_WHTO_LOCATOR: &str = "FROM_WHTO_LOCATOR";
pub const LOCATION_NAME: &str = "LOCATION_NAME";
pub const STATE_CITY: &str = "STATE_CITY";
pub const LOCATION_MOVEMENT_DATE: &str = "LOCATION_MOVEMENT_DATE";
pub const L1_ACCOUNT_NO: &str = "L1_ACCOUNT_NO";
pub const L1_NAME: &str = "L1_NAME";
pub const DATE_OF_L1_ACCEPTANCE: &str = "DATE_OF_L1_ACCEPTANCE";
pub const L1_ACCEPTANCE_APP: &str = "L1_ACCEPTANCE_APP";
pub const L2_ACCOUNT_NO: &str = "L2_ACCOUNT_NO";
pub const L2_NAME: &str = "L2_NAME";
pub const DATE_OF_L2_ACCEPTANCE: &str = "DATE_OF_L2_ACCEPTANCE";
pub const L2_ACCEPTANCE_APP: &str = "L2_ACCEPTANCE_APP";
pub const ENGG_ACCOUNT_NO: &str = "ENGG_ACCOUNT_NO";
pub const ENGG_NAME: &str = "ENGG_NAME";
pub const L1_ASSIGNED_TO_ENGG: &str = "L1_ASSIGNED_TO_ENGG";
pub const DATE_OF_ENGG_ACCEPTANCE: &str = "DATE_OF_ENGG_ACCEPTANCE";
pub const ACCEPTANCE_STATUS: &str = "ACCEPTANCE_STATUS";
pub const FLOW_TYPE: &str = "FLOW_TYPE";
pub const TICKET_NO: &str = "TICKET_NO";
pub const TICKET_DATE: &str = "TICKET_DATE";
pub const TYPE_OF_TICKET: &str = "TYPE_OF_TICKET";
pub const TICKET_STATUS: &str = "TICKET_STATUS";
pub const CUSTOMER_ACCOUNT_NO: &str = "CUSTOMER_ACCOUNT_NO";
pub const CUSTOMER_NAME: &str = "CUSTOMER_NAME";
pub const DATE_OF_CUSTOMER_ALLOCATION: &str = "DATE_OF_CUSTOMER_ALLOCATION";
pub const DEVICE_ALLOCATION_STATUS: &str = "DEVICE_ALLOCATION_STATUS";
pub const CURRENT_LOCATION_USER_ID: &str = "CURRENT_LOCATION_USER_ID";
pub const LOCATION_FIRST_NAME: &str = "LOCATION_FIRST_NAME";
pub const LOCATION_LAST_NAME: &str = "LOCATION_LAST_NAME";

/// Columns the backend accepts in `sort_by`.
pub const SORTABLE_FIELDS: &[&str] = &[
    DEVICE_ID,
    DEVICE_SERIAL_NO,
    MODEL_MAKE,
    CATEGORY,
    FROM_WHTO_LOCATOR,
    LOCATION_NAME,
    STATE_CITY,
    LOCATION_MOVEMENT_DATE,
    L1_ACCOUNT_NO,
    L1_NAME,
    DATE_OF_L1_ACCEPTANCE,
    L1_ACCEPTANCE_APP,
    L2_ACCOUNT_NO,
    L2_NAME,
    DATE_OF_L2_ACCEPTANCE,
    L2_ACCEPTANCE_APP,
    ENGG_ACCOUNT_NO,
    ENGG_NAME,
    L1_ASSIGNED_TO_ENGG,
    "DATE_OF_ENGG_ASSIGNMENT",
    DATE_OF_ENGG_ACCEPTANCE,
    ACCEPTANCE_STATUS,
    FLOW_TYPE,
    TICKET_NO,
    TICKET_DATE,
    TYPE_OF_TICKET,
    TICKET_STATUS,
    CUSTOMER_ACCOUNT_NO,
    CUSTOMER_NAME,
    DATE_OF_CUSTOMER_ALLOCATION,
    DEVICE_ALLOCATION_STATUS,
    CURRENT_LOCATION_USER_ID,
    LOCATION_FIRST_NAME,
    LOCATION_LAST_NAME,
    "STATE",
    "CITY",
    "STATE_ID",
    "POID_ID0",
];

pub fn is_sortable_field(field: &str) -> bool {
    SORTABLE_FIELDS.contains(&field)
}

/// One inventory record, kept exactly as the backend sent it.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Device(Map<String, Value>);

impl Device {
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn id(&self) -> Option<Cow<'_, str>> {
        self.field(DEVICE_ID)
    }

    /// Textual value of `name`; `None` when absent or null.
    pub fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match self.0.get(name)? {
            Value::Null => None,
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            other => Some(Cow::Owned(other.to_string())),
        }
    }

    /// Like [`Device::field`] but treats an empty string as missing.
    pub fn present(&self, name: &str) -> Option<Cow<'_, str>> {
        self.field(name).filter(|v| !v.is_empty())
    }

    pub fn text(&self, name: &str) -> String {
        self.field(name).map(Cow::into_owned).unwrap_or_default()
    }

    pub fn text_or(&self, name: &str, fallback: &str) -> String {
        self.present(name)
            .map(Cow::into_owned)
            .unwrap_or_else(|| fallback.to_string())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterDimension {
    Category,
    AcceptanceStatus,
    AllocationStatus,
    StateCity,
    FlowType,
    TicketType,
}

impl FilterDimension {
    pub const ALL: [FilterDimension; 6] = [
        FilterDimension::Category,
        FilterDimension::AcceptanceStatus,
        FilterDimension::AllocationStatus,
        FilterDimension::StateCity,
        FilterDimension::FlowType,
        FilterDimension::TicketType,
    ];

    /// Query-string key sent to `/api/devices/paginated`.
    pub fn query_key(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::AcceptanceStatus => "acceptance_status",
            Self::AllocationStatus => "allocation_status",
            Self::StateCity => "state_city",
            Self::FlowType => "flow_type",
            Self::TicketType => "ticket_type",
        }
    }

    pub fn control_id(self) -> &'static str {
        match self {
            Self::Category => "category-filter",
            Self::AcceptanceStatus => "acceptance-status-filter",
            Self::AllocationStatus => "allocation-status-filter",
            Self::StateCity => "state-city-filter",
            Self::FlowType => "flow-type-filter",
            Self::TicketType => "ticket-type-filter",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::AcceptanceStatus => "Acceptance Status",
            Self::AllocationStatus => "Allocation Status",
            Self::StateCity => "State/City",
            Self::FlowType => "Flow Type",
            Self::TicketType => "Ticket Type",
        }
    }
}

/// Selectable values per filter dimension, as served by `/api/filters`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterOptions {
    pub categories: Vec<String>,
    pub acceptance_statuses: Vec<String>,
    pub allocation_statuses: Vec<String>,
    pub state_cities: Vec<String>,
    pub flow_types: Vec<String>,
    pub ticket_types: Vec<String>,
}

impl FilterOptions {
    pub fn values(&self, dimension: FilterDimension) -> &[String] {
        match dimension {
            FilterDimension::Category => &self.categories,
            FilterDimension::AcceptanceStatus => &self.acceptance_statuses,
            FilterDimension::AllocationStatus => &self.allocation_statuses,
            FilterDimension::StateCity => &self.state_cities,
            FilterDimension::FlowType => &self.flow_types,
            FilterDimension::TicketType => &self.ticket_types,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardStats {
    pub total_devices: u64,
    pub allocated: u64,
    pub available: u64,
    pub repairing: u64,
    pub faulty: u64,
    pub repaired: u64,
}

/// The six summary displays; each one doubles as an allocation-status shortcut.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SummaryCard {
    Total,
    Allocated,
    Available,
    Repairing,
    Faulty,
    Repaired,
}

impl SummaryCard {
    pub const ALL: [SummaryCard; 6] = [
        SummaryCard::Total,
        SummaryCard::Allocated,
        SummaryCard::Available,
        SummaryCard::Repairing,
        SummaryCard::Faulty,
        SummaryCard::Repaired,
    ];

    pub fn allocation_filter(self) -> &'static str {
        match self {
            Self::Total => "",
            Self::Allocated => "ALLOCATED",
            Self::Available => "GOOD",
            Self::Repairing => "REPAIRING",
            Self::Faulty => "FAULTY",
            Self::Repaired => "REPAIRED",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Total => "Total Devices",
            Self::Allocated => "Allocated",
            Self::Available => "Available",
            Self::Repairing => "Repairing",
            Self::Faulty => "Faulty",
            Self::Repaired => "Repaired",
        }
    }

    pub fn element_id(self) -> &'static str {
        match self {
            Self::Total => "total-devices",
            Self::Allocated => "allocated-devices",
            Self::Available => "available-devices",
            Self::Repairing => "repairing-devices",
            Self::Faulty => "faulty-devices",
            Self::Repaired => "repaired-devices",
        }
    }

    pub fn count(self, stats: &DashboardStats) -> u64 {
        match self {
            Self::Total => stats.total_devices,
            Self::Allocated => stats.allocated,
            Self::Available => stats.available,
            Self::Repairing => stats.repairing,
            Self::Faulty => stats.faulty,
            Self::Repaired => stats.repaired,
        }
    }
}
