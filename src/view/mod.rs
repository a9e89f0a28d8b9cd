//! Device list renderers.
//!
//! Devices are first mapped to [`DeviceRow`] view models (fallbacks and date
//! formatting applied), then written out as markup. Every value that came
//! from the backend goes through [`escape_html`] on the way out.

pub mod modal;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::model::{self, Device};
use crate::state::{SortIndicator, SortState};

pub const NOT_ASSIGNED: &str = "Not assigned";
pub const NOT_AVAILABLE: &str = "N/A";

/// Table header labels and the column each one sorts by.
pub const TABLE_COLUMNS: [(&str, &str); 8] = [
    ("Device", model::DEVICE_ID),
    ("Location", model::LOCATION_NAME),
    ("L1 Assignment", model::L1_NAME),
    ("L2 Assignment", model::L2_NAME),
    ("Engineer", model::ENGG_NAME),
    ("Customer", model::CUSTOMER_NAME),
    ("Status", model::DEVICE_ALLOCATION_STATUS),
    ("Ticket", model::TICKET_NO),
];

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// `DD/MM/YYYY`, or `None` when the value is absent or not a date.
pub fn date_text(value: Option<&str>) -> Option<String> {
    value
        .and_then(parse_date)
        .map(|d| d.format("%d/%m/%Y").to_string())
}

pub fn format_date(value: Option<&str>) -> String {
    date_text(value).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Acceptance,
    Allocation,
}

impl StatusKind {
    /// Unknown statuses fall back to the pending/available style.
    pub fn css_class(self, status: Option<&str>) -> &'static str {
        match self {
            Self::Acceptance => match status {
                Some("Accepted") => "status-accepted",
                Some("Pending") => "status-pending",
                Some("In Progress") => "status-in-progress",
                Some("Rejected") => "status-rejected",
                _ => "status-pending",
            },
            Self::Allocation => match status {
                Some("ALLOCATED") => "status-allocated",
                Some("GOOD") => "status-available",
                Some("REPAIRED") => "status-accepted",
                Some("REPAIRING") => "status-in-progress",
                Some("FAULTY") => "status-rejected",
                _ => "status-available",
            },
        }
    }
}

pub fn status_badge(status: Option<&str>, kind: StatusKind) -> String {
    let status = status.filter(|s| !s.is_empty());
    format!(
        r#"<span class="status-badge {}">{}</span>"#,
        kind.css_class(status),
        escape_html(status.unwrap_or(NOT_AVAILABLE))
    )
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TierCell {
    pub label: &'static str,
    pub name: String,
    pub account: String,
    pub date: String,
}

/// Display-ready fields of one device, shared by the table and card views.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceRow {
    pub id: String,
    pub serial: String,
    pub model: String,
    pub category: String,
    pub location_name: String,
    pub state_city: String,
    pub movement_date: String,
    pub tiers: [TierCell; 3],
    pub customer: TierCell,
    pub acceptance_status: Option<String>,
    pub allocation_status: Option<String>,
    pub ticket_no: String,
    pub ticket_type: String,
    pub ticket_date: String,
}

fn tier(device: &Device, label: &'static str, name: &str, account: &str, date: &str) -> TierCell {
    TierCell {
        label,
        name: device.text_or(name, NOT_ASSIGNED),
        account: device.text(account),
        date: date_text(device.present(date).as_deref()).unwrap_or_default(),
    }
}

impl DeviceRow {
    pub fn from_device(device: &Device) -> Self {
        Self {
            id: device.text(model::DEVICE_ID),
            serial: device.text(model::DEVICE_SERIAL_NO),
            model: device.text(model::MODEL_MAKE),
            category: device.text(model::CATEGORY),
            location_name: device.text(model::LOCATION_NAME),
            state_city: device.text(model::STATE_CITY),
            movement_date: format_date(device.field(model::LOCATION_MOVEMENT_DATE).as_deref()),
            tiers: [
                tier(
                    device,
                    "L1",
                    model::L1_NAME,
                    model::L1_ACCOUNT_NO,
                    model::DATE_OF_L1_ACCEPTANCE,
                ),
                tier(
                    device,
                    "L2",
                    model::L2_NAME,
                    model::L2_ACCOUNT_NO,
                    model::DATE_OF_L2_ACCEPTANCE,
                ),
                tier(
                    device,
                    "Engineer",
                    model::ENGG_NAME,
                    model::ENGG_ACCOUNT_NO,
                    model::DATE_OF_ENGG_ACCEPTANCE,
                ),
            ],
            customer: TierCell {
                label: "Customer",
                name: device.text(model::CUSTOMER_NAME),
                account: device.text(model::CUSTOMER_ACCOUNT_NO),
                date: date_text(device.present(model::DATE_OF_CUSTOMER_ALLOCATION).as_deref())
                    .unwrap_or_default(),
            },
            acceptance_status: device.field(model::ACCEPTANCE_STATUS).map(|s| s.into_owned()),
            allocation_status: device
                .field(model::DEVICE_ALLOCATION_STATUS)
                .map(|s| s.into_owned()),
            ticket_no: device.text(model::TICKET_NO),
            ticket_type: device.text(model::TYPE_OF_TICKET),
            ticket_date: format_date(device.field(model::TICKET_DATE).as_deref()),
        }
    }

    fn badges(&self) -> String {
        format!(
            "{}\n{}",
            status_badge(self.acceptance_status.as_deref(), StatusKind::Acceptance),
            status_badge(self.allocation_status.as_deref(), StatusKind::Allocation)
        )
    }
}

fn assignment_cell(cell: &TierCell) -> String {
    format!(
        r#"<td>
  <div class="assignment-info">
    <div class="assignment-name">{}</div>
    <div class="assignment-account">{}</div>
    <div class="assignment-date">{}</div>
  </div>
</td>"#,
        escape_html(&cell.name),
        escape_html(&cell.account),
        escape_html(&cell.date)
    )
}

pub fn render_table_row(row: &DeviceRow) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        r#"<tr data-device-id="{}">"#,
        escape_html(&row.id)
    ));
    out.push('\n');
    out.push_str(&format!(
        r#"<td>
  <div class="device-info">
    <div class="device-id">{}</div>
    <div class="device-serial">{}</div>
    <div class="device-model">{}</div>
    <span class="device-category">{}</span>
  </div>
</td>"#,
        escape_html(&row.id),
        escape_html(&row.serial),
        escape_html(&row.model),
        escape_html(&row.category)
    ));
    out.push('\n');
    out.push_str(&format!(
        r#"<td>
  <div class="location-info">
    <div class="location-name">{}</div>
    <div class="location-city">{}</div>
    <div class="location-movement">{}</div>
  </div>
</td>"#,
        escape_html(&row.location_name),
        escape_html(&row.state_city),
        escape_html(&row.movement_date)
    ));
    out.push('\n');
    for cell in row.tiers.iter().chain(std::iter::once(&row.customer)) {
        out.push_str(&assignment_cell(cell));
        out.push('\n');
    }
    out.push_str(&format!(
        "<td>\n  <div class=\"status-cell\">\n{}\n  </div>\n</td>\n",
        row.badges()
    ));
    out.push_str(&format!(
        r#"<td>
  <div class="ticket-info">
    <div class="ticket-number">{}</div>
    <div class="ticket-type">{}</div>
    <div class="ticket-date">{}</div>
  </div>
</td>"#,
        escape_html(&row.ticket_no),
        escape_html(&row.ticket_type),
        escape_html(&row.ticket_date)
    ));
    out.push_str("\n</tr>\n");
    out
}

pub fn render_card(row: &DeviceRow) -> String {
    let details = [
        ("Serial No", &row.serial),
        ("Model", &row.model),
        ("Category", &row.category),
        ("Location", &row.location_name),
    ];
    let mut out = String::new();
    out.push_str(&format!(
        "<div class=\"device-card\" data-device-id=\"{}\">\n<div class=\"card-header\">\n",
        escape_html(&row.id)
    ));
    out.push_str(&format!(
        "<div class=\"card-device-info\">\n  <div class=\"card-device-id\">{}</div>\n  <div class=\"card-badges\">\n{}\n  </div>\n</div>\n",
        escape_html(&row.id),
        row.badges()
    ));
    out.push_str("<div class=\"card-details\">\n");
    for (label, value) in details {
        out.push_str(&format!(
            "  <div class=\"card-detail\"><div class=\"card-detail-label\">{label}</div><div class=\"card-detail-value\">{}</div></div>\n",
            escape_html(value)
        ));
    }
    out.push_str("</div>\n</div>\n<div class=\"card-body\">\n<div class=\"card-assignments\">\n");
    for cell in &row.tiers {
        out.push_str(&format!(
            "  <div class=\"card-assignment\"><div class=\"card-assignment-label\">{}</div><div class=\"card-assignment-name\">{}</div></div>\n",
            cell.label,
            escape_html(&cell.name)
        ));
    }
    out.push_str("</div>\n</div>\n</div>\n");
    out
}

pub fn render_table(devices: &[Device]) -> String {
    devices
        .iter()
        .map(|d| render_table_row(&DeviceRow::from_device(d)))
        .collect()
}

pub fn render_cards(devices: &[Device]) -> String {
    devices
        .iter()
        .map(|d| render_card(&DeviceRow::from_device(d)))
        .collect()
}

pub fn header_indicators(sort: &SortState) -> Vec<(&'static str, SortIndicator)> {
    TABLE_COLUMNS
        .iter()
        .map(|(_, field)| (*field, sort.indicator(field)))
        .collect()
}

pub fn render_table_header(indicators: &[(&'static str, SortIndicator)]) -> String {
    let mut out = String::from("<tr>\n");
    for (label, field) in TABLE_COLUMNS {
        let indicator = indicators
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, i)| *i)
            .unwrap_or(SortIndicator::Neutral);
        out.push_str(&format!(
            "  <th data-sort=\"{field}\">{label} <i class=\"{}\"></i></th>\n",
            indicator.css_class()
        ));
    }
    out.push_str("</tr>\n");
    out
}
