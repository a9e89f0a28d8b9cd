use crate::model::{self, Device};

use super::{escape_html, format_date, status_badge, StatusKind, NOT_ASSIGNED, NOT_AVAILABLE};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModalTab {
    #[default]
    General,
    Assignment,
    Customer,
    Ticket,
}

impl ModalTab {
    pub const ALL: [ModalTab; 4] = [
        ModalTab::General,
        ModalTab::Assignment,
        ModalTab::Customer,
        ModalTab::Ticket,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Assignment => "assignment",
            Self::Customer => "customer",
            Self::Ticket => "ticket",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Assignment => "Assignment",
            Self::Customer => "Customer",
            Self::Ticket => "Ticket",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == value.trim())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DetailValue {
    Text { text: String, monospace: bool },
    Badge { status: Option<String>, kind: StatusKind },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailItem {
    pub label: &'static str,
    pub value: DetailValue,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailSection {
    pub title: &'static str,
    pub items: Vec<DetailItem>,
}

/// Contents of the detail modal for one device.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModalView {
    pub device_id: String,
    pub panels: Vec<(ModalTab, Vec<DetailSection>)>,
}

fn text(label: &'static str, text: String) -> DetailItem {
    DetailItem {
        label,
        value: DetailValue::Text {
            text,
            monospace: false,
        },
    }
}

fn mono(label: &'static str, text: String) -> DetailItem {
    DetailItem {
        label,
        value: DetailValue::Text {
            text,
            monospace: true,
        },
    }
}

fn badge(label: &'static str, device: &Device, field: &str, kind: StatusKind) -> DetailItem {
    DetailItem {
        label,
        value: DetailValue::Badge {
            status: device.field(field).map(|s| s.into_owned()),
            kind,
        },
    }
}

fn date_or_na(device: &Device, field: &str) -> String {
    match device.present(field) {
        Some(raw) => format_date(Some(raw.as_ref())),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn general(device: &Device) -> Vec<DetailSection> {
    vec![
        DetailSection {
            title: "Device Information",
            items: vec![
                mono("Device ID", device.text(model::DEVICE_ID)),
                mono("Serial Number", device.text(model::DEVICE_SERIAL_NO)),
                text("Model/Make", device.text(model::MODEL_MAKE)),
                text("Category", device.text(model::CATEGORY)),
            ],
        },
        DetailSection {
            title: "Location Information",
            items: vec![
                text("Location Name", device.text(model::LOCATION_NAME)),
                text("State/City", device.text(model::STATE_CITY)),
                text(
                    "Movement Path",
                    device.text_or(model::FROM_WHTO_LOCATOR, NOT_AVAILABLE),
                ),
                text(
                    "Movement Date",
                    format_date(device.field(model::LOCATION_MOVEMENT_DATE).as_deref()),
                ),
            ],
        },
        DetailSection {
            title: "Status Information",
            items: vec![
                badge(
                    "Acceptance Status",
                    device,
                    model::ACCEPTANCE_STATUS,
                    StatusKind::Acceptance,
                ),
                badge(
                    "Allocation Status",
                    device,
                    model::DEVICE_ALLOCATION_STATUS,
                    StatusKind::Allocation,
                ),
                text("Flow Type", device.text(model::FLOW_TYPE)),
            ],
        },
    ]
}

fn assignment(device: &Device) -> Vec<DetailSection> {
    let tier = |title: &'static str, account: &str, name: &str, date: &str, app: &str| DetailSection {
        title,
        items: vec![
            mono("Account Number", device.text_or(account, NOT_AVAILABLE)),
            text("Name", device.text_or(name, NOT_ASSIGNED)),
            text("Acceptance Date", date_or_na(device, date)),
            text("Acceptance App", device.text_or(app, NOT_AVAILABLE)),
        ],
    };
    vec![
        tier(
            "L1 Assignment",
            model::L1_ACCOUNT_NO,
            model::L1_NAME,
            model::DATE_OF_L1_ACCEPTANCE,
            model::L1_ACCEPTANCE_APP,
        ),
        tier(
            "L2 Assignment",
            model::L2_ACCOUNT_NO,
            model::L2_NAME,
            model::DATE_OF_L2_ACCEPTANCE,
            model::L2_ACCEPTANCE_APP,
        ),
        DetailSection {
            title: "Engineer Assignment",
            items: vec![
                mono(
                    "Account Number",
                    device.text_or(model::ENGG_ACCOUNT_NO, NOT_AVAILABLE),
                ),
                text("Name", device.text_or(model::ENGG_NAME, NOT_ASSIGNED)),
                text(
                    "Assignment Date",
                    date_or_na(device, model::L1_ASSIGNED_TO_ENGG),
                ),
                text(
                    "Acceptance Date",
                    date_or_na(device, model::DATE_OF_ENGG_ACCEPTANCE),
                ),
            ],
        },
    ]
}

fn customer(device: &Device) -> Vec<DetailSection> {
    let contact = format!(
        "{} {}",
        device.text(model::LOCATION_FIRST_NAME),
        device.text(model::LOCATION_LAST_NAME)
    );
    vec![DetailSection {
        title: "Customer Information",
        items: vec![
            mono(
                "Account Number",
                device.text_or(model::CUSTOMER_ACCOUNT_NO, NOT_AVAILABLE),
            ),
            text("Name", device.text_or(model::CUSTOMER_NAME, NOT_ASSIGNED)),
            text(
                "Allocation Date",
                date_or_na(device, model::DATE_OF_CUSTOMER_ALLOCATION),
            ),
            text(
                "Current Location User",
                device.text_or(model::CURRENT_LOCATION_USER_ID, NOT_AVAILABLE),
            ),
            text("Location Contact", contact.trim().to_string()),
        ],
    }]
}

fn ticket(device: &Device) -> Vec<DetailSection> {
    vec![DetailSection {
        title: "Ticket Information",
        items: vec![
            mono("Ticket Number", device.text_or(model::TICKET_NO, NOT_AVAILABLE)),
            text("Type", device.text_or(model::TYPE_OF_TICKET, NOT_AVAILABLE)),
            text(
                "Date",
                format_date(device.field(model::TICKET_DATE).as_deref()),
            ),
            text("Status", device.text_or(model::TICKET_STATUS, NOT_AVAILABLE)),
        ],
    }]
}

impl ModalView {
    pub fn from_device(device: &Device) -> Self {
        Self {
            device_id: device.text(model::DEVICE_ID),
            panels: vec![
                (ModalTab::General, general(device)),
                (ModalTab::Assignment, assignment(device)),
                (ModalTab::Customer, customer(device)),
                (ModalTab::Ticket, ticket(device)),
            ],
        }
    }

    pub fn title(&self) -> String {
        format!("Device: {}", self.device_id)
    }

    pub fn panel(&self, tab: ModalTab) -> &[DetailSection] {
        self.panels
            .iter()
            .find(|(t, _)| *t == tab)
            .map(|(_, sections)| sections.as_slice())
            .unwrap_or(&[])
    }
}

pub fn render_panel(sections: &[DetailSection]) -> String {
    let mut out = String::new();
    for section in sections {
        out.push_str("<div class=\"detail-section\">\n");
        out.push_str(&format!("  <h3>{}</h3>\n", section.title));
        out.push_str("  <div class=\"detail-grid\">\n");
        for item in &section.items {
            let value = match &item.value {
                DetailValue::Text { text, monospace } => format!(
                    "<div class=\"detail-value{}\">{}</div>",
                    if *monospace { " monospace" } else { "" },
                    escape_html(text)
                ),
                DetailValue::Badge { status, kind } => format!(
                    "<div class=\"detail-value\">{}</div>",
                    status_badge(status.as_deref(), *kind)
                ),
            };
            out.push_str(&format!(
                "    <div class=\"detail-item\"><div class=\"detail-label\">{}</div>{value}</div>\n",
                item.label
            ));
        }
        out.push_str("  </div>\n</div>\n");
    }
    out
}
