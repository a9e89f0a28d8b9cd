use chrono::NaiveDate;

use crate::model::{self, Device};
use crate::view::date_text;

pub const CSV_HEADERS: [&str; 29] = [
    "Device ID",
    "Serial No",
    "Model/Make",
    "Category",
    "Location Name",
    "State/City",
    "Movement Date",
    "L1 Account",
    "L1 Name",
    "L1 Acceptance Date",
    "L1 Acceptance App",
    "L2 Account",
    "L2 Name",
    "L2 Acceptance Date",
    "L2 Acceptance App",
    "Engg Account",
    "Engg Name",
    "Engg Assignment Date",
    "Engg Acceptance Date",
    "Acceptance Status",
    "Flow Type",
    "Ticket No",
    "Ticket Date",
    "Ticket Type",
    "Ticket Status",
    "Customer Account",
    "Customer Name",
    "Customer Allocation Date",
    "Allocation Status",
];

enum Column {
    Text(&'static str),
    Date(&'static str),
}

const COLUMNS: [Column; 29] = [
    Column::Text(model::DEVICE_ID),
    Column::Text(model::DEVICE_SERIAL_NO),
    Column::Text(model::MODEL_MAKE),
    Column::Text(model::CATEGORY),
    Column::Text(model::LOCATION_NAME),
    Column::Text(model::STATE_CITY),
    Column::Date(model::LOCATION_MOVEMENT_DATE),
    Column::Text(model::L1_ACCOUNT_NO),
    Column::Text(model::L1_NAME),
    Column::Date(model::DATE_OF_L1_ACCEPTANCE),
    Column::Text(model::L1_ACCEPTANCE_APP),
    Column::Text(model::L2_ACCOUNT_NO),
    Column::Text(model::L2_NAME),
    Column::Date(model::DATE_OF_L2_ACCEPTANCE),
    Column::Text(model::L2_ACCEPTANCE_APP),
    Column::Text(model::ENGG_ACCOUNT_NO),
    Column::Text(model::ENGG_NAME),
    Column::Date(model::L1_ASSIGNED_TO_ENGG),
    Column::Date(model::DATE_OF_ENGG_ACCEPTANCE),
    Column::Text(model::ACCEPTANCE_STATUS),
    Column::Text(model::FLOW_TYPE),
    Column::Text(model::TICKET_NO),
    Column::Date(model::TICKET_DATE),
    Column::Text(model::TYPE_OF_TICKET),
    Column::Text(model::TICKET_STATUS),
    Column::Text(model::CUSTOMER_ACCOUNT_NO),
    Column::Text(model::CUSTOMER_NAME),
    Column::Date(model::DATE_OF_CUSTOMER_ALLOCATION),
    Column::Text(model::DEVICE_ALLOCATION_STATUS),
];

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Missing or null fields, and dates that do not parse, export as `""`.
fn cell(device: &Device, column: &Column) -> String {
    let value = match column {
        Column::Text(name) => device.text(name),
        Column::Date(name) => date_text(device.field(name).as_deref()).unwrap_or_default(),
    };
    quote(&value)
}

pub fn render_csv(devices: &[Device]) -> String {
    let mut lines = Vec::with_capacity(devices.len() + 1);
    lines.push(CSV_HEADERS.join(","));
    for device in devices {
        let row: Vec<String> = COLUMNS.iter().map(|c| cell(device, c)).collect();
        lines.push(row.join(","));
    }
    lines.join("\n")
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("cpe_devices_{}.csv", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(json: &str) -> Device {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn header_plus_one_line_per_device() {
        let devices = vec![
            device(r#"{"DEVICE_ID": "A1", "TICKET_DATE": "2024-02-29"}"#),
            device(r#"{"DEVICE_ID": "A2", "L1_NAME": null}"#),
            device(r#"{"DEVICE_ID": 3}"#),
        ];
        let csv = render_csv(&devices);
        let lines: Vec<&str> = csv.split('\n').collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].split(',').count(), 29);
        for line in &lines[1..] {
            let fields: Vec<&str> = line.split(',').collect();
            assert_eq!(fields.len(), 29);
            assert!(fields.iter().all(|f| f.starts_with('"') && f.ends_with('"')));
        }
        assert!(lines[1].starts_with(r#""A1","""#));
        assert!(lines[1].contains(r#""29/02/2024""#));
        assert!(lines[3].starts_with(r#""3","#));
    }

    #[test]
    fn missing_values_export_empty() {
        let csv = render_csv(&[device(r#"{"DEVICE_ID": "A1"}"#)]);
        let row = csv.lines().nth(1).unwrap();
        assert!(!row.contains("undefined"));
        assert!(!row.contains("N/A"));
        assert_eq!(row.matches(r#""""#).count(), 28);
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let csv = render_csv(&[device(r#"{"DEVICE_ID": "A1", "CUSTOMER_NAME": "Sri \"Ram\" Stores"}"#)]);
        assert!(csv.contains(r#""Sri ""Ram"" Stores""#));
    }

    #[test]
    fn file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 9).unwrap();
        assert_eq!(export_file_name(date), "cpe_devices_2024-07-09.csv");
    }

    #[test]
    fn empty_list_is_header_only() {
        let csv = render_csv(&[]);
        assert_eq!(csv, CSV_HEADERS.join(","));
    }
}
