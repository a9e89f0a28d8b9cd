pub mod csv;
pub mod report;

use serde::Serialize;

use crate::document::Document;
use crate::model::{self, DashboardStats, Device};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
    Csv,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".csv") {
        return Some(OutputFormat::Csv);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

#[derive(Serialize)]
struct JsonSnapshot<'a> {
    stats: &'a DashboardStats,
    count: usize,
    devices: &'a [Device],
}

/// One tab-separated line per device: id, location, allocation status, ticket.
pub fn render_text(devices: &[Device]) -> Vec<u8> {
    let mut out = String::new();
    for d in devices {
        let line = [
            model::DEVICE_ID,
            model::LOCATION_NAME,
            model::DEVICE_ALLOCATION_STATUS,
            model::TICKET_NO,
        ]
        .iter()
        .map(|f| d.text(f))
        .collect::<Vec<_>>()
        .join("\t");
        out.push_str(&line);
        out.push('\n');
    }
    out.into_bytes()
}

pub fn render_json(devices: &[Device], stats: &DashboardStats) -> Vec<u8> {
    let snapshot = JsonSnapshot {
        stats,
        count: devices.len(),
        devices,
    };
    serde_json::to_vec_pretty(&snapshot).unwrap_or_else(|_| b"{}\n".to_vec())
}

pub fn render_html(document: &Document, devices: &[Device]) -> Vec<u8> {
    report::render_html(document, devices)
}

pub fn render(format: OutputFormat, devices: &[Device], document: &Document) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_text(devices),
        OutputFormat::Json => render_json(devices, &document.stats),
        OutputFormat::Html => render_html(document, devices),
        OutputFormat::Csv => csv::render_csv(devices).into_bytes(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_names_and_extensions() {
        assert_eq!(OutputFormat::parse(" CSV "), Some(OutputFormat::Csv));
        assert_eq!(OutputFormat::parse("htm"), Some(OutputFormat::Html));
        assert_eq!(OutputFormat::parse("xml"), None);
        assert_eq!(infer_format_from_path("out/devices.JSON"), Some(OutputFormat::Json));
        assert_eq!(infer_format_from_path("report.html"), Some(OutputFormat::Html));
        assert_eq!(infer_format_from_path("devices"), None);
    }

    #[test]
    fn text_lines_leave_missing_fields_blank() {
        let devices: Vec<Device> = serde_json::from_str(
            r#"[{"DEVICE_ID": "A1", "LOCATION_NAME": "Kochi", "TICKET_NO": null}]"#,
        )
        .unwrap();
        let text = String::from_utf8(render_text(&devices)).unwrap();
        assert_eq!(text, "A1\tKochi\t\t\n");
    }

    #[test]
    fn json_snapshot_carries_stats_and_raw_records() {
        let devices: Vec<Device> =
            serde_json::from_str(r#"[{"DEVICE_ID": "A1", "EXTRA": 5}]"#).unwrap();
        let stats = DashboardStats {
            total_devices: 9,
            ..Default::default()
        };
        let value: serde_json::Value =
            serde_json::from_slice(&render_json(&devices, &stats)).unwrap();
        assert_eq!(value["count"], 1);
        assert_eq!(value["stats"]["total_devices"], 9);
        assert_eq!(value["devices"][0]["EXTRA"], 5);
    }
}
