use crate::cli::args::CliArgs;
use crate::model::is_sortable_field;
use crate::output::OutputFormat;
use crate::state::ViewMode;
use crate::view::modal::ModalTab;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(pages) = args.pages {
        if pages == 0 {
            return Err("invalid --pages, expected positive integer".to_string());
        }
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid --timeout, expected positive integer".to_string());
        }
    }
    if let Some(raw) = args.view.as_deref() {
        if ViewMode::parse(raw).is_none() {
            return Err(format!("invalid --view '{raw}', expected table or card"));
        }
    }
    if let Some(raw) = args.sort.as_deref() {
        if !is_sortable_field(raw.trim()) {
            return Err(format!("invalid --sort '{raw}', not a sortable column"));
        }
    }
    if let Some(raw) = args.output_format.as_deref() {
        if OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --output-format '{raw}', expected text, json, html or csv"
            ));
        }
    }
    if let Some(raw) = args.tab.as_deref() {
        if ModalTab::parse(raw).is_none() {
            return Err(format!(
                "invalid --tab '{raw}', expected general, assignment, customer or ticket"
            ));
        }
    }
    if let Some(raw) = args.base_url.as_deref() {
        let url = reqwest::Url::parse(raw.trim())
            .map_err(|e| format!("invalid --base-url '{raw}': {e}"))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!("invalid --base-url '{raw}', expected http or https"));
        }
    }
    Ok(())
}
