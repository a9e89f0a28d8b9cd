use std::path::PathBuf;
use std::time::Duration;

use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::time::Instant;

use crate::api::{Backend, HttpBackend};
use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECONDS};
use crate::controller::DeviceListController;
use crate::document::Document;
use crate::model::{FilterDimension, SummaryCard};
use crate::output::{self, OutputFormat};
use crate::state::{
    DashboardState, FilterSelection, NotificationKind, SortDirection, SortState, ViewMode,
};
use crate::view::modal::{DetailValue, ModalTab, ModalView};
use crate::view::NOT_AVAILABLE;

fn print_banner() {
    const BANNER: &str = r#"
                    __                         __
  _________  ___   / /_  ____  ____ __________/ /
 / ___/ __ \/ _ \ / __ \/ __ \/ __ `/ ___/ __  /
/ /__/ /_/ /  __// /_/ / /_/ / /_/ / /  / /_/ /
\___/ .___/\___//_.___/\____/\__,_/_/   \__,_/
   /_/
          CPE device inventory dashboard
    "#;
    eprint!("{}", BANNER);
    eprintln!();
}

fn format_kv_line(label: &str, value: &str) {
    eprintln!(":: {:<10}: {}", label, value);
}

fn format_opt_value<'a>(v: &'a str, default: &'a str) -> &'a str {
    if v.trim().is_empty() {
        default
    } else {
        v
    }
}

fn summarize_filters(filters: &FilterSelection) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    if !filters.search.trim().is_empty() {
        parts.push(format!("search={}", filters.search.trim()));
    }
    for dimension in FilterDimension::ALL {
        let value = filters.get(dimension);
        if !value.trim().is_empty() {
            parts.push(format!("{}={}", dimension.query_key(), value.trim()));
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

#[derive(Clone, Debug)]
struct RunConfig {
    base_url: String,
    timeout: u64,
    view: ViewMode,
    pages: usize,
    all_pages: bool,
    output: Option<String>,
    output_format: Option<OutputFormat>,
    export_dir: Option<PathBuf>,
    no_color: bool,
    filters: FilterSelection,
    sort: SortState,
    device: Option<String>,
    tab: ModalTab,
}

fn pick(cli: Option<String>, cfg: Option<String>) -> String {
    cli.or(cfg).unwrap_or_default()
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };

    let base_url = args
        .base_url
        .or(cfg.base_url)
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let timeout = args
        .timeout
        .or(cfg.timeout)
        .unwrap_or(DEFAULT_TIMEOUT_SECONDS);

    let view_raw = args.view.or(cfg.view).unwrap_or_else(|| "table".to_string());
    let view = ViewMode::parse(&view_raw)
        .ok_or_else(|| format!("invalid view '{view_raw}', expected table or card"))?;

    let pages = args.pages.or(cfg.pages).unwrap_or(1);
    if pages == 0 {
        return Err("invalid pages, expected positive integer".to_string());
    }
    let all_pages = args.all || cfg.all_pages.unwrap_or(false);

    let output_format = match args.output_format.or(cfg.output_format) {
        Some(raw) => Some(
            OutputFormat::parse(&raw)
                .ok_or_else(|| format!("invalid output format '{raw}'"))?,
        ),
        None => None,
    };
    let output = args
        .output
        .or(cfg.output)
        .map(|p| config::expand_tilde(&p).to_string_lossy().to_string());
    let export_dir = args
        .export
        .or(cfg.export_dir)
        .map(|p| config::expand_tilde(&p));

    let filters = FilterSelection {
        search: pick(args.search, cfg.search),
        category: pick(args.category, cfg.category),
        acceptance_status: pick(args.acceptance_status, cfg.acceptance_status),
        allocation_status: pick(args.allocation_status, cfg.allocation_status),
        state_city: pick(args.state_city, cfg.state_city),
        flow_type: pick(args.flow_type, cfg.flow_type),
        ticket_type: pick(args.ticket_type, cfg.ticket_type),
    };

    let sort = match args.sort.or(cfg.sort) {
        Some(field) => {
            let field = field.trim().to_string();
            if !crate::model::is_sortable_field(&field) {
                return Err(format!("invalid sort column '{field}'"));
            }
            let descending = args.desc
                || cfg
                    .sort_order
                    .as_deref()
                    .map(|o| o.trim().eq_ignore_ascii_case("desc"))
                    .unwrap_or(false);
            let direction = if descending {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
            SortState::new(field, direction)
        }
        None => SortState::default(),
    };

    let tab = args
        .tab
        .as_deref()
        .and_then(ModalTab::parse)
        .unwrap_or_default();

    Ok(RunConfig {
        base_url,
        timeout,
        view,
        pages,
        all_pages,
        output,
        output_format,
        export_dir,
        no_color,
        filters,
        sort,
        device: args.device,
        tab,
    })
}

fn print_detail(view: &ModalView, tab: ModalTab) {
    println!("{}", view.title().bold());
    println!("[{}]", tab.label());
    for section in view.panel(tab) {
        println!();
        println!("  {}", section.title.bold());
        for item in &section.items {
            let value = match &item.value {
                DetailValue::Text { text, .. } => text.clone(),
                DetailValue::Badge { status, .. } => status
                    .clone()
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            };
            println!("  {:<22} {}", format!("{}:", item.label), value);
        }
    }
}

/// Loads the first page and then follows "load more" until the page budget
/// or the data runs out.
async fn load_pages<B: Backend>(
    controller: &mut DeviceListController<B>,
    run: &RunConfig,
    pb: &ProgressBar,
) {
    controller.start().await;
    let mut pages_loaded = 1;
    while (run.all_pages || pages_loaded < run.pages) && controller.state().has_more() {
        let before = controller.state().devices().len();
        pb.set_message(format!(
            "loading page {} ({} devices so far)",
            controller.state().page() + 1,
            before
        ));
        controller.load_more_devices().await;
        if controller.state().devices().len() == before {
            break;
        }
        pages_loaded += 1;
    }
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    print_banner();

    let backend = HttpBackend::new(&run.base_url, run.timeout).map_err(|e| e.to_string())?;
    format_kv_line("Backend", backend.base().as_str());
    format_kv_line(
        "Filters",
        &summarize_filters(&run.filters).unwrap_or_else(|| "none".to_string()),
    );
    let sort_label = match run.sort.field() {
        Some(field) => format!("{} {}", field, run.sort.direction().as_param()),
        None => "default".to_string(),
    };
    format_kv_line("Sort", &sort_label);
    format_kv_line("View", run.view.as_str());
    let pages_label = if run.all_pages {
        "all".to_string()
    } else {
        run.pages.to_string()
    };
    format_kv_line("Pages", &pages_label);
    eprintln!();

    let state = DashboardState::new(run.filters.clone(), run.sort.clone()).with_view(run.view);
    let mut controller = DeviceListController::new(backend, Document::new()).with_state(state);

    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_style(
        ProgressStyle::with_template(":: {spinner} {msg} [{elapsed_precise}]")
            .map_err(|e| format!("failed to build progress style: {e}"))?,
    );
    pb.set_message("loading devices");

    let now = Instant::now();
    load_pages(&mut controller, &run, &pb).await;
    pb.finish_and_clear();

    for n in &controller.document().notifications {
        match n.kind {
            NotificationKind::Error => eprintln!(":: {}", n.message.red()),
            _ => eprintln!(":: {}", n.message.green()),
        }
    }

    let stats = controller.document().stats;
    let counts: Vec<String> = SummaryCard::ALL
        .iter()
        .map(|c| format!("{} {}", c.label(), c.count(&stats)))
        .collect();
    format_kv_line("Stats", &counts.join(" | "));
    let loaded = controller.state().devices().len();
    let more = if controller.state().has_more() {
        " (more available)".yellow().to_string()
    } else {
        String::new()
    };
    format_kv_line("Loaded", &format!("{loaded} devices{more}"));

    if let Some(id) = run.device.as_deref() {
        if controller.show_device_modal(id) {
            controller.switch_tab(run.tab);
            if let Some(view) = controller.document().modal.as_ref() {
                print_detail(view, run.tab);
            }
        } else {
            eprintln!(
                ":: {}",
                format!("device '{id}' is not among the loaded devices").yellow()
            );
        }
    }

    match run.output.as_deref() {
        Some(path) => {
            let format = run
                .output_format
                .or_else(|| output::infer_format_from_path(path))
                .unwrap_or(OutputFormat::Text);
            let bytes = output::render(format, controller.state().devices(), controller.document());
            tokio::fs::write(path, bytes)
                .await
                .map_err(|e| format!("failed to write output '{path}': {e}"))?;
            format_kv_line("Output", format_opt_value(path, "-"));
        }
        None if run.device.is_none() => {
            let format = run.output_format.unwrap_or(OutputFormat::Text);
            let bytes = output::render(format, controller.state().devices(), controller.document());
            print!("{}", String::from_utf8_lossy(&bytes));
        }
        None => {}
    }

    if let Some(dir) = run.export_dir.as_deref() {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| format!("failed to create export directory '{}': {e}", dir.display()))?;
        let today = chrono::Local::now().date_naive();
        let path = controller
            .export_csv(dir, today)
            .await
            .map_err(|e| format!("failed to export csv: {e}"))?;
        format_kv_line("Export", &path.display().to_string());
    }

    eprintln!(
        ":: Completed :: took {}ms ::",
        now.elapsed().as_millis()
    );
    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                print!("{}", CliArgs::command().render_long_help());
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                print!("{}", CliArgs::command().render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    if args.init_config {
        let path = config::default_config_path()
            .ok_or_else(|| "cannot determine home directory".to_string())?;
        config::ensure_default_config_file(&path)?;
        println!("{}", path.display());
        return Ok(());
    }

    let cfg = match args.config.as_deref() {
        Some(p) => config::load_config(&config::expand_tilde(p), false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let verbose = args.verbose;
    let run = build_run_config(args, cfg)?;
    crate::logging::init(verbose, !run.no_color);

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))?;
    Ok(())
}
