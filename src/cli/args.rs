use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "cpeboard",
    version,
    about = "CPE device inventory dashboard client",
    long_about = "cpeboard loads the CPE device inventory from the dashboard backend, applies filters, search and sorting the way the web dashboard does, and renders the result.\n\nExamples:\n  cpeboard --base-url http://10.0.0.5:5001\n  cpeboard --allocation-status FAULTY --sort DEVICE_ID --desc\n  cpeboard --search zte --all -o devices.html\n  cpeboard --export ./exports\n\nTip: Use --config to persist the backend URL and default filters."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "color",
        visible_alias = "clr",
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        long = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the listing to a file (format inferred from extension)."
    )]
    pub output: Option<String>,

    #[arg(
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format: text, json, html or csv."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 'e',
        long = "export",
        value_name = "DIR",
        help_heading = "Output",
        help = "Export loaded devices to cpe_devices_<date>.csv in DIR."
    )]
    pub export: Option<String>,

    #[arg(
        long = "view",
        value_name = "MODE",
        help_heading = "Output",
        help = "Device view: table or card."
    )]
    pub view: Option<String>,

    #[arg(
        short = 'C',
        long = "config",
        visible_alias = "cfg",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.cpeboard/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "init-config",
        help_heading = "Input",
        help = "Write a default config to ~/.cpeboard/config.yml if none exists, then exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 'u',
        long = "base-url",
        visible_alias = "url",
        value_name = "URL",
        help_heading = "HTTP",
        help = "Dashboard backend base URL."
    )]
    pub base_url: Option<String>,

    #[arg(
        long = "timeout",
        value_name = "SECONDS",
        help_heading = "HTTP",
        help = "Request timeout in seconds."
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = 's',
        long = "search",
        value_name = "TEXT",
        help_heading = "Filters",
        help = "Free-text search."
    )]
    pub search: Option<String>,

    #[arg(long = "category", value_name = "VALUE", help_heading = "Filters")]
    pub category: Option<String>,

    #[arg(long = "acceptance-status", value_name = "VALUE", help_heading = "Filters")]
    pub acceptance_status: Option<String>,

    #[arg(
        long = "allocation-status",
        value_name = "VALUE",
        help_heading = "Filters",
        help = "Allocation status, e.g. ALLOCATED, GOOD, REPAIRING, FAULTY, REPAIRED."
    )]
    pub allocation_status: Option<String>,

    #[arg(long = "state-city", value_name = "VALUE", help_heading = "Filters")]
    pub state_city: Option<String>,

    #[arg(long = "flow-type", value_name = "VALUE", help_heading = "Filters")]
    pub flow_type: Option<String>,

    #[arg(long = "ticket-type", value_name = "VALUE", help_heading = "Filters")]
    pub ticket_type: Option<String>,

    #[arg(
        long = "sort",
        value_name = "FIELD",
        help_heading = "Listing",
        help = "Sort column (e.g. DEVICE_ID, CUSTOMER_NAME)."
    )]
    pub sort: Option<String>,

    #[arg(
        long = "desc",
        help_heading = "Listing",
        help = "Sort descending."
    )]
    pub desc: bool,

    #[arg(
        short = 'p',
        long = "pages",
        value_name = "N",
        help_heading = "Listing",
        help = "Number of pages of 50 devices to load."
    )]
    pub pages: Option<usize>,

    #[arg(
        short = 'a',
        long = "all",
        help_heading = "Listing",
        help = "Keep loading pages until the backend runs out."
    )]
    pub all: bool,

    #[arg(
        short = 'd',
        long = "device",
        value_name = "ID",
        help_heading = "Listing",
        help = "Show the detail view of one loaded device."
    )]
    pub device: Option<String>,

    #[arg(
        long = "tab",
        value_name = "TAB",
        requires = "device",
        help_heading = "Listing",
        help = "Detail tab: general, assignment, customer or ticket."
    )]
    pub tab: Option<String>,
}
