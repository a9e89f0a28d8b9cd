//! Standalone HTML snapshot of the dashboard.
//!
//! Everything is rendered up front from the [`Document`]; the small inline
//! script only toggles visibility (view switch, modal tabs, filter panel).
//! Both device views are filled so the view switch works offline.

use crate::document::{Document, FilterControl};
use crate::model::{Device, SummaryCard};
use crate::state::ViewMode;
use crate::view::modal::{render_panel, ModalTab, ModalView};
use crate::view::{escape_html, render_cards, render_table, render_table_header};

fn hidden_unless(visible: bool) -> &'static str {
    if visible {
        ""
    } else {
        " hidden"
    }
}

fn render_summary_cards(document: &Document) -> String {
    let mut out = String::new();
    for card in SummaryCard::ALL {
        out.push_str(&format!(
            r#"        <div class="summary-card bg-white dark:bg-slate-900 rounded-2xl border border-slate-200 dark:border-slate-800 p-5 shadow-sm" data-allocation-filter="{}">
          <p class="text-xs font-bold text-slate-500 uppercase tracking-widest">{}</p>
          <p id="{}" class="text-3xl font-display mt-2">{}</p>
        </div>
"#,
            card.allocation_filter(),
            card.label(),
            card.element_id(),
            card.count(&document.stats)
        ));
    }
    out
}

fn render_filter_control(control: &FilterControl) -> String {
    let mut options = format!(
        "            <option value=\"\"{}>All</option>\n",
        if control.selected.is_empty() {
            " selected"
        } else {
            ""
        }
    );
    for value in &control.options {
        let selected = if *value == control.selected {
            " selected"
        } else {
            ""
        };
        options.push_str(&format!(
            "            <option value=\"{0}\"{selected}>{0}</option>\n",
            escape_html(value)
        ));
    }
    format!(
        r#"        <label class="block mb-4">
          <span class="text-xs font-bold text-slate-500 uppercase tracking-widest">{label}</span>
          <select id="{id}" class="w-full mt-1 bg-slate-50 dark:bg-slate-800/50 border border-slate-200 dark:border-slate-700 rounded-xl text-xs font-bold px-4 py-3">
{options}          </select>
        </label>
"#,
        label = control.dimension.label(),
        id = control.dimension.control_id(),
    )
}

fn render_modal(document: &Document, modal: &ModalView) -> String {
    let mut tabs = String::new();
    let mut panels = String::new();
    for tab in ModalTab::ALL {
        let active = tab == document.active_tab;
        tabs.push_str(&format!(
            "          <button class=\"tab-btn{}\" data-tab=\"{}\" type=\"button\">{}</button>\n",
            if active { " active" } else { "" },
            tab.id(),
            tab.label()
        ));
        panels.push_str(&format!(
            "        <div class=\"tab-panel{}\" id=\"{}-tab\">\n{}        </div>\n",
            hidden_unless(active),
            tab.id(),
            render_panel(modal.panel(tab))
        ));
    }
    format!(
        r#"  <div id="device-modal" class="modal fixed inset-0 z-50 flex items-center justify-center{hidden}">
    <div class="modal-content bg-white dark:bg-slate-900 rounded-2xl max-w-3xl w-full p-8">
      <div class="flex items-center justify-between mb-6">
        <h2 id="modal-title">{title}</h2>
        <button id="modal-close" type="button">&times;</button>
      </div>
      <div class="modal-tabs flex gap-2 mb-6">
{tabs}      </div>
{panels}    </div>
  </div>
"#,
        hidden = hidden_unless(document.modal_visible),
        title = escape_html(&modal.title()),
    )
}

fn render_notifications(document: &Document) -> String {
    document
        .notifications
        .iter()
        .map(|n| {
            format!(
                "    <div class=\"notification notification-{}\">{}</div>\n",
                n.kind.as_str(),
                escape_html(&n.message)
            )
        })
        .collect()
}

fn view_button(view: ViewMode, active: ViewMode, label: &str) -> String {
    format!(
        r#"<button class="view-btn{}" data-view="{}" type="button">{label}</button>"#,
        if view == active { " active" } else { "" },
        view.as_str()
    )
}

pub fn render_html(document: &Document, devices: &[Device]) -> Vec<u8> {
    let summary = render_summary_cards(document);
    let filters: String = document
        .filter_controls
        .iter()
        .map(render_filter_control)
        .collect();
    let header = render_table_header(&document.sort_indicators);
    let modal = document
        .modal
        .as_ref()
        .map(|m| render_modal(document, m))
        .unwrap_or_default();
    let notifications = render_notifications(document);
    let table_button = view_button(ViewMode::Table, document.active_view, "TABLE");
    let card_button = view_button(ViewMode::Card, document.active_view, "CARDS");

    let html = format!(
        r####"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>CPE Device Dashboard</title>
  <script src="https://cdn.tailwindcss.com?plugins=forms"></script>
  <link href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.4.0/css/all.min.css" rel="stylesheet"/>
  <style>
    .hidden {{ display: none; }}
    .sort-icon.active {{ color: #135bec; }}
    .status-badge {{ padding: 2px 8px; border-radius: 9999px; font-size: 11px; font-weight: 700; }}
    .status-accepted {{ background: #d1fae5; color: #047857; }}
    .status-pending {{ background: #fef3c7; color: #b45309; }}
    .status-in-progress {{ background: #dbeafe; color: #1d4ed8; }}
    .status-rejected {{ background: #ffe4e6; color: #be123c; }}
    .status-allocated {{ background: #ede9fe; color: #6d28d9; }}
    .status-available {{ background: #f1f5f9; color: #334155; }}
    .monospace {{ font-family: ui-monospace, monospace; }}
  </style>
</head>
<body class="bg-slate-50 text-slate-900 min-h-screen">
  <header class="flex items-center justify-between border-b border-slate-200 bg-white px-8 py-4">
    <h1 class="text-xl font-bold uppercase tracking-tight">CPE Device Dashboard</h1>
    <div class="flex items-center gap-3">
      <input id="search-input" type="text" placeholder="Search devices..." value="{search}"/>
      <button id="filter-toggle" type="button"><i class="fas fa-filter"></i> Filters</button>
      {table_button}
      {card_button}
    </div>
  </header>

  <div id="notifications" class="fixed top-4 right-4 z-50">
{notifications}  </div>

  <div id="overlay" class="overlay fixed inset-0 bg-black/40{overlay_hidden}"></div>

  <aside id="filter-sidebar" class="filter-sidebar fixed top-0 left-0 h-full w-80 bg-white p-6 z-40{filters_hidden}">
    <div class="flex items-center justify-between mb-6">
      <h2 class="font-bold">Filters</h2>
      <button id="filter-close" type="button">&times;</button>
    </div>
{filters}    <button id="clear-filters" type="button">Clear All</button>
  </aside>

  <main class="max-w-[1440px] mx-auto w-full px-8 py-10">
    <section class="grid grid-cols-2 md:grid-cols-3 xl:grid-cols-6 gap-4 mb-8">
{summary}    </section>

    <div id="loading" class="text-center py-10{loading_hidden}"><i class="fas fa-spinner fa-spin"></i> Loading devices...</div>

    <div id="table-view" class="overflow-x-auto bg-white rounded-2xl border border-slate-200{table_hidden}">
      <table class="device-table w-full text-left">
        <thead>
{header}        </thead>
        <tbody id="devices-table-body">
{table_body}        </tbody>
      </table>
    </div>

    <div id="card-view" class="grid grid-cols-1 md:grid-cols-2 xl:grid-cols-3 gap-5{cards_hidden}">
{cards_body}    </div>

    <div id="no-results" class="text-center py-16{empty_hidden}">
      <i class="fas fa-search"></i>
      <p>No devices found</p>
    </div>

    <div class="text-center mt-6">
      <button id="load-more" class="load-more-btn{load_more_hidden}" type="button">Load More</button>
    </div>
  </main>

{modal}
  <script>
    (function() {{
      function toggle(id, on) {{
        const el = document.getElementById(id);
        if (el) el.classList.toggle('hidden', !on);
      }}
      document.querySelectorAll('.tab-btn').forEach(function(btn) {{
        btn.addEventListener('click', function() {{
          document.querySelectorAll('.tab-btn').forEach(function(b) {{ b.classList.remove('active'); }});
          document.querySelectorAll('.tab-panel').forEach(function(p) {{ p.classList.add('hidden'); }});
          btn.classList.add('active');
          toggle(btn.dataset.tab + '-tab', true);
        }});
      }});
      document.querySelectorAll('.view-btn').forEach(function(btn) {{
        btn.addEventListener('click', function() {{
          document.querySelectorAll('.view-btn').forEach(function(b) {{ b.classList.remove('active'); }});
          btn.classList.add('active');
          toggle('table-view', btn.dataset.view === 'table');
          toggle('card-view', btn.dataset.view === 'card');
        }});
      }});
      function closeAll() {{
        toggle('filter-sidebar', false);
        toggle('device-modal', false);
        toggle('overlay', false);
      }}
      const filterToggle = document.getElementById('filter-toggle');
      if (filterToggle) filterToggle.addEventListener('click', function() {{
        toggle('filter-sidebar', true);
        toggle('overlay', true);
      }});
      ['filter-close', 'modal-close', 'overlay'].forEach(function(id) {{
        const el = document.getElementById(id);
        if (el) el.addEventListener('click', closeAll);
      }});
      document.addEventListener('keydown', function(e) {{
        if (e.key === 'Escape') closeAll();
      }});
    }})();
  </script>
</body>
</html>
"####,
        search = escape_html(&document.search_value),
        overlay_hidden = hidden_unless(document.overlay_visible),
        filters_hidden = hidden_unless(document.filters_open),
        loading_hidden = hidden_unless(document.loading),
        table_hidden = hidden_unless(document.table_visible),
        cards_hidden = hidden_unless(document.cards_visible),
        empty_hidden = hidden_unless(document.no_results_visible),
        load_more_hidden = hidden_unless(document.load_more_visible),
        table_body = render_table(devices),
        cards_body = render_cards(devices),
    );
    html.into_bytes()
}
