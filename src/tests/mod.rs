use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::api::{ApiError, Backend, DevicePage};
use crate::controller::DeviceListController;
use crate::document::Document;
use crate::model::{DashboardStats, Device, FilterDimension, FilterOptions, SummaryCard};
use crate::state::{DeviceQuery, NotificationKind, SortDirection, ViewMode};
use crate::view::modal::ModalTab;

#[derive(Default)]
struct StubBackend {
    pages: Mutex<VecDeque<Result<DevicePage, ApiError>>>,
    queries: Mutex<Vec<DeviceQuery>>,
    fail_filters: bool,
    fail_stats: bool,
    stats_calls: Mutex<usize>,
}

impl StubBackend {
    fn with_pages(pages: Vec<Result<DevicePage, ApiError>>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            ..Default::default()
        }
    }

    fn queries(&self) -> Vec<DeviceQuery> {
        self.queries.lock().unwrap().clone()
    }

    fn stats_calls(&self) -> usize {
        *self.stats_calls.lock().unwrap()
    }
}

fn status_error(endpoint: &str) -> ApiError {
    ApiError::Status {
        endpoint: endpoint.to_string(),
        status: 500,
    }
}

#[async_trait]
impl Backend for StubBackend {
    async fn filter_options(&self) -> Result<FilterOptions, ApiError> {
        if self.fail_filters {
            return Err(status_error("/api/filters"));
        }
        Ok(FilterOptions {
            categories: vec!["ONT".to_string(), "Router".to_string()],
            allocation_statuses: vec!["GOOD".to_string(), "FAULTY".to_string()],
            ..Default::default()
        })
    }

    async fn devices(&self, query: &DeviceQuery) -> Result<DevicePage, ApiError> {
        self.queries.lock().unwrap().push(query.clone());
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(DevicePage::Devices(Vec::new())))
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        *self.stats_calls.lock().unwrap() += 1;
        if self.fail_stats {
            return Err(status_error("/api/dashboard-stats"));
        }
        Ok(DashboardStats {
            total_devices: 120,
            allocated: 40,
            available: 50,
            repairing: 10,
            faulty: 15,
            repaired: 5,
        })
    }
}

fn devices(n: usize, offset: usize) -> Vec<Device> {
    (0..n)
        .map(|i| {
            serde_json::from_value(serde_json::json!({
                "DEVICE_ID": format!("D{}", i + offset),
                "LOCATION_NAME": "Kochi Hub",
                "DEVICE_ALLOCATION_STATUS": "GOOD",
            }))
            .unwrap()
        })
        .collect()
}

fn page(n: usize, offset: usize) -> Result<DevicePage, ApiError> {
    Ok(DevicePage::Devices(devices(n, offset)))
}

fn controller(backend: StubBackend) -> DeviceListController<StubBackend> {
    DeviceListController::new(backend, Document::new())
}

fn pair(query: &DeviceQuery, key: &str) -> Option<String> {
    query
        .to_pairs()
        .into_iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

fn error_messages(c: &DeviceListController<StubBackend>) -> Vec<String> {
    c.document()
        .notifications
        .iter()
        .filter(|n| n.kind == NotificationKind::Error)
        .map(|n| n.message.clone())
        .collect()
}

#[tokio::test]
async fn startup_loads_catalog_first_page_and_stats() {
    let mut c = controller(StubBackend::with_pages(vec![page(3, 0)]));
    c.start().await;

    let queries = c.backend().queries();
    assert_eq!(queries.len(), 1);
    let keys: Vec<&str> = queries[0].to_pairs().iter().map(|(k, _)| *k).collect();
    assert_eq!(
        keys,
        vec![
            "search",
            "category",
            "acceptance_status",
            "allocation_status",
            "state_city",
            "flow_type",
            "ticket_type",
            "page",
            "per_page"
        ]
    );
    assert_eq!(pair(&queries[0], "page").as_deref(), Some("1"));
    assert_eq!(pair(&queries[0], "per_page").as_deref(), Some("50"));

    let category = c.document().filter_control(FilterDimension::Category).unwrap();
    assert_eq!(category.options, vec!["ONT", "Router"]);
    assert_eq!(c.catalog().allocation_statuses.len(), 2);
    assert_eq!(c.document().stats.total_devices, 120);
    assert_eq!(c.state().devices().len(), 3);
    assert!(c.document().table_visible);
    assert!(!c.document().loading);
    assert!(c.document().table_body.contains(r#"<tr data-device-id="D2">"#));
}

#[tokio::test]
async fn full_page_enables_load_more_for_page_two() {
    let mut c = controller(StubBackend::with_pages(vec![page(50, 0), page(10, 50)]));
    c.start().await;
    assert!(c.document().load_more_visible);
    assert!(!c.state().no_more_data());

    c.load_more_devices().await;
    let queries = c.backend().queries();
    assert_eq!(queries[1].page, 2);
    assert_eq!(c.state().devices().len(), 60);
    assert_eq!(c.state().devices()[59].id().as_deref(), Some("D59"));
    assert!(!c.document().load_more_visible);
}

#[tokio::test]
async fn short_page_makes_load_more_a_noop() {
    let mut c = controller(StubBackend::with_pages(vec![page(30, 0)]));
    c.start().await;
    assert!(c.state().no_more_data());

    c.load_more_devices().await;
    c.load_more_devices().await;
    c.load_devices(2).await;
    assert_eq!(c.backend().queries().len(), 1);
    assert_eq!(c.state().page(), 1);
}

#[tokio::test]
async fn filter_change_starts_over_from_page_one() {
    let mut c = controller(StubBackend::with_pages(vec![
        page(50, 0),
        page(50, 50),
        page(3, 900),
    ]));
    c.start().await;
    c.load_more_devices().await;
    assert_eq!(c.state().devices().len(), 100);

    c.set_filter(FilterDimension::Category, "ONT").await;
    let queries = c.backend().queries();
    let last = queries.last().unwrap();
    assert_eq!(last.page, 1);
    assert_eq!(pair(last, "category").as_deref(), Some("ONT"));

    let ids: Vec<String> = c
        .state()
        .devices()
        .iter()
        .map(|d| d.text("DEVICE_ID"))
        .collect();
    assert_eq!(ids, vec!["D900", "D901", "D902"]);
    assert!(!c.document().table_body.contains(r#"data-device-id="D0""#));
    assert_eq!(
        c.document()
            .filter_control(FilterDimension::Category)
            .unwrap()
            .selected,
        "ONT"
    );
}

#[tokio::test]
async fn sorting_toggles_and_keeps_one_active_header() {
    let mut c = controller(StubBackend::default());
    c.sort_by_column("DEVICE_ID").await;
    assert_eq!(c.state().sort().direction(), SortDirection::Asc);
    assert_eq!(c.document().active_sort_headers(), 1);

    c.sort_by_column("DEVICE_ID").await;
    assert_eq!(c.state().sort().direction(), SortDirection::Desc);
    assert_eq!(c.document().active_sort_headers(), 1);

    c.sort_by_column("CUSTOMER_NAME").await;
    assert_eq!(c.state().sort().direction(), SortDirection::Asc);
    assert_eq!(c.document().active_sort_headers(), 1);

    let last = c.backend().queries().pop().unwrap();
    assert_eq!(pair(&last, "sort_by").as_deref(), Some("CUSTOMER_NAME"));
    assert_eq!(pair(&last, "sort_order").as_deref(), Some("ASC"));
}

#[tokio::test]
async fn unsortable_column_issues_no_request() {
    let mut c = controller(StubBackend::default());
    c.sort_by_column("SECRET").await;
    assert!(c.backend().queries().is_empty());
    assert_eq!(c.document().active_sort_headers(), 0);
}

#[tokio::test]
async fn modal_opens_for_loaded_devices_only() {
    let mut c = controller(StubBackend::with_pages(vec![page(2, 0)]));
    c.start().await;

    assert!(!c.show_device_modal("NOPE"));
    assert!(!c.document().modal_visible);
    assert!(c.document().modal.is_none());

    assert!(c.show_device_modal("D1"));
    assert!(c.document().modal_visible);
    assert_eq!(c.document().active_tab, ModalTab::General);
    assert_eq!(c.document().modal.as_ref().unwrap().title(), "Device: D1");

    c.switch_tab(ModalTab::Ticket);
    assert_eq!(c.document().active_tab, ModalTab::Ticket);

    c.click_modal_backdrop(false);
    assert!(c.document().modal_visible);
    c.click_modal_backdrop(true);
    assert!(!c.document().modal_visible);
}

#[tokio::test]
async fn escape_closes_overlays_and_ctrl_f_focuses_search() {
    let mut c = controller(StubBackend::with_pages(vec![page(1, 0)]));
    c.start().await;
    c.toggle_filters();
    assert!(c.document().filters_open);
    assert!(c.show_device_modal("D0"));

    assert!(!c.handle_key("Escape", false, false));
    assert!(!c.document().modal_visible);
    assert!(!c.document().filters_open);
    assert!(!c.document().overlay_visible);

    assert!(!c.handle_key("f", false, false));
    assert!(!c.document().search_focused);
    assert!(c.handle_key("f", true, false));
    assert!(c.document().search_focused);
    assert!(c.handle_key("F", false, true));
}

#[tokio::test]
async fn overlay_click_closes_filter_panel() {
    let mut c = controller(StubBackend::default());
    c.toggle_filters();
    assert!(c.document().overlay_visible);
    c.click_overlay();
    assert!(!c.document().filters_open);
    assert!(!c.document().overlay_visible);
}

#[tokio::test(start_paused = true)]
async fn typing_burst_issues_one_search_request() {
    let mut c = controller(StubBackend::default());
    c.search_input("z");
    tokio::time::sleep(Duration::from_millis(100)).await;
    c.search_input("zt");
    tokio::time::sleep(Duration::from_millis(100)).await;
    c.search_input("zte");
    assert!(c.backend().queries().is_empty());

    assert!(c.settle_search().await);
    let queries = c.backend().queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(pair(&queries[0], "search").as_deref(), Some("zte"));
    assert!(!c.settle_search().await);
}

#[tokio::test(start_paused = true)]
async fn unread_search_tick_does_not_fire_twice() {
    let mut c = controller(StubBackend::default());
    c.search_input("a");
    tokio::time::sleep(Duration::from_millis(400)).await;
    c.search_input("ab");

    assert!(c.settle_search().await);
    assert!(!c.settle_search().await);
    let queries = c.backend().queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(pair(&queries[0], "search").as_deref(), Some("ab"));
}

#[tokio::test(start_paused = true)]
async fn clear_all_resets_controls_and_drops_pending_search() {
    let mut c = controller(StubBackend::default());
    c.set_filter(FilterDimension::TicketType, "Repair").await;
    c.search_input("abc");

    c.clear_all_filters().await;
    assert!(c.document().search_value.is_empty());
    assert!(c
        .document()
        .filter_controls
        .iter()
        .all(|control| control.selected.is_empty()));
    assert!(c.state().filters().is_empty());

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(!c.settle_search().await);
    let queries = c.backend().queries();
    assert_eq!(queries.len(), 2);
    assert!(queries[1].filters.is_empty());
}

#[tokio::test]
async fn summary_card_applies_allocation_shortcut() {
    let mut c = controller(StubBackend::default());
    c.click_summary_card(SummaryCard::Available).await;
    c.click_summary_card(SummaryCard::Total).await;
    let queries = c.backend().queries();
    assert_eq!(pair(&queries[0], "allocation_status").as_deref(), Some("GOOD"));
    assert_eq!(pair(&queries[1], "allocation_status").as_deref(), Some(""));
}

#[tokio::test]
async fn missing_allocation_control_notifies_without_request() {
    let document = Document::new().without_filter_control(FilterDimension::AllocationStatus);
    let mut c = DeviceListController::new(StubBackend::default(), document);
    c.filter_by_allocation_status("FAULTY").await;
    assert!(c.backend().queries().is_empty());
    assert_eq!(
        error_messages(&c),
        vec!["Unable to apply allocation status filter"]
    );
    assert!(c.state().filters().allocation_status.is_empty());
}

#[tokio::test]
async fn catalog_failure_notifies_and_still_lists_devices() {
    let backend = StubBackend {
        fail_filters: true,
        ..StubBackend::with_pages(vec![page(2, 0)])
    };
    let mut c = controller(backend);
    c.start().await;
    assert_eq!(error_messages(&c), vec!["Error loading filter options"]);
    assert_eq!(c.state().devices().len(), 2);
    assert!(c.document().filter_controls.iter().all(|f| f.options.is_empty()));
}

#[tokio::test]
async fn stats_failure_is_silent() {
    let backend = StubBackend {
        fail_stats: true,
        ..Default::default()
    };
    let mut c = controller(backend);
    c.start().await;
    assert!(c.document().notifications.is_empty());
    assert_eq!(c.document().stats, DashboardStats::default());
}

#[tokio::test]
async fn device_fetch_failure_clears_list_and_notifies() {
    let mut c = controller(StubBackend::with_pages(vec![
        page(50, 0),
        Err(status_error("/api/devices/paginated")),
    ]));
    c.start().await;
    c.load_more_devices().await;
    assert!(c.state().devices().is_empty());
    assert_eq!(error_messages(&c), vec!["Error loading devices"]);
    assert!(c.document().no_results_visible);
    assert!(c.document().table_body.is_empty());
    assert!(!c.document().loading);
}

#[tokio::test]
async fn load_more_after_failed_page_waits_for_page_one() {
    let mut c = controller(StubBackend::with_pages(vec![
        page(50, 0),
        Err(status_error("/api/devices/paginated")),
        page(50, 100),
    ]));
    c.start().await;
    c.load_more_devices().await;
    assert!(!c.document().load_more_visible);

    c.load_more_devices().await;
    let pages: Vec<usize> = c.backend().queries().iter().map(|q| q.page).collect();
    assert_eq!(pages, vec![1, 2]);
    assert!(c.state().devices().is_empty());

    c.apply_filters().await;
    let pages: Vec<usize> = c.backend().queries().iter().map(|q| q.page).collect();
    assert_eq!(pages, vec![1, 2, 1]);
    assert_eq!(c.state().devices()[0].id().as_deref(), Some("D100"));
    assert!(c.document().load_more_visible);
}

#[tokio::test]
async fn malformed_payload_shows_empty_state_quietly() {
    let mut c = controller(StubBackend::with_pages(vec![Ok(DevicePage::Malformed(
        serde_json::json!({"error": "Database error"}),
    ))]));
    c.start().await;
    assert!(c.state().devices().is_empty());
    assert!(c.document().no_results_visible);
    assert!(c.document().notifications.is_empty());
    assert!(!c.document().load_more_visible);
}

#[tokio::test]
async fn view_switch_rerenders_without_fetching() {
    let mut c = controller(StubBackend::with_pages(vec![page(2, 0)]));
    c.start().await;
    c.switch_view(ViewMode::Card).await;
    assert_eq!(c.backend().queries().len(), 1);
    assert!(c.document().cards_visible);
    assert!(!c.document().table_visible);
    assert!(c.document().cards_body.contains(r#"data-device-id="D1""#));
    assert!(c.document().table_body.is_empty());
}

#[tokio::test]
async fn refresh_reloads_and_confirms() {
    let mut c = controller(StubBackend::with_pages(vec![page(2, 0), page(4, 0)]));
    c.start().await;
    c.refresh_data().await;
    assert_eq!(c.backend().queries().len(), 2);
    assert_eq!(c.backend().stats_calls(), 2);
    assert_eq!(c.state().devices().len(), 4);
    let last = c.document().notifications.last().unwrap();
    assert_eq!(last.kind, NotificationKind::Success);
    assert_eq!(last.message, "Data refreshed");
}

#[tokio::test]
async fn export_writes_dated_csv() {
    let mut c = controller(StubBackend::with_pages(vec![page(2, 0)]));
    c.start().await;
    let dir = tempfile::tempdir().unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    let path = c.export_csv(dir.path(), date).await.unwrap();
    assert!(path.ends_with("cpe_devices_2024-03-15.csv"));

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.split('\n').collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Device ID,Serial No"));
    assert!(lines[2].starts_with(r#""D1","#));
    assert_eq!(
        c.document().notifications.last().unwrap().message,
        "Data exported successfully"
    );
}

#[tokio::test]
async fn snapshot_page_reflects_controller_state() {
    let mut c = controller(StubBackend::with_pages(vec![page(1, 0)]));
    c.start().await;
    c.sort_by_column("LOCATION_NAME").await;
    let html = String::from_utf8(crate::output::report::render_html(c.document(), c.state().devices())).unwrap();
    assert!(html.contains(r#"<option value="ONT">ONT</option>"#));
    assert!(html.contains(r#"<p id="total-devices" class="text-3xl font-display mt-2">120</p>"#));
    assert!(html.contains(r#"data-sort="LOCATION_NAME">Location <i class="fas fa-sort-up sort-icon active">"#));
}
