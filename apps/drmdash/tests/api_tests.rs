//! Integration tests for the drmdash HTTP API.
//!
//! Uses axum-test to test the API handlers without starting a real server.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum_test::TestServer;
use drmdash::api::{
    AppState, BenchmarksResponse, ChartResponse, CountryJson, ErrorResponse, HealthResponse,
    StatusResponse, create_router,
};
use drmdash::config::ServerConfig;
use drmdash_core::{
    CountryRecord, CountryTable, Observation, PlaceholderKind, RegionCode, SeriesKind, Snapshot,
    Table,
    primitives::{MAX_REQUEST_CODES, SELECTED_COUNTRY_COLOR},
};
use serde_json::json;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn countries() -> CountryTable {
    CountryTable::new([
        CountryRecord::new("KEN", RegionCode::AFE, "Kenya"),
        CountryRecord::new("NGA", RegionCode::AFW, "Nigeria"),
        CountryRecord::new("GHA", RegionCode::AFW, "Ghana"),
        CountryRecord::new("TCD", RegionCode::AFW, "Chad"),
    ])
}

/// Urbanization table: KEN 2016-2030, aggregates and two peers.
fn wup_table() -> Table {
    let mut table = Table::new("wup");
    for year in 2016..=2030 {
        table.push("KEN", Observation::new(year, Some(f64::from(year - 1990))));
    }
    for code in ["SSA", "AFE", "AFW", "EAP", "NGA", "GHA"] {
        table.push(code, Observation::new(2020, Some(40.0)));
        table.push(code, Observation::new(2030, Some(45.0)));
    }
    table
}

fn test_config() -> ServerConfig {
    ServerConfig {
        rate_limit: 0,
        ..ServerConfig::default()
    }
}

/// Create a test server over a small in-memory snapshot.
fn create_test_server() -> TestServer {
    let snapshot = Snapshot::new(countries(), [wup_table()]);
    let state = AppState::new(snapshot, 2025);
    TestServer::new(create_router(state, &test_config())).unwrap()
}

/// Create a test server with no countries and no sources.
fn create_empty_test_server() -> TestServer {
    let state = AppState::new(Snapshot::default(), 2025);
    TestServer::new(create_router(state, &test_config())).unwrap()
}

// =============================================================================
// HEALTH & STATUS TESTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_status_reports_sources() {
    let server = create_test_server();

    let response = server.get("/status").await;

    response.assert_status_ok();
    let status: StatusResponse = response.json();
    assert_eq!(status.countries, 4);
    assert_eq!(status.base_year, 2025);
    assert_eq!(status.sources.len(), 1);
    assert_eq!(status.sources[0].source_id, "wup");
    assert_eq!(status.sources[0].rows, 15 + 12);
}

#[tokio::test]
async fn test_status_empty_snapshot() {
    let server = create_empty_test_server();

    let status: StatusResponse = server.get("/status").await.json();
    assert_eq!(status.countries, 0);
    assert!(status.sources.is_empty());
}

// =============================================================================
// REFERENCE DATA TESTS
// =============================================================================

#[tokio::test]
async fn test_countries_sorted_by_name() {
    let server = create_test_server();

    let response = server.get("/countries").await;

    response.assert_status_ok();
    let countries: Vec<CountryJson> = response.json();
    let names: Vec<&str> = countries.iter().map(|c| c.display_name.as_str()).collect();
    assert_eq!(names, vec!["Chad", "Ghana", "Kenya", "Nigeria"]);
    assert_eq!(countries[2].region_code, RegionCode::AFE);
}

#[tokio::test]
async fn test_regional_benchmarks() {
    let server = create_test_server();

    let response = server.get("/benchmarks/regional").await;

    response.assert_status_ok();
    let benchmarks: BenchmarksResponse = response.json();
    let codes: Vec<&str> = benchmarks.options.iter().map(|o| o.code.as_str()).collect();
    assert_eq!(codes, vec!["SSA", "AFE", "AFW"]);
}

#[tokio::test]
async fn test_global_benchmarks() {
    let server = create_test_server();

    let benchmarks: BenchmarksResponse = server.get("/benchmarks/global").await.json();
    assert_eq!(benchmarks.scope, "global");
    assert_eq!(benchmarks.options.len(), 8);
    assert_eq!(benchmarks.options[0].display_name, "Sub-Saharan Africa");
}

#[tokio::test]
async fn test_unknown_benchmark_scope() {
    let server = create_test_server();

    let response = server.get("/benchmarks/continental").await;

    response.assert_status_not_found();
    let error: ErrorResponse = response.json();
    assert!(!error.success);
}

// =============================================================================
// SERIES ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_series_selected_country() {
    let server = create_test_server();

    let response = server
        .post("/series")
        .json(&json!({"source": "wup", "country_code": "KEN"}))
        .await;

    response.assert_status_ok();
    let chart: ChartResponse = response.json();
    assert!(chart.placeholder.is_none());
    assert_eq!(chart.series.len(), 1);

    let kenya = &chart.series[0];
    assert_eq!(kenya.display_name, "Kenya");
    assert_eq!(kenya.color, SELECTED_COUNTRY_COLOR);
    assert_eq!(kenya.kind, SeriesKind::SelectedCountry);
    // 2016..=2025 and 2025..=2030, sharing the base year.
    assert_eq!(kenya.historical.len(), 10);
    assert_eq!(kenya.projection.len(), 6);
    assert_eq!(kenya.historical.last(), kenya.projection.first());
}

#[tokio::test]
async fn test_series_benchmark_order() {
    let server = create_test_server();

    let chart: ChartResponse = server
        .post("/series")
        .json(&json!({"source": "wup", "regional_codes": ["AFW", "SSA"]}))
        .await
        .json();

    let codes: Vec<&str> = chart.series.iter().map(|s| s.code.as_str()).collect();
    assert_eq!(codes, vec!["SSA", "AFW"]);
}

#[tokio::test]
async fn test_series_lower_case_codes_resolve() {
    let server = create_test_server();

    let chart: ChartResponse = server
        .post("/series")
        .json(&json!({"source": "wup", "country_code": "ken", "regional_codes": ["afw", "ssa"]}))
        .await
        .json();

    let codes: Vec<&str> = chart.series.iter().map(|s| s.code.as_str()).collect();
    assert_eq!(codes, vec!["KEN", "SSA", "AFW"]);
}

#[tokio::test]
async fn test_series_full_overlay() {
    let server = create_test_server();

    let chart: ChartResponse = server
        .post("/series")
        .json(&json!({
            "source": "wup",
            "country_code": "KEN",
            "global_codes": ["EAP", "AFE"],
            "peer_countries": ["GHA", "NGA"]
        }))
        .await
        .json();

    let codes: Vec<&str> = chart.series.iter().map(|s| s.code.as_str()).collect();
    assert_eq!(codes, vec!["KEN", "AFE", "EAP", "GHA", "NGA"]);
    assert_eq!(chart.series[3].kind, SeriesKind::PeerCountry);
}

#[tokio::test]
async fn test_series_no_selection_placeholder() {
    let server = create_test_server();

    let response = server
        .post("/series")
        .json(&json!({"source": "wup", "country_code": ""}))
        .await;

    response.assert_status_ok();
    let chart: ChartResponse = response.json();
    let placeholder = chart.placeholder.unwrap();
    assert_eq!(placeholder.kind, PlaceholderKind::NoData);
    assert_eq!(placeholder.message, "No country selected");
    assert!(chart.series.is_empty());
}

#[tokio::test]
async fn test_series_no_rows_placeholder() {
    let server = create_test_server();

    let chart: ChartResponse = server
        .post("/series")
        .json(&json!({"source": "wup", "country_code": "TCD"}))
        .await
        .json();

    let placeholder = chart.placeholder.unwrap();
    assert_eq!(placeholder.kind, PlaceholderKind::NoData);
    assert_eq!(placeholder.message, "No data available");
}

#[tokio::test]
async fn test_series_unknown_source_placeholder() {
    let server = create_test_server();

    let response = server
        .post("/series")
        .json(&json!({"source": "flood", "country_code": "KEN"}))
        .await;

    response.assert_status_ok();
    let chart: ChartResponse = response.json();
    let placeholder = chart.placeholder.unwrap();
    assert_eq!(placeholder.kind, PlaceholderKind::Error);
    assert!(placeholder.message.contains("flood"));
}

#[tokio::test]
async fn test_series_malformed_body() {
    let server = create_test_server();

    let response = server
        .post("/series")
        .json(&json!({"country_code": "KEN"}))
        .await;

    response.assert_status_bad_request();
    let error: ErrorResponse = response.json();
    assert!(!error.success);
}

#[tokio::test]
async fn test_series_too_many_codes() {
    let server = create_test_server();
    let peers: Vec<String> = (0..=MAX_REQUEST_CODES).map(|i| format!("P{}", i)).collect();

    let response = server
        .post("/series")
        .json(&json!({"source": "wup", "peer_countries": peers}))
        .await;

    response.assert_status_bad_request();
}

// =============================================================================
// EXPORT ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_export_csv() {
    let server = create_test_server();

    let response = server
        .post("/export")
        .json(&json!({"source": "wup", "country_code": "KEN", "regional_codes": ["SSA"]}))
        .await;

    response.assert_status_ok();
    let content_type = response.header("content-type");
    assert!(content_type.to_str().unwrap().starts_with("text/csv"));
    let disposition = response.header("content-disposition");
    assert!(disposition.to_str().unwrap().contains("wup_KEN.csv"));

    let text = response.text();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "code,name,kind,year,value");
    assert_eq!(lines.len(), 1 + 15 + 2);
}

#[tokio::test]
async fn test_export_unresolvable_is_not_found() {
    let server = create_test_server();

    let response = server
        .post("/export")
        .json(&json!({"source": "wup", "country_code": "TCD"}))
        .await;
    response.assert_status_not_found();

    let response = server
        .post("/export")
        .json(&json!({"source": "flood", "country_code": "KEN"}))
        .await;
    response.assert_status_not_found();
}

// =============================================================================
// MIDDLEWARE TESTS
// =============================================================================

#[tokio::test]
async fn test_unknown_route() {
    let server = create_test_server();

    let response = server.get("/nope").await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_wrong_method() {
    let server = create_test_server();

    let response = server.get("/series").await;

    assert_eq!(response.status_code().as_u16(), 405);
}

#[tokio::test]
async fn test_rate_limit_rejects_excess() {
    let state = AppState::new(Snapshot::new(countries(), [wup_table()]), 2025);
    let config = ServerConfig {
        rate_limit: 1,
        ..ServerConfig::default()
    };
    let server = TestServer::new(create_router(state, &config)).unwrap();

    server.get("/health").await.assert_status_ok();
    let response = server.get("/health").await;
    assert_eq!(response.status_code().as_u16(), 429);
    assert_eq!(response.header("retry-after"), "1");

    let error: ErrorResponse = response.json();
    assert!(!error.success);
    assert!(error.error.contains("Too many requests"));
}

// =============================================================================
// CONFIG-BACKED SERVER TESTS
// =============================================================================

#[tokio::test]
async fn test_server_from_config_files() {
    use drmdash::config::DashboardConfig;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("countries.csv"),
        "ISO3,Country,Region\nKEN,Kenya,AFE\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("wup.csv"),
        "ISO3_Code,Year,Urban_Share\nKEN,2020,0.28\nKEN,2030,0.35\nSSA,2020,0.42\n",
    )
    .unwrap();

    let text = format!(
        "data_dir = {:?}\n\
         [sources.wup]\npath = \"wup.csv\"\ncode_column = \"ISO3_Code\"\nvalue_column = \"Urban_Share\"\nscale = 100.0\n\
         [sources.flood]\npath = \"flood.csv\"\nvalue_column = \"exposed\"\n\
         [server]\nrate_limit = 0\n",
        dir.path().to_string_lossy()
    );
    let config = DashboardConfig::from_toml(&text).unwrap();
    let snapshot = Snapshot::load(&config.catalog(), &config.countries).unwrap();
    let state = AppState::new(snapshot, config.base_year);
    let server = TestServer::new(create_router(state, &config.server)).unwrap();

    let status: StatusResponse = server.get("/status").await.json();
    assert_eq!(status.countries, 1);
    let flood = status.sources.iter().find(|s| s.source_id == "flood").unwrap();
    assert!(!flood.available);

    let chart: ChartResponse = server
        .post("/series")
        .json(&json!({"source": "wup", "country_code": "KEN", "regional_codes": ["SSA"]}))
        .await
        .json();
    assert_eq!(chart.series.len(), 2);
    let first = chart.series[0].historical[0].value.unwrap();
    assert!((first - 28.0).abs() < 1e-9);

    let chart: ChartResponse = server
        .post("/series")
        .json(&json!({"source": "flood", "country_code": "KEN"}))
        .await
        .json();
    assert_eq!(chart.placeholder.unwrap().kind, PlaceholderKind::Error);
}
