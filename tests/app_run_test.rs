//! Full runs against mock remote services and temporary files.

use std::fs;
use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use blueprint_prospector::app;
use blueprint_prospector::domain::{MoneyFormat, RankPolicy, RecordFormat};
use blueprint_prospector::infra::output::ReportFormat;
use blueprint_prospector::util::config::RunConfig;
use blueprint_prospector::util::logging;

const STATION: i64 = 60003760;

fn write_inputs(dir: &TempDir) -> (String, std::path::PathBuf) {
    let blueprints = dir.path().join("blueprints.json");
    fs::write(
        &blueprints,
        json!([
            {"typeID": 100, "materialEfficiency": 10, "itemID": 1},
            {"typeID": 100, "materialEfficiency": 10, "itemID": 2},
            {"typeID": 200, "materialEfficiency": 0, "itemID": 3},
            {"typeID": 300, "materialEfficiency": 5, "itemID": 4}
        ])
        .to_string(),
    )
    .expect("write blueprints");

    let facilities = dir.path().join("facilities.json");
    fs::write(
        &facilities,
        json!([
            {"id": STATION, "name": "Jita IV - Moon 4 - Caldari Navy Assembly Plant"},
            {"id": 60008494, "name": "Amarr VIII (Oris) - Emperor Family Academy"}
        ])
        .to_string(),
    )
    .expect("write facilities");

    (blueprints.display().to_string(), facilities)
}

async fn mock_services() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/recipes/manufacturing/100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "productTypeID": 1001,
            "productName": "Widget",
            "quantity": 100,
            "time": 3600,
            "materials": [{"typeID": 34, "name": "Tritanium", "quantity": 1000}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/recipes/manufacturing/200"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/recipes/manufacturing/300"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/prices/1001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sell": 1000.0})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/prices/34"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sell": 5.0})))
        .mount(&server)
        .await;
    server
}

fn run_config(server: &MockServer, dir: &TempDir, format: ReportFormat) -> RunConfig {
    let (blueprints, facilities_path) = write_inputs(dir);
    RunConfig {
        refapi_url: server.uri(),
        prices_url: format!("{}/prices", server.uri()),
        blueprints,
        blueprints_token: None,
        facilities_path,
        station_ids: vec![STATION],
        output_path: dir.path().join("prospects.csv"),
        format,
        rank_policy: RankPolicy::default(),
        record_format: RecordFormat::uniform(MoneyFormat::Currency),
        request_timeout: Duration::from_secs(5),
        cache_capacity: 8,
    }
}

#[tokio::test]
async fn run_writes_ranked_csv_report() {
    logging::init_test();
    let server = mock_services().await;
    let dir = TempDir::new().expect("temp dir");
    let config = run_config(&server, &dir, ReportFormat::Csv);

    let prospects = app::run(&config).await.expect("run succeeds");

    assert_eq!(prospects.len(), 1);
    assert_eq!(prospects[0].product, "Widget");
    assert_eq!(prospects[0].count, 2);
    assert_eq!(prospects[0].facility.id, STATION);

    let report = fs::read_to_string(&config.output_path).expect("report written");
    assert_eq!(
        report,
        "product,profit,price,cost,margin\n\
         Widget,955.00 ISK,\"1,000.00 ISK\",45.00 ISK,95.50%\n"
    );
}

#[tokio::test]
async fn unknown_station_aborts_before_remote_calls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let dir = TempDir::new().expect("temp dir");
    let mut config = run_config(&server, &dir, ReportFormat::Csv);
    config.station_ids = vec![STATION, 1];

    let err = app::run(&config).await.expect_err("unknown station is fatal");

    assert!(err.to_string().contains("unknown facility id 1"));
    assert!(!config.output_path.exists());
}

#[tokio::test]
async fn missing_blueprint_listing_fails_the_run() {
    let server = MockServer::start().await;
    let dir = TempDir::new().expect("temp dir");
    let mut config = run_config(&server, &dir, ReportFormat::Csv);
    config.blueprints = dir.path().join("absent.json").display().to_string();

    let err = app::run(&config).await.expect_err("listing is required");

    assert!(format!("{err:#}").contains("failed to load owned blueprints"));
}
