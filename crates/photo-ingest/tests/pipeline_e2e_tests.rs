//! End-to-end tests for the photo ingestion pipeline
//!
//! These tests run the full pipeline against a local mock image server:
//! - CSV ingestion and output layout
//! - Partial failures (invalid rows, HTTP errors, timeouts)
//! - Group scheduling and ordering
//! - Manifest contents and idempotent reruns

use photo_ingest::{pipeline, HttpFetcher, IngestConfig, Manifest, Record};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::{
    matchers::{method, path, path_regex},
    Mock, MockServer, ResponseTemplate,
};

const JPEG_BYTES: &[u8] = b"\xFF\xD8\xFF\xE0fake-jpeg-body";

const HEADER: &str = "photo_id,photo_image_url,photographer_username,photo_submitted_at,ai_description,photo_location_country";

/// Helper to write `photos.csv` under the temp root
fn write_csv(dir: &TempDir, rows: &[String]) {
    let mut content = String::from(HEADER);
    content.push('\n');
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    fs::write(dir.path().join("photos.csv"), content).expect("Failed to write CSV");
}

fn row(id: &str, url: &str, author: &str, description: &str) -> String {
    format!("{id},{url},{author},2020-04-28 13:55:02.371,{description},Norway")
}

fn config_for(dir: &TempDir) -> IngestConfig {
    IngestConfig::builder()
        .root(dir.path())
        .input("photos.csv")
        .group_size(20)
        .timeout_secs(5)
        .build()
}

/// Helper to mount a mock that serves the fake JPEG for every /img/ path
async fn mount_images(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/img/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(JPEG_BYTES.to_vec()))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn read_manifest(root: &Path) -> serde_json::Value {
    let raw = fs::read_to_string(root.join("downloads").join("manifest.json"))
        .expect("manifest.json should exist");
    serde_json::from_str(&raw).expect("manifest should be valid JSON")
}

#[tokio::test]
async fn test_run_stores_images_sidecars_and_manifest() {
    let server = MockServer::start().await;
    mount_images(&server, 2).await;

    let dir = TempDir::new().unwrap();
    write_csv(
        &dir,
        &[
            row("a1", &format!("{}/img/a1", server.uri()), "ann", "Calm lake at dawn"),
            row("b2", &format!("{}/img/b2", server.uri()), "bob", "City lights"),
        ],
    );

    let summary = pipeline::run(&config_for(&dir)).await.unwrap();

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 0);
    assert_eq!(
        summary.manifest_path.as_deref(),
        Some(dir.path().join("downloads").join("manifest.json").as_path())
    );

    let stem = dir.path().join("downloads/ann/2020/calm_lake_at_dawn_by_ann_a1");
    assert_eq!(fs::read(stem.with_extension("jpg")).unwrap(), JPEG_BYTES);

    let sidecar: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(stem.with_extension("json")).unwrap()).unwrap();
    assert_eq!(sidecar["photo_id"], "a1");
    assert_eq!(sidecar["photographer_username"], "ann");
    assert_eq!(sidecar["photo_location_country"], "Norway");

    let manifest = read_manifest(dir.path());
    assert_eq!(
        manifest[0],
        serde_json::json!({
            "id": "a1",
            "description": "Calm lake at dawn",
            "photographer": "ann",
            "country": "Norway",
            "tags": ["Calm", "lake", "at", "dawn"],
            "path": "downloads/ann/2020/calm_lake_at_dawn_by_ann_a1.jpg"
        })
    );
    assert_eq!(manifest[1]["id"], "b2");
}

#[tokio::test]
async fn test_invalid_row_fails_without_network_call() {
    let server = MockServer::start().await;
    // Only the valid row may reach the server
    mount_images(&server, 1).await;

    let dir = TempDir::new().unwrap();
    write_csv(
        &dir,
        &[
            row("ok", &format!("{}/img/ok", server.uri()), "ann", "Good"),
            row("nourl", "", "ann", "Missing url"),
        ],
    );

    let summary = pipeline::run(&config_for(&dir)).await.unwrap();

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);

    let manifest = read_manifest(dir.path());
    assert_eq!(manifest.as_array().unwrap().len(), 1);
    assert_eq!(manifest[0]["id"], "ok");
}

#[tokio::test]
async fn test_http_error_is_isolated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/here"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(JPEG_BYTES.to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    write_csv(
        &dir,
        &[
            row("gone", &format!("{}/img/gone", server.uri()), "ann", "Lost"),
            row("here", &format!("{}/img/here", server.uri()), "ann", "Found"),
        ],
    );

    let summary = pipeline::run(&config_for(&dir)).await.unwrap();

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    assert!(!dir.path().join("downloads/ann/2020/lost_by_ann_gone.jpg").exists());
    assert!(dir.path().join("downloads/ann/2020/found_by_ann_here.jpg").exists());
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(JPEG_BYTES.to_vec())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    write_csv(&dir, &[row("slow", &format!("{}/img/slow", server.uri()), "ann", "Slow")]);
    let config = IngestConfig::builder()
        .root(dir.path())
        .timeout_secs(1)
        .build();

    let summary = pipeline::run(&config).await.unwrap();

    assert_eq!(summary.failed, 1);
    assert_eq!(read_manifest(dir.path()), serde_json::json!([]));
}

#[tokio::test]
async fn test_twenty_five_records_keep_order_across_groups() {
    let server = MockServer::start().await;
    mount_images(&server, 25).await;

    let dir = TempDir::new().unwrap();
    let records: Vec<Record> = (0..25)
        .map(|i| {
            Record::from_pairs([
                ("photo_id".to_string(), format!("id{i:02}")),
                ("photo_image_url".to_string(), format!("{}/img/{i}", server.uri())),
                ("photographer_username".to_string(), "ann".to_string()),
                ("ai_description".to_string(), format!("shot {i}")),
            ])
        })
        .collect();

    let config = config_for(&dir);
    let fetcher = HttpFetcher::new(&config).unwrap();
    let summary = pipeline::run_records(&config, fetcher, records).await.unwrap();

    assert_eq!(summary.processed, 25);
    assert_eq!(summary.succeeded, 25);

    let manifest = Manifest::load(&dir.path().join("downloads/manifest.json"))
        .await
        .unwrap();
    let ids: Vec<_> = manifest.entries().iter().map(|e| e.id.clone()).collect();
    let expected: Vec<_> = (0..25).map(|i| format!("id{i:02}")).collect();
    assert_eq!(ids, expected);
    assert_eq!(
        manifest.entries()[0].path,
        "downloads/ann/_unknown_date/shot_0_by_ann_id00.jpg"
    );
}

#[tokio::test]
async fn test_rerun_overwrites_with_identical_content() {
    let server = MockServer::start().await;
    mount_images(&server, 4).await;

    let dir = TempDir::new().unwrap();
    write_csv(
        &dir,
        &[
            row("a", &format!("{}/img/a", server.uri()), "ann", "One"),
            row("b", &format!("{}/img/b", server.uri()), "bob", "Two"),
        ],
    );
    let config = config_for(&dir);

    pipeline::run(&config).await.unwrap();
    let first_image = fs::read(dir.path().join("downloads/ann/2020/one_by_ann_a.jpg")).unwrap();
    let first_manifest = read_manifest(dir.path());

    pipeline::run(&config).await.unwrap();
    let second_image = fs::read(dir.path().join("downloads/ann/2020/one_by_ann_a.jpg")).unwrap();
    let second_manifest = read_manifest(dir.path());

    assert_eq!(first_image, second_image);
    assert_eq!(first_manifest, second_manifest);

    let files: Vec<_> = fs::read_dir(dir.path().join("downloads/ann/2020"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(files.len(), 2, "expected one image and one sidecar, got {files:?}");
}

#[tokio::test]
async fn test_manifest_write_failure_keeps_downloads() {
    let server = MockServer::start().await;
    mount_images(&server, 1).await;

    let dir = TempDir::new().unwrap();
    write_csv(&dir, &[row("a", &format!("{}/img/a", server.uri()), "ann", "Kept")]);
    // A directory where the manifest file should go makes the write fail
    fs::create_dir_all(dir.path().join("downloads/manifest.json")).unwrap();

    let summary = pipeline::run(&config_for(&dir)).await.unwrap();

    assert_eq!(summary.succeeded, 1);
    assert!(summary.manifest_path.is_none());
    assert!(dir.path().join("downloads/ann/2020/kept_by_ann_a.jpg").exists());
}

#[tokio::test]
async fn test_limit_processes_first_rows_only() {
    let server = MockServer::start().await;
    mount_images(&server, 2).await;

    let dir = TempDir::new().unwrap();
    let rows: Vec<_> = (0..5)
        .map(|i| row(&format!("r{i}"), &format!("{}/img/{i}", server.uri()), "ann", "Pic"))
        .collect();
    write_csv(&dir, &rows);

    let mut config = config_for(&dir);
    config.limit = Some(2);

    let summary = pipeline::run(&config).await.unwrap();
    assert_eq!(summary.processed, 2);
}

#[tokio::test]
async fn test_missing_csv_is_a_bootstrap_error() {
    let dir = TempDir::new().unwrap();
    let result = pipeline::run(&config_for(&dir)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_zero_group_size_is_rejected() {
    let dir = TempDir::new().unwrap();
    write_csv(&dir, &[]);
    let config = IngestConfig::builder().root(dir.path()).group_size(0).build();
    assert!(pipeline::run(&config).await.is_err());
}
