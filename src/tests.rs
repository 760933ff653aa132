//! Integration tests for the campaign backend.

use std::sync::Arc;

use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::store::RecordStore;
use crate::{create_router, AppState};

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    records_path: std::path::PathBuf,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let records_path = temp_dir.path().join("campaign_records.csv");

        let store = Arc::new(RecordStore::open(&records_path).expect("Failed to open store"));

        let state = AppState { store };
        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        TestFixture {
            client: Client::new(),
            base_url,
            records_path,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn create_campaign(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/campaigns"))
            .json(body)
            .send()
            .await
            .unwrap()
    }
}

fn sample_campaign() -> Value {
    json!({
        "created_by": "Jane Doe",
        "platform": "TikTok",
        "campaign_objective": "Traffic",
        "start_date": "2026-09-01",
        "end_date": "2026-09-30",
        "budget": 1500.0,
        "targeting": {
            "age_range": "18-35",
            "gender": ["All"],
            "languages": ["English"],
            "location_type": "Countries",
            "locations": "USA, Canada",
            "interests": ["Technology", "Gaming"],
            "devices": ["Mobile"]
        }
    })
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_create_campaign_returns_record() {
    let fixture = TestFixture::new().await;

    let resp = fixture.create_campaign(&sample_campaign()).await;
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);

    let campaign_id = body["data"]["campaign_id"].as_str().unwrap();
    let parts: Vec<&str> = campaign_id.split('-').collect();
    assert_eq!(parts.len(), 4);
    assert_eq!(parts[0], "TIK");
    assert_eq!(parts[1], "TRA");
    assert_eq!(parts[2].len(), 14);
    assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
    assert_eq!(parts[3].len(), 8);
    assert!(parts[3].chars().all(|c| c.is_ascii_hexdigit()));

    assert_eq!(body["data"]["created_by"], "Jane Doe");
    assert_eq!(body["data"]["platform"], "TikTok");
    assert_eq!(body["data"]["budget"], 1500.0);
    // creation_date is "YYYY-MM-DD HH:MM:SS"
    assert_eq!(body["data"]["creation_date"].as_str().unwrap().len(), 19);
    // targeting is persisted as an opaque JSON blob
    let blob = body["data"]["targeting_criteria"].as_str().unwrap();
    let targeting: Value = serde_json::from_str(blob).unwrap();
    assert_eq!(targeting["age_range"], "18-35");
}

#[tokio::test]
async fn test_create_requires_creator_and_platform() {
    let fixture = TestFixture::new().await;

    // Missing marketing manager name
    let resp = fixture
        .create_campaign(&json!({ "platform": "TikTok" }))
        .await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    // Missing platform
    let resp2 = fixture
        .create_campaign(&json!({ "created_by": "Jane Doe" }))
        .await;
    assert_eq!(resp2.status(), 400);
    let body2: Value = resp2.json().await.unwrap();
    assert_eq!(body2["error"]["code"], "VALIDATION_ERROR");

    // Blank values are rejected too
    let resp3 = fixture
        .create_campaign(&json!({ "created_by": "  ", "platform": "TikTok" }))
        .await;
    assert_eq!(resp3.status(), 400);

    // Nothing was persisted
    let list: Value = fixture
        .client
        .get(fixture.url("/api/campaigns"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_two_campaigns_each_retrievable_by_search() {
    let fixture = TestFixture::new().await;

    let first: Value = fixture
        .create_campaign(&sample_campaign())
        .await
        .json()
        .await
        .unwrap();
    let first_id = first["data"]["campaign_id"].as_str().unwrap().to_string();

    let second: Value = fixture
        .create_campaign(&json!({
            "created_by": "John Smith",
            "platform": "Facebook",
            "campaign_objective": "Brand Awareness",
            "budget": 800.0
        }))
        .await
        .json()
        .await
        .unwrap();
    let second_id = second["data"]["campaign_id"].as_str().unwrap().to_string();

    // Exactly two rows in the store
    let list: Value = fixture
        .client
        .get(fixture.url("/api/campaigns"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list["data"].as_array().unwrap().len(), 2);

    // Each retrievable by its own generated ID
    for id in [&first_id, &second_id] {
        let found: Value = fixture
            .client
            .get(fixture.url(&format!("/api/search?q={}", id)))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(found["data"]["total"], 1);
        assert_eq!(found["data"]["results"][0]["campaign_id"], id.as_str());
    }
}

#[tokio::test]
async fn test_search_is_case_insensitive_on_platform() {
    let fixture = TestFixture::new().await;
    fixture.create_campaign(&sample_campaign()).await;

    let found: Value = fixture
        .client
        .get(fixture.url("/api/search?q=tiktok"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(found["data"]["total"], 1);
    assert_eq!(found["data"]["results"][0]["platform"], "TikTok");

    let missing: Value = fixture
        .client
        .get(fixture.url("/api/search?q=zzz"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(missing["data"]["total"], 0);
}

#[tokio::test]
async fn test_get_campaign_by_id() {
    let fixture = TestFixture::new().await;

    let created: Value = fixture
        .create_campaign(&sample_campaign())
        .await
        .json()
        .await
        .unwrap();
    let id = created["data"]["campaign_id"].as_str().unwrap();

    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/campaigns/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["campaign_id"], id);
    assert_eq!(body["data"]["platform"], "TikTok");
}

#[tokio::test]
async fn test_not_found_errors() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/campaigns/NOT-A-REAL-ID"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let export_resp = fixture
        .client
        .get(fixture.url("/api/campaigns/NOT-A-REAL-ID/export"))
        .send()
        .await
        .unwrap();
    assert_eq!(export_resp.status(), 404);
}

#[tokio::test]
async fn test_export_round_trips_description() {
    let fixture = TestFixture::new().await;
    let submitted = sample_campaign();

    let created: Value = fixture
        .create_campaign(&submitted)
        .await
        .json()
        .await
        .unwrap();
    let id = created["data"]["campaign_id"].as_str().unwrap();

    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/campaigns/{}/export", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let disposition = resp
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains(&format!("{}_data.json", id)));

    let body = resp.text().await.unwrap();
    // Pretty-printed with 2-space indentation
    assert!(body.starts_with("{\n  "));

    let exported: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(exported, submitted);
}

#[tokio::test]
async fn test_records_survive_store_reopen() {
    let fixture = TestFixture::new().await;
    fixture.create_campaign(&sample_campaign()).await;

    // A fresh store over the same file sees the appended row
    let reopened = RecordStore::open(&fixture.records_path).unwrap();
    let records = reopened.list().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].platform, "TikTok");
}
