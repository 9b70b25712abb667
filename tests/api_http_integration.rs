//! HTTP-level integration tests for the lead API.
//!
//! Collaborators are in-process fakes, so these run without network access
//! or credentials. Requests go through the full router (CORS and trace
//! layers included) via `tower::ServiceExt::oneshot`.

#![cfg(feature = "server")]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::{json, Map, Value};
use tower::ServiceExt;

use willow_leads::api::{create_router, ApiState};
use willow_leads::error::ProviderError;
use willow_leads::momentum::{Clock, InMemoryMomentumStore, MomentumCounter};
use willow_leads::protocol::CmaRequest;
use willow_leads::providers::{
    CmaGenerator, CrmSync, NoteLogger, NoteReceipt, PersonDataProvider, PropertyDataProvider,
};

// ── Fakes ──────────────────────────────────────────────────────

#[derive(Default)]
struct FakePeople {
    people: HashMap<String, Value>,
}

#[async_trait]
impl PersonDataProvider for FakePeople {
    async fn fetch_person(&self, person_id: &str) -> Result<Value, ProviderError> {
        self.people
            .get(person_id)
            .cloned()
            .ok_or_else(|| ProviderError::Status {
                provider: "FUB",
                status: 404,
                body: "not found".into(),
            })
    }
}

/// Returns a fixed lookup result for every address.
struct FakeProperties {
    response: Result<Value, u16>,
}

#[async_trait]
impl PropertyDataProvider for FakeProperties {
    async fn lookup_property(&self, _address: &str) -> Result<Value, ProviderError> {
        self.response.clone().map_err(|status| ProviderError::Status {
            provider: "ATTOM",
            status,
            body: "upstream failure".into(),
        })
    }
}

#[derive(Default)]
struct RecordingCrm {
    updates: Mutex<Vec<(String, Map<String, Value>)>>,
    notes: Mutex<Vec<(u64, String)>>,
    cma_requests: Mutex<Vec<CmaRequest>>,
}

#[async_trait]
impl CrmSync for RecordingCrm {
    async fn update_person(
        &self,
        person_id: &str,
        fields: &Map<String, Value>,
    ) -> Result<(), ProviderError> {
        self.updates
            .lock()
            .unwrap()
            .push((person_id.to_string(), fields.clone()));
        Ok(())
    }
}

#[async_trait]
impl NoteLogger for RecordingCrm {
    async fn create_note(&self, person_id: u64, body: &str) -> Result<NoteReceipt, ProviderError> {
        self.notes.lock().unwrap().push((person_id, body.to_string()));
        Ok(NoteReceipt {
            note_id: Some(json!(555)),
        })
    }
}

#[async_trait]
impl CmaGenerator for RecordingCrm {
    async fn generate_cma(&self, request: &CmaRequest) -> Result<Value, ProviderError> {
        self.cma_requests.lock().unwrap().push(request.clone());
        Ok(json!({ "id": 42, "edit_url": "https://cloudcma.example/cmas/42/edit" }))
    }
}

struct FixedClock(NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

// ── Test app builder ───────────────────────────────────────────

struct TestApp {
    state: ApiState,
    crm: Arc<RecordingCrm>,
}

fn reference_person() -> Value {
    json!({
        "id": 999,
        "firstName": "Dana",
        "customFelloLeadScore": 85,
        "customFelloEmailClicks": "10",
        "customCloudCMARequestCount": 3,
        "addresses": [
            { "street": "12 Orchard Ln", "city": "Bend", "state": "OR", "code": "97701" }
        ]
    })
}

fn build_app(property_response: Result<Value, u16>) -> TestApp {
    let mut people = HashMap::new();
    people.insert("999".to_string(), reference_person());
    people.insert("1".to_string(), json!({ "person": { "id": 1 } }));

    let crm = Arc::new(RecordingCrm::default());
    let clock = FixedClock(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    let state = ApiState {
        people: Arc::new(FakePeople { people }),
        properties: Arc::new(FakeProperties {
            response: property_response,
        }),
        crm: crm.clone(),
        notes: crm.clone(),
        cma: crm.clone(),
        momentum: Arc::new(MomentumCounter::new(
            Arc::new(clock),
            Arc::new(InMemoryMomentumStore::new()),
        )),
    };
    TestApp { state, crm }
}

fn default_app() -> TestApp {
    build_app(Ok(json!({ "property": [] })))
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = create_router(app.state.clone())
        .oneshot(request)
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn post(app: &TestApp, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn get(app: &TestApp, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

fn attom_property(lot_acres: f64, market_value: f64) -> Value {
    json!({
        "property": [{
            "lot": { "lotSize2": lot_acres },
            "summary": { "yearBuilt": 1998 },
            "building": { "rooms": { "beds": 4, "bathsFull": 3 } },
            "assessment": { "market": { "mktTtlValue": market_value } }
        }]
    })
}

// ── Health ─────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_ok() {
    let app = default_app();
    let (status, body) = get(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

// ── Behavioral scoring ─────────────────────────────────────────

#[tokio::test]
async fn scoring_reference_lead() {
    let app = default_app();
    let (status, body) = post(&app, "/api/behavioral-scoring", json!({ "personId": 999 })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["personId"], "999");
    assert_eq!(body["score"], 57);
    assert_eq!(body["priority"], "HOT");
    assert_eq!(
        body["triggers"],
        json!(["HIGH_FELLO_SCORE", "SUSTAINED_EMAIL_ENGAGEMENT", "MULTI_CMA_REQUEST"])
    );
    assert_eq!(
        body["breakdown"],
        json!({ "fello": 30, "cloudCma": 15, "willow": 13, "sierra": 0 })
    );
    assert_eq!(body["rawData"]["felloEmailClicks"], 10);
    assert_eq!(body["rawData"]["address"], "12 Orchard Ln, Bend, OR 97701");
}

#[tokio::test]
async fn scoring_accepts_string_person_id() {
    let app = default_app();
    let (status, body) = post(&app, "/api/behavioral-scoring", json!({ "personId": "1" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"], 0);
    assert_eq!(body["priority"], "COLD");
    assert_eq!(body["triggers"], json!([]));
}

#[tokio::test]
async fn scoring_requires_person_id() {
    let app = default_app();
    let (status, body) = post(&app, "/api/behavioral-scoring", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "personId required");
}

#[tokio::test]
async fn scoring_surfaces_provider_failure() {
    let app = default_app();
    let (status, body) = post(&app, "/api/behavioral-scoring", json!({ "personId": 404 })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to calculate behavioral score");
    assert!(body["details"].as_str().unwrap().contains("404"));
}

// ── Guidance and briefing ──────────────────────────────────────

#[tokio::test]
async fn guidance_follows_primary_trigger() {
    let app = default_app();
    let (status, body) = post(&app, "/api/agent-guidance", json!({ "personId": 999 })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["priority"], "HOT");
    assert_eq!(body["primaryTrigger"], "HIGH_FELLO_SCORE");
    assert_eq!(
        body["triggerLabels"],
        json!(["High Fello Score", "Sustained Email Engagement", "Multi Cma Request"])
    );
    assert_eq!(body["whyNow"], "High Fello Engagement Score");
    assert_eq!(body["action"], "Call Now");
    assert!(body["script"].as_str().unwrap().contains("high-demand zone"));
}

#[tokio::test]
async fn guidance_defaults_for_quiet_lead() {
    let app = default_app();
    let (_, body) = post(&app, "/api/agent-guidance", json!({ "personId": 1 })).await;

    assert_eq!(body["primaryTrigger"], "DEFAULT");
    assert_eq!(body["action"], "Check In");
}

#[tokio::test]
async fn briefing_keeps_rationale_out_of_transcript() {
    let app = default_app();
    let (status, body) = post(&app, "/api/briefing", json!({ "personId": 999 })).await;

    assert_eq!(status, StatusCode::OK);
    let transcript = body["transcript"].as_str().unwrap();
    assert!(transcript.starts_with("[Suggested Voice]:"));
    assert!(!transcript.contains("High Fello Engagement Score"));
    assert!(body["agentContext"]
        .as_str()
        .unwrap()
        .contains("High Fello Engagement Score"));
    assert_eq!(body["momentum"], 1);

    let notes = app.crm.notes.lock().unwrap().clone();
    assert_eq!(notes, vec![(999, "Listened to Audio Lead Review".to_string())]);
}

// ── CMA smart defaults ─────────────────────────────────────────

#[tokio::test]
async fn smart_defaults_requires_address() {
    let app = default_app();
    let (status, body) = post(&app, "/api/cma-smart-defaults", json!({ "address": "  " })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "address required");
}

#[tokio::test]
async fn smart_defaults_rural_lot() {
    let app = build_app(Ok(attom_property(6.2, 420_000.0)));
    let (status, body) = post(
        &app,
        "/api/cma-smart-defaults",
        json!({ "address": "88 Ranch Rd, Sisters, OR" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["protocol"], "RURAL");
    assert_eq!(
        body["defaults"],
        json!({ "radius": 3, "daysBack": 545, "maxComparables": 15, "priceVariance": 15 })
    );
    assert_eq!(body["propertyIntelligence"]["lotSize"], 6.2);
    assert_eq!(body["propertyIntelligence"]["estimatedValue"], 420_000);
    assert_eq!(
        body["propertyIntelligence"]["valueRange"],
        json!({ "low": 399_000, "high": 441_000 })
    );
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn smart_defaults_luxury_urban() {
    let app = build_app(Ok(attom_property(0.3, 1_200_000.0)));
    let (_, body) = post(&app, "/api/cma-smart-defaults", json!({ "address": "1 Main St" })).await;

    assert_eq!(body["protocol"], "URBAN");
    assert_eq!(
        body["defaults"],
        json!({ "radius": 1, "daysBack": 730, "maxComparables": 12, "priceVariance": 20 })
    );
}

#[tokio::test]
async fn smart_defaults_fall_back_on_provider_error() {
    let app = build_app(Err(503));
    let (status, body) = post(&app, "/api/cma-smart-defaults", json!({ "address": "1 Main St" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["protocol"], "FALLBACK");
    assert_eq!(
        body["defaults"],
        json!({ "radius": 1, "daysBack": 365, "maxComparables": 20, "priceVariance": 10 })
    );
    assert_eq!(body["propertyIntelligence"], Value::Null);
    assert!(body["error"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn smart_defaults_fall_back_without_record() {
    let app = default_app();
    let (status, body) = post(&app, "/api/cma-smart-defaults", json!({ "address": "1 Main St" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["protocol"], "FALLBACK");
    assert_eq!(body["error"], "No property record found for address");
}

// ── CloudCMA generation ────────────────────────────────────────

#[tokio::test]
async fn generate_fills_missing_parameters_from_urban_base() {
    let app = default_app();
    let (status, body) = post(
        &app,
        "/api/cloudcma-generate",
        json!({ "personId": 999, "address": "1 Main St", "radius": 2.5, "daysBack": 0 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["personId"], "999");
    assert_eq!(body["cma"]["id"], 42);

    let sent = app.crm.cma_requests.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].address, "1 Main St");
    assert_eq!(sent[0].radius, 2.5);
    assert_eq!(sent[0].days_back, 365);
    assert_eq!(sent[0].max_comparables, 20);
    assert_eq!(sent[0].price_variance, 10);
}

#[tokio::test]
async fn generate_requires_address() {
    let app = default_app();
    let (status, _) = post(&app, "/api/cloudcma-generate", json!({ "personId": 999 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.crm.cma_requests.lock().unwrap().is_empty());
}

// ── CRM write-back and momentum ────────────────────────────────

#[tokio::test]
async fn fub_sync_writes_all_fields() {
    let app = default_app();
    let (status, body) = post(
        &app,
        "/api/fub-sync",
        json!({ "personId": 999, "cmaGeneratedDate": "2024-05-30T10:00:00Z" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["fieldsUpdated"].as_array().unwrap().len(), 6);

    let updates = app.crm.updates.lock().unwrap().clone();
    assert_eq!(updates.len(), 1);
    let (person_id, fields) = &updates[0];
    assert_eq!(person_id, "999");
    assert_eq!(fields["customCloudCMALastRequest"], "2024-05-30T10:00:00.000Z");
    assert_eq!(fields["customCloudCMARequestCount"], "INCREMENT");
    assert_eq!(fields["customWillowStatus"], "Active");
    assert_eq!(fields["customWillowWhyNowTrigger"], "CMA Generated");
}

#[tokio::test]
async fn log_action_records_note_and_momentum() {
    let app = default_app();

    let (_, before) = get(&app, "/api/momentum").await;
    assert_eq!(before, json!({ "date": "2024-06-01", "count": 0 }));

    let (status, body) = post(
        &app,
        "/api/log-action",
        json!({ "personId": "999", "noteBody": "Called, left voicemail" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["noteId"], 555);
    assert_eq!(body["message"], "Note logged successfully");
    assert_eq!(body["momentum"], 1);

    let (_, after) = get(&app, "/api/momentum").await;
    assert_eq!(after["count"], 1);
}

#[tokio::test]
async fn log_action_validates_input() {
    let app = default_app();

    let (status, body) = post(&app, "/api/log-action", json!({ "personId": 999 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "personId and noteBody required");

    let (status, body) = post(
        &app,
        "/api/log-action",
        json!({ "personId": "abc", "noteBody": "hello" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "personId must be numeric");

    assert!(app.crm.notes.lock().unwrap().is_empty());
    let (_, momentum) = get(&app, "/api/momentum").await;
    assert_eq!(momentum["count"], 0);
}

#[tokio::test]
async fn log_action_accepts_float_person_id() {
    let app = default_app();
    let (status, body) = post(
        &app,
        "/api/log-action",
        json!({ "personId": 999.0, "noteBody": "Sent market report" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["momentum"], 1);
    let notes = app.crm.notes.lock().unwrap().clone();
    assert_eq!(notes, vec![(999, "Sent market report".to_string())]);
}

#[tokio::test]
async fn smart_defaults_rural_lot_with_units() {
    let app = build_app(Ok(json!({
        "property": [{ "lot": { "lotSize2": "5.5 acres" } }]
    })));
    let (status, body) = post(&app, "/api/cma-smart-defaults", json!({ "address": "9 Farm Rd" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["protocol"], "RURAL");
    assert_eq!(body["propertyIntelligence"]["lotSize"], 5.5);
}

#[tokio::test]
async fn guidance_script_is_served_verbatim() {
    let app = default_app();
    let (_, body) = post(&app, "/api/agent-guidance", json!({ "personId": 1 })).await;
    assert_eq!(
        body["script"],
        "Just reviewing my priority client list and wanted to ensure our valuation \
         of your home is still accurate given this months market changes."
    );
}
