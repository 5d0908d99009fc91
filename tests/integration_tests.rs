use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Form, Json, Router};
use chrono::NaiveTime;
use serde_json::{json, Value};

use clinic_client::errors::ApiError;
use clinic_client::models::message::CONNECTIVITY_APOLOGY;
use clinic_client::models::{
    Action, MessageRole, RegisterRequest, Role, ScheduleConfig, UserRole, VerifyDecision,
};
use clinic_client::services::api::ClinicApi;
use clinic_client::services::conversation::{ChatSession, TurnOutcome};
use clinic_client::services::credentials::{AuthContext, MemoryCredentialStore};
use clinic_client::services::transport::{HttpTransport, RequestBody};

// ── Fake backend ──

#[derive(Default)]
struct Recorded {
    auth_headers: Vec<Option<String>>,
    login_form: Option<HashMap<String, String>>,
    register_body: Option<Value>,
    agent_bodies: Vec<Value>,
    config_body: Option<Value>,
    verify_calls: Vec<(String, String, String)>,
}

type Shared = Arc<Mutex<Recorded>>;

fn record_auth(state: &Shared, headers: &HeaderMap) {
    let value = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.lock().unwrap().auth_headers.push(value);
}

async fn login(State(state): State<Shared>, Form(form): Form<HashMap<String, String>>) -> Json<Value> {
    state.lock().unwrap().login_form = Some(form);
    Json(json!({"access_token": "tok-123", "token_type": "bearer", "role": "patient"}))
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let reply = json!({
        "id": "U9",
        "email": body["email"],
        "full_name": body["full_name"],
        "role": body["role"],
        "is_active": true,
        "is_verified": false
    });
    state.lock().unwrap().register_body = Some(body);
    Json(reply)
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    record_auth(&state, &headers);
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some("Bearer tok-123") => Ok(Json(json!({
            "id": "P1",
            "email": "pat@example.com",
            "full_name": "Pat",
            "role": "patient",
            "details": {"age": 30}
        }))),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

async fn agent_execute(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    record_auth(&state, &headers);
    state.lock().unwrap().agent_bodies.push(body.clone());

    let query = body["user_query"].as_str().unwrap_or_default();
    let reply = if query.contains("book me") {
        json!({
            "response_text": "Here are available slots",
            "action_taken": "booking_intent",
            "slots": [{"slot_id": "D1_1000", "time": "10:00 AM"}]
        })
    } else if body["intent"] == "book" {
        json!({"response_text": "Confirmed!", "action_taken": "booking_confirmed"})
    } else {
        json!({"status": "success", "action_taken": "none"})
    };
    Json(reply)
}

async fn doctor_dashboard() -> (StatusCode, &'static str) {
    (StatusCode::SERVICE_UNAVAILABLE, "maintenance")
}

async fn doctor_patients() -> Json<Value> {
    Json(json!([
        {"id": "P1", "name": "Pat", "email": "pat@example.com"},
        {"id": "P2", "name": "Sam", "email": "sam@example.com"}
    ]))
}

async fn inventory_memory() -> Json<Value> {
    Json(json!([{"id": "inv-1", "name": "Composite resin", "stock": 12}]))
}

async fn admin_stats() -> Json<Value> {
    Json(json!({
        "total_users": {"doctors": 4, "patients": 40, "hospitals": 2},
        "action_items": {"pending_doctors": 1, "pending_hospitals": 1},
        "financials": {"revenue": 4500, "appointments": 3}
    }))
}

async fn pending_doctors() -> Json<Value> {
    Json(json!([{
        "id": "D7",
        "name": "Dr. Lee",
        "email": "lee@example.com",
        "license_number": "N/A",
        "specialization": "Orthodontist",
        "joined_at": "2025-06-01T09:00:00"
    }]))
}

async fn pending_hospitals() -> Json<Value> {
    Json(json!([{
        "id": "H3",
        "name": "Harbor Dental",
        "location": "Old Town",
        "contact_email": "desk@harbor.example",
        "is_verified": false
    }]))
}

async fn doctor_config(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    state.lock().unwrap().config_body = Some(body);
    Json(json!({"status": "success"}))
}

async fn verify(
    State(state): State<Shared>,
    Path((entity, id)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let action = query.get("action").cloned().unwrap_or_default();
    state
        .lock()
        .unwrap()
        .verify_calls
        .push((entity.clone(), id, action.clone()));
    Json(json!({"status": "success", "message": format!("{entity} {action}")}))
}

async fn spawn_backend() -> (String, Shared) {
    let state: Shared = Arc::new(Mutex::new(Recorded::default()));
    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/me", get(me))
        .route("/agent/execute", post(agent_execute))
        .route("/doctor/dashboard", get(doctor_dashboard))
        .route("/doctor/patients", get(doctor_patients))
        .route("/doctor/config", put(doctor_config))
        .route("/agent/memory/inventory", get(inventory_memory))
        .route("/admin/dashboard/stats", get(admin_stats))
        .route("/admin/doctors/pending", get(pending_doctors))
        .route("/admin/hospitals/pending", get(pending_hospitals))
        .route("/admin/verify/:entity/:id", post(verify))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), state)
}

fn api_for(base_url: &str, auth: AuthContext) -> ClinicApi {
    ClinicApi::new(HttpTransport::new(base_url, auth, None).unwrap())
}

async fn dead_address() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

// ── Transport ──

#[tokio::test]
async fn test_request_without_credential_has_no_auth_header() {
    let (url, state) = spawn_backend().await;
    let api = api_for(&url, AuthContext::in_memory());

    let reply = api.agent.send_message("hi", json!({}), Role::Patient).await.unwrap();
    assert_eq!(reply.response_text, None);
    assert_eq!(state.lock().unwrap().auth_headers, vec![None]);
}

#[tokio::test]
async fn test_request_with_credential_sends_bearer() {
    let (url, state) = spawn_backend().await;
    let auth = AuthContext::new(Arc::new(MemoryCredentialStore::with_token("tok-123")));
    let api = api_for(&url, auth);

    let me = api.auth.get_me().await.unwrap();
    assert_eq!(me.id, "P1");
    assert_eq!(me.role, UserRole::Patient);
    assert_eq!(
        state.lock().unwrap().auth_headers,
        vec![Some("Bearer tok-123".to_string())]
    );
}

#[tokio::test]
async fn test_unauthorized_surfaces_auth_expired_and_keeps_credential() {
    let (url, _state) = spawn_backend().await;
    let auth = AuthContext::new(Arc::new(MemoryCredentialStore::with_token("stale")));
    let api = api_for(&url, auth.clone());

    let err = api.auth.get_me().await.unwrap_err();
    assert!(err.is_auth_expired());
    assert_eq!(auth.bearer_token().as_deref(), Some("stale"));
}

#[tokio::test]
async fn test_server_error_carries_status_and_body() {
    let (url, _state) = spawn_backend().await;
    let api = api_for(&url, AuthContext::in_memory());

    match api.doctor.get_dashboard_stats().await.unwrap_err() {
        ApiError::Status { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_raw_request_passes_extra_headers() {
    let (url, state) = spawn_backend().await;
    let transport = HttpTransport::new(&url, AuthContext::in_memory(), None).unwrap();

    let mut headers = HeaderMap::new();
    headers.insert("authorization", "Bearer manual".parse().unwrap());
    let resp = transport
        .request(
            reqwest::Method::POST,
            "/agent/execute",
            RequestBody::Json(json!({"user_query": "x", "role": "patient", "agent_type": null, "context": {}})),
            Some(headers),
        )
        .await
        .unwrap();
    assert!(resp.status().is_success());
    assert_eq!(
        state.lock().unwrap().auth_headers,
        vec![Some("Bearer manual".to_string())]
    );
}

// ── Facades ──

#[tokio::test]
async fn test_login_is_form_encoded_and_stores_token() {
    let (url, state) = spawn_backend().await;
    let auth = AuthContext::in_memory();
    let api = api_for(&url, auth.clone());

    let resp = api.auth.login("pat@example.com", "secret").await.unwrap();
    assert_eq!(resp.access_token, "tok-123");

    let form = state.lock().unwrap().login_form.clone().unwrap();
    assert_eq!(form.get("username").map(String::as_str), Some("pat@example.com"));
    assert_eq!(form.get("password").map(String::as_str), Some("secret"));
    assert_eq!(auth.bearer_token().as_deref(), Some("tok-123"));

    // subsequent requests carry the new credential
    api.auth.get_me().await.unwrap();

    api.auth.logout().await.unwrap();
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn test_send_message_sends_explicit_null_agent_type() {
    let (url, state) = spawn_backend().await;
    let api = api_for(&url, AuthContext::in_memory());

    api.agent
        .send_message("hello", json!({"page": "dashboard"}), Role::Patient)
        .await
        .unwrap();

    let body = state.lock().unwrap().agent_bodies[0].clone();
    assert!(body.as_object().unwrap().contains_key("agent_type"));
    assert!(body["agent_type"].is_null());
    assert_eq!(body["context"]["page"], "dashboard");
    assert_eq!(body["role"], "patient");
}

#[tokio::test]
async fn test_book_slot_request_fields() {
    let (url, state) = spawn_backend().await;
    let api = api_for(&url, AuthContext::in_memory());

    let reply = api.agent.book_slot("S1", "P1", Some("2025-06-20")).await.unwrap();
    assert_eq!(reply.response_text.as_deref(), Some("Confirmed!"));

    let body = state.lock().unwrap().agent_bodies[0].clone();
    assert_eq!(body["agent_type"], "appointment");
    assert_eq!(body["intent"], "book");
    assert_eq!(body["slot_id"], "S1");
    assert_eq!(body["patient_id"], "P1");
    assert_eq!(body["date"], "2025-06-20");
}

#[tokio::test]
async fn test_doctor_assistant_sends_doctor_role_and_router() {
    let (url, state) = spawn_backend().await;
    let api = api_for(&url, AuthContext::in_memory());

    api.agent.ask_doctor_assistant("low stock items?").await.unwrap();

    let body = state.lock().unwrap().agent_bodies[0].clone();
    assert_eq!(body["role"], "doctor");
    assert_eq!(body["agent_type"], "router");
    assert_eq!(body["user_query"], "low stock items?");
}

#[tokio::test]
async fn test_register_posts_json_profile() {
    let (url, state) = spawn_backend().await;
    let api = api_for(&url, AuthContext::in_memory());

    let user = api
        .auth
        .register(&RegisterRequest {
            email: "new@example.com".to_string(),
            password: "pw".to_string(),
            full_name: "New Patient".to_string(),
            role: UserRole::Patient,
            specialization: None,
            license_number: None,
            hospital_name: None,
            age: Some(28),
            gender: Some("female".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(user.id, "U9");
    assert_eq!(user.role, UserRole::Patient);
    assert!(user.is_active);

    let body = state.lock().unwrap().register_body.clone().unwrap();
    assert_eq!(body["email"], "new@example.com");
    assert_eq!(body["age"], 28);
}

#[tokio::test]
async fn test_doctor_reads_decode() {
    let (url, _state) = spawn_backend().await;
    let api = api_for(&url, AuthContext::in_memory());

    let patients = api.doctor.get_patients().await.unwrap();
    assert_eq!(patients.len(), 2);
    assert_eq!(patients[1].name, "Sam");
    assert_eq!(patients[0].email.as_deref(), Some("pat@example.com"));

    let inventory = api.doctor.get_inventory_memory().await.unwrap();
    assert_eq!(inventory[0].id, "inv-1");
    assert_eq!(inventory[0].stock, 12);
}

#[tokio::test]
async fn test_admin_reads_decode() {
    let (url, _state) = spawn_backend().await;
    let api = api_for(&url, AuthContext::in_memory());

    let stats = api.admin.get_dashboard_stats().await.unwrap();
    assert_eq!(stats.total_users.patients, 40);
    assert_eq!(stats.action_items.pending_doctors, 1);
    assert_eq!(stats.financials.revenue, 4500.0);

    let doctors = api.admin.get_pending_doctors().await.unwrap();
    assert_eq!(doctors[0].id, "D7");
    assert_eq!(doctors[0].specialization.as_deref(), Some("Orthodontist"));

    let hospitals = api.admin.get_pending_hospitals().await.unwrap();
    assert_eq!(hospitals[0].name, "Harbor Dental");
    assert!(!hospitals[0].is_verified);
}

#[tokio::test]
async fn test_update_config_replaces_whole_schedule() {
    let (url, state) = spawn_backend().await;
    let api = api_for(&url, AuthContext::in_memory());
    let t = |s: &str| NaiveTime::parse_from_str(s, "%H:%M").unwrap();

    let config = ScheduleConfig::new(20, 10, t("08:30"), t("16:00")).unwrap();
    api.doctor.update_config(&config).await.unwrap();

    assert_eq!(
        state.lock().unwrap().config_body.clone().unwrap(),
        json!({"slot_duration": 20, "break_duration": 10, "work_start": "08:30", "work_end": "16:00"})
    );
}

#[tokio::test]
async fn test_verify_doctor_uses_action_query() {
    let (url, state) = spawn_backend().await;
    let api = api_for(&url, AuthContext::in_memory());

    let result = api.admin.verify_doctor("D 7", VerifyDecision::Reject).await.unwrap();
    assert_eq!(result.status, "success");
    assert_eq!(
        state.lock().unwrap().verify_calls,
        vec![("doctor".to_string(), "D 7".to_string(), "reject".to_string())]
    );
}

#[tokio::test]
async fn test_verify_hospital_targets_hospital_path() {
    let (url, state) = spawn_backend().await;
    let api = api_for(&url, AuthContext::in_memory());

    let result = api.admin.verify_hospital("H3", VerifyDecision::Approve).await.unwrap();
    assert_eq!(result.message, "hospital approve");
    assert_eq!(
        state.lock().unwrap().verify_calls,
        vec![("hospital".to_string(), "H3".to_string(), "approve".to_string())]
    );
}

// ── Chat session end to end ──

#[tokio::test]
async fn test_booking_scenario_produces_booking_suggestion() {
    let (url, _state) = spawn_backend().await;
    let api = api_for(&url, AuthContext::in_memory());
    let session = ChatSession::new(Arc::new(api.agent.clone()), Role::Patient);

    let outcome = session.send("book me a slot tomorrow").await;
    assert!(matches!(outcome, TurnOutcome::Replied(_)));

    let log = session.messages();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].role, MessageRole::User);
    assert_eq!(log[1].content, "Here are available slots");
    match &log[1].action {
        Some(action @ Action::BookingSuggestion { slots, .. }) => {
            assert_eq!(action.kind(), "booking_suggestion");
            assert_eq!(slots[0].slot_id, "D1_1000");
        }
        other => panic!("unexpected action: {other:?}"),
    }
}

#[tokio::test]
async fn test_network_failure_produces_apology() {
    let url = dead_address().await;
    let api = api_for(&url, AuthContext::in_memory());
    let session = ChatSession::new(Arc::new(api.agent.clone()), Role::Patient);

    let outcome = session.send("hello?").await;
    match &outcome {
        TurnOutcome::Fallback { error, .. } => assert!(matches!(error, ApiError::Transport(_))),
        other => panic!("unexpected outcome: {other:?}"),
    }

    let log = session.messages();
    assert_eq!(log.len(), 2);
    assert_eq!(log[1].content, CONNECTIVITY_APOLOGY);
    assert!(log[1].action.is_none());
    assert!(!session.is_pending());
}
