use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::FixedOffset;
use clinic_store::{Practice, Seed, StoreOptions};
use clinic_web::{create_app, AppState};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

fn seeded_app() -> Router {
    let practice = Practice::new(Seed::builtin().unwrap(), &StoreOptions::default()).unwrap();
    create_app(AppState::new(practice, utc()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn test_patient_appointment_date_scenario() {
    let app = create_app(AppState::new(Practice::empty().unwrap(), utc()));

    let (status, patient) = send(
        &app,
        "POST",
        "/api/v1/patients",
        Some(json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "phone": "555-0100",
            "dateOfBirth": "1990-01-01",
            "gender": "Female"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(patient["Id"], 1);
    assert_eq!(patient["allergies"], json!([]));

    let (status, appointment) = send(
        &app,
        "POST",
        "/api/v1/appointments",
        Some(json!({
            "patientId": 1,
            "patientName": "Jane Doe",
            "dateTime": "2024-03-01T09:00:00Z",
            "duration": 30,
            "type": "Consultation",
            "status": "scheduled"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(appointment["Id"], 1);

    let (status, on_day) = send(&app, "GET", "/api/v1/views/appointments?date=2024-03-01", None).await;
    assert_eq!(status, StatusCode::OK);
    let on_day = on_day.as_array().unwrap();
    assert_eq!(on_day.len(), 1);
    assert_eq!(on_day[0]["Id"], 1);
    assert_eq!(on_day[0]["type"], "Consultation");

    let (_, next_day) = send(&app, "GET", "/api/v1/views/appointments?date=2024-03-02", None).await;
    assert_eq!(next_day, json!([]));
}

#[tokio::test]
async fn test_missing_record_is_404() {
    let app = seeded_app();

    let (status, body) = send(&app, "GET", "/api/v1/patients/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], true);
    assert_eq!(body["status"], 404);

    let (status, _) = send(&app, "PUT", "/api/v1/drugs/99", Some(json!({ "name": "X" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_twice() {
    let app = seeded_app();

    let (status, body) = send(&app, "DELETE", "/api/v1/drugs/2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, _) = send(&app, "DELETE", "/api/v1/drugs/2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_keeps_path_id() {
    let app = seeded_app();

    let (status, drug) = send(
        &app,
        "PUT",
        "/api/v1/drugs/1",
        Some(json!({ "Id": 77, "strength": "20mg" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(drug["Id"], 1);
    assert_eq!(drug["name"], "Lisinopril");
    assert_eq!(drug["strength"], "20mg");
}

#[tokio::test]
async fn test_validation_errors_are_400() {
    let app = seeded_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/patients",
        Some(json!({
            "name": "Bad Email",
            "email": "nope",
            "phone": "555",
            "dateOfBirth": "1990-01-01",
            "gender": "Male"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email is invalid");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/prescriptions",
        Some(json!({ "patientId": 1, "medications": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please add at least one medication");

    let (status, _) = send(&app, "GET", "/api/v1/views/appointments?date=03/01/2024", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let app = seeded_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/drugs")
        .header("Content-Type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_save_as_template_ignores_supplied_medications() {
    let app = seeded_app();

    let (status, template) = send(
        &app,
        "POST",
        "/api/v1/prescriptions/1/template",
        Some(json!({
            "name": "BP Maintenance",
            "category": "Cardiology",
            "medications": [{ "name": "IGNORED" }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(template["Id"], 6);
    assert_eq!(template["usageCount"], 0);
    assert_eq!(template["medications"][0]["name"], "Lisinopril");
    assert_eq!(template["medications"].as_array().unwrap().len(), 1);

    let (_, cardiology) = send(&app, "GET", "/api/v1/templates?category=Cardiology", None).await;
    assert_eq!(cardiology.as_array().unwrap().len(), 2);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/prescriptions/99/template",
        Some(json!({ "name": "Orphan" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/prescriptions/1/template",
        Some(json!({ "name": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please enter a template name");
}

#[tokio::test]
async fn test_template_routes() {
    let app = seeded_app();

    let (_, all) = send(&app, "GET", "/api/v1/templates?category=All", None).await;
    assert_eq!(all.as_array().unwrap().len(), 5);

    let (_, chronic) = send(&app, "GET", "/api/v1/templates?category=Chronic%20Care", None).await;
    assert_eq!(chronic.as_array().unwrap().len(), 1);
    assert_eq!(chronic[0]["Id"], 2);

    let (_, none) = send(&app, "GET", "/api/v1/templates?category=Oncology", None).await;
    assert_eq!(none, json!([]));

    let (status, updated) = send(
        &app,
        "PUT",
        "/api/v1/templates/2",
        Some(json!({ "description": "Metformin plus statin" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["description"], "Metformin plus statin");
    assert_eq!(updated["category"], "Chronic Care");

    let (status, _) = send(&app, "DELETE", "/api/v1/templates/2", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", "/api/v1/templates/2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_views() {
    let app = seeded_app();

    let (_, rows) = send(&app, "GET", "/api/v1/views/prescriptions?q=lisinopril", None).await;
    let rows = rows.as_array().unwrap();
    assert!(!rows.is_empty());
    assert_eq!(rows[0]["patientName"], "Sarah Johnson");
    assert_eq!(rows[0]["Id"], 1);

    let (_, drugs) = send(&app, "GET", "/api/v1/views/drugs?q=metformin", None).await;
    assert_eq!(drugs[0]["name"], "Glucophage");

    let (_, templates) = send(
        &app,
        "GET",
        "/api/v1/views/templates?q=diabetes&category=All",
        None,
    )
    .await;
    assert_eq!(templates.as_array().unwrap().len(), 1);

    let (_, patients) = send(&app, "GET", "/api/v1/views/patients", None).await;
    assert_eq!(patients.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_patient_summary_and_dashboard() {
    let app = seeded_app();

    let (status, summary) = send(&app, "GET", "/api/v1/views/patients/1/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["patient"]["name"], "Sarah Johnson");
    assert!(summary["appointments"]
        .as_array()
        .unwrap()
        .iter()
        .all(|apt| apt["patientId"] == 1));

    let (status, _) = send(&app, "GET", "/api/v1/views/patients/99/summary", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, dashboard) = send(&app, "GET", "/api/v1/views/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["stats"]["totalPatients"], 5);
    assert_eq!(dashboard["recentPatients"][0]["Id"], 5);
}

#[tokio::test]
async fn test_health_and_root() {
    let app = seeded_app();

    let (status, health) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");

    let (status, root) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(root["status"], "running");
}

#[tokio::test]
async fn test_crud_across_all_resources() {
    // (路径, 新建载荷, 种子中最大标识)
    let cases = [
        (
            "/api/v1/patients",
            json!({
                "name": "Nora Quinn",
                "email": "nora@example.com",
                "phone": "555-0199",
                "dateOfBirth": "1979-06-02",
                "gender": "Female"
            }),
            5,
        ),
        (
            "/api/v1/appointments",
            json!({
                "patientId": 2,
                "dateTime": "2024-04-02T10:00:00Z",
                "type": "Check-up"
            }),
            6,
        ),
        (
            "/api/v1/assistants",
            json!({
                "name": "Omar Reyes",
                "email": "omar@clinic.com",
                "role": "Receptionist"
            }),
            3,
        ),
        (
            "/api/v1/drugs",
            json!({ "name": "Zyrtec", "genericName": "Cetirizine", "strength": "10mg" }),
            8,
        ),
        (
            "/api/v1/prescriptions",
            json!({
                "patientId": 2,
                "medications": [{ "name": "Zyrtec", "dosage": "10mg" }]
            }),
            4,
        ),
    ];

    for (path, body, seeded_max) in cases {
        let app = seeded_app();
        let fresh = seeded_max + 1;

        let (status, created) = send(&app, "POST", path, Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "create {}", path);
        assert_eq!(created["Id"], fresh, "create {}", path);

        let (status, all) = send(&app, "GET", path, None).await;
        assert_eq!(status, StatusCode::OK, "list {}", path);
        let all = all.as_array().unwrap();
        assert_eq!(all.len(), fresh as usize, "list {}", path);
        assert!(all.iter().any(|record| record["Id"] == fresh), "list {}", path);

        let (status, fetched) = send(&app, "GET", &format!("{}/{}", path, fresh), None).await;
        assert_eq!(status, StatusCode::OK, "get {}", path);
        assert_eq!(fetched, created, "get {}", path);

        let missing = format!("{}/99", path);
        let (status, _) = send(&app, "GET", &missing, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "get missing {}", path);
        let (status, _) = send(&app, "PUT", &missing, Some(json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "update missing {}", path);
        let (status, _) = send(&app, "DELETE", &missing, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "delete missing {}", path);

        let target = format!("{}/{}", path, fresh);
        let (status, _) = send(&app, "DELETE", &target, None).await;
        assert_eq!(status, StatusCode::OK, "delete {}", path);
        let (status, _) = send(&app, "DELETE", &target, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "delete twice {}", path);
    }
}

#[tokio::test]
async fn test_template_draft() {
    let app = seeded_app();

    let (status, draft) = send(
        &app,
        "GET",
        "/api/v1/views/templates/2/draft?patientId=3&drugIds=5",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(draft["Id"], 0);
    assert_eq!(draft["patientId"], 3);
    assert_eq!(draft["templateId"], 2);
    let names: Vec<&str> = draft["medications"]
        .as_array()
        .unwrap()
        .iter()
        .map(|med| med["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Glucophage", "Lipitor", "Ventolin"]);
    assert_eq!(draft["medications"][2]["dosage"], "90mcg/actuation");
    assert_eq!(draft["medications"][2]["frequency"], "Take as needed");

    // 草稿不写入存储，也不计入模板使用次数
    let (_, template) = send(&app, "GET", "/api/v1/templates/2", None).await;
    assert_eq!(template["usageCount"], 8);
    let (_, prescriptions) = send(&app, "GET", "/api/v1/prescriptions", None).await;
    assert_eq!(prescriptions.as_array().unwrap().len(), 4);

    let (status, _) = send(&app, "GET", "/api/v1/views/templates/2/draft?patientId=99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", "/api/v1/views/templates/99/draft?patientId=1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(
        &app,
        "GET",
        "/api/v1/views/templates/2/draft?patientId=1&drugIds=5,x",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(
        &app,
        "GET",
        "/api/v1/views/templates/2/draft?patientId=1&drugIds=42",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_drug_line_item_and_apply_template() {
    let app = seeded_app();

    let (status, medication) = send(&app, "GET", "/api/v1/views/drugs/1/medication", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        medication,
        json!({
            "name": "Lisinopril",
            "genericName": "Lisinopril",
            "dosage": "10mg",
            "frequency": "Take as needed",
            "duration": "7 days",
            "instructions": ""
        })
    );

    let (status, _) = send(&app, "GET", "/api/v1/views/drugs/99/medication", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, draft) = send(
        &app,
        "POST",
        "/api/v1/views/templates/2/apply",
        Some(json!({
            "patientId": 1,
            "medications": [{ "name": "glucophage", "dosage": "1000mg" }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(draft["templateId"], 2);
    assert_eq!(draft["medications"].as_array().unwrap().len(), 2);
    assert_eq!(draft["medications"][0]["dosage"], "1000mg");
    assert_eq!(draft["medications"][1]["name"], "Lipitor");
}
