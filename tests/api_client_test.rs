//! HTTP client against a mock inspection API.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sitecheck::api::{ApiConnector, ApiCredentials, ApiError, HttpConnector, HttpInspectionApi, InspectionApi, SignatureFile};

fn credentials() -> ApiCredentials {
    ApiCredentials {
        token: "tok-123".to_string(),
        work_site_id: "12".to_string(),
    }
}

fn client(server: &MockServer) -> HttpInspectionApi {
    HttpInspectionApi::new(&server.uri(), credentials()).expect("client")
}

fn signature() -> SignatureFile {
    SignatureFile {
        file_name: "signature.png".to_string(),
        mime: "image/png".to_string(),
        bytes: b"PNGDATA".to_vec(),
    }
}

#[tokio::test]
async fn witnesses_are_fetched_with_token_and_site() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/user/witness/"))
        .and(query_param("work_site_id", "12"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 5, "username": "asha", "company": "EPC Contractor"},
            {"id": 7, "username": "ben"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let witnesses = client(&server).list_witnesses().await.expect("witnesses");

    assert_eq!(witnesses.len(), 2);
    assert_eq!(witnesses[0].display_name(), "asha (EPC Contractor)");
    assert_eq!(witnesses[1].company, "");
}

#[tokio::test]
async fn connector_builds_clients_under_a_path_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/backend/api/auth/user/witness/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let connector = HttpConnector::new(&format!("{}/backend", server.uri())).expect("connector");
    let api = connector.connect(credentials());

    assert!(api.list_witnesses().await.expect("witnesses").is_empty());
}

#[tokio::test]
async fn unauthorized_witness_call_is_flagged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid token."})))
        .mount(&server)
        .await;

    let err = client(&server).list_witnesses().await.expect_err("should fail");

    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn create_posts_json_and_expects_201() {
    let server = MockServer::start().await;
    let payload = json!({"drawing_no": "DWG-7", "witness_1": 5, "witness_2": 7, "checklists": {}});
    Mock::given(method("POST"))
        .and(path("/api/electrical/transformer-checklist/"))
        .and(query_param("work_site_id", "12"))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 42})))
        .expect(1)
        .mount(&server)
        .await;

    let created = client(&server)
        .create_report("api/electrical/transformer-checklist/", &payload)
        .await
        .expect("created");

    assert_eq!(created.id, Some(42));
}

#[tokio::test]
async fn create_with_200_is_not_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 42})))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .create_report("api/electrical/transformer-checklist/", &json!({}))
        .await
        .expect_err("200 is not 201");

    assert!(matches!(err, ApiError::Status { status: 200, .. }));
}

#[tokio::test]
async fn create_failure_carries_non_field_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"non_field_errors": ["Duplicate report."]})))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .create_report("api/civil/culvert-work/", &json!({}))
        .await
        .expect_err("400");

    assert_eq!(err.non_field_errors(), ["Duplicate report."]);
}

#[tokio::test]
async fn list_accepts_paginated_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/civil/culvert-work/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 2, "results": [{"id": 1}, {"id": 2}]})))
        .mount(&server)
        .await;

    let records = client(&server).list_reports("api/civil/culvert-work/").await.expect("list");

    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn fetch_appends_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/civil/culvert-work/9/"))
        .and(query_param("work_site_id", "12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 9, "actions": []})))
        .expect(1)
        .mount(&server)
        .await;

    let record = client(&server).fetch_report("api/civil/culvert-work/", 9).await.expect("fetch");

    assert_eq!(record["id"], 9);
}

#[tokio::test]
async fn fetch_bad_json_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = client(&server).fetch_report("api/civil/culvert-work/", 9).await.expect_err("decode");

    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn approve_puts_multipart_signature() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/civil/culvert-work/9/approve/"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .approve("/api/civil/culvert-work/9/approve/", signature())
        .await
        .expect("approved");

    let requests = server.received_requests().await.expect("recording enabled");
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data"), "{content_type}");
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains(r#"name="signature"; filename="signature.png""#), "{body}");
    assert!(body.contains("PNGDATA"));
}

#[tokio::test]
async fn approve_accepts_absolute_action_url() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/elsewhere/approve/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let absolute = format!("{}/elsewhere/approve/", server.uri());
    client(&server).approve(&absolute, signature()).await.expect("approved");
}

#[tokio::test]
async fn approve_failure_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .approve("/api/civil/culvert-work/9/approve/", signature())
        .await
        .expect_err("500");

    assert!(matches!(err, ApiError::Status { status: 500, .. }));
}
