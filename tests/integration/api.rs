use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use callback_bridge::config::{Config, ConnectConfig, PinpointConfig};
use callback_bridge::{build_router, AppState, Stats};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_state(connect_url: &str, pinpoint_url: &str) -> AppState {
    AppState {
        config: Config {
            keyword: "callback".to_string(),
            connect: ConnectConfig {
                contact_flow_id: "flow-1".to_string(),
                instance_id: "inst-1".to_string(),
                queue_id: "queue-1".to_string(),
                fallback_number: "+15550001111".to_string(),
                endpoint: Some(connect_url.to_string()),
            },
            pinpoint: PinpointConfig {
                application_id: "app-1".to_string(),
                endpoint: Some(pinpoint_url.to_string()),
            },
            ..Config::default()
        },
        http: reqwest::Client::new(),
        stats: Arc::new(Stats::default()),
    }
}

fn sns_request(number: &str, body_text: &str) -> Request<Body> {
    let message = serde_json::json!({
        "originationNumber": number,
        "messageBody": body_text,
    })
    .to_string();
    let envelope = serde_json::json!({
        "Records": [{"Sns": {"Message": message, "Timestamp": "2026-08-29T12:00:00.000Z"}}]
    });
    Request::builder()
        .method("POST")
        .uri("/v1/inbound/sms")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(envelope.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let connect = MockServer::start().await;
    let pinpoint = MockServer::start().await;
    let app = build_router(test_state(&connect.uri(), &pinpoint.uri()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let value = body_json(response).await;
    assert_eq!(value["status"], "ok");
}

#[tokio::test]
async fn test_inbound_dispatch_flow() {
    let connect = MockServer::start().await;
    let pinpoint = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/phone/number/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "NumberValidateResponse": { "PhoneTypeCode": 1, "PhoneType": "LANDLINE" }
        })))
        .expect(1)
        .mount(&pinpoint)
        .await;
    Mock::given(method("PUT"))
        .and(path("/contact/outbound-voice"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"ContactId": "contact-xyz"})),
        )
        .expect(1)
        .mount(&connect)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/apps/app-1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "MessageResponse": {
                "Result": {
                    "+15551234567": { "DeliveryStatus": "SUCCESSFUL" }
                }
            }
        })))
        .expect(1)
        .mount(&pinpoint)
        .await;

    let state = test_state(&connect.uri(), &pinpoint.uri());
    let app = build_router(state.clone());

    let response = app
        .oneshot(sns_request("5551234567", "text CALLBACK please"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let value = body_json(response).await;
    assert_eq!(value["status"], "dispatched");
    assert_eq!(value["contact_id"], "contact-xyz");
}

#[tokio::test]
async fn test_inbound_skip_reported() {
    let connect = MockServer::start().await;
    let pinpoint = MockServer::start().await;
    let app = build_router(test_state(&connect.uri(), &pinpoint.uri()));

    let response = app
        .oneshot(sns_request("5551234567", "no trigger word here"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let value = body_json(response).await;
    assert_eq!(value["status"], "skipped");
    assert_eq!(value["reason"], "keyword_not_found");
}

#[tokio::test]
async fn test_inbound_malformed_envelope_is_bad_request() {
    let connect = MockServer::start().await;
    let pinpoint = MockServer::start().await;
    let app = build_router(test_state(&connect.uri(), &pinpoint.uri()));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/inbound/sms")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value = body_json(response).await;
    assert!(value["error"].as_str().unwrap().contains("no records"));
}

#[tokio::test]
async fn test_inbound_unparseable_message_is_bad_request() {
    let connect = MockServer::start().await;
    let pinpoint = MockServer::start().await;
    let app = build_router(test_state(&connect.uri(), &pinpoint.uri()));

    let envelope = serde_json::json!({
        "Records": [{"Sns": {"Message": "definitely not json"}}]
    });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/inbound/sms")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(envelope.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_status_counters_track_outcomes() {
    let connect = MockServer::start().await;
    let pinpoint = MockServer::start().await;
    let state = test_state(&connect.uri(), &pinpoint.uri());

    let app = build_router(state.clone());
    let response = app
        .oneshot(sns_request("5551234567", "nothing relevant"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let app = build_router(state.clone());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let value = body_json(response).await;
    assert_eq!(value["received"], 1);
    assert_eq!(value["dispatched"], 0);
    assert_eq!(value["skipped"], 1);
}
