//! HTTP tests for the reqwest-backed Graph client
//!
//! Runs a local axum server standing in for `graph.microsoft.com` and sends
//! real requests through `Office365Transport`.

use std::sync::Arc;

use acton_office365::config::Office365Config;
use acton_office365::events::SimpleEventDispatcher;
use acton_office365::graph::{GraphClient, GraphClientError, ReqwestGraphClient, SendMailRequest};
use acton_office365::message::{MimePart, OutgoingMessage};
use acton_office365::transport::{Office365Transport, SendOutcome, Transport, TransportError};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use parking_lot::Mutex;

#[derive(Clone)]
struct FakeGraph {
    status: StatusCode,
    body: &'static str,
    seen: Arc<Mutex<Vec<(Option<String>, serde_json::Value)>>>,
}

async fn send_mail(
    State(graph): State<FakeGraph>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, [(&'static str, &'static str); 1], &'static str) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    graph.seen.lock().push((auth, body));

    (graph.status, [("request-id", "test-request-id")], graph.body)
}

/// Start a fake Graph endpoint and return its base URL with the captured requests
async fn spawn_graph(
    status: StatusCode,
    body: &'static str,
) -> (String, Arc<Mutex<Vec<(Option<String>, serde_json::Value)>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let state = FakeGraph {
        status,
        body,
        seen: seen.clone(),
    };
    let app = Router::new()
        .route("/v1.0/me/sendMail", post(send_mail))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/v1.0"), seen)
}

fn config(base_url: &str) -> Office365Config {
    Office365Config::default()
        .with_base_url(base_url)
        .with_timeout_secs(5)
}

fn message() -> OutgoingMessage {
    OutgoingMessage::new()
        .from_named("me@contoso.com", "Me")
        .to("user@example.com")
        .bcc("audit@example.com")
        .subject("Invoice")
        .html("<b>Due</b>")
        .attach(MimePart::attachment("invoice.txt", "text/plain", "total: 42"))
}

#[tokio::test]
async fn test_accepted_over_http() {
    let (base_url, seen) = spawn_graph(StatusCode::ACCEPTED, "").await;
    let transport =
        Office365Transport::with_config("token-123", SimpleEventDispatcher::shared(), &config(&base_url))
            .unwrap();

    let outcome = transport.send(&message()).await.unwrap();
    assert!(matches!(outcome, SendOutcome::Sent { recipients: 2 }));

    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    let (auth, body) = &seen[0];
    assert_eq!(auth.as_deref(), Some("Bearer token-123"));
    assert_eq!(body["message"]["subject"], "Invoice");
    assert_eq!(body["message"]["body"]["contentType"], "html");
    assert_eq!(body["message"]["body"]["content"], "<b>Due</b>");
    assert_eq!(
        body["message"]["toRecipients"][0]["emailAddress"]["address"],
        "user@example.com"
    );
    assert_eq!(
        body["message"]["bccRecipients"][0]["emailAddress"]["address"],
        "audit@example.com"
    );
    assert!(body["message"].get("ccRecipients").is_none());
    assert!(body["message"].get("from").is_none());
    assert!(body.get("saveToSentItems").is_none());
    assert_eq!(body["message"]["attachments"][0]["name"], "invoice.txt");
}

#[tokio::test]
async fn test_options_reach_the_wire() {
    let (base_url, seen) = spawn_graph(StatusCode::ACCEPTED, "").await;
    let config = config(&base_url)
        .with_save_to_sent_items(false)
        .with_send_as_sender();
    let transport =
        Office365Transport::with_config("token", SimpleEventDispatcher::shared(), &config).unwrap();

    let _ = transport.send(&message()).await.unwrap();

    let seen = seen.lock();
    let body = &seen[0].1;
    assert_eq!(body["saveToSentItems"], false);
    assert_eq!(body["message"]["from"]["emailAddress"]["address"], "me@contoso.com");
    assert_eq!(body["message"]["from"]["emailAddress"]["name"], "Me");
}

#[tokio::test]
async fn test_unauthorized_over_http() {
    let (base_url, _) = spawn_graph(
        StatusCode::UNAUTHORIZED,
        r#"{"error":{"code":"InvalidAuthenticationToken","message":"Access token has expired."}}"#,
    )
    .await;
    let transport =
        Office365Transport::with_config("expired", SimpleEventDispatcher::shared(), &config(&base_url))
            .unwrap();

    match transport.send(&message()).await {
        Err(TransportError::InvalidToken(err)) => {
            assert_eq!(err.code(), "InvalidAuthenticationToken");
        }
        other => panic!("expected InvalidToken, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_over_http() {
    let (base_url, _) = spawn_graph(StatusCode::BAD_GATEWAY, "bad gateway").await;
    let transport =
        Office365Transport::with_config("token", SimpleEventDispatcher::shared(), &config(&base_url))
            .unwrap();

    match transport.send(&message()).await {
        Err(TransportError::Transport(exception)) => {
            assert_eq!(exception.message(), "Response error: 502");
            assert_eq!(exception.response().text(), "bad gateway");
            assert_eq!(exception.response().request_id(), Some("test-request-id"));
        }
        other => panic!("expected Transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_client_maps_client_errors() {
    let (base_url, _) = spawn_graph(StatusCode::NOT_FOUND, "").await;
    let client = ReqwestGraphClient::new("token", &config(&base_url)).unwrap();
    let request: SendMailRequest = serde_json::from_value(serde_json::json!({
        "message": {
            "subject": "s",
            "body": { "contentType": "text", "content": "b" }
        }
    }))
    .unwrap();

    match client.send_mail(&request).await {
        Err(GraphClientError::Status { response }) => {
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_failure_is_request_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transport = Office365Transport::with_config(
        "token",
        SimpleEventDispatcher::shared(),
        &config(&format!("http://{addr}")),
    )
    .unwrap();

    let result = transport.send(&message()).await;
    assert!(matches!(
        result,
        Err(TransportError::Client(GraphClientError::Request(_)))
    ));
}
