use axum::{
    Json, Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
    routing::get,
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use randdata_service::{AppState, build_router, config::Config, server};
use serde_json::{Value, json};
use tower::util::ServiceExt;

const SECRET: &[u8] = b"integration-test-signing-secret!";
const KID: &str = "test-key";

/// Serve a key set containing our HMAC key on an ephemeral port and return its URL.
async fn spawn_jwks_server() -> String {
    let key_set = json!({
        "keys": [{
            "kty": "oct",
            "kid": KID,
            "alg": "HS256",
            "k": URL_SAFE_NO_PAD.encode(SECRET),
        }]
    });
    let app = Router::new().route(
        "/.well-known/jwks.json",
        get(move || {
            let key_set = key_set.clone();
            async move { Json(key_set) }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/.well-known/jwks.json", addr)
}

/// A URL on a port nothing is listening on.
async fn dead_jwks_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/jwks.json", addr)
}

fn app_for(jwks_url: String) -> Router {
    let state = AppState::new(Config::with_jwks_url(jwks_url)).expect("Failed to build state");
    build_router(state)
}

async fn test_app() -> Router {
    app_for(spawn_jwks_server().await)
}

fn token_expiring_in(seconds: i64) -> String {
    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some(KID.to_string());
    let claims = json!({
        "sub": "user_123",
        "exp": Utc::now().timestamp() + seconds,
    });
    encode(&header, &claims, &EncodingKey::from_secret(SECRET)).unwrap()
}

fn valid_token() -> String {
    token_expiring_in(600)
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_text(response: axum::response::Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

#[tokio::test]
async fn test_health_is_public() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(get_request("/health", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_bytes(response).await.is_empty());

    // Garbage credentials are ignored
    let response = app
        .oneshot(get_request("/health", Some("garbage")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_data_with_valid_token() {
    let app = test_app().await;

    let response = app
        .oneshot(get_request("/data", Some(&valid_token())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "application/json");

    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    let value = body["random_value"].as_u64().expect("random_value missing");
    assert!(value < 1000);

    let timestamp = body["timestamp"].as_str().expect("timestamp missing");
    assert!(DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn test_data_without_authorization_header() {
    let app = test_app().await;

    let response = app.oneshot(get_request("/data", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(response).await, "Invalid Authorization header");
}

#[tokio::test]
async fn test_data_with_malformed_authorization_header() {
    let app = test_app().await;

    for value in ["Basic dXNlcjpwYXNz", "Bearer", "Bearer a b", "bearer abc"] {
        let request = Request::builder()
            .uri("/data")
            .header(header::AUTHORIZATION, value)
            .body(Body::empty())
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{value:?}");
    }
}

#[tokio::test]
async fn test_data_with_expired_token() {
    let app = test_app().await;

    let response = app
        .oneshot(get_request("/data", Some(&token_expiring_in(-3600))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_data_with_forged_token() {
    let app = test_app().await;

    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some(KID.to_string());
    let forged = encode(
        &header,
        &json!({ "sub": "mallory", "exp": Utc::now().timestamp() + 600 }),
        &EncodingKey::from_secret(b"not-the-published-secret"),
    )
    .unwrap();

    let response = app
        .oneshot(get_request("/data", Some(&forged)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unreachable_key_set_looks_like_bad_token() {
    let app = app_for(dead_jwks_url().await);

    let response = app
        .oneshot(get_request("/data", Some(&valid_token())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(response).await, "Invalid Authorization header");
}

#[tokio::test]
async fn test_data_massive_default_size() {
    let app = test_app().await;

    let response = app
        .oneshot(get_request("/data-massive", Some(&valid_token())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body.as_array().unwrap().len(), 100);
}

#[tokio::test]
async fn test_data_massive_returns_requested_count() {
    let app = test_app().await;
    let token = valid_token();

    for size in [0usize, 1, 37] {
        let response = app
            .clone()
            .oneshot(get_request(
                &format!("/data-massive?size={}", size),
                Some(&token),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        let items = body.as_array().expect("Expected array");
        assert_eq!(items.len(), size);

        for item in items {
            for field in [
                "random_number_1",
                "random_number_2",
                "random_number_3",
                "random_number_4",
            ] {
                assert!(item[field].as_u64().unwrap() < 10_000);
            }
            let text = item["random_text"].as_str().unwrap();
            assert_eq!(text.len(), 20);
            assert!(text.chars().all(|c| c.is_ascii_alphanumeric() || c == ' '));
            assert!(DateTime::parse_from_rfc3339(item["timestamp"].as_str().unwrap()).is_ok());
        }
    }
}

#[tokio::test]
async fn test_data_massive_empty_is_json_array() {
    let app = test_app().await;

    let response = app
        .oneshot(get_request("/data-massive?size=0", Some(&valid_token())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "[]");
}

#[tokio::test]
async fn test_data_massive_rejects_bad_size() {
    let app = test_app().await;
    let token = valid_token();

    let cases = [
        ("-1", "Invalid 'size' parameter. Must be a non-negative integer."),
        ("abc", "Invalid 'size' parameter. Must be an integer."),
    ];

    for (size, message) in cases {
        let response = app
            .clone()
            .oneshot(get_request(
                &format!("/data-massive?size={}", size),
                Some(&token),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, message);
    }
}

#[tokio::test]
async fn test_data_massive_requires_token() {
    let app = test_app().await;

    let response = app
        .oneshot(get_request("/data-massive?size=5", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_get_methods_rejected() {
    let app = test_app().await;
    let token = valid_token();

    for path in ["/data", "/data-massive"] {
        for method in [Method::HEAD, Method::POST, Method::PUT, Method::DELETE] {
            // With and without credentials
            for token in [None, Some(token.as_str())] {
                let mut builder = Request::builder().method(method.clone()).uri(path);
                if let Some(token) = token {
                    builder =
                        builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
                }

                let response = app
                    .clone()
                    .oneshot(builder.body(Body::empty()).unwrap())
                    .await
                    .unwrap();

                assert_eq!(
                    response.status(),
                    StatusCode::METHOD_NOT_ALLOWED,
                    "{method} {path}"
                );
                // HEAD responses carry no body
                if method != Method::HEAD {
                    assert_eq!(body_text(response).await, "Method not allowed");
                }
            }
        }
    }
}

#[tokio::test]
async fn test_oversized_headers_rejected() {
    let app = test_app().await;

    let big = "x".repeat(64 * 1024);
    let mut builder = Request::builder().uri("/health");
    for i in 0..20 {
        builder = builder.header(format!("x-filler-{}", i), big.as_str());
    }

    let response = app
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE);
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let app = test_app().await;

    let response = app.oneshot(get_request("/nope", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_data_massive_uses_first_size() {
    let app = test_app().await;

    let response = app
        .oneshot(get_request("/data-massive?size=3&size=5", Some(&valid_token())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_data_massive_unallocatable_size_is_server_error() {
    let app = test_app().await;

    let response = app
        .oneshot(get_request(
            "/data-massive?size=1000000000000000000",
            Some(&valid_token()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Internal server error");
}

/// Run the full server on an ephemeral port and return its base URL.
async fn spawn_server() -> String {
    let app = test_app().await;
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        server::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

async fn health_with_headers(base: &str, headers: Vec<(String, String)>) -> StatusCode {
    let client = reqwest::Client::new();
    let mut request = client.get(format!("{}/health", base));
    for (name, value) in headers {
        request = request.header(name, value);
    }

    let response = request.send().await.expect("request failed");
    response.status()
}

#[tokio::test]
async fn test_server_accepts_large_header_blocks_under_cap() {
    let base = spawn_server().await;

    // About 600 KiB in ten headers
    let big = "x".repeat(60 * 1024);
    let headers = (0..10)
        .map(|i| (format!("x-filler-{}", i), big.clone()))
        .collect();
    assert_eq!(health_with_headers(&base, headers).await, StatusCode::OK);

    // Many small headers
    let headers = (0..150)
        .map(|i| (format!("x-small-{}", i), "y".to_string()))
        .collect();
    assert_eq!(health_with_headers(&base, headers).await, StatusCode::OK);
}

#[tokio::test]
async fn test_server_rejects_header_blocks_over_cap() {
    let base = spawn_server().await;

    // 16 x 64 KiB values plus their names is just over 1 MiB
    let big = "x".repeat(64 * 1024);
    let headers = (0..16)
        .map(|i| (format!("x-filler-{}", i), big.clone()))
        .collect();

    assert_eq!(
        health_with_headers(&base, headers).await,
        StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE
    );
}

#[tokio::test]
async fn test_server_serves_authenticated_routes() {
    let base = spawn_server().await;

    let response = reqwest::Client::new()
        .get(format!("{}/data-massive?size=2", base))
        .bearer_auth(valid_token())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 2);
}
