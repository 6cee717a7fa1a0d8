use std::collections::BTreeMap;

use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Customer, IpData, PNG_BYTES};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn content_type(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

// --- content types ---

#[tokio::test]
async fn ip_is_json() {
    let resp = app().oneshot(get("/ip")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp), "application/json");
    let ip: IpData = body_json(resp).await;
    assert_eq!(ip.country, "Australia");
}

#[tokio::test]
async fn greeting_is_plain_text() {
    let resp = app().oneshot(get("/greeting")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp), "text/plain; charset=utf-8");
    assert_eq!(body_bytes(resp).await, "Hello, world");
}

#[tokio::test]
async fn gateway_is_html() {
    let resp = app().oneshot(get("/gateway")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(content_type(&resp).starts_with("text/html"));
}

#[tokio::test]
async fn logo_is_binary_png() {
    let resp = app().oneshot(get("/logo")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp), "image/png");
    assert_eq!(body_bytes(resp).await.as_ref(), PNG_BYTES);
}

// --- echo ---

#[tokio::test]
async fn headers_are_echoed() {
    let request = Request::builder()
        .uri("/headers")
        .header("authorization", "Bearer abc123")
        .header("x-client-name", "pipeclient")
        .body(String::new())
        .unwrap();
    let resp = app().oneshot(request).await.unwrap();

    let echoed: BTreeMap<String, String> = body_json(resp).await;
    assert_eq!(echoed["authorization"], "Bearer abc123");
    assert_eq!(echoed["x-client-name"], "pipeclient");
}

#[tokio::test]
async fn search_echoes_decoded_query() {
    let resp = app()
        .oneshot(get("/search?q=a+b&callback=http%3A%2F%2Flocalhost%3A5000"))
        .await
        .unwrap();

    let echoed: BTreeMap<String, String> = body_json(resp).await;
    assert_eq!(echoed["q"], "a b");
    assert_eq!(echoed["callback"], "http://localhost:5000");
}

// --- customers ---

#[tokio::test]
async fn create_customer_returns_201() {
    let resp = app()
        .oneshot(json_request("POST", "/customers", r#"{"name":"Ada"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let customer: Customer = body_json(resp).await;
    assert_eq!(customer.name, "Ada");
    assert!(customer.email.is_none());
}

#[tokio::test]
async fn create_customer_without_json_content_type_is_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/customers")
        .body(r#"{"name":"Ada"}"#.to_string())
        .unwrap();
    let resp = app().oneshot(request).await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn create_customer_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/customers", r#"{"not_name":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn get_customer_not_found() {
    let resp = app()
        .oneshot(get("/customers/00000000-0000-0000-0000-000000000000"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn get_customer_bad_uuid_returns_400() {
    let resp = app().oneshot(get("/customers/not-a-uuid")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn customer_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/customers",
            r#"{"name":"Grace","email":"grace@example.com"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Customer = body_json(resp).await;
    let id = created.id;

    // get
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("/customers/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Customer = body_json(resp).await;
    assert_eq!(fetched.name, "Grace");
    assert_eq!(fetched.email.as_deref(), Some("grace@example.com"));

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(&format!("/customers/{id}"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // get after delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("/customers/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
