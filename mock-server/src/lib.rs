//! In-memory HTTP API used to exercise client pipelines over real HTTP.
//!
//! Besides a small customer resource, the routes cover the response shapes
//! a pipeline must negotiate: JSON, plain text, an HTML page standing in
//! for a misconfigured gateway, and empty 204 responses.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IpData {
    pub ip: String,
    pub country: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct NewCustomer {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Customer>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/ip", get(check_ip))
        .route("/customers", post(create_customer))
        .route("/customers/{id}", get(get_customer).delete(delete_customer))
        .route("/greeting", get(greeting))
        .route("/gateway", get(gateway))
        .route("/headers", get(echo_headers))
        .route("/search", get(search))
        .route("/logo", get(logo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn check_ip() -> Json<IpData> {
    Json(IpData {
        ip: "127.0.0.1".to_string(),
        country: "Australia".to_string(),
    })
}

async fn create_customer(
    State(db): State<Db>,
    Json(input): Json<NewCustomer>,
) -> (StatusCode, Json<Customer>) {
    let customer = Customer {
        id: Uuid::new_v4(),
        name: input.name,
        email: input.email,
    };
    debug!(id = %customer.id, "created customer");
    db.write().await.insert(customer.id, customer.clone());
    (StatusCode::CREATED, Json(customer))
}

async fn get_customer(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Customer>, StatusCode> {
    let customers = db.read().await;
    customers.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn delete_customer(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    let mut customers = db.write().await;
    customers
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}

// `&str` responses are sent as `text/plain; charset=utf-8`.
async fn greeting() -> &'static str {
    "Hello, world"
}

async fn gateway() -> Html<&'static str> {
    Html("<html><body><h1>Welcome to nginx!</h1></body></html>")
}

/// PNG signature followed by bytes that are not valid UTF-8.
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0xFF, 0xFE];

async fn logo() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/png")], PNG_BYTES)
}

async fn echo_headers(headers: HeaderMap) -> Json<BTreeMap<String, String>> {
    let echoed = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    Json(echoed)
}

async fn search(Query(params): Query<BTreeMap<String, String>>) -> Json<BTreeMap<String, String>> {
    debug!(?params, "search");
    Json(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_serializes_to_json() {
        let customer = Customer {
            id: Uuid::nil(),
            name: "Ada".to_string(),
            email: None,
        };
        let json = serde_json::to_value(&customer).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["name"], "Ada");
        assert!(json["email"].is_null());
    }

    #[test]
    fn new_customer_email_is_optional() {
        let input: NewCustomer = serde_json::from_str(r#"{"name":"Ada"}"#).unwrap();
        assert_eq!(input.name, "Ada");
        assert!(input.email.is_none());
    }

    #[test]
    fn new_customer_rejects_missing_name() {
        let result: Result<NewCustomer, _> = serde_json::from_str(r#"{"email":"a@b.c"}"#);
        assert!(result.is_err());
    }
}
