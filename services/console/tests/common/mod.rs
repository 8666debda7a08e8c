//! An in-process stand-in for the catalog REST API.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path as UrlPath, State},
    http::{header::AUTHORIZATION, HeaderMap, Method, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use console_lib::adapters::{CookieJar, HexApiAdapter};
use console_lib::app::{Console, Services};
use serde_json::{json, Value};

pub const TOKEN: &str = "tok-123";
pub const PASSWORD: &str = "secret";
pub const API_PATH: &str = "shop";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub auth: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct FakeApi {
    pub products: Mutex<Vec<Value>>,
    pub requests: Mutex<Vec<Recorded>>,
    pub fail_mutations: AtomicBool,
    pub fail_list: AtomicBool,
    next_id: AtomicUsize,
}

impl FakeApi {
    pub fn seeded() -> Arc<Self> {
        let fake = Self::default();
        fake.products.lock().unwrap().push(json!({
            "id": "p1",
            "title": "Hat",
            "category": "caps",
            "origin_price": 300,
            "price": 250,
            "unit": "pc",
            "description": "",
            "content": "",
            "is_enabled": 1,
            "imageUrl": "http://hat",
            "imagesUrl": ["http://hat/2"]
        }));
        Arc::new(fake)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self, method: Method) -> Option<Recorded> {
        self.requests().into_iter().rev().find(|r| r.method == method)
    }

    fn record(&self, method: Method, path: String, headers: &HeaderMap, body: Option<Value>) {
        let auth = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.requests.lock().unwrap().push(Recorded {
            method,
            path,
            auth,
            body,
        });
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) == Some(TOKEN)
}

type Reply = (StatusCode, Json<Value>);

fn denied() -> Reply {
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "success": false, "message": "Please sign in again" })),
    )
}

async fn signin(State(fake): State<Arc<FakeApi>>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    fake.record(Method::POST, "/admin/signin".into(), &headers, Some(body.clone()));
    if body["password"] != PASSWORD {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "message": "wrong password" })),
        );
    }
    let expired = (Utc::now() + chrono::Duration::days(1)).timestamp_millis();
    (
        StatusCode::OK,
        Json(json!({ "success": true, "token": TOKEN, "expired": expired })),
    )
}

async fn check(State(fake): State<Arc<FakeApi>>, headers: HeaderMap) -> Reply {
    fake.record(Method::POST, "/api/user/check".into(), &headers, None);
    if !authorized(&headers) {
        return denied();
    }
    (StatusCode::OK, Json(json!({ "success": true, "uid": "u1" })))
}

async fn list(State(fake): State<Arc<FakeApi>>, headers: HeaderMap) -> Reply {
    fake.record(Method::GET, format!("/api/{API_PATH}/admin/products"), &headers, None);
    if !authorized(&headers) {
        return denied();
    }
    if fake.fail_list.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "success": false, "message": "listing is down" })),
        );
    }
    let products = fake.products.lock().unwrap().clone();
    (
        StatusCode::OK,
        Json(json!({ "success": true, "products": products })),
    )
}

fn mutation_rejected() -> Reply {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "success": false, "message": ["title is required"] })),
    )
}

async fn create(State(fake): State<Arc<FakeApi>>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    fake.record(Method::POST, format!("/api/{API_PATH}/admin/product"), &headers, Some(body.clone()));
    if !authorized(&headers) {
        return denied();
    }
    if fake.fail_mutations.load(Ordering::SeqCst) {
        return mutation_rejected();
    }
    let mut data = body["data"].clone();
    data["id"] = json!(format!("n{}", fake.next_id.fetch_add(1, Ordering::SeqCst) + 1));
    fake.products.lock().unwrap().push(data);
    (StatusCode::OK, Json(json!({ "success": true, "message": "Created" })))
}

async fn update(
    State(fake): State<Arc<FakeApi>>,
    UrlPath(id): UrlPath<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    fake.record(Method::PUT, format!("/api/{API_PATH}/admin/product/{id}"), &headers, Some(body.clone()));
    if !authorized(&headers) {
        return denied();
    }
    if fake.fail_mutations.load(Ordering::SeqCst) {
        return mutation_rejected();
    }
    let mut products = fake.products.lock().unwrap();
    match products.iter_mut().find(|p| p["id"] == id.as_str()) {
        Some(product) => {
            let mut data = body["data"].clone();
            data["id"] = json!(id);
            *product = data;
            (StatusCode::OK, Json(json!({ "success": true, "message": "Updated" })))
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "message": "No such product" })),
        ),
    }
}

async fn remove(
    State(fake): State<Arc<FakeApi>>,
    UrlPath(id): UrlPath<String>,
    headers: HeaderMap,
) -> Reply {
    fake.record(Method::DELETE, format!("/api/{API_PATH}/admin/product/{id}"), &headers, None);
    if !authorized(&headers) {
        return denied();
    }
    if fake.fail_mutations.load(Ordering::SeqCst) {
        return mutation_rejected();
    }
    fake.products.lock().unwrap().retain(|p| p["id"] != id.as_str());
    (StatusCode::OK, Json(json!({ "success": true, "message": "Deleted" })))
}

/// Starts the fake API on an ephemeral port and returns its base URL.
pub async fn spawn(fake: Arc<FakeApi>) -> String {
    let app = Router::new()
        .route("/admin/signin", post(signin))
        .route("/api/user/check", post(check))
        .route(&format!("/api/{API_PATH}/admin/products"), get(list))
        .route(&format!("/api/{API_PATH}/admin/product"), post(create))
        .route(
            &format!("/api/{API_PATH}/admin/product/{{id}}"),
            put(update).delete(remove),
        )
        .with_state(fake);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A console wired to the fake API, keeping its cookie at `cookie`.
pub fn console(base: &str, cookie: &Path) -> Console {
    let api = Arc::new(HexApiAdapter::new(base, API_PATH, Duration::from_secs(5)).unwrap());
    Console::new(Services {
        auth: api.clone(),
        products: api,
        tokens: Arc::new(CookieJar::new(cookie)),
    })
}
