//! services/console/src/adapters/hex_api.rs
//!
//! This module contains the adapter for the remote catalog REST API.
//! It implements the `AuthService` and `ProductRepository` ports from the `core`
//! crate on top of `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use catalog_core::domain::{AuthToken, Credentials, Product, ProductPayload, RequestContext};
use catalog_core::ports::{AuthService, PortError, PortResult, ProductRepository};
use chrono::{DateTime, Utc};
use reqwest::{header::AUTHORIZATION, Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that talks to the catalog's admin endpoints.
#[derive(Debug, Clone)]
pub struct HexApiAdapter {
    client: Client,
    api_base: String,
    api_path: String,
}

impl HexApiAdapter {
    /// Creates a new `HexApiAdapter`.
    pub fn new(
        api_base: &str,
        api_path: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_path: api_path.trim_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Self::new(&config.api_base, &config.api_path, config.request_timeout)
    }

    /// `{base}/api/{path}/{suffix}`
    fn catalog_url(&self, suffix: &str) -> String {
        format!("{}/api/{}/{}", self.api_base, self.api_path, suffix)
    }

    fn request(&self, method: Method, url: &str, ctx: &RequestContext) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match ctx.token() {
            Some(token) => builder.header(AUTHORIZATION, token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> PortResult<T> {
        let response = builder.send().await.map_err(map_transport)?;
        let status = response.status();
        let body = response.text().await.map_err(map_transport)?;

        if !status.is_success() {
            let message = server_message(&body).unwrap_or_else(|| fallback_message(status));
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    PortError::Unauthorized(message)
                }
                _ => PortError::Server {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        // Some endpoints answer 200 with `success: false`.
        if let Ok(envelope) = serde_json::from_str::<Envelope>(&body) {
            if envelope.success == Some(false) {
                return Err(PortError::Server {
                    status: status.as_u16(),
                    message: envelope
                        .message
                        .as_ref()
                        .and_then(message_text)
                        .unwrap_or_else(|| fallback_message(status)),
                });
            }
        }

        serde_json::from_str(&body).map_err(|e| PortError::Decode(e.to_string()))
    }

    async fn mutate(&self, builder: RequestBuilder, action: &str) -> PortResult<()> {
        let envelope: Envelope = self.send(builder).await?;
        debug!(
            action,
            message = envelope.message.as_ref().and_then(message_text).as_deref(),
            "Catalog mutation accepted"
        );
        Ok(())
    }
}

//=========================================================================================
// Wire Records
//=========================================================================================

#[derive(Deserialize)]
struct Envelope {
    success: Option<bool>,
    message: Option<Value>,
}

#[derive(Serialize)]
struct SignInRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct SignInRecord {
    token: String,
    #[serde(deserialize_with = "de_millis")]
    expired: i64,
}

#[derive(Deserialize)]
struct ProductListRecord {
    #[serde(default)]
    products: Value,
}

#[derive(Deserialize)]
struct ProductRecord {
    #[serde(default, deserialize_with = "de_text")]
    id: String,
    #[serde(default, deserialize_with = "de_text")]
    title: String,
    #[serde(default, deserialize_with = "de_text")]
    category: String,
    #[serde(default, deserialize_with = "de_number")]
    origin_price: f64,
    #[serde(default, deserialize_with = "de_number")]
    price: f64,
    #[serde(default, deserialize_with = "de_text")]
    unit: String,
    #[serde(default, deserialize_with = "de_text")]
    description: String,
    #[serde(default, deserialize_with = "de_text")]
    content: String,
    #[serde(default, deserialize_with = "de_flag")]
    is_enabled: bool,
    #[serde(default, rename = "imageUrl", deserialize_with = "de_text")]
    image_url: String,
    #[serde(default, rename = "imagesUrl", deserialize_with = "de_images")]
    images_url: Vec<String>,
}

impl ProductRecord {
    fn to_domain(self) -> Product {
        Product {
            id: self.id,
            title: self.title,
            category: self.category,
            origin_price: self.origin_price,
            price: self.price,
            unit: self.unit,
            description: self.description,
            content: self.content,
            is_enabled: self.is_enabled,
            image_url: self.image_url,
            images_url: self.images_url,
        }
    }
}

#[derive(Serialize)]
struct PayloadRecord<'a> {
    data: ProductBody<'a>,
}

#[derive(Serialize)]
struct ProductBody<'a> {
    #[serde(skip_serializing_if = "str::is_empty")]
    id: &'a str,
    title: &'a str,
    category: &'a str,
    origin_price: f64,
    price: f64,
    unit: &'a str,
    description: &'a str,
    content: &'a str,
    is_enabled: u8,
    #[serde(rename = "imageUrl")]
    image_url: &'a str,
    #[serde(rename = "imagesUrl")]
    images_url: &'a [String],
}

impl<'a> PayloadRecord<'a> {
    fn from_domain(payload: &'a ProductPayload) -> Self {
        Self {
            data: ProductBody {
                id: &payload.id,
                title: &payload.title,
                category: &payload.category,
                origin_price: payload.origin_price,
                price: payload.price,
                unit: &payload.unit,
                description: &payload.description,
                content: &payload.content,
                is_enabled: payload.is_enabled,
                image_url: &payload.image_url,
                images_url: &payload.images_url,
            },
        }
    }
}

//=========================================================================================
// `AuthService` and `ProductRepository` Trait Implementations
//=========================================================================================

#[async_trait]
impl AuthService for HexApiAdapter {
    async fn sign_in(&self, credentials: &Credentials) -> PortResult<AuthToken> {
        let url = format!("{}/admin/signin", self.api_base);
        let body = SignInRequest {
            username: &credentials.username,
            password: &credentials.password,
        };
        let builder = self
            .request(Method::POST, &url, &RequestContext::anonymous())
            .json(&body);
        let record: SignInRecord = self.send(builder).await.map_err(|e| match e {
            PortError::Server { message, .. } => PortError::Unauthorized(message),
            other => other,
        })?;

        let expires_at = DateTime::<Utc>::from_timestamp_millis(record.expired).ok_or_else(|| {
            PortError::Decode(format!("expiry {} is out of range", record.expired))
        })?;
        Ok(AuthToken {
            token: record.token,
            expires_at,
        })
    }

    async fn check(&self, ctx: &RequestContext) -> PortResult<()> {
        let url = format!("{}/api/user/check", self.api_base);
        let _: Envelope = self.send(self.request(Method::POST, &url, ctx)).await?;
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for HexApiAdapter {
    async fn list(&self, ctx: &RequestContext) -> PortResult<Vec<Product>> {
        let url = self.catalog_url("admin/products");
        let record: ProductListRecord = self.send(self.request(Method::GET, &url, ctx)).await?;

        // The listing is an array, but older deployments key it by id.
        let items = match record.products {
            Value::Array(items) => items,
            Value::Object(map) => map.into_iter().map(|(_, item)| item).collect(),
            Value::Null => Vec::new(),
            other => {
                return Err(PortError::Decode(format!(
                    "products has unexpected shape: {}",
                    other
                )))
            }
        };

        items
            .into_iter()
            .map(|item| {
                serde_json::from_value::<ProductRecord>(item)
                    .map(ProductRecord::to_domain)
                    .map_err(|e| PortError::Decode(e.to_string()))
            })
            .collect()
    }

    async fn create(&self, ctx: &RequestContext, payload: &ProductPayload) -> PortResult<()> {
        let url = self.catalog_url("admin/product");
        let builder = self
            .request(Method::POST, &url, ctx)
            .json(&PayloadRecord::from_domain(payload));
        self.mutate(builder, "create").await
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        id: &str,
        payload: &ProductPayload,
    ) -> PortResult<()> {
        let url = self.catalog_url(&format!("admin/product/{}", id));
        let builder = self
            .request(Method::PUT, &url, ctx)
            .json(&PayloadRecord::from_domain(payload));
        self.mutate(builder, "update").await
    }

    async fn delete(&self, ctx: &RequestContext, id: &str) -> PortResult<()> {
        let url = self.catalog_url(&format!("admin/product/{}", id));
        self.mutate(self.request(Method::DELETE, &url, ctx), "delete")
            .await
    }
}

//=========================================================================================
// Helpers
//=========================================================================================

fn map_transport(e: reqwest::Error) -> PortError {
    if e.is_decode() {
        PortError::Decode(e.to_string())
    } else {
        PortError::Transport(e.to_string())
    }
}

fn fallback_message(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

/// Pulls the `message` field out of an error body, if the body is JSON.
fn server_message(body: &str) -> Option<String> {
    match serde_json::from_str::<Envelope>(body) {
        Ok(envelope) => envelope.message.as_ref().and_then(message_text),
        Err(_) => {
            warn!(body, "Error response was not JSON");
            None
        }
    }
}

/// The message is a string, or a list of strings for validation failures.
fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        _ => None,
    }
}

fn de_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

fn de_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0.0,
    })
}

fn de_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => matches!(s.trim(), "1" | "true"),
        _ => false,
    })
}

fn de_images<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn de_millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .ok_or_else(|| serde::de::Error::custom("expired is not an integer")),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom("expired is not an integer")),
        _ => Err(serde::de::Error::custom("expired is missing")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn product_record_decodes_leniently() {
        let record: ProductRecord = serde_json::from_value(json!({
            "id": "-Nabc",
            "title": "Shirt",
            "origin_price": "120",
            "price": 99,
            "is_enabled": 1,
            "imageUrl": null,
            "imagesUrl": ["a", null, "b"]
        }))
        .unwrap();
        let product = record.to_domain();

        assert_eq!(product.id, "-Nabc");
        assert_eq!(product.origin_price, 120.0);
        assert_eq!(product.price, 99.0);
        assert!(product.is_enabled);
        assert_eq!(product.image_url, "");
        assert_eq!(product.images_url, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(product.unit, "");
    }

    #[test]
    fn payload_serializes_numbers_and_flag() {
        let payload = ProductPayload {
            id: String::new(),
            title: "Shirt".into(),
            category: "tops".into(),
            origin_price: 120.0,
            price: 99.5,
            unit: "pc".into(),
            description: String::new(),
            content: String::new(),
            is_enabled: 1,
            image_url: "main".into(),
            images_url: vec!["a".into()],
        };

        let body = serde_json::to_value(PayloadRecord::from_domain(&payload)).unwrap();

        assert_eq!(body["data"]["origin_price"], json!(120.0));
        assert_eq!(body["data"]["price"], json!(99.5));
        assert_eq!(body["data"]["is_enabled"], json!(1));
        assert_eq!(body["data"]["imageUrl"], json!("main"));
        assert_eq!(body["data"]["imagesUrl"], json!(["a"]));
        assert!(body["data"].get("id").is_none());
    }

    #[test]
    fn message_text_joins_lists() {
        assert_eq!(message_text(&json!("bad")), Some("bad".to_string()));
        assert_eq!(
            message_text(&json!(["title required", "price required"])),
            Some("title required, price required".to_string())
        );
        assert_eq!(message_text(&json!(3)), None);
    }

    #[test]
    fn urls_are_built_from_base_and_path() {
        let adapter =
            HexApiAdapter::new("https://api.example.com/v2/", "/shop/", Duration::from_secs(5))
                .unwrap();
        assert_eq!(
            adapter.catalog_url("admin/products"),
            "https://api.example.com/v2/api/shop/admin/products"
        );
    }
}
