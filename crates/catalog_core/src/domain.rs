//! crates/catalog_core/src/domain.rs
//!
//! Defines the pure, core data structures for the catalog console.
//! These structs are independent of any wire or storage format; adapters
//! translate to and from them.

use chrono::{DateTime, Utc};

/// The maximum number of secondary image URLs a product may carry.
pub const MAX_IMAGES: usize = 5;

/// A product record as held by the remote catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Product {
    /// Empty for a record that has not been saved yet.
    pub id: String,
    pub title: String,
    pub category: String,
    pub origin_price: f64,
    pub price: f64,
    pub unit: String,
    pub description: String,
    /// Rich-text body.
    pub content: String,
    pub is_enabled: bool,
    /// Primary image.
    pub image_url: String,
    /// Secondary images, in display order.
    pub images_url: Vec<String>,
}

/// The editable copy of a product bound to the modal form.
///
/// Prices are kept as the raw text typed by the user; they are only coerced
/// to numbers when the draft is turned into a [`ProductPayload`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub id: String,
    pub title: String,
    pub category: String,
    pub origin_price: String,
    pub price: String,
    pub unit: String,
    pub description: String,
    pub content: String,
    pub is_enabled: bool,
    pub image_url: String,
    pub images_url: Vec<String>,
}

impl ProductDraft {
    /// The "new empty record" template.
    pub fn template() -> Self {
        Self::default()
    }

    /// Builds a draft holding the product's current values, prices rendered
    /// as text.
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            category: product.category.clone(),
            origin_price: product.origin_price.to_string(),
            price: product.price.to_string(),
            unit: product.unit.clone(),
            description: product.description.clone(),
            content: product.content.clone(),
            is_enabled: product.is_enabled,
            image_url: product.image_url.clone(),
            images_url: product.images_url.clone(),
        }
    }
}

/// The record sent to the catalog on create or update.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPayload {
    pub id: String,
    pub title: String,
    pub category: String,
    pub origin_price: f64,
    pub price: f64,
    pub unit: String,
    pub description: String,
    pub content: String,
    /// `1` when enabled, `0` otherwise.
    pub is_enabled: u8,
    pub image_url: String,
    /// Never contains empty strings.
    pub images_url: Vec<String>,
}

/// Sign-in form values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

// Represents the bearer credential issued by the catalog on sign-in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthToken {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Per-call request settings handed to every port method.
///
/// This replaces any process-wide default header: a call is authenticated
/// only if the context it receives carries a token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    token: Option<String>,
}

impl RequestContext {
    /// A context that sends no credentials.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// The value for the `Authorization` header, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}
