//! Catalog models and request DTOs

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

/// Product category. `price` and option prices are minor units.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: i64,
    pub duration: Option<String>,
    pub available: i32,
    pub instant_delivery: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// How an option gets fulfilled after purchase.
///
/// `None` means no customer-supplied data is needed: the order is served
/// from pre-stocked content. The other variants name the data the customer
/// must supply and staff deliver manually.
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "fulfillment_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentType {
    None,
    EmailPassword,
    Link,
    Text,
}

impl FulfillmentType {
    /// Auto-delivery options are served from stock with no staff action.
    pub fn is_auto_delivery(&self) -> bool {
        matches!(self, FulfillmentType::None)
    }
}

/// Purchasable variant of a product
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct ProductOption {
    pub id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub fulfillment: FulfillmentType,
    pub price: i64,
    pub duration: Option<String>,
    pub estimated_time: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One unit of redeemable content for an auto-delivery option.
///
/// `content` is never exposed to customers until it is claimed by an order.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct StockItem {
    pub id: Uuid,
    pub product_id: Uuid,
    pub option_id: Option<Uuid>,
    pub content: String,
    pub is_sold: bool,
    pub created_at: DateTime<Utc>,
}

/// Request DTO for creating or updating a product
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(range(min = 0))]
    pub price: i64,
    pub duration: Option<String>,
    #[serde(default)]
    pub available: i32,
    #[serde(default)]
    pub instant_delivery: bool,
}

pub type UpdateProductRequest = CreateProductRequest;

/// Request DTO for creating an option under a product
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOptionRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub fulfillment: FulfillmentType,
    #[validate(range(min = 0))]
    pub price: i64,
    pub duration: Option<String>,
    pub estimated_time: Option<String>,
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

pub type UpdateOptionRequest = CreateOptionRequest;

fn default_true() -> bool {
    true
}

/// Bulk stock intake: newline-delimited content, one item per line
#[derive(Debug, Deserialize, Validate)]
pub struct AddStockRequest {
    pub product_id: Uuid,
    pub option_id: Option<Uuid>,
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: String,
}

/// Storefront view of an option: stock count, never raw content
#[derive(Debug, Serialize)]
pub struct StorefrontOption {
    pub id: Uuid,
    pub name: String,
    pub fulfillment: FulfillmentType,
    pub price: i64,
    pub duration: Option<String>,
    pub estimated_time: Option<String>,
    pub description: Option<String>,
    pub available_stock: Option<i64>,
}

/// Storefront view of a product with its active options
#[derive(Debug, Serialize)]
pub struct StorefrontProduct {
    pub id: Uuid,
    pub name: String,
    pub price: i64,
    pub duration: Option<String>,
    pub instant_delivery: bool,
    pub options: Vec<StorefrontOption>,
}
