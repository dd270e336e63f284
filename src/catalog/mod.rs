//! Product catalog: products, purchasable options, and stock
//!
//! A product is a category; options are the purchasable variants. Options
//! with `FulfillmentType::None` are auto-delivered from a pool of
//! pre-stocked content; every other fulfillment type is handled manually
//! by staff after the order is placed.

mod model;
mod service;

pub use model::{
    AddStockRequest, CreateOptionRequest, CreateProductRequest, FulfillmentType, Product,
    ProductOption, StockItem, StorefrontOption, StorefrontProduct, UpdateOptionRequest,
    UpdateProductRequest,
};
pub use service::{CatalogError, CatalogService};

use crate::error::ApiError;

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::ProductNotFound => {
                ApiError::NotFound("Product not found".to_string())
            }
            CatalogError::OptionNotFound => {
                ApiError::NotFound("Product option not found".to_string())
            }
            CatalogError::EmptyName => {
                ApiError::ValidationError("Name must not be empty".to_string())
            }
            CatalogError::EmptyStockContent => {
                ApiError::ValidationError("Stock content must not be empty".to_string())
            }
            CatalogError::DatabaseError(msg) => ApiError::DatabaseError(msg),
        }
    }
}
