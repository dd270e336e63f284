//! Catalog service layer

use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::model::{
    AddStockRequest, CreateOptionRequest, CreateProductRequest, Product, ProductOption, StockItem,
    StorefrontOption, StorefrontProduct, UpdateOptionRequest, UpdateProductRequest,
};

/// Catalog errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Product not found")]
    ProductNotFound,

    #[error("Product option not found")]
    OptionNotFound,

    #[error("Name must not be empty")]
    EmptyName,

    #[error("Stock content must not be empty")]
    EmptyStockContent,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for CatalogError {
    fn from(e: sqlx::Error) -> Self {
        CatalogError::DatabaseError(e.to_string())
    }
}

/// Catalog service for products, options and stock
#[derive(Clone)]
pub struct CatalogService {
    db_pool: PgPool,
}

impl CatalogService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    // ===== Products =====

    pub async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        let products =
            sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY created_at DESC")
                .fetch_all(&self.db_pool)
                .await?;

        Ok(products)
    }

    pub async fn create_product(
        &self,
        request: CreateProductRequest,
    ) -> Result<Product, CatalogError> {
        if request.name.trim().is_empty() {
            return Err(CatalogError::EmptyName);
        }

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (id, name, price, duration, available, instant_delivery, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.name.trim())
        .bind(request.price)
        .bind(&request.duration)
        .bind(request.available)
        .bind(request.instant_delivery)
        .bind(Utc::now())
        .fetch_one(&self.db_pool)
        .await?;

        Ok(product)
    }

    pub async fn update_product(
        &self,
        id: Uuid,
        request: UpdateProductRequest,
    ) -> Result<Product, CatalogError> {
        if request.name.trim().is_empty() {
            return Err(CatalogError::EmptyName);
        }

        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = $1, price = $2, duration = $3, available = $4,
                instant_delivery = $5, updated_at = $6
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(request.name.trim())
        .bind(request.price)
        .bind(&request.duration)
        .bind(request.available)
        .bind(request.instant_delivery)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(CatalogError::ProductNotFound)?;

        Ok(product)
    }

    /// Delete a product. Options and stock cascade in the schema.
    pub async fn delete_product(&self, id: Uuid) -> Result<(), CatalogError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::ProductNotFound);
        }

        Ok(())
    }

    // ===== Options =====

    pub async fn list_options(&self, product_id: Uuid) -> Result<Vec<ProductOption>, CatalogError> {
        let options = sqlx::query_as::<_, ProductOption>(
            "SELECT * FROM product_options WHERE product_id = $1 ORDER BY created_at",
        )
        .bind(product_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(options)
    }

    pub async fn get_option(&self, id: Uuid) -> Result<Option<ProductOption>, CatalogError> {
        let option = sqlx::query_as::<_, ProductOption>("SELECT * FROM product_options WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(option)
    }

    pub async fn create_option(
        &self,
        product_id: Uuid,
        request: CreateOptionRequest,
    ) -> Result<ProductOption, CatalogError> {
        if request.name.trim().is_empty() {
            return Err(CatalogError::EmptyName);
        }

        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE id = $1")
            .bind(product_id)
            .fetch_one(&self.db_pool)
            .await?;
        if exists == 0 {
            return Err(CatalogError::ProductNotFound);
        }

        let option = sqlx::query_as::<_, ProductOption>(
            r#"
            INSERT INTO product_options
                (id, product_id, name, fulfillment, price, duration, estimated_time,
                 description, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(product_id)
        .bind(request.name.trim())
        .bind(request.fulfillment)
        .bind(request.price)
        .bind(&request.duration)
        .bind(&request.estimated_time)
        .bind(&request.description)
        .bind(request.is_active)
        .bind(Utc::now())
        .fetch_one(&self.db_pool)
        .await?;

        Ok(option)
    }

    pub async fn update_option(
        &self,
        id: Uuid,
        request: UpdateOptionRequest,
    ) -> Result<ProductOption, CatalogError> {
        if request.name.trim().is_empty() {
            return Err(CatalogError::EmptyName);
        }

        let option = sqlx::query_as::<_, ProductOption>(
            r#"
            UPDATE product_options
            SET name = $1, fulfillment = $2, price = $3, duration = $4,
                estimated_time = $5, description = $6, is_active = $7, updated_at = $8
            WHERE id = $9
            RETURNING *
            "#,
        )
        .bind(request.name.trim())
        .bind(request.fulfillment)
        .bind(request.price)
        .bind(&request.duration)
        .bind(&request.estimated_time)
        .bind(&request.description)
        .bind(request.is_active)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(CatalogError::OptionNotFound)?;

        Ok(option)
    }

    pub async fn delete_option(&self, id: Uuid) -> Result<(), CatalogError> {
        let result = sqlx::query("DELETE FROM product_options WHERE id = $1")
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::OptionNotFound);
        }

        Ok(())
    }

    // ===== Stock =====

    /// Bulk stock intake from a newline-delimited paste.
    ///
    /// Blank lines are skipped; each remaining line becomes one unsold
    /// stock item. Returns the number of items inserted.
    pub async fn add_stock(&self, request: AddStockRequest) -> Result<u64, CatalogError> {
        let items: Vec<&str> = request
            .content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        if items.is_empty() {
            return Err(CatalogError::EmptyStockContent);
        }

        let mut tx = self.db_pool.begin().await?;
        let now = Utc::now();

        for content in &items {
            sqlx::query(
                r#"
                INSERT INTO stock_items (id, product_id, option_id, content, is_sold, created_at)
                VALUES ($1, $2, $3, $4, FALSE, $5)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(request.product_id)
            .bind(request.option_id)
            .bind(content)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(items.len() as u64)
    }

    /// Count of unsold items for an option: the "available stock" figure.
    pub async fn available_stock(&self, option_id: Uuid) -> Result<i64, CatalogError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM stock_items WHERE option_id = $1 AND is_sold = FALSE",
        )
        .bind(option_id)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(count)
    }

    /// Unsold stock items for staff views. Content stays staff-only.
    pub async fn list_unsold_stock(&self) -> Result<Vec<StockItem>, CatalogError> {
        let items = sqlx::query_as::<_, StockItem>(
            "SELECT * FROM stock_items WHERE is_sold = FALSE ORDER BY created_at",
        )
        .fetch_all(&self.db_pool)
        .await?;

        Ok(items)
    }

    /// Claim exactly one unsold stock item for an option.
    ///
    /// `FOR UPDATE SKIP LOCKED` makes concurrent claims pick distinct rows;
    /// the `is_sold = FALSE` guard makes the claim at-most-once per item.
    /// Returns `None` when the pool is exhausted.
    pub async fn claim_stock_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        option_id: Uuid,
    ) -> Result<Option<StockItem>, CatalogError> {
        let item = sqlx::query_as::<_, StockItem>(
            r#"
            UPDATE stock_items
            SET is_sold = TRUE
            WHERE id = (
                SELECT id FROM stock_items
                WHERE option_id = $1 AND is_sold = FALSE
                ORDER BY created_at
                LIMIT 1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING *
            "#,
        )
        .bind(option_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(item)
    }

    /// Storefront listing: products with active options and stock counts.
    pub async fn storefront(&self) -> Result<Vec<StorefrontProduct>, CatalogError> {
        let products = self.list_products().await?;

        let options = sqlx::query_as::<_, ProductOption>(
            "SELECT * FROM product_options WHERE is_active = TRUE ORDER BY created_at",
        )
        .fetch_all(&self.db_pool)
        .await?;

        let mut listing = Vec::with_capacity(products.len());
        for product in products {
            let mut views = Vec::new();
            for option in options.iter().filter(|o| o.product_id == product.id) {
                let available_stock = if option.fulfillment.is_auto_delivery() {
                    Some(self.available_stock(option.id).await?)
                } else {
                    None
                };

                views.push(StorefrontOption {
                    id: option.id,
                    name: option.name.clone(),
                    fulfillment: option.fulfillment,
                    price: option.price,
                    duration: option.duration.clone(),
                    estimated_time: option.estimated_time.clone(),
                    description: option.description.clone(),
                    available_stock,
                });
            }

            listing.push(StorefrontProduct {
                id: product.id,
                name: product.name,
                price: product.price,
                duration: product.duration,
                instant_delivery: product.instant_delivery,
                options: views,
            });
        }

        Ok(listing)
    }
}
