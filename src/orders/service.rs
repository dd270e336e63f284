//! Order service layer - placement, status machine, chat channel

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::catalog::{CatalogService, FulfillmentType, ProductOption};
use crate::coupons::{CouponError, CouponService};
use crate::tokens::{Token, TokenError, TokenService};

use super::model::{
    MessageSender, Order, OrderMessage, OrderStatus, PlaceOrderRequest, UpdateOrderStatusRequest,
};

/// Notice posted into the chat when staff need a fresh fulfillment link.
const RESEND_NOTICE: &str =
    "The link you provided is invalid or expired. Please send a new link in the chat.";

/// Order workflow errors
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Token is not valid or is blocked")]
    InvalidToken,

    #[error("Product option not found")]
    OptionNotFound,

    #[error("Product option is inactive")]
    InactiveOption,

    #[error("Insufficient token balance")]
    InsufficientBalance,

    #[error("Option is out of stock")]
    OutOfStock,

    #[error("Missing required field: {0}")]
    MissingInput(&'static str),

    #[error("Order not found")]
    NotFound,

    #[error("Illegal status transition from {from:?} to {to:?}")]
    IllegalTransition { from: OrderStatus, to: OrderStatus },

    #[error("Order is not in progress")]
    NotInProgress,

    #[error(transparent)]
    Coupon(#[from] CouponError),

    #[error("Message must not be empty")]
    EmptyMessage,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for OrderError {
    fn from(e: sqlx::Error) -> Self {
        OrderError::DatabaseError(e.to_string())
    }
}

impl From<TokenError> for OrderError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::InsufficientBalance => OrderError::InsufficientBalance,
            TokenError::NotFound | TokenError::Blocked | TokenError::EmptyValue => {
                OrderError::InvalidToken
            }
            TokenError::DuplicateValue => OrderError::DatabaseError(e.to_string()),
            TokenError::DatabaseError(msg) => OrderError::DatabaseError(msg),
        }
    }
}

/// Order workflow service
#[derive(Clone)]
pub struct OrderService {
    db_pool: PgPool,
}

impl OrderService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Place an order for a product option against a token.
    ///
    /// Runs as one transaction: token lock, option check, coupon apply,
    /// balance debit, stock claim (auto-delivery), order insert. Any
    /// failure rolls the whole placement back, so there is no path that
    /// debits a token without creating the order.
    pub async fn place_order(&self, request: PlaceOrderRequest) -> Result<Order, OrderError> {
        let token_value = request.token.trim();
        if token_value.is_empty() {
            return Err(OrderError::InvalidToken);
        }

        let mut tx = self.db_pool.begin().await?;

        // Lock the token row for the duration of the placement so
        // concurrent orders on the same token serialize here.
        let token =
            sqlx::query_as::<_, Token>("SELECT * FROM tokens WHERE token = $1 FOR UPDATE")
                .bind(token_value)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(OrderError::InvalidToken)?;

        if token.is_blocked {
            return Err(OrderError::InvalidToken);
        }

        let option =
            sqlx::query_as::<_, ProductOption>("SELECT * FROM product_options WHERE id = $1")
                .bind(request.option_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(OrderError::OptionNotFound)?;

        if !option.is_active {
            return Err(OrderError::InactiveOption);
        }

        let (email, password, verification_link) =
            validate_fulfillment_input(&option, &request)?;

        let mut amount = option.price;
        if let Some(code) = request.coupon_code.as_deref().filter(|c| !c.trim().is_empty()) {
            amount = CouponService::apply_in_tx(&mut tx, code, amount).await?;
        }

        if token.balance < amount {
            return Err(OrderError::InsufficientBalance);
        }
        // Conditional debit re-checks the balance under the row lock.
        TokenService::debit_in_tx(&mut tx, token.id, amount).await?;

        let (status, response_message) = if option.fulfillment.is_auto_delivery() {
            let item = CatalogService::claim_stock_in_tx(&mut tx, option.id)
                .await
                .map_err(|e| OrderError::DatabaseError(e.to_string()))?
                .ok_or(OrderError::OutOfStock)?;
            // Delivered content goes straight onto the order; no staff
            // action is needed, so the order starts completed.
            (OrderStatus::Completed, Some(item.content))
        } else {
            (OrderStatus::Pending, None)
        };

        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders
                (id, token_id, product_id, option_id, amount, status,
                 email, password, verification_link, response_message,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(token.id)
        .bind(option.product_id)
        .bind(option.id)
        .bind(amount)
        .bind(status)
        .bind(email)
        .bind(password)
        .bind(verification_link)
        .bind(response_message)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            order_number = order.order_number,
            amount = order.amount,
            status = order.status.as_str(),
            "Order placed"
        );

        Ok(order)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Order>, OrderError> {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(order)
    }

    pub async fn list(&self, status: Option<OrderStatus>) -> Result<Vec<Order>, OrderError> {
        let orders = match status {
            Some(status) => {
                sqlx::query_as::<_, Order>(
                    "SELECT * FROM orders WHERE status = $1 ORDER BY created_at DESC",
                )
                .bind(status)
                .fetch_all(&self.db_pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY created_at DESC")
                    .fetch_all(&self.db_pool)
                    .await?
            }
        };

        Ok(orders)
    }

    /// Customer lookup by display number, revalidating token ownership.
    pub async fn get_by_number_for_token(
        &self,
        order_number: i64,
        token_value: &str,
    ) -> Result<Order, OrderError> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT o.* FROM orders o
            JOIN tokens t ON o.token_id = t.id
            WHERE o.order_number = $1 AND t.token = $2
            "#,
        )
        .bind(order_number)
        .bind(token_value.trim())
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(OrderError::NotFound)?;

        Ok(order)
    }

    /// Staff status update. Legal transitions only; rejection does not
    /// touch the token balance — refunds are a separate workflow.
    pub async fn update_status(
        &self,
        id: Uuid,
        request: UpdateOrderStatusRequest,
    ) -> Result<Order, OrderError> {
        let mut tx = self.db_pool.begin().await?;

        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(OrderError::NotFound)?;

        if !order.status.can_transition_to(request.status) {
            return Err(OrderError::IllegalTransition {
                from: order.status,
                to: request.status,
            });
        }

        // A transition without a message keeps whatever is already on the
        // order (staff notes, auto-delivered content).
        let updated = sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders
            SET status = $1, response_message = COALESCE($2, response_message), updated_at = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(request.status)
        .bind(&request.response_message)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            order_number = updated.order_number,
            from = order.status.as_str(),
            to = updated.status.as_str(),
            "Order status updated"
        );

        Ok(updated)
    }

    /// Hard delete. Deliberately no balance side effect: deleting an
    /// order never refunds the token.
    pub async fn delete(&self, id: Uuid) -> Result<(), OrderError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(OrderError::NotFound);
        }

        Ok(())
    }

    /// Ask the customer for a fresh fulfillment link via the chat
    /// channel. Only meaningful while the order is being worked on.
    pub async fn request_fulfillment_resend(&self, id: Uuid) -> Result<OrderMessage, OrderError> {
        let order = self.get(id).await?.ok_or(OrderError::NotFound)?;

        if order.status != OrderStatus::InProgress {
            return Err(OrderError::NotInProgress);
        }

        self.insert_message(order.id, MessageSender::Admin, RESEND_NOTICE)
            .await
    }

    /// Post a message into an order's chat channel.
    pub async fn post_message(
        &self,
        order_id: Uuid,
        sender: MessageSender,
        message: &str,
    ) -> Result<OrderMessage, OrderError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(OrderError::EmptyMessage);
        }

        // Surface a clean not-found instead of an FK violation.
        if self.get(order_id).await?.is_none() {
            return Err(OrderError::NotFound);
        }

        self.insert_message(order_id, sender, message).await
    }

    pub async fn list_messages(&self, order_id: Uuid) -> Result<Vec<OrderMessage>, OrderError> {
        let messages = sqlx::query_as::<_, OrderMessage>(
            "SELECT * FROM order_messages WHERE order_id = $1 ORDER BY created_at",
        )
        .bind(order_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(messages)
    }

    async fn insert_message(
        &self,
        order_id: Uuid,
        sender: MessageSender,
        message: &str,
    ) -> Result<OrderMessage, OrderError> {
        let msg = sqlx::query_as::<_, OrderMessage>(
            r#"
            INSERT INTO order_messages (id, order_id, sender, message, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(order_id)
        .bind(sender)
        .bind(message)
        .bind(Utc::now())
        .fetch_one(&self.db_pool)
        .await?;

        Ok(msg)
    }
}

/// Check the customer supplied what the option's fulfillment type needs.
///
/// Returns the (email, password, verification_link) triple to stamp on
/// the order.
fn validate_fulfillment_input(
    option: &ProductOption,
    request: &PlaceOrderRequest,
) -> Result<(Option<String>, Option<String>, Option<String>), OrderError> {
    fn required(value: &Option<String>, name: &'static str) -> Result<String, OrderError> {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or(OrderError::MissingInput(name))
    }

    match option.fulfillment {
        FulfillmentType::None => Ok((None, None, None)),
        FulfillmentType::EmailPassword => {
            let email = required(&request.email, "email")?;
            let password = required(&request.password, "password")?;
            Ok((Some(email), Some(password), None))
        }
        FulfillmentType::Link => {
            let link = required(&request.verification_link, "verification_link")?;
            Ok((None, None, Some(link)))
        }
        FulfillmentType::Text => {
            // Free-text input shares the email column; there is no
            // dedicated column for it in the order record.
            let text = required(&request.text, "text")?;
            Ok((Some(text), None, None))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn option_with(fulfillment: FulfillmentType) -> ProductOption {
        ProductOption {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            name: "1 month".to_string(),
            fulfillment,
            price: 2000,
            duration: None,
            estimated_time: None,
            description: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn request() -> PlaceOrderRequest {
        PlaceOrderRequest {
            token: "ABC123".to_string(),
            option_id: Uuid::new_v4(),
            coupon_code: None,
            email: None,
            password: None,
            verification_link: None,
            text: None,
        }
    }

    #[test]
    fn test_auto_delivery_needs_no_input() {
        let option = option_with(FulfillmentType::None);
        assert!(validate_fulfillment_input(&option, &request()).is_ok());
    }

    #[test]
    fn test_email_password_required() {
        let option = option_with(FulfillmentType::EmailPassword);
        let mut req = request();
        assert!(matches!(
            validate_fulfillment_input(&option, &req),
            Err(OrderError::MissingInput("email"))
        ));

        req.email = Some("user@example.com".to_string());
        assert!(matches!(
            validate_fulfillment_input(&option, &req),
            Err(OrderError::MissingInput("password"))
        ));

        req.password = Some("hunter2".to_string());
        let (email, password, link) = validate_fulfillment_input(&option, &req).unwrap();
        assert_eq!(email.as_deref(), Some("user@example.com"));
        assert_eq!(password.as_deref(), Some("hunter2"));
        assert!(link.is_none());
    }

    #[test]
    fn test_link_required_and_blank_rejected() {
        let option = option_with(FulfillmentType::Link);
        let mut req = request();
        req.verification_link = Some("   ".to_string());
        assert!(matches!(
            validate_fulfillment_input(&option, &req),
            Err(OrderError::MissingInput("verification_link"))
        ));

        req.verification_link = Some("https://example.com/verify".to_string());
        assert!(validate_fulfillment_input(&option, &req).is_ok());
    }
}
