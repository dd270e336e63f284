//! Route definitions for the storefront and admin API

mod catalog;
mod coupons;
mod orders;
mod permissions;
mod refunds;
mod storefront;
mod tokens;

pub use catalog::catalog_routes;
pub use coupons::coupon_routes;
pub use orders::order_routes;
pub use permissions::permission_routes;
pub use refunds::refund_routes;
pub use storefront::storefront_routes;
pub use tokens::token_routes;
