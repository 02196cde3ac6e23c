//! Route groups, one per backing store, plus the stateless common routes.

pub mod buckets;
pub mod common;
pub mod products;
pub mod users;

pub use buckets::bucket_routes;
pub use common::common_routes;
pub use products::product_routes;
pub use users::user_routes;
