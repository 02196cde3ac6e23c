//! Tri-store gateway: HTTP CRUD endpoints over MongoDB (users), MySQL (products) and S3 (files).

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod state;
pub mod store;

pub use app::build_app;
pub use config::GatewayConfig;
pub use error::{AppError, ConfigError, StoreError};
pub use state::AppState;
pub use store::{
    MongoUserStore, MySqlProductStore, ObjectStore, ProductStore, S3ObjectStore, UserStore,
};
