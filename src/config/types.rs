//! Gateway settings, one struct per backing store.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_POOL_SIZE: u32 = 10;
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 25 * 1024 * 1024;
/// Database used when the MongoDB URI names none.
pub const DEFAULT_DOCUMENT_DATABASE: &str = "gateway";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelationalConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub pool_size: u32,
    /// How long a checkout waits for a pooled connection, including connect retries.
    pub acquire_timeout: Duration,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentConfig {
    pub uri: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectStorageConfig {
    pub region: String,
    /// S3-compatible endpoint override (MinIO, LocalStack). Path-style addressing is used when set.
    pub endpoint: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayConfig {
    pub port: u16,
    pub relational: RelationalConfig,
    pub document: DocumentConfig,
    pub object_storage: ObjectStorageConfig,
    /// When true, raw backing-store error text is returned in 500 responses.
    pub expose_error_details: bool,
    pub body_limit_bytes: usize,
}

impl GatewayConfig {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}
