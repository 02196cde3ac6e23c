//! In-memory stores and request helpers shared by the API tests.
#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use tristore_gateway::model::{
    BucketEntry, ObjectEntry, Product, ProductInput, UploadReceipt, UploadedFile, User, UserInput,
};
use tristore_gateway::{build_app, AppState, ObjectStore, ProductStore, StoreError, UserStore};

pub const BODY_LIMIT: usize = 1024 * 1024;

#[derive(Default)]
pub struct MemoryUsers {
    inner: Mutex<(u64, Vec<User>)>,
}

impl MemoryUsers {
    pub fn count(&self) -> usize {
        self.inner.lock().unwrap().1.len()
    }
}

#[async_trait]
impl UserStore for MemoryUsers {
    async fn probe(&self) -> Result<bool, StoreError> {
        Ok(!self.inner.lock().unwrap().1.is_empty())
    }

    async fn create(&self, input: UserInput) -> Result<User, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.0 += 1;
        let user = User {
            id: format!("{:024x}", inner.0),
            name: input.name,
            email: input.email,
        };
        inner.1.push(user.clone());
        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.inner.lock().unwrap().1.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.inner.lock().unwrap().1.iter().find(|u| u.id == id).cloned())
    }

    async fn update(&self, id: &str, input: UserInput) -> Result<Option<User>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(user) = inner.1.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if input.name.is_some() {
            user.name = input.name;
        }
        if input.email.is_some() {
            user.email = input.email;
        }
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.1.len();
        inner.1.retain(|u| u.id != id);
        Ok(inner.1.len() < before)
    }
}

/// Mimics the `Produtos` table: absent until `init_schema`, NOT NULL on Nome and Preco,
/// prices stored with two decimal places.
#[derive(Default)]
pub struct MemoryProducts {
    inner: Mutex<ProductTable>,
}

#[derive(Default)]
struct ProductTable {
    ready: bool,
    next_id: i32,
    rows: Vec<Product>,
}

impl MemoryProducts {
    pub fn row_count(&self) -> usize {
        self.inner.lock().unwrap().rows.len()
    }
}

fn table_missing() -> StoreError {
    StoreError::Rejected("Table 'gateway.Produtos' doesn't exist".into())
}

fn to_row(id: i32, input: ProductInput) -> Result<Product, StoreError> {
    let nome = input
        .nome
        .ok_or_else(|| StoreError::Rejected("Column 'Nome' cannot be null".into()))?;
    let mut preco: Decimal = input
        .preco
        .ok_or_else(|| StoreError::Rejected("Column 'Preco' cannot be null".into()))?;
    preco.rescale(2);
    Ok(Product {
        id,
        nome,
        descricao: input.descricao,
        preco,
    })
}

#[async_trait]
impl ProductStore for MemoryProducts {
    async fn init_schema(&self) -> Result<(), StoreError> {
        self.inner.lock().unwrap().ready = true;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let table = self.inner.lock().unwrap();
        if !table.ready {
            return Err(table_missing());
        }
        Ok(table.rows.clone())
    }

    async fn get(&self, id: i64) -> Result<Option<Product>, StoreError> {
        let table = self.inner.lock().unwrap();
        if !table.ready {
            return Err(table_missing());
        }
        Ok(table.rows.iter().find(|p| i64::from(p.id) == id).cloned())
    }

    async fn create(&self, input: ProductInput) -> Result<u64, StoreError> {
        let mut table = self.inner.lock().unwrap();
        if !table.ready {
            return Err(table_missing());
        }
        let row = to_row(table.next_id + 1, input)?;
        table.next_id = row.id;
        table.rows.push(row);
        Ok(table.next_id as u64)
    }

    async fn update(&self, id: i64, input: ProductInput) -> Result<bool, StoreError> {
        let mut table = self.inner.lock().unwrap();
        if !table.ready {
            return Err(table_missing());
        }
        let Some(existing) = table.rows.iter_mut().find(|p| i64::from(p.id) == id) else {
            return Ok(false);
        };
        *existing = to_row(existing.id, input)?;
        Ok(true)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut table = self.inner.lock().unwrap();
        if !table.ready {
            return Err(table_missing());
        }
        let before = table.rows.len();
        table.rows.retain(|p| i64::from(p.id) != id);
        Ok(table.rows.len() < before)
    }
}

pub struct MemoryObjects {
    buckets: Mutex<BTreeMap<String, BTreeMap<String, UploadedFile>>>,
    puts: AtomicUsize,
}

impl MemoryObjects {
    pub fn with_buckets(names: &[&str]) -> Self {
        MemoryObjects {
            buckets: Mutex::new(
                names
                    .iter()
                    .map(|n| (n.to_string(), BTreeMap::new()))
                    .collect(),
            ),
            puts: AtomicUsize::new(0),
        }
    }

    pub fn put_calls(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn stored(&self, bucket: &str, key: &str) -> Option<UploadedFile> {
        self.buckets
            .lock()
            .unwrap()
            .get(bucket)
            .and_then(|b| b.get(key))
            .cloned()
    }
}

fn no_such_bucket(bucket: &str) -> StoreError {
    StoreError::Object(format!("NoSuchBucket: The specified bucket does not exist ({})", bucket))
}

#[async_trait]
impl ObjectStore for MemoryObjects {
    async fn list_buckets(&self) -> Result<Vec<BucketEntry>, StoreError> {
        Ok(self
            .buckets
            .lock()
            .unwrap()
            .keys()
            .map(|name| BucketEntry {
                name: name.clone(),
                creation_date: None,
            })
            .collect())
    }

    async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectEntry>, StoreError> {
        let buckets = self.buckets.lock().unwrap();
        let objects = buckets.get(bucket).ok_or_else(|| no_such_bucket(bucket))?;
        Ok(objects
            .values()
            .map(|f| ObjectEntry {
                key: f.file_name.clone(),
                size: Some(f.data.len() as i64),
                last_modified: None,
                etag: None,
            })
            .collect())
    }

    async fn put_object(&self, bucket: &str, file: UploadedFile) -> Result<UploadReceipt, StoreError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        let mut buckets = self.buckets.lock().unwrap();
        let objects = buckets.get_mut(bucket).ok_or_else(|| no_such_bucket(bucket))?;
        let receipt = UploadReceipt {
            bucket: bucket.to_string(),
            key: file.file_name.clone(),
            etag: Some("\"etag\"".into()),
            size: file.data.len(),
            content_type: file.content_type.clone(),
        };
        objects.insert(file.file_name.clone(), file);
        Ok(receipt)
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StoreError> {
        let mut buckets = self.buckets.lock().unwrap();
        let objects = buckets.get_mut(bucket).ok_or_else(|| no_such_bucket(bucket))?;
        objects.remove(key);
        Ok(())
    }
}

/// Every operation fails as if the backing service were down.
pub struct Unreachable;

fn down() -> StoreError {
    StoreError::Object("connection refused".into())
}

#[async_trait]
impl UserStore for Unreachable {
    async fn probe(&self) -> Result<bool, StoreError> {
        Err(down())
    }
    async fn create(&self, _input: UserInput) -> Result<User, StoreError> {
        Err(down())
    }
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        Err(down())
    }
    async fn get(&self, _id: &str) -> Result<Option<User>, StoreError> {
        Err(down())
    }
    async fn update(&self, _id: &str, _input: UserInput) -> Result<Option<User>, StoreError> {
        Err(down())
    }
    async fn delete(&self, _id: &str) -> Result<bool, StoreError> {
        Err(down())
    }
}

#[async_trait]
impl ProductStore for Unreachable {
    async fn init_schema(&self) -> Result<(), StoreError> {
        Err(down())
    }
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        Err(down())
    }
    async fn get(&self, _id: i64) -> Result<Option<Product>, StoreError> {
        Err(down())
    }
    async fn create(&self, _input: ProductInput) -> Result<u64, StoreError> {
        Err(down())
    }
    async fn update(&self, _id: i64, _input: ProductInput) -> Result<bool, StoreError> {
        Err(down())
    }
    async fn delete(&self, _id: i64) -> Result<bool, StoreError> {
        Err(down())
    }
}

#[async_trait]
impl ObjectStore for Unreachable {
    async fn list_buckets(&self) -> Result<Vec<BucketEntry>, StoreError> {
        Err(down())
    }
    async fn list_objects(&self, _bucket: &str) -> Result<Vec<ObjectEntry>, StoreError> {
        Err(down())
    }
    async fn put_object(&self, _bucket: &str, _file: UploadedFile) -> Result<UploadReceipt, StoreError> {
        Err(down())
    }
    async fn delete_object(&self, _bucket: &str, _key: &str) -> Result<(), StoreError> {
        Err(down())
    }
}

pub struct Harness {
    pub app: Router,
    pub users: Arc<MemoryUsers>,
    pub products: Arc<MemoryProducts>,
    pub objects: Arc<MemoryObjects>,
}

pub fn harness() -> Harness {
    harness_with_details(true)
}

pub fn harness_with_details(expose: bool) -> Harness {
    let users = Arc::new(MemoryUsers::default());
    let products = Arc::new(MemoryProducts::default());
    let objects = Arc::new(MemoryObjects::with_buckets(&["fotos", "documentos"]));
    let state = AppState::new(users.clone(), products.clone(), objects.clone())
        .with_error_details(expose);
    Harness {
        app: build_app(state, BODY_LIMIT),
        users,
        products,
        objects,
    }
}

pub fn unreachable_app() -> Router {
    let down = Arc::new(Unreachable);
    let state = AppState::new(down.clone(), down.clone(), down);
    build_app(state, BODY_LIMIT)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("json body")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.to_vec()).expect("utf-8 body")
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.expect("infallible router");
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn empty(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// A request whose body is sent as-is, with an optional content type.
pub fn raw_request(method: Method, uri: &str, content_type: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub struct Part<'a> {
    pub name: &'a str,
    pub file_name: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub data: &'a [u8],
}

const BOUNDARY: &str = "gateway-test-boundary";

pub fn multipart(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", part.name);
        if let Some(file_name) = part.file_name {
            disposition.push_str(&format!("; filename=\"{}\"", file_name));
        }
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"\r\n");
        if let Some(content_type) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}
