//! Buckets and objects in S3 (or an S3-compatible endpoint).

use crate::config::ObjectStorageConfig;
use crate::error::StoreError;
use crate::model::{BucketEntry, ObjectEntry, UploadReceipt, UploadedFile};
use crate::store::ObjectStore;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::{ByteStream, DateTime as S3DateTime};
use aws_sdk_s3::Client;
use chrono::{DateTime, Utc};

pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    /// Load credentials from the default provider chain and pin the configured region.
    pub async fn from_config(config: &ObjectStorageConfig) -> Self {
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        Self::with_client(Client::from_conf(builder.build()))
    }

    pub fn with_client(client: Client) -> Self {
        S3ObjectStore { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn list_buckets(&self) -> Result<Vec<BucketEntry>, StoreError> {
        let output = self.client.list_buckets().send().await.map_err(object_error)?;
        Ok(output
            .buckets()
            .iter()
            .map(|b| BucketEntry {
                name: b.name().unwrap_or_default().to_string(),
                creation_date: b.creation_date().and_then(to_utc),
            })
            .collect())
    }

    async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectEntry>, StoreError> {
        let mut entries = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .into_paginator()
            .send();
        while let Some(page) = pages.next().await {
            let page = page.map_err(object_error)?;
            entries.extend(page.contents().iter().map(|o| ObjectEntry {
                key: o.key().unwrap_or_default().to_string(),
                size: o.size(),
                last_modified: o.last_modified().and_then(to_utc),
                etag: o.e_tag().map(str::to_string),
            }));
        }
        Ok(entries)
    }

    async fn put_object(&self, bucket: &str, file: UploadedFile) -> Result<UploadReceipt, StoreError> {
        let size = file.data.len();
        let output = self
            .client
            .put_object()
            .bucket(bucket)
            .key(&file.file_name)
            .content_type(&file.content_type)
            .body(ByteStream::from(file.data))
            .send()
            .await
            .map_err(object_error)?;
        tracing::info!(bucket, key = %file.file_name, size, "object stored");
        Ok(UploadReceipt {
            bucket: bucket.to_string(),
            key: file.file_name,
            etag: output.e_tag().map(str::to_string),
            size,
            content_type: file.content_type,
        })
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StoreError> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(object_error)?;
        Ok(())
    }
}

fn object_error<E>(err: E) -> StoreError
where
    E: std::error::Error + 'static,
{
    StoreError::Object(DisplayErrorContext(err).to_string())
}

fn to_utc(dt: &S3DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())
}
