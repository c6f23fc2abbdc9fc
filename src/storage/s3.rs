use async_trait::async_trait;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;

use super::store::{TileExistence, TileStore};
use crate::error::StorageError;
use crate::grid::TileKey;

/// S3-backed tile store.
///
/// Tiles live under `{prefix}{layer}/{zoom}/{column}/{row}.png` in a single
/// bucket. Existence checks use HEAD requests, so no tile bytes are
/// transferred for them.
#[derive(Clone)]
pub struct S3TileStore {
    client: Client,
    bucket: String,
    prefix: String,
    identifier: String,
}

impl S3TileStore {
    /// Create a store for the given bucket.
    ///
    /// A non-empty `prefix` is normalized to end with `/`.
    pub fn new(client: Client, bucket: String, prefix: Option<String>) -> Self {
        let prefix = match prefix {
            Some(p) if !p.is_empty() && !p.ends_with('/') => format!("{}/", p),
            Some(p) => p,
            None => String::new(),
        };
        let identifier = format!("s3://{}/{}", bucket, prefix);

        Self {
            client,
            bucket,
            prefix,
            identifier,
        }
    }

    /// Get the bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Object key for a tile.
    pub fn object_key(&self, key: &TileKey) -> String {
        format!(
            "{}{}/{}/{}/{}.png",
            self.prefix, key.layer, key.index.zoom, key.index.column, key.index.row
        )
    }
}

/// Whether an SDK error means the object does not exist.
fn is_not_found<E>(err: &SdkError<E, HttpResponse>) -> bool
where
    E: ProvideErrorMetadata,
{
    if let SdkError::ServiceError(service_err) = err {
        if matches!(service_err.err().code(), Some("NotFound") | Some("NoSuchKey")) {
            return true;
        }
    }

    // HEAD responses carry no body, so the code may be missing; use the status.
    err.raw_response()
        .map(|r| r.status().as_u16() == 404)
        .unwrap_or(false)
}

/// Map an SDK error that is not a 404 into a storage error.
fn storage_error<E>(err: SdkError<E, HttpResponse>) -> StorageError
where
    E: std::error::Error + 'static,
{
    match err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
            StorageError::Connection(err.to_string())
        }
        other => StorageError::S3(other.to_string()),
    }
}

#[async_trait]
impl TileStore for S3TileStore {
    async fn get_tile(&self, key: &TileKey) -> Result<Option<Bytes>, StorageError> {
        let object_key = self.object_key(key);

        let resp = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) if is_not_found(&e) => return Ok(None),
            Err(e) => return Err(storage_error(e)),
        };

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?
            .into_bytes();

        Ok(Some(data))
    }

    async fn put_tile(&self, key: TileKey, data: Bytes) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(self.object_key(&key))
            .content_type("image/png")
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(storage_error)?;

        Ok(())
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn existence(&self) -> Option<&dyn TileExistence> {
        Some(self)
    }
}

#[async_trait]
impl TileExistence for S3TileStore {
    async fn tile_exists(&self, key: &TileKey) -> Result<bool, StorageError> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(self.object_key(key))
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if is_not_found(&e) => Ok(false),
            Err(e) => Err(storage_error(e)),
        }
    }
}

/// Create an S3 client with optional custom endpoint and region.
///
/// Use a custom endpoint for S3-compatible services like MinIO:
/// ```ignore
/// let client = create_s3_client(Some("http://localhost:9000"), "us-east-1").await;
/// ```
pub async fn create_s3_client(endpoint_url: Option<&str>, region: &str) -> Client {
    let region = aws_config::Region::new(region.to_string());
    let mut config_loader =
        aws_config::defaults(aws_config::BehaviorVersion::latest()).region(region);

    if let Some(endpoint) = endpoint_url {
        config_loader = config_loader.endpoint_url(endpoint);
    }

    let sdk_config = config_loader.load().await;

    // S3-compatible services generally need path-style addressing
    let s3_config = if endpoint_url.is_some() {
        aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build()
    } else {
        aws_sdk_s3::config::Builder::from(&sdk_config).build()
    };

    Client::from_conf(s3_config)
}
