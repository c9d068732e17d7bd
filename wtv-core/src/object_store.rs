//! Retrieval of the source tables from object storage.
//!
//! The viewer only needs whole-object reads. Two backends are provided:
//! a directory tree laid out as `<root>/<bucket>/<key>`, and (with the
//! `api` feature) plain HTTP GETs against a bucket endpoint.

use crate::error::FetchError;
use flate2::read::GzDecoder;
use std::io::{ErrorKind, Read};
use std::path::PathBuf;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Source of raw table objects.
#[allow(async_fn_in_trait)]
pub trait ObjectStore {
    /// Fetch the raw bytes stored under `bucket`/`key`.
    async fn fetch_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, FetchError>;

    /// Fetch a table object as UTF-8 text, decompressing gzip objects.
    async fn fetch_table(&self, bucket: &str, key: &str) -> Result<String, FetchError> {
        let raw = self.fetch_object(bucket, key).await?;
        let bytes = decode_object(key, raw)?;
        String::from_utf8(bytes).map_err(|_| FetchError::Encoding {
            key: key.to_string(),
        })
    }
}

/// Decompress `raw` if the key or the leading bytes say it is gzip.
pub fn decode_object(key: &str, raw: Vec<u8>) -> Result<Vec<u8>, FetchError> {
    if !key.ends_with(".gz") && !raw.starts_with(&GZIP_MAGIC) {
        return Ok(raw);
    }
    let mut decoder = GzDecoder::new(raw.as_slice());
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| FetchError::Decompression {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
    log::debug!(
        "[WTV] store: Decompressed {} ({} -> {} bytes)",
        key,
        raw.len(),
        out.len()
    );
    Ok(out)
}

/// Object store backed by a local directory.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn object_path(&self, bucket: &str, key: &str) -> PathBuf {
        self.root.join(bucket).join(key)
    }
}

impl ObjectStore for LocalObjectStore {
    async fn fetch_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, FetchError> {
        let path = self.object_path(bucket, key);
        log::info!("[WTV] store: Reading {}", path.display());
        std::fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FetchError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            },
            ErrorKind::PermissionDenied => FetchError::Auth {
                bucket: bucket.to_string(),
                key: key.to_string(),
                reason: e.to_string(),
            },
            _ => FetchError::Io {
                key: key.to_string(),
                source: e,
            },
        })
    }
}

#[cfg(feature = "api")]
pub use http::HttpObjectStore;

#[cfg(feature = "api")]
mod http {
    use super::ObjectStore;
    use crate::error::FetchError;
    use reqwest::{Client, StatusCode};

    /// Object store reached over HTTP at `<base_url>/<bucket>/<key>`.
    #[derive(Debug, Clone)]
    pub struct HttpObjectStore {
        client: Client,
        base_url: String,
    }

    impl HttpObjectStore {
        pub fn new(base_url: impl Into<String>) -> Self {
            Self::with_client(Client::new(), base_url)
        }

        pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
            let base_url = base_url.into().trim_end_matches('/').to_string();
            Self { client, base_url }
        }

        pub fn object_url(&self, bucket: &str, key: &str) -> String {
            format!("{}/{}/{}", self.base_url, bucket, key)
        }
    }

    impl ObjectStore for HttpObjectStore {
        async fn fetch_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, FetchError> {
            let url = self.object_url(bucket, key);
            log::info!("[WTV] store: GET {}", url);
            let http_err = |reason: String| FetchError::Http {
                key: key.to_string(),
                reason,
            };

            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| http_err(e.to_string()))?;

            match response.status() {
                StatusCode::NOT_FOUND => Err(FetchError::NotFound {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                }),
                s @ (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => Err(FetchError::Auth {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                    reason: s.to_string(),
                }),
                s if !s.is_success() => Err(http_err(format!("unexpected status {}", s))),
                _ => {
                    let body = response
                        .bytes()
                        .await
                        .map_err(|e| http_err(e.to_string()))?;
                    Ok(body.to_vec())
                }
            }
        }
    }

}
