//! Remote object store over HTTP.
//!
//! Objects are addressed as `{endpoint}/{container}/{key}`; `GET` downloads,
//! `PUT` uploads (overwriting). The payload is the same CSV dialect as local
//! files. Every transport failure or non-success status is reported as
//! `ErrorKind::Storage`, never as a generic I/O error.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use tracing::info;

use crate::config::{ENV_STORAGE_URL, StorageConfig};
use crate::domain::Dataset;
use crate::error::{AppError, ErrorKind};
use crate::io::{read_dataset_csv, write_dataset_csv};
use crate::storage::{DatasetStore, Location};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct BlobStore {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl BlobStore {
    /// Construct from configuration; fails if no endpoint is configured.
    pub fn new(config: &StorageConfig) -> Result<Self, AppError> {
        let endpoint = config.endpoint.clone().ok_or_else(|| {
            AppError::new(
                ErrorKind::Config,
                format!("Remote storage requested but {ENV_STORAGE_URL} is not set."),
            )
        })?;
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(AppError::new(
                ErrorKind::Config,
                format!("{ENV_STORAGE_URL} must be an http(s) URL, got '{endpoint}'."),
            ));
        }
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| AppError::new(ErrorKind::Config, format!("Failed to create storage HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub fn object_url(&self, container: &str, key: &str) -> String {
        format!("{}/{container}/{}", self.endpoint, key.trim_start_matches('/'))
    }

    pub fn download(&self, container: &str, key: &str) -> Result<Dataset, AppError> {
        let url = self.object_url(container, key);
        let resp = self
            .authorize(self.client.get(&url))
            .send()
            .map_err(|e| unavailable(&url, e))?;
        if !resp.status().is_success() {
            return Err(AppError::new(
                ErrorKind::Storage,
                format!("Remote storage GET {url} failed with status {}.", resp.status()),
            ));
        }
        let body = resp.bytes().map_err(|e| unavailable(&url, e))?;
        let dataset = read_dataset_csv(body.as_ref(), &url)?;
        info!(%url, rows = dataset.n_rows(), "downloaded dataset");
        Ok(dataset)
    }

    pub fn upload(&self, dataset: &Dataset, container: &str, key: &str) -> Result<(), AppError> {
        let url = self.object_url(container, key);
        let mut body = Vec::new();
        write_dataset_csv(&mut body, dataset)?;
        let resp = self
            .authorize(self.client.put(&url))
            .header(reqwest::header::CONTENT_TYPE, "text/csv")
            .body(body)
            .send()
            .map_err(|e| unavailable(&url, e))?;
        if !resp.status().is_success() {
            return Err(AppError::new(
                ErrorKind::Storage,
                format!("Remote storage PUT {url} failed with status {}.", resp.status()),
            ));
        }
        info!(%url, rows = dataset.n_rows(), "uploaded dataset");
        Ok(())
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

impl DatasetStore for BlobStore {
    fn load(&self, location: &Location) -> Result<Dataset, AppError> {
        match location {
            Location::Remote { container, key } => self.download(container, key),
            Location::Local(_) => Err(local_not_supported(location)),
        }
    }

    fn store(&self, dataset: &Dataset, location: &Location) -> Result<(), AppError> {
        match location {
            Location::Remote { container, key } => self.upload(dataset, container, key),
            Location::Local(_) => Err(local_not_supported(location)),
        }
    }
}

fn unavailable(url: &str, e: reqwest::Error) -> AppError {
    AppError::new(ErrorKind::Storage, format!("Remote storage unavailable at {url}: {e}"))
}

fn local_not_supported(location: &Location) -> AppError {
    AppError::new(
        ErrorKind::Config,
        format!("Blob store cannot handle local location '{location}'."),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: Option<&str>) -> StorageConfig {
        StorageConfig {
            endpoint: endpoint.map(str::to_string),
            token: None,
        }
    }

    #[test]
    fn requires_endpoint() {
        let err = BlobStore::new(&config(None)).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains(ENV_STORAGE_URL));
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let err = BlobStore::new(&config(Some("ftp://files"))).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn builds_object_urls() {
        let store = BlobStore::new(&config(Some("https://store.example.net/"))).unwrap();
        assert_eq!(
            store.object_url("data", "/2024/ref.csv"),
            "https://store.example.net/data/2024/ref.csv"
        );
    }

    #[test]
    fn unreachable_endpoint_is_a_storage_error() {
        // Port 9 (discard) on localhost is expected to refuse connections.
        let store = BlobStore::new(&config(Some("http://127.0.0.1:9"))).unwrap();
        let err = store.download("data", "ref.csv").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);
    }
}
