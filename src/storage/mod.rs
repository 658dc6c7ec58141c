//! Dataset load/store collaborators.
//!
//! - `LocalStore`: CSV files on disk
//! - `BlobStore`: CSV objects behind an HTTP object store
//! - `Storage`: dispatches by `Location`, built once at startup
//!
//! The remote backend is constructed eagerly when configured; a remote
//! location without configuration is rejected by [`Storage::ensure_supports`]
//! before any work starts.

use crate::config::{ENV_STORAGE_URL, StorageConfig};
use crate::domain::Dataset;
use crate::error::{AppError, ErrorKind};

pub mod blob;
pub mod local;
pub mod location;

pub use blob::BlobStore;
pub use local::LocalStore;
pub use location::Location;

/// Load/store capability over dataset locations.
pub trait DatasetStore {
    fn load(&self, location: &Location) -> Result<Dataset, AppError>;
    fn store(&self, dataset: &Dataset, location: &Location) -> Result<(), AppError>;
}

pub struct Storage {
    local: LocalStore,
    remote: Option<BlobStore>,
}

impl Storage {
    /// Build from configuration. The remote backend exists only when an
    /// endpoint is configured; a malformed endpoint fails here.
    pub fn new(config: &StorageConfig) -> Result<Self, AppError> {
        let remote = match config.endpoint {
            Some(_) => Some(BlobStore::new(config)?),
            None => None,
        };
        Ok(Self {
            local: LocalStore,
            remote,
        })
    }

    /// Fail fast if any of `locations` needs a backend that is not configured.
    pub fn ensure_supports<'a>(&self, locations: impl IntoIterator<Item = &'a Location>) -> Result<(), AppError> {
        if self.remote.is_some() {
            return Ok(());
        }
        match locations.into_iter().find(|l| l.is_remote()) {
            Some(loc) => Err(AppError::new(
                ErrorKind::Config,
                format!("Location '{loc}' needs remote storage, but {ENV_STORAGE_URL} is not set."),
            )),
            None => Ok(()),
        }
    }

    fn remote(&self, location: &Location) -> Result<&BlobStore, AppError> {
        self.remote.as_ref().ok_or_else(|| {
            AppError::new(
                ErrorKind::Config,
                format!("Location '{location}' needs remote storage, but {ENV_STORAGE_URL} is not set."),
            )
        })
    }
}

impl DatasetStore for Storage {
    fn load(&self, location: &Location) -> Result<Dataset, AppError> {
        match location {
            Location::Local(_) => self.local.load(location),
            Location::Remote { .. } => self.remote(location)?.load(location),
        }
    }

    fn store(&self, dataset: &Dataset, location: &Location) -> Result<(), AppError> {
        match location {
            Location::Local(_) => self.local.store(dataset, location),
            Location::Remote { .. } => self.remote(location)?.store(dataset, location),
        }
    }
}
