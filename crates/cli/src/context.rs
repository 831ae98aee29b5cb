//! Shared command context: data directory, backend client, errors.

use std::io;
use std::path::{Path, PathBuf};

use pasar_core::EmailError;
use pasar_storefront::backend::{BackendClient, BackendError, Upload};
use pasar_storefront::cart::{CartError, CartService, CartStore, CartSyncClient};
use pasar_storefront::config::{BackendConfig, ConfigError};
use pasar_storefront::storage::{FileStore, StorageError};
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No data directory available, set PASAR_DATA_DIR")]
    NoDataDir,

    #[error("Not logged in, run `pasar login` first")]
    NotLoggedIn,

    /// The backend answered with `success: false`.
    #[error("{0}")]
    Rejected(String),
}

/// Where state lives and how to reach the backend.
///
/// The backend configuration is read lazily so offline commands
/// (`cart show`, `logout`) work without `PASAR_BACKEND_URL`.
pub struct Context {
    data_dir: PathBuf,
}

impl Context {
    /// Resolve the data directory: explicit path, else `<data dir>/pasar`.
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self, CliError> {
        let data_dir = data_dir
            .or_else(|| dirs::data_dir().map(|dir| dir.join("pasar")))
            .ok_or(CliError::NoDataDir)?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Open the file-backed cart store.
    pub fn store(&self) -> Result<CartStore<FileStore>, CliError> {
        Ok(CartStore::open(FileStore::open(&self.data_dir)?))
    }

    /// Build a backend client from the environment.
    pub fn backend(&self) -> Result<BackendClient, CliError> {
        let config = BackendConfig::from_env()?;
        tracing::debug!(backend = %config.base_url, "Using backend");
        Ok(BackendClient::new(&config)?)
    }

    /// Cart store plus sync client.
    pub fn cart_service(&self) -> Result<CartService<FileStore>, CliError> {
        let sync = CartSyncClient::new(self.backend()?);
        Ok(CartService::new(self.store()?, sync))
    }
}

/// Read a file for upload, guessing its content type from the extension.
pub async fn read_upload(path: &Path) -> Result<Upload, CliError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| CliError::ReadFile {
            path: path.to_owned(),
            source,
        })?;

    let file_name = path
        .file_name()
        .map_or_else(|| "upload".to_string(), |name| name.to_string_lossy().into_owned());

    Ok(Upload {
        content_type: image_content_type(path).map(str::to_owned),
        file_name,
        bytes,
    })
}

fn image_content_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}
