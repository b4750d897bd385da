use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;

use crate::config::AppConfig;

const DEFAULT_TEMP_PREFIX: &str = "export_";
const DOWNLOADS_SUBDIR: &str = "Downloads";
const DEFAULT_FALLBACK_TEMP_DIR: &str = "/tmp/captionkit";
const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("delivery target does not accept binary payloads")]
    BlobUnsupported,
    #[error("missing HOME environment variable")]
    MissingHomeDirectory,
    #[error("download file name is empty")]
    MissingFileName,
    #[error("payload is not a PNG data URI")]
    MalformedDataUri,
    #[error("data URI payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type DeliveryResult<T> = std::result::Result<T, DeliveryError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryPayload {
    Blob(Vec<u8>),
    /// `data:image/png;base64,...` text for targets that only take strings.
    DataUri(String),
}

impl DeliveryPayload {
    pub fn png_data_uri(bytes: &[u8]) -> Self {
        Self::DataUri(format!(
            "{PNG_DATA_URI_PREFIX}{}",
            general_purpose::STANDARD.encode(bytes)
        ))
    }

    /// Raw PNG bytes regardless of the transport encoding.
    pub fn decode(&self) -> DeliveryResult<Vec<u8>> {
        match self {
            Self::Blob(bytes) => Ok(bytes.clone()),
            Self::DataUri(uri) => {
                let encoded = uri
                    .strip_prefix(PNG_DATA_URI_PREFIX)
                    .ok_or(DeliveryError::MalformedDataUri)?;
                Ok(general_purpose::STANDARD.decode(encoded)?)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub payload: DeliveryPayload,
}

/// Hands a finished export to the user. Implementations may refuse blobs with
/// [`DeliveryError::BlobUnsupported`]; the exporter then retries with a data URI.
pub trait Delivery {
    fn deliver(&self, download: &Download) -> DeliveryResult<()>;
}

/// Saves downloads into a directory on disk, staging each one in a temp file first.
#[derive(Debug, Clone)]
pub struct DownloadStorage {
    temp_dir: PathBuf,
    downloads_dir: PathBuf,
}

impl DownloadStorage {
    pub const fn with_paths(temp_dir: PathBuf, downloads_dir: PathBuf) -> Self {
        Self {
            temp_dir,
            downloads_dir,
        }
    }

    /// `override_dir`, then `$XDG_DOWNLOAD_DIR`, then `$HOME/Downloads`.
    pub fn with_default_paths(override_dir: Option<&Path>) -> DeliveryResult<Self> {
        let downloads_dir = match override_dir {
            Some(dir) => dir.to_path_buf(),
            None => default_downloads_dir()?,
        };
        let temp_dir = default_runtime_temp_dir();

        fs::create_dir_all(&temp_dir)?;
        fs::create_dir_all(&downloads_dir)?;

        Ok(Self::with_paths(temp_dir, downloads_dir))
    }

    /// Honors a configured `download_dir` before the environment defaults.
    pub fn from_config(config: &AppConfig) -> DeliveryResult<Self> {
        Self::with_default_paths(config.download_dir.as_deref())
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    pub fn downloads_dir(&self) -> &Path {
        &self.downloads_dir
    }

    fn validate_file_name(file_name: &str) -> DeliveryResult<()> {
        if file_name.trim().is_empty() {
            return Err(DeliveryError::MissingFileName);
        }
        Ok(())
    }

    pub fn temp_path_for(&self, file_name: &str) -> DeliveryResult<PathBuf> {
        Self::validate_file_name(file_name)?;
        let mut path = self.temp_dir.clone();
        path.push(format!("{DEFAULT_TEMP_PREFIX}{file_name}"));
        Ok(path)
    }

    pub fn allocate_target_path(&self, file_name: &str) -> DeliveryResult<PathBuf> {
        Self::validate_file_name(file_name)?;
        let mut path = self.downloads_dir.clone();
        path.push(file_name);
        Ok(path)
    }

    pub fn save_download(&self, download: &Download) -> DeliveryResult<PathBuf> {
        let bytes = download.payload.decode()?;
        let staged = self.temp_path_for(&download.file_name)?;
        let target = self.allocate_target_path(&download.file_name)?;

        if let Some(parent) = staged.parent() {
            fs::create_dir_all(parent)?;
        }
        if let Err(err) = fs::write(&staged, &bytes) {
            discard_temp(&staged);
            return Err(err.into());
        }
        let saved = save_overwrite(&staged, &target);
        discard_temp(&staged);
        saved?;

        tracing::info!(path = %target.display(), bytes = bytes.len(), "download saved");
        Ok(target)
    }
}

impl Delivery for DownloadStorage {
    fn deliver(&self, download: &Download) -> DeliveryResult<()> {
        self.save_download(download).map(|_| ())
    }
}

fn save_overwrite<S: AsRef<Path>, D: AsRef<Path>>(source: S, destination: D) -> DeliveryResult<()> {
    let source = source.as_ref();
    let destination = destination.as_ref();

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }

    let _ = fs::remove_file(destination);
    fs::copy(source, destination)?;
    Ok(())
}

fn discard_temp(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            tracing::warn!(path = %path.display(), ?err, "failed to remove staged download");
        }
    }
}

fn default_downloads_dir() -> DeliveryResult<PathBuf> {
    downloads_dir_from(std::env::var_os("XDG_DOWNLOAD_DIR"), std::env::var_os("HOME"))
}

fn downloads_dir_from(xdg: Option<OsString>, home: Option<OsString>) -> DeliveryResult<PathBuf> {
    if let Some(dir) = xdg.filter(|dir| !dir.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = home
        .filter(|home| !home.is_empty())
        .ok_or(DeliveryError::MissingHomeDirectory)?;
    let mut dir = PathBuf::from(home);
    dir.push(DOWNLOADS_SUBDIR);
    Ok(dir)
}

fn default_runtime_temp_dir() -> PathBuf {
    std::env::var("XDG_RUNTIME_DIR")
        .map(|dir| PathBuf::from(dir).join("captionkit"))
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_FALLBACK_TEMP_DIR))
}
