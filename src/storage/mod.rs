use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::AppConfig;
use crate::export::{EncodedImage, ExportError, ExportSink};

const PICTURES_SUBDIR: &str = "Pictures";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("missing HOME environment variable")]
    MissingHomeDirectory,
    #[error("export file name is empty or not a plain file name: {0:?}")]
    InvalidFileName(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Writes exported images into a single directory.
#[derive(Debug, Clone)]
pub struct StorageService {
    export_dir: PathBuf,
}

impl StorageService {
    pub const fn with_export_dir(export_dir: PathBuf) -> Self {
        Self { export_dir }
    }

    /// Uses `export_dir` from the app config, else `$HOME/Pictures`.
    pub fn with_default_paths(config: &AppConfig) -> StorageResult<Self> {
        let export_dir = match config.export_dir.as_ref() {
            Some(dir) => dir.clone(),
            None => {
                let home = std::env::var_os("HOME").ok_or(StorageError::MissingHomeDirectory)?;
                PathBuf::from(home).join(PICTURES_SUBDIR)
            }
        };
        Ok(Self::with_export_dir(export_dir))
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    pub fn allocate_export_path(&self, file_name: &str) -> StorageResult<PathBuf> {
        let is_plain = Path::new(file_name)
            .file_name()
            .is_some_and(|name| name == file_name);
        if file_name.is_empty() || !is_plain {
            return Err(StorageError::InvalidFileName(file_name.to_string()));
        }
        Ok(self.export_dir.join(file_name))
    }

    pub fn save_export(&self, bytes: &[u8], file_name: &str) -> StorageResult<PathBuf> {
        let target = self.allocate_export_path(file_name)?;
        fs::create_dir_all(&self.export_dir)?;
        fs::write(&target, bytes)?;
        tracing::info!(path = %target.display(), bytes = bytes.len(), "saved export");
        Ok(target)
    }
}

impl ExportSink for StorageService {
    fn save(&self, image: &EncodedImage, file_name: &str) -> Result<PathBuf, ExportError> {
        self.save_export(&image.bytes, file_name)
            .map_err(ExportError::from)
    }
}
