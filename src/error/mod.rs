use crate::config::ConfigError;
use crate::export::ExportError;
use crate::source::SourceError;
use crate::state::StateError;
use crate::storage::StorageError;
use crate::store::StoreError;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to initialize GTK: {0}")]
    GtkInit(#[from] gtk4::glib::BoolError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
