use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::client::TranslateError;
use crate::config::ConfigError;
use crate::store::StoreError;

/// Errors that can stop the application before or while it runs.
///
/// Translation and persistence failures during a session are reported in the
/// UI and logged instead; they only surface here during start-up.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Translate(#[from] TranslateError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("could not read {path}: {source}")]
    Import {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
