//! Error type for the command-line front end.

use std::path::PathBuf;

use st_core::CoreError;
use st_state::StateError;
use st_tables::TableError;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to read unit file: {path}")]
    UnitsRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid unit file {path}: {source}")]
    UnitsParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Units error: {0}")]
    Units(#[from] CoreError),

    #[error("Table error: {0}")]
    Tables(#[from] TableError),

    #[error("State error: {0}")]
    State(#[from] StateError),
}
