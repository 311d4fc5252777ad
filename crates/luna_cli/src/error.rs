use luna_core::OracleError;
use luna_search::SearchError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Oracle(#[from] OracleError),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error("no {0} found within the search window")]
    NotFound(&'static str),
}
