use sigcat_core::CatalogError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    #[error("Unknown spectrum unit: {0}")]
    UnknownUnit(String),

    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
