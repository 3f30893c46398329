use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Table not found: {0}")]
    NotFound(String),
    #[error("Table already exists: {0}")]
    DuplicateKey(String),
    #[error("Table is in use: {0}")]
    TableInUse(String),
    #[error("Gateway error: {0}")]
    Gateway(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDbError(#[from] rocksdb::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
