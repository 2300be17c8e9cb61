use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShopGenError {
    #[error("random source exhausted")]
    RandomSourceExhausted,

    #[error("invalid date range: end {end} is before start {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("date out of range: {days} days before {today}")]
    DateOutOfRange { today: NaiveDate, days: u32 },

    #[error("invalid draw: {0}")]
    InvalidDraw(String),

    #[error("invalid policy: {0}")]
    InvalidPolicy(String),

    #[error("not enough customers: a day needs {needed} distinct customers, only {available} exist")]
    InsufficientCustomers { needed: usize, available: usize },

    #[error("unsupported database '{0}': only sqlite URLs can be opened")]
    UnsupportedDatabase(String),

    #[error("invalid database url '{0}': sqlite URLs take a path, not credentials or a host")]
    InvalidDatabaseUrl(String),

    #[error("config not found at {0}: run 'shopgen init'")]
    ConfigNotFound(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, ShopGenError>;
