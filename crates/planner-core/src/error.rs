use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("repeat rule is missing")]
    MissingRule,

    #[error("unsupported repeat rule: {0:?}")]
    UnsupportedRule(String),

    #[error("invalid rule operand: {0}")]
    InvalidOperand(String),

    #[error("invalid start date: {0:?}")]
    InvalidStartDate(String),

    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("task not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
