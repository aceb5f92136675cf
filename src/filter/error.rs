use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid column name: {0}")]
    InvalidColumn(String),

    #[error("Invalid value for {column}: {value}")]
    InvalidValue { column: String, value: String },

    #[error("Invalid limit: {0}")]
    InvalidLimit(String),

    #[error("Invalid offset: {0}")]
    InvalidOffset(String),
}
