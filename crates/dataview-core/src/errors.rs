use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewError {
    #[error("view not found")]
    ViewNotFound,
    #[error("preset not found")]
    PresetNotFound,
    #[error("validation failed: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, ViewError>;
