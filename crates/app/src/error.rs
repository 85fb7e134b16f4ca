//! Console error types

use techsolutions_core::{Error, LoginError};

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] Error),

    #[error(transparent)]
    Login(#[from] LoginError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] inquire::InquireError),

    #[error("{0}")]
    Usage(String),
}
