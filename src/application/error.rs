use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("User already exists: {0}")]
    UserAlreadyExists(String),

    #[error("Not logged in. Run `login` or `register` first")]
    NotLoggedIn,

    #[error("Tour not found: {0}")]
    TourNotFound(String),

    #[error("Guest not found: {0}")]
    GuestNotFound(String),

    #[error("Expense not found: {0}")]
    ExpenseNotFound(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Stored data is corrupt: {0}")]
    CorruptStore(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
