use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DifficultyError {
    #[error("header history holds {found} entries while {required} are needed")]
    InsufficientHistory { required: usize, found: usize },

    #[error("LWMA window {window} and weight {weight} must both be positive")]
    InvalidWindowParams { window: u64, weight: u64 },
}

pub type DifficultyResult<T> = std::result::Result<T, DifficultyError>;
