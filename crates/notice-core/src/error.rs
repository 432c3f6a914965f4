use thiserror::Error;

#[derive(Error, Debug)]
pub enum NoticeError {
    #[error("Invalid tenant table: {0}")]
    Schema(String),

    #[error("Failed to fill template: {0}")]
    Fill(String),

    #[error("Failed to flatten notice: {0}")]
    Flatten(String),

    #[error("Failed to archive notices: {0}")]
    Archive(String),

    #[error("Missing input: {0}")]
    Input(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
