use thiserror::Error;

#[derive(Error, Debug)]
pub enum CanopyError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },

    #[error("Invalid image file: {0}")]
    InvalidImage(String),

    #[error("Invalid task list: {0}")]
    InvalidTaskList(String),

    #[error("Invalid topology file: {0}")]
    InvalidTopologyFile(String),

    #[error("Topology is not a tree: {0}")]
    Topology(String),

    #[error("Protocol violation: {0}")]
    Protocol(String),

    #[error("Worker node failed: {0}")]
    Worker(String),
}

pub type Result<T> = std::result::Result<T, CanopyError>;
