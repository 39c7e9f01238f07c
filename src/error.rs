use thiserror::Error;

/// Failures reported by [`crate::store::PictureStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The index does not name a current entry.
    #[error("index {index} is out of range for {len} frames")]
    OutOfRange { index: usize, len: usize },
}

/// Failures reported by the image folder.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// Empty names or names that would escape the image folder.
    #[error("invalid image name: {0:?}")]
    InvalidName(String),

    /// The sentinel image can never be deleted.
    #[error("image {0} is protected")]
    Protected(String),

    #[error("image {0} not found")]
    NotFound(String),

    /// Underlying IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failures while running a power command.
#[derive(Debug, Error)]
pub enum PowerError {
    #[error("no command configured for {0}")]
    NotConfigured(&'static str),

    #[error("failed to launch {action} command: {source}")]
    Launch {
        action: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{action} command exited with status {status}")]
    Failed {
        action: &'static str,
        status: std::process::ExitStatus,
    },
}
