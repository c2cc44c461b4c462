//! Error types for the playlist controller

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaybackError {
    /// The playlist has no tracks to play or step through
    #[error("Playlist is empty")]
    EmptyPlaylist,

    /// Requested position is outside the playlist
    #[error("Index {index} out of range for playlist of {len} tracks")]
    IndexOutOfRange { index: usize, len: usize },

    /// Capability the controller deliberately does not offer
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    /// The audio output rejected a request
    #[error("Audio output error: {0}")]
    Output(String),
}

impl PlaybackError {
    pub(crate) fn output(err: &anyhow::Error) -> Self {
        Self::Output(format!("{err:#}"))
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
