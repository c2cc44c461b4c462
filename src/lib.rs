pub mod app;
pub mod audio;
pub mod config;
pub mod controller;
pub mod error;
pub mod library;
pub mod model;
pub mod playlist;
pub mod shuffle;

pub use controller::{Command, PlaylistController, TickOutcome};
pub use error::{PlaybackError, Result};
