//! Ordered track list with a wrap-around cursor.

use crate::error::{PlaybackError, Result};
use crate::model::Track;

#[derive(Debug, Clone, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
    cursor: usize,
}

/// Where the cursor lands after stepping past the current track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Moved(usize),
    Wrapped,
    End,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub(crate) fn tracks_mut(&mut self) -> &mut [Track] {
        &mut self.tracks
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&Track> {
        self.tracks.get(self.cursor)
    }

    pub fn next_index(&self) -> Result<usize> {
        let last = self.last_index()?;
        Ok(if self.cursor == last { 0 } else { self.cursor + 1 })
    }

    pub fn previous_index(&self) -> Result<usize> {
        let last = self.last_index()?;
        Ok(if self.cursor == 0 { last } else { self.cursor - 1 })
    }

    pub fn jump_to(&mut self, index: usize) -> Result<()> {
        if self.tracks.is_empty() {
            return Err(PlaybackError::EmptyPlaylist);
        }
        if index >= self.tracks.len() {
            return Err(PlaybackError::IndexOutOfRange {
                index,
                len: self.tracks.len(),
            });
        }
        self.cursor = index;
        Ok(())
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub fn clamp_cursor(&mut self) {
        if let Some(last) = self.tracks.len().checked_sub(1) {
            self.cursor = self.cursor.min(last);
        }
    }

    /// Moves one past the current track. With `wrap` the cursor returns to
    /// the first track at the end; without it the cursor stays on the last
    /// track and `Step::End` is reported.
    pub fn step_forward(&mut self, wrap: bool) -> Step {
        let next = self.cursor + 1;
        if next < self.tracks.len() {
            self.cursor = next;
            return Step::Moved(next);
        }
        if wrap && !self.tracks.is_empty() {
            self.cursor = 0;
            return Step::Wrapped;
        }
        self.clamp_cursor();
        Step::End
    }

    fn last_index(&self) -> Result<usize> {
        self.tracks
            .len()
            .checked_sub(1)
            .ok_or(PlaybackError::EmptyPlaylist)
    }
}
