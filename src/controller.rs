//! Playlist playback controller
//!
//! Owns the playlist, the playback state and the audio output. Commands act
//! immediately; [`PlaylistController::tick`] is polled once per host frame and
//! is the only place where playback advances on its own.

use crate::audio::AudioOutput;
use crate::error::{PlaybackError, Result};
use crate::model::{ControllerConfig, PlaybackState, ShuffleAlgorithm, Track};
use crate::playlist::{Playlist, Step};
use crate::shuffle;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Play,
    PlayIndex(usize),
    PlayTrack(Track),
    PlayNext,
    PlayPrevious,
    TogglePlay,
    Stop,
    Restart,
    Pause,
    Shuffle,
    ToggleLoop,
}

/// What a single [`PlaylistController::tick`] observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing; nothing to watch.
    Idle,
    /// Playing and the output is still busy.
    Sounding,
    /// The finished track was followed by the track at `index`.
    Advanced { index: usize },
    /// The last track finished and playback looped to the first.
    Wrapped,
    /// The last track finished with looping off; playback stopped.
    Finished,
}

pub struct PlaylistController<O: AudioOutput> {
    playlist: Playlist,
    output: O,
    state: PlaybackState,
    current_track: Option<Track>,
    loop_at_end: bool,
    shuffle_algorithm: ShuffleAlgorithm,
    rng: SmallRng,
}

impl<O: AudioOutput> PlaylistController<O> {
    pub fn new(tracks: Vec<Track>, output: O, config: ControllerConfig) -> Self {
        Self::with_rng(tracks, output, config, SmallRng::from_os_rng())
    }

    pub fn with_rng(
        tracks: Vec<Track>,
        mut output: O,
        config: ControllerConfig,
        rng: SmallRng,
    ) -> Self {
        output.stop();
        let mut controller = Self {
            playlist: Playlist::new(tracks),
            output,
            state: PlaybackState::Stopped,
            current_track: None,
            loop_at_end: config.loop_at_end,
            shuffle_algorithm: config.shuffle_algorithm,
            rng,
        };
        if config.random_order_on_start {
            controller.shuffle();
        }
        controller
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    pub fn cursor(&self) -> usize {
        self.playlist.cursor()
    }

    pub fn tracks(&self) -> &[Track] {
        self.playlist.tracks()
    }

    pub fn loop_at_end(&self) -> bool {
        self.loop_at_end
    }

    pub fn set_loop_at_end(&mut self, enabled: bool) {
        self.loop_at_end = enabled;
        debug!(enabled, "loop at end toggled");
    }

    pub fn shuffle_algorithm(&self) -> ShuffleAlgorithm {
        self.shuffle_algorithm
    }

    pub fn set_shuffle_algorithm(&mut self, algorithm: ShuffleAlgorithm) {
        self.shuffle_algorithm = algorithm;
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    pub fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Play => self.play(),
            Command::PlayIndex(index) => self.play_index(index),
            Command::PlayTrack(track) => self.play_track(track),
            Command::PlayNext => self.play_next(),
            Command::PlayPrevious => self.play_previous(),
            Command::TogglePlay => {
                if self.state == PlaybackState::Playing {
                    self.stop();
                    Ok(())
                } else {
                    self.play()
                }
            }
            Command::Stop => {
                self.stop();
                Ok(())
            }
            Command::Restart => {
                self.restart();
                Ok(())
            }
            Command::Pause => self.pause(),
            Command::Shuffle => {
                self.shuffle();
                Ok(())
            }
            Command::ToggleLoop => {
                self.set_loop_at_end(!self.loop_at_end);
                Ok(())
            }
        }
    }

    /// Starts the track under the cursor without silencing whatever is
    /// already sounding.
    pub fn play(&mut self) -> Result<()> {
        let track = self
            .playlist
            .current()
            .cloned()
            .ok_or(PlaybackError::EmptyPlaylist)?;
        self.start(track)
    }

    pub fn play_index(&mut self, index: usize) -> Result<()> {
        self.ensure_index(index)?;
        self.halt();
        self.playlist.jump_to(index)?;
        self.play()
    }

    /// Plays a track that need not belong to the playlist. The cursor stays
    /// where it is.
    pub fn play_track(&mut self, track: Track) -> Result<()> {
        self.halt();
        self.start(track)
    }

    pub fn play_next(&mut self) -> Result<()> {
        let next = self.playlist.next_index()?;
        self.halt();
        self.playlist.jump_to(next)?;
        self.play()
    }

    pub fn play_previous(&mut self) -> Result<()> {
        let previous = self.playlist.previous_index()?;
        self.halt();
        self.playlist.jump_to(previous)?;
        self.play()
    }

    pub fn jump_to(&mut self, index: usize) -> Result<()> {
        self.playlist.jump_to(index)?;
        debug!(cursor = index, "cursor moved");
        Ok(())
    }

    pub fn stop(&mut self) {
        self.halt();
    }

    pub fn restart(&mut self) {
        self.halt();
        self.playlist.rewind();
        debug!("playlist rewound");
    }

    pub fn pause(&mut self) -> Result<()> {
        warn!("pause requested but not supported");
        Err(PlaybackError::NotImplemented("pause"))
    }

    pub fn shuffle(&mut self) {
        shuffle::shuffle(
            self.playlist.tracks_mut(),
            self.shuffle_algorithm,
            &mut self.rng,
        );
        debug!(
            algorithm = ?self.shuffle_algorithm,
            tracks = self.playlist.len(),
            "playlist shuffled"
        );
    }

    /// Polls the output once. A silent output while playing means the
    /// current track ended, whatever the reason.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        self.playlist.clamp_cursor();

        if self.state != PlaybackState::Playing {
            return Ok(TickOutcome::Idle);
        }
        if self.output.is_producing_sound() {
            return Ok(TickOutcome::Sounding);
        }

        let outcome = match self.playlist.step_forward(self.loop_at_end) {
            Step::Moved(index) => TickOutcome::Advanced { index },
            Step::Wrapped => TickOutcome::Wrapped,
            Step::End => {
                self.state = PlaybackState::Stopped;
                info!("reached end of playlist");
                return Ok(TickOutcome::Finished);
            }
        };

        let track = self
            .playlist
            .current()
            .cloned()
            .ok_or(PlaybackError::EmptyPlaylist)?;
        info!(cursor = self.playlist.cursor(), title = %track.title, "auto-advancing");
        if let Err(err) = self.start(track) {
            self.state = PlaybackState::Stopped;
            return Err(err);
        }
        Ok(outcome)
    }

    fn ensure_index(&self, index: usize) -> Result<()> {
        if self.playlist.is_empty() {
            return Err(PlaybackError::EmptyPlaylist);
        }
        if index >= self.playlist.len() {
            warn!(index, len = self.playlist.len(), "play index out of range");
            return Err(PlaybackError::IndexOutOfRange {
                index,
                len: self.playlist.len(),
            });
        }
        Ok(())
    }

    fn halt(&mut self) {
        self.output.stop();
        if self.state != PlaybackState::Stopped {
            debug!(from = ?self.state, "playback stopped");
        }
        self.state = PlaybackState::Stopped;
    }

    fn start(&mut self, track: Track) -> Result<()> {
        if let Err(err) = self.output.request_play(&track) {
            warn!(path = %track.path.display(), "output rejected track: {err:#}");
            return Err(PlaybackError::output(&err));
        }
        info!(title = %track.title, cursor = self.playlist.cursor(), "playing");
        self.state = PlaybackState::Playing;
        self.current_track = Some(track);
        Ok(())
    }
}
