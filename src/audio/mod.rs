use crate::model::Track;
use anyhow::{Context, Result};
use rodio::Source;
use rodio::cpal::traits::{DeviceTrait, HostTrait};
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};
#[cfg(unix)]
use std::ffi::CString;
use std::fs::File;
use std::path::Path;
use std::time::{Duration, Instant};

const MAX_VOLUME: f32 = 2.5;

/// The sound-producing side of the controller.
///
/// `request_play` starts a new sound instance and does not silence one that
/// is already sounding; callers that want a clean start call `stop` first.
pub trait AudioOutput {
    fn request_play(&mut self, track: &Track) -> Result<()>;
    fn stop(&mut self);
    fn pause(&mut self);
    fn is_producing_sound(&self) -> bool;
}

impl<T: AudioOutput + ?Sized> AudioOutput for Box<T> {
    fn request_play(&mut self, track: &Track) -> Result<()> {
        (**self).request_play(track)
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn pause(&mut self) {
        (**self).pause()
    }

    fn is_producing_sound(&self) -> bool {
        (**self).is_producing_sound()
    }
}

pub struct RodioOutput {
    stream: OutputStream,
    sinks: Vec<Sink>,
    volume: f32,
    selected_output: Option<String>,
}

impl RodioOutput {
    pub fn new(output: Option<&str>) -> Result<Self> {
        let stream = Self::open_output_stream(output)?;
        Ok(Self {
            stream,
            sinks: Vec::new(),
            volume: 1.0,
            selected_output: output.map(ToOwned::to_owned),
        })
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, MAX_VOLUME);
        for sink in &self.sinks {
            sink.set_volume(self.volume);
        }
    }

    pub fn output_name(&self) -> String {
        self.selected_output
            .clone()
            .unwrap_or_else(|| "System default output (CPAL)".to_string())
    }

    pub fn available_outputs() -> Vec<String> {
        let mut outputs: Vec<String> = with_silenced_stderr(|| {
            rodio::cpal::default_host()
                .output_devices()
                .ok()
                .into_iter()
                .flatten()
                .filter_map(|device| device.name().ok())
                .collect()
        });
        outputs.sort_by_cached_key(|name| name.to_ascii_lowercase());
        outputs.dedup();
        outputs
    }

    fn open_output_stream(output: Option<&str>) -> Result<OutputStream> {
        let mut stream = with_silenced_stderr(|| {
            if let Some(requested) = output {
                let device = rodio::cpal::default_host()
                    .output_devices()
                    .context("failed to enumerate output devices")?
                    .find(|candidate| candidate.name().ok().as_deref() == Some(requested))
                    .with_context(|| format!("audio output device not found: {requested}"))?;
                OutputStreamBuilder::from_device(device)
                    .context("failed to open selected output device")?
                    .with_error_callback(|_| {})
                    .open_stream_or_fallback()
                    .context("failed to start selected output stream")
            } else {
                OutputStreamBuilder::from_default_device()
                    .context("failed to open default system output stream")?
                    .with_error_callback(|_| {})
                    .open_stream_or_fallback()
                    .context("failed to start default output stream")
            }
        })?;
        stream.log_on_drop(false);
        Ok(stream)
    }

    fn prune_finished(&mut self) {
        self.sinks.retain(|sink| !sink.empty());
    }
}

impl AudioOutput for RodioOutput {
    fn request_play(&mut self, track: &Track) -> Result<()> {
        self.prune_finished();

        let file = File::open(&track.path)
            .with_context(|| format!("failed to open track {}", track.path.display()))?;
        let source = Decoder::try_from(file)
            .with_context(|| format!("failed to decode {}", track.path.display()))?;

        let sink = Sink::connect_new(self.stream.mixer());
        sink.set_volume(self.volume);
        sink.append(source);
        self.sinks.push(sink);
        Ok(())
    }

    fn stop(&mut self) {
        for sink in self.sinks.drain(..) {
            sink.stop();
        }
    }

    fn pause(&mut self) {
        for sink in &self.sinks {
            sink.pause();
        }
    }

    fn is_producing_sound(&self) -> bool {
        self.sinks
            .iter()
            .any(|sink| !sink.empty() && !sink.is_paused())
    }
}

#[cfg(unix)]
fn with_silenced_stderr<T>(operation: impl FnOnce() -> T) -> T {
    let saved = unsafe { libc::dup(libc::STDERR_FILENO) };
    if saved < 0 {
        return operation();
    }

    let devnull = CString::new("/dev/null")
        .ok()
        .map(|path| unsafe { libc::open(path.as_ptr(), libc::O_WRONLY) })
        .unwrap_or(-1);

    if devnull >= 0 {
        unsafe {
            libc::dup2(devnull, libc::STDERR_FILENO);
            libc::close(devnull);
        }
    }

    let result = operation();

    unsafe {
        libc::dup2(saved, libc::STDERR_FILENO);
        libc::close(saved);
    }

    result
}

#[cfg(not(unix))]
fn with_silenced_stderr<T>(operation: impl FnOnce() -> T) -> T {
    operation()
}

struct Voice {
    started_at: Instant,
    duration: Option<Duration>,
}

impl Voice {
    fn sounding(&self) -> bool {
        match self.duration {
            Some(duration) => self.started_at.elapsed() < duration,
            None => true,
        }
    }
}

/// Silent output that keeps time as if the tracks were playing.
pub struct NullOutput {
    voices: Vec<Voice>,
    paused: bool,
    fallback_duration: Option<Duration>,
}

impl NullOutput {
    pub fn new() -> Self {
        Self {
            voices: Vec::new(),
            paused: false,
            fallback_duration: None,
        }
    }

    /// Tracks whose length cannot be probed finish after `duration`
    /// instead of sounding forever.
    pub fn with_fallback_duration(duration: Duration) -> Self {
        Self {
            fallback_duration: Some(duration),
            ..Self::new()
        }
    }

    fn estimate_duration(path: &Path) -> Option<Duration> {
        let file = File::open(path).ok()?;
        let source = Decoder::try_from(file).ok()?;
        source
            .total_duration()
            .filter(|duration| !duration.is_zero())
    }
}

impl Default for NullOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioOutput for NullOutput {
    fn request_play(&mut self, track: &Track) -> Result<()> {
        self.voices.retain(Voice::sounding);
        self.paused = false;
        self.voices.push(Voice {
            started_at: Instant::now(),
            duration: Self::estimate_duration(&track.path).or(self.fallback_duration),
        });
        Ok(())
    }

    fn stop(&mut self) {
        self.voices.clear();
        self.paused = false;
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn is_producing_sound(&self) -> bool {
        !self.paused && self.voices.iter().any(Voice::sounding)
    }
}
