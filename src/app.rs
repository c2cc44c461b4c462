use crate::audio::{AudioOutput, NullOutput, RodioOutput};
use crate::controller::{Command, PlaylistController, TickOutcome};
use crate::library;
use crate::model::{HostConfig, PlaybackState};
use anyhow::{Result, bail};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType, disable_raw_mode, enable_raw_mode};
use crossterm::{cursor, execute};
use std::io::{Write, stdout};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Default)]
pub struct AppStartupOptions {
    pub roots: Vec<PathBuf>,
    pub config: HostConfig,
    pub null_output: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Run(Command),
}

pub fn run_with_startup(options: AppStartupOptions) -> Result<()> {
    let tracks = library::scan_many(&options.roots);
    if tracks.is_empty() {
        bail!("no audio files found in the given paths");
    }
    info!(tracks = tracks.len(), "library loaded");

    let output = open_output(&options.config, options.null_output);
    let mut controller = PlaylistController::new(tracks, output, options.config.controller);
    let frame = Duration::from_millis(options.config.frame_interval_ms.max(1));

    enable_raw_mode()?;
    let result = frame_loop(&mut controller, frame);
    disable_raw_mode()?;
    controller.stop();
    println!();
    result
}

fn open_output(config: &HostConfig, null_output: bool) -> Box<dyn AudioOutput> {
    let fallback = NullOutput::with_fallback_duration(Duration::from_secs(
        config.null_fallback_seconds.max(1),
    ));
    if null_output {
        return Box::new(fallback);
    }

    match RodioOutput::new(config.output_device.as_deref()) {
        Ok(mut output) => {
            output.set_volume(config.volume);
            info!(output = %output.output_name(), "audio output opened");
            Box::new(output)
        }
        Err(err) => {
            warn!("falling back to silent output: {err:#}");
            Box::new(fallback)
        }
    }
}

fn frame_loop<O: AudioOutput>(
    controller: &mut PlaylistController<O>,
    frame: Duration,
) -> Result<()> {
    let mut status = String::from("Ready. Space to play, q to quit");
    draw_status(&status)?;

    loop {
        match controller.tick() {
            Ok(TickOutcome::Advanced { .. } | TickOutcome::Wrapped) => {
                status = now_playing(controller);
                draw_status(&status)?;
            }
            Ok(TickOutcome::Finished) => {
                status = String::from("Reached end of playlist");
                draw_status(&status)?;
            }
            Ok(TickOutcome::Idle | TickOutcome::Sounding) => {}
            Err(err) => {
                status = format!("playback error: {err}");
                draw_status(&status)?;
            }
        }

        if !event::poll(frame)? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let Some(action) = action_for_key(key) else {
            continue;
        };
        let command = match action {
            KeyAction::Quit => return Ok(()),
            KeyAction::Run(command) => command,
        };

        status = match controller.execute(command.clone()) {
            Ok(()) => describe(controller, &command),
            Err(err) => {
                warn!(?command, "command failed: {err}");
                format!("{err}")
            }
        };
        draw_status(&status)?;
    }
}

pub fn action_for_key(key: KeyEvent) -> Option<KeyAction> {
    let command = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Some(KeyAction::Quit);
        }
        KeyCode::Char('q') | KeyCode::Esc => return Some(KeyAction::Quit),
        KeyCode::Char(' ') => Command::TogglePlay,
        KeyCode::Char('s') => Command::Shuffle,
        KeyCode::Char('r') => Command::Restart,
        KeyCode::Char('p') => Command::Pause,
        KeyCode::Char('l') => Command::ToggleLoop,
        KeyCode::Right => Command::PlayNext,
        KeyCode::Left => Command::PlayPrevious,
        KeyCode::Char(digit @ '1'..='9') => {
            let position = digit.to_digit(10)? as usize;
            Command::PlayIndex(position - 1)
        }
        _ => return None,
    };
    Some(KeyAction::Run(command))
}

fn describe<O: AudioOutput>(controller: &PlaylistController<O>, command: &Command) -> String {
    match command {
        Command::Shuffle => String::from("Playlist shuffled"),
        Command::Restart => String::from("Rewound to first track"),
        Command::ToggleLoop => format!(
            "Loop at end: {}",
            if controller.loop_at_end() { "on" } else { "off" }
        ),
        _ if controller.state() == PlaybackState::Playing => now_playing(controller),
        _ => String::from("Stopped"),
    }
}

fn now_playing<O: AudioOutput>(controller: &PlaylistController<O>) -> String {
    match controller.current_track() {
        Some(track) => format!(
            "Playing [{}/{}] {}",
            controller.cursor() + 1,
            controller.tracks().len(),
            track.title
        ),
        None => String::from("Playing"),
    }
}

fn draw_status(status: &str) -> Result<()> {
    let mut out = stdout();
    execute!(
        out,
        cursor::MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(status)
    )?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn keys_map_to_controller_commands() {
        assert_eq!(
            action_for_key(press(KeyCode::Char(' '))),
            Some(KeyAction::Run(Command::TogglePlay))
        );
        assert_eq!(
            action_for_key(press(KeyCode::Right)),
            Some(KeyAction::Run(Command::PlayNext))
        );
        assert_eq!(
            action_for_key(press(KeyCode::Left)),
            Some(KeyAction::Run(Command::PlayPrevious))
        );
        assert_eq!(
            action_for_key(press(KeyCode::Char('p'))),
            Some(KeyAction::Run(Command::Pause))
        );
        assert_eq!(action_for_key(press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn digit_keys_are_one_based() {
        assert_eq!(
            action_for_key(press(KeyCode::Char('1'))),
            Some(KeyAction::Run(Command::PlayIndex(0)))
        );
        assert_eq!(
            action_for_key(press(KeyCode::Char('9'))),
            Some(KeyAction::Run(Command::PlayIndex(8)))
        );
        assert_eq!(action_for_key(press(KeyCode::Char('0'))), None);
    }

    #[test]
    fn quit_keys() {
        assert_eq!(action_for_key(press(KeyCode::Esc)), Some(KeyAction::Quit));
        assert_eq!(
            action_for_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(KeyAction::Quit)
        );
    }
}
