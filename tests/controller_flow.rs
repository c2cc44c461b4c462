use loopdeck::audio::AudioOutput;
use loopdeck::model::{ControllerConfig, PlaybackState, Track};
use loopdeck::{PlaybackError, PlaylistController, TickOutcome};
use rand::SeedableRng;
use rand::rngs::SmallRng;

#[derive(Default)]
struct FakeOutput {
    requested: Vec<String>,
    stops: usize,
    sounding: bool,
}

impl FakeOutput {
    fn finish(&mut self) {
        self.sounding = false;
    }
}

impl AudioOutput for FakeOutput {
    fn request_play(&mut self, track: &Track) -> anyhow::Result<()> {
        self.requested.push(track.title.clone());
        self.sounding = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.stops += 1;
        self.sounding = false;
    }

    fn pause(&mut self) {
        self.sounding = false;
    }

    fn is_producing_sound(&self) -> bool {
        self.sounding
    }
}

fn abc(loop_at_end: bool) -> PlaylistController<FakeOutput> {
    let tracks = ["A.mp3", "B.mp3", "C.mp3"]
        .into_iter()
        .map(Track::from_path)
        .collect();
    PlaylistController::with_rng(
        tracks,
        FakeOutput::default(),
        ControllerConfig {
            random_order_on_start: false,
            loop_at_end,
            ..ControllerConfig::default()
        },
        SmallRng::seed_from_u64(42),
    )
}

fn current_title(controller: &PlaylistController<FakeOutput>) -> Option<&str> {
    controller.current_track().map(|track| track.title.as_str())
}

#[test]
fn looping_playlist_advances_forever() {
    let mut controller = abc(true);
    controller.play().expect("play");
    assert_eq!(controller.state(), PlaybackState::Playing);
    assert_eq!(current_title(&controller), Some("A"));

    let expected = [
        (TickOutcome::Advanced { index: 1 }, "B"),
        (TickOutcome::Advanced { index: 2 }, "C"),
        (TickOutcome::Wrapped, "A"),
        (TickOutcome::Advanced { index: 1 }, "B"),
    ];
    for (outcome, title) in expected {
        assert_eq!(controller.tick(), Ok(TickOutcome::Sounding));
        controller.output_mut().finish();
        assert_eq!(controller.tick(), Ok(outcome));
        assert_eq!(current_title(&controller), Some(title));
        assert_eq!(controller.state(), PlaybackState::Playing);
    }
    assert_eq!(controller.output().requested, vec!["A", "B", "C", "A", "B"]);
}

#[test]
fn non_looping_playlist_stops_after_last_track() {
    let mut controller = abc(false);
    controller.play().expect("play");
    for _ in 0..2 {
        controller.output_mut().finish();
        controller.tick().expect("tick");
    }
    assert_eq!(current_title(&controller), Some("C"));

    controller.output_mut().finish();
    assert_eq!(controller.tick(), Ok(TickOutcome::Finished));
    assert_eq!(controller.state(), PlaybackState::Stopped);
    assert_eq!(controller.cursor(), 2);

    assert_eq!(controller.tick(), Ok(TickOutcome::Idle));
    assert_eq!(controller.output().requested, vec!["A", "B", "C"]);
}

#[test]
fn loop_toggle_takes_effect_on_the_next_wrap() {
    let mut controller = abc(false);
    controller.play_index(2).expect("play last");
    controller.set_loop_at_end(true);
    controller.output_mut().finish();
    assert_eq!(controller.tick(), Ok(TickOutcome::Wrapped));
    assert_eq!(current_title(&controller), Some("A"));
}

#[test]
fn play_next_wraps_and_stops_first_each_time() {
    let mut controller = abc(true);
    let stops_before = controller.output().stops;
    for _ in 0..3 {
        controller.play_next().expect("next");
    }
    assert_eq!(controller.cursor(), 0);
    assert_eq!(current_title(&controller), Some("A"));
    assert_eq!(controller.output().stops - stops_before, 3);
    assert_eq!(controller.output().requested, vec!["B", "C", "A"]);
}

#[test]
fn play_index_out_of_range_is_reported() {
    let mut controller = abc(true);
    assert_eq!(
        controller.play_index(5),
        Err(PlaybackError::IndexOutOfRange { index: 5, len: 3 })
    );
    assert_eq!(controller.state(), PlaybackState::Stopped);
    assert!(controller.output().requested.is_empty());
}

#[test]
fn pause_always_reports_not_implemented() {
    let mut controller = abc(true);
    assert_eq!(controller.pause(), Err(PlaybackError::NotImplemented("pause")));
    controller.play().expect("play");
    assert_eq!(controller.pause(), Err(PlaybackError::NotImplemented("pause")));
    controller.stop();
    assert_eq!(controller.pause(), Err(PlaybackError::NotImplemented("pause")));
}

#[test]
fn restart_rewinds_and_stops_from_any_state() {
    let mut controller = abc(true);
    controller.play_index(2).expect("play");
    controller.restart();
    assert_eq!(controller.state(), PlaybackState::Stopped);
    assert_eq!(controller.cursor(), 0);
    assert!(!controller.output().is_producing_sound());

    controller.restart();
    assert_eq!(controller.state(), PlaybackState::Stopped);
    assert_eq!(controller.cursor(), 0);
}

#[test]
fn shuffle_keeps_cursor_position_and_tracks() {
    let mut controller = abc(true);
    controller.play_index(1).expect("play");
    controller.shuffle();
    assert_eq!(controller.cursor(), 1);
    assert_eq!(controller.state(), PlaybackState::Playing);

    let mut titles: Vec<&str> = controller
        .tracks()
        .iter()
        .map(|track| track.title.as_str())
        .collect();
    titles.sort_unstable();
    assert_eq!(titles, vec!["A", "B", "C"]);
}

#[test]
fn external_stop_of_output_reads_as_finished_track() {
    let mut controller = abc(true);
    controller.play().expect("play");
    controller.output_mut().stop();
    assert_eq!(controller.tick(), Ok(TickOutcome::Advanced { index: 1 }));
}
