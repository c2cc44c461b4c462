#![no_main]

use libfuzzer_sys::fuzz_target;
use loopdeck::audio::AudioOutput;
use loopdeck::model::{ControllerConfig, ShuffleAlgorithm, Track};
use loopdeck::{Command, PlaylistController};
use rand::SeedableRng;
use rand::rngs::SmallRng;

#[derive(Default)]
struct SwitchOutput {
    sounding: bool,
}

impl AudioOutput for SwitchOutput {
    fn request_play(&mut self, _track: &Track) -> anyhow::Result<()> {
        self.sounding = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.sounding = false;
    }

    fn pause(&mut self) {
        self.sounding = false;
    }

    fn is_producing_sound(&self) -> bool {
        self.sounding
    }
}

fuzz_target!(|data: &[u8]| {
    let len = data.len() % 32;
    let tracks = (0..len)
        .map(|idx| Track::from_path(format!("track_{idx}.mp3")))
        .collect();
    let config = ControllerConfig {
        random_order_on_start: data.first().is_some_and(|byte| byte & 1 == 1),
        loop_at_end: data.get(1).is_some_and(|byte| byte & 1 == 1),
        shuffle_algorithm: if data.get(2).is_some_and(|byte| byte & 1 == 1) {
            ShuffleAlgorithm::FisherYates
        } else {
            ShuffleAlgorithm::Legacy
        },
    };
    let mut controller = PlaylistController::with_rng(
        tracks,
        SwitchOutput::default(),
        config,
        SmallRng::seed_from_u64(len as u64),
    );

    for byte in data {
        let _ = match byte % 12 {
            0 => controller.execute(Command::Play),
            1 => controller.execute(Command::PlayIndex(usize::from(byte / 12))),
            2 => controller.execute(Command::PlayNext),
            3 => controller.execute(Command::PlayPrevious),
            4 => controller.execute(Command::TogglePlay),
            5 => controller.execute(Command::Stop),
            6 => controller.execute(Command::Restart),
            7 => controller.execute(Command::Pause),
            8 => controller.execute(Command::Shuffle),
            9 => controller.execute(Command::ToggleLoop),
            10 => {
                controller.output_mut().sounding = false;
                Ok(())
            }
            _ => controller.tick().map(|_| ()),
        };

        assert_eq!(controller.tracks().len(), len);
        if len > 0 {
            assert!(controller.cursor() < len);
        }
    }
});
