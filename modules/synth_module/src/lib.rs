// Synthetic landmark source for running the daemon without a detector.
// Emits a neutral face that blinks and glances on a fixed schedule, so
// every analysis path fires during a live soak.

use std::time::{Duration, Instant};

use anyhow::Result;
use api::{mesh, FaceFrame, LandmarkModule, ModuleLogger};
use glam::Vec3;

const FRAME_INTERVAL: Duration = Duration::from_millis(33);

const BLINK_PERIOD: f32 = 4.0;
const BLINK_LENGTH: f32 = 0.4;
const GLANCE_PERIOD: f32 = 7.0;
const GLANCE_LENGTH: f32 = 1.2;

pub struct SynthModule {
    logger: Option<ModuleLogger>,
    started: Option<Instant>,
    last_emit: Option<Instant>,
    input: u32,
}

impl SynthModule {
    fn new() -> Self {
        Self {
            logger: None,
            started: None,
            last_emit: None,
            input: 0,
        }
    }

    fn build_frame(&self, t: f32) -> FaceFrame {
        let mut landmarks = vec![Vec3::new(0.5, 0.5, 0.0); mesh::REFINED_LANDMARK_COUNT];

        // Slow, sub-threshold head wander.
        let nose_x = 0.5 + 0.002 * (t * 0.7).sin();
        landmarks[mesh::NOSE_TIP] = Vec3::new(nose_x, 0.55, 0.0);

        landmarks[mesh::LEFT_EYE_OUTER_CORNER] = Vec3::new(0.35, 0.40, 0.0);
        landmarks[mesh::LEFT_EYE_INNER_CORNER] = Vec3::new(0.45, 0.40, 0.0);
        landmarks[mesh::RIGHT_EYE_INNER_CORNER] = Vec3::new(0.55, 0.40, 0.0);
        landmarks[mesh::RIGHT_EYE_OUTER_CORNER] = Vec3::new(0.65, 0.40, 0.0);

        // Lid gap: 0.03 open, pinched shut during the blink window.
        let blinking = t % BLINK_PERIOD < BLINK_LENGTH;
        let half_gap = if blinking { 0.0005 } else { 0.015 };
        landmarks[mesh::LEFT_EYE_UPPER_LID] = Vec3::new(0.40, 0.40 - half_gap, 0.0);
        landmarks[mesh::LEFT_EYE_LOWER_LID] = Vec3::new(0.40, 0.40 + half_gap, 0.0);
        landmarks[mesh::RIGHT_EYE_UPPER_LID] = Vec3::new(0.60, 0.40 - half_gap, 0.0);
        landmarks[mesh::RIGHT_EYE_LOWER_LID] = Vec3::new(0.60, 0.40 + half_gap, 0.0);

        // Iris: centered, except for a hard glance toward the outer
        // corner during the glance window.
        let glancing = t % GLANCE_PERIOD < GLANCE_LENGTH;
        let iris_offset = if glancing { -0.03 } else { 0.0 };
        landmarks[mesh::LEFT_IRIS_CENTER] = Vec3::new(0.40 + iris_offset, 0.40, 0.0);
        landmarks[mesh::RIGHT_IRIS_CENTER] = Vec3::new(0.60 + iris_offset, 0.40, 0.0);

        FaceFrame {
            landmarks,
            width: 640,
            height: 480,
        }
    }
}

impl LandmarkModule for SynthModule {
    fn initialize(&mut self, logger: ModuleLogger) -> Result<()> {
        logger.info("Synthetic landmark source ready");
        self.logger = Some(logger);
        Ok(())
    }

    fn open_input(&mut self, index: u32) -> Result<()> {
        self.input = index;
        self.started = Some(Instant::now());
        self.last_emit = None;
        if let Some(logger) = &self.logger {
            logger.info(&format!("Synthetic input {} opened", index));
        }
        Ok(())
    }

    fn poll(&mut self, frame: &mut FaceFrame) -> Result<bool> {
        let Some(started) = self.started else {
            return Ok(false);
        };

        let now = Instant::now();
        if self
            .last_emit
            .is_some_and(|last| now.duration_since(last) < FRAME_INTERVAL)
        {
            return Ok(false);
        }
        self.last_emit = Some(now);

        let t = now.duration_since(started).as_secs_f32();
        *frame = self.build_frame(t);
        Ok(true)
    }

    fn unload(&mut self) {
        if let Some(logger) = &self.logger {
            logger.info("Unloading synthetic landmark source");
        }
    }
}

#[no_mangle]
#[allow(improper_ctypes_definitions)]
pub extern "C" fn create_module() -> Box<dyn LandmarkModule> {
    Box::new(SynthModule::new())
}
