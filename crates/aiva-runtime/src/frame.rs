//! Frame Loop - polls the simulator once per rendered frame

use aiva_core::Sample;
use aiva_visual::{HeadMotion, MouthDriver, MouthPose, MouthState};
use aiva_voice::VisemeSimulator;
use tokio::time::Instant;
use tracing::trace;

/// Everything the host engine applies for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvatarPose {
    /// Sample the pose was computed from
    pub sample: Sample,
    pub mouth: MouthPose,
    pub mouth_state: MouthState,
    pub head: HeadMotion,
    pub speaking: bool,
}

/// Frame counters
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub frames: u64,
    pub speaking_frames: u64,
    pub last_volume: f32,
}

/// Reads the latest sample and poses the avatar
pub struct FrameLoop {
    simulator: VisemeSimulator,
    driver: MouthDriver,
    origin: Instant,
    stats: FrameStats,
}

impl FrameLoop {
    pub fn new(simulator: VisemeSimulator, driver: MouthDriver) -> Self {
        Self {
            simulator,
            driver,
            origin: Instant::now(),
            stats: FrameStats::default(),
        }
    }

    /// Pose for the current instant
    pub fn frame(&mut self) -> AvatarPose {
        let t_ms = self.origin.elapsed().as_secs_f64() * 1000.0;
        self.frame_at(t_ms)
    }

    /// Pose at `t_ms` milliseconds since the loop started
    pub fn frame_at(&mut self, t_ms: f64) -> AvatarPose {
        let speaking = self.simulator.is_active();
        let sample = self.simulator.current_sample();

        self.stats.frames += 1;
        if speaking {
            self.stats.speaking_frames += 1;
        }
        self.stats.last_volume = sample.volume;

        let pose = AvatarPose {
            sample,
            mouth: self.driver.pose(speaking, sample.volume, t_ms),
            mouth_state: if speaking {
                MouthState::from_sample(&sample)
            } else {
                MouthState::closed()
            },
            head: HeadMotion::at(speaking, t_ms),
            speaking,
        };
        trace!(t_ms, speaking, volume = sample.volume, "frame");
        pose
    }

    pub fn driver(&self) -> &MouthDriver {
        &self.driver
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiva_visual::{MouthDrive, RigBinding, RigConfig, Viseme};
    use aiva_voice::{FixedPitch, SimulatorConfig};
    use std::time::Duration;

    fn frame_loop() -> FrameLoop {
        let simulator = VisemeSimulator::with_pitch_source(
            SimulatorConfig::default(),
            Box::new(FixedPitch::new(1.0)),
        )
        .unwrap();
        let binding = RigBinding {
            drive: MouthDrive::MorphTarget { mesh: 0, target: 0 },
            node_name: "Face".into(),
        };
        FrameLoop::new(simulator, MouthDriver::new(binding, RigConfig::default()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_frame() {
        let mut frames = frame_loop();
        let pose = frames.frame_at(0.0);

        assert!(!pose.speaking);
        assert_eq!(
            pose.mouth,
            MouthPose::MorphInfluence {
                mesh: 0,
                target: 0,
                value: 0.0
            }
        );
        assert_eq!(pose.mouth_state, MouthState::closed());
        assert_eq!(pose.sample, Sample::SILENT);
        assert_eq!(frames.stats().frames, 1);
        assert_eq!(frames.stats().speaking_frames, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_speaking_frame_follows_sample() {
        let mut frames = frame_loop();
        frames.simulator.start("ab");
        tokio::time::sleep(Duration::from_millis(10)).await;

        // t = 0: no wobble, influence equals the sample volume
        let pose = frames.frame_at(0.0);
        assert!(pose.speaking);
        assert_eq!(pose.sample.phoneme_class, Some('a'));
        assert_eq!(pose.mouth_state.viseme, Viseme::AA);
        assert_eq!(
            pose.mouth,
            MouthPose::MorphInfluence {
                mesh: 0,
                target: 0,
                value: 0.8
            }
        );
        assert_eq!(frames.stats().last_volume, 0.8);

        tokio::time::sleep(Duration::from_millis(50)).await;
        let pose = frames.frame_at(0.0);
        assert_eq!(pose.mouth_state.viseme, Viseme::PP);

        tokio::time::sleep(Duration::from_millis(100)).await;
        let pose = frames.frame();
        assert!(!pose.speaking);
        assert_eq!(frames.stats().speaking_frames, 2);
        assert_eq!(frames.stats().last_volume, 0.0);
    }
}
