//! Head Motion - idle breathing and speaking sway
//!
//! Pure functions of wall-clock time, so any frame rate gives the same
//! curve.

/// Head offset for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeadMotion {
    /// Vertical bob
    pub position_y: f32,
    /// Head rotation (x, y, z in radians)
    pub rotation: (f32, f32, f32),
}

impl HeadMotion {
    /// Motion at `t_ms` milliseconds
    pub fn at(speaking: bool, t_ms: f64) -> Self {
        let wave = |rate: f64, amplitude: f64| ((t_ms * rate).sin() * amplitude) as f32;

        let rotation = if speaking {
            (wave(0.003, 0.02), wave(0.002, 0.05), wave(0.002, 0.01))
        } else {
            (wave(0.0007, 0.01), wave(0.0005, 0.03), 0.0)
        };

        Self {
            position_y: wave(0.001, 0.02),
            rotation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_at_zero() {
        assert_eq!(HeadMotion::at(false, 0.0), HeadMotion::default());
        assert_eq!(HeadMotion::at(true, 0.0), HeadMotion::default());
    }

    #[test]
    fn test_amplitudes() {
        for step in 0..10_000 {
            let t = step as f64 * 16.7;
            let idle = HeadMotion::at(false, t);
            assert!(idle.position_y.abs() <= 0.02);
            assert!(idle.rotation.1.abs() <= 0.03);
            assert_eq!(idle.rotation.2, 0.0);

            let speaking = HeadMotion::at(true, t);
            assert!(speaking.rotation.0.abs() <= 0.02);
            assert!(speaking.rotation.1.abs() <= 0.05);
            assert!(speaking.rotation.2.abs() <= 0.01);
        }
    }

    #[test]
    fn test_speaking_sways_more() {
        // Quarter period of the speaking yaw
        let t = std::f64::consts::FRAC_PI_2 / 0.002;
        let speaking = HeadMotion::at(true, t);
        let idle = HeadMotion::at(false, t);
        assert!(speaking.rotation.1.abs() > idle.rotation.1.abs());
    }
}
