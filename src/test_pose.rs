use std::f64::consts::PI;

pub const CYCLE_LENGTH: f64 = 12.0 * PI;
pub const PHASE_WIDTH: f64 = 2.0 * PI;
pub const POSITION_AMPLITUDE: f64 = 1000.0;
pub const DEFAULT_TIME_STEP: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
    Pitch,
    Yaw,
    Roll,
}

impl Axis {
    /// Axis driven at time `t`
    pub fn active_at(t: f64) -> Axis {
        let phase = (t.rem_euclid(CYCLE_LENGTH) / PHASE_WIDTH) as usize;
        match phase {
            0 => Axis::X,
            1 => Axis::Y,
            2 => Axis::Z,
            3 => Axis::Pitch,
            4 => Axis::Yaw,
            _ => Axis::Roll,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TestPose {
    pub position: [f64; 3],
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

impl TestPose {
    pub fn at(t: f64) -> TestPose {
        let delta = t.sin() * POSITION_AMPLITUDE;
        let alpha = t.cos() * PI * 2.0;
        let mut pose = TestPose::default();
        match Axis::active_at(t) {
            Axis::X => pose.position[0] = delta,
            Axis::Y => pose.position[1] = delta,
            Axis::Z => pose.position[2] = delta,
            Axis::Pitch => pose.pitch = alpha,
            Axis::Yaw => pose.yaw = alpha,
            Axis::Roll => pose.roll = alpha,
        }
        pose
    }
}

/// Sweeps one of `x, y, z, pitch, yaw, roll` per `2π` phase, the rest stay at zero
#[derive(Debug, Clone)]
pub struct TestPoseGenerator {
    t: f64,
    step: f64,
}

impl Default for TestPoseGenerator {
    fn default() -> Self {
        TestPoseGenerator::new(DEFAULT_TIME_STEP)
    }
}

impl TestPoseGenerator {
    pub fn new(step: f64) -> Self {
        TestPoseGenerator { t: 0.0, step }
    }

    pub fn with_time(t: f64, step: f64) -> Self {
        TestPoseGenerator { t, step }
    }

    pub fn time(&self) -> f64 {
        self.t
    }

    /// Pose for the current time. The clock restarts once a full cycle has elapsed.
    pub fn sample(&mut self) -> TestPose {
        if self.t >= CYCLE_LENGTH {
            self.t = 0.0;
        }
        TestPose::at(self.t)
    }

    pub fn advance(&mut self) {
        self.t += self.step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_axis_per_phase() {
        assert_eq!(Axis::active_at(1.0), Axis::X);
        assert_eq!(Axis::active_at(7.0), Axis::Y);
        assert_eq!(Axis::active_at(13.0), Axis::Z);
        assert_eq!(Axis::active_at(20.0), Axis::Pitch);
        assert_eq!(Axis::active_at(26.0), Axis::Yaw);
        assert_eq!(Axis::active_at(33.0), Axis::Roll);
        assert_eq!(Axis::active_at(CYCLE_LENGTH + 1.0), Axis::X);
    }

    #[test]
    fn test_only_active_axis_moves() {
        let pose = TestPose::at(1.0);
        assert!((pose.position[0] - 1.0_f64.sin() * 1000.0).abs() < 1e-9);
        assert_eq!(pose.position[1], 0.0);
        assert_eq!(pose.position[2], 0.0);
        assert_eq!(pose.pitch, 0.0);
        assert_eq!(pose.yaw, 0.0);
        assert_eq!(pose.roll, 0.0);

        let pose = TestPose::at(26.0);
        assert!((pose.yaw - 26.0_f64.cos() * 2.0 * PI).abs() < 1e-9);
        assert_eq!(pose.position, [0.0, 0.0, 0.0]);
        assert_eq!(pose.pitch, 0.0);
        assert_eq!(pose.roll, 0.0);
    }

    #[test]
    fn test_time_resets_after_full_cycle() {
        let mut generator = TestPoseGenerator::with_time(CYCLE_LENGTH - 0.005, 0.01);
        generator.sample();
        assert!(generator.time() > 0.0);
        generator.advance();
        let pose = generator.sample();
        assert_eq!(generator.time(), 0.0);
        assert_eq!(pose, TestPose::at(0.0));
    }

    #[test]
    fn test_advance_steps_time() {
        let mut generator = TestPoseGenerator::default();
        for _ in 0..10 {
            generator.advance();
        }
        assert!((generator.time() - 0.1).abs() < 1e-9);
    }
}
