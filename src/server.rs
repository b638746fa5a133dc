use crate::config::TrackerConfig;
use crate::error::{Result, TrackerError};
use crate::joints::build_joint_state;
use crate::messages::{to_json, Header};
use crate::pose::{build_pose_stamped, build_twist_stamped};
use crate::state::SharedState;
use crate::test_pose::TestPoseGenerator;
use log::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::sleep;
use std::time::{Duration, Instant};

/// Anything the tracker can publish serialized messages to
pub trait MessageSink {
    fn publish(&mut self, topic: &str, payload: Vec<u8>) -> Result<()>;
}

/// Keeps a loop running at a fixed frequency
pub struct Rate {
    period: Duration,
    next: Instant,
}

impl Rate {
    pub fn new(hz: f64) -> Result<Self> {
        if !(hz.is_finite() && hz > 0.0) {
            return Err(TrackerError::Config(format!("Invalid loop rate {} Hz", hz)));
        }
        let period = Duration::from_secs_f64(1.0 / hz);
        Ok(Self {
            period,
            next: Instant::now() + period,
        })
    }

    /// Sleep for what is left of the current period.
    /// Overrunning a period resets the schedule instead of bursting to catch up.
    pub fn sleep(&mut self) {
        let now = Instant::now();
        if self.next > now {
            sleep(self.next - now);
            self.next += self.period;
        } else {
            self.next = now + self.period;
        }
    }
}

struct Topics {
    joint_state: String,
    pose_stamped: String,
    twist_stamped: String,
}

/// Publishes the last known tracking state at a fixed rate
pub struct LeapServer {
    state: SharedState,
    generator: TestPoseGenerator,
    topics: Topics,
    node_name: String,
    rate_hz: f64,
    test_pose: bool,
    publish_twist: bool,
    seq: u32,
}

impl LeapServer {
    pub fn new(state: SharedState, config: &TrackerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            state,
            generator: TestPoseGenerator::new(config.time_step),
            topics: Topics {
                joint_state: config.joint_state_topic(),
                pose_stamped: config.pose_stamped_topic(),
                twist_stamped: config.twist_stamped_topic(),
            },
            node_name: config.node_name.clone(),
            rate_hz: config.rate_hz,
            test_pose: config.test_pose,
            publish_twist: config.publish_twist,
            seq: 0,
        })
    }

    pub fn seq(&self) -> u32 {
        self.seq
    }

    /// Build and publish one set of messages
    pub fn transmit_once(&mut self, sink: &mut dyn MessageSink) -> Result<()> {
        let state = self
            .state
            .lock()
            .map_err(|_| TrackerError::StatePoisoned)?
            .clone();
        let header = Header::new(self.seq, &self.node_name);

        let joint_state = build_joint_state(&state, header.clone());
        let test_pose = if self.test_pose {
            Some(self.generator.sample())
        } else {
            None
        };
        let pose_stamped = build_pose_stamped(&state.hand, header.clone(), test_pose.as_ref());
        trace!("{:?}", pose_stamped);

        sink.publish(&self.topics.joint_state, to_json(&joint_state)?)?;
        sink.publish(&self.topics.pose_stamped, to_json(&pose_stamped)?)?;
        if self.publish_twist {
            let twist_stamped = build_twist_stamped(header);
            sink.publish(&self.topics.twist_stamped, to_json(&twist_stamped)?)?;
        }

        self.generator.advance();
        self.seq = self.seq.wrapping_add(1);
        Ok(())
    }

    /// Publish until `running` is cleared. Always ends with [`TrackerError::Quit`].
    pub fn start_transmit(
        &mut self,
        sink: &mut dyn MessageSink,
        running: &AtomicBool,
    ) -> Result<()> {
        info!(
            "Publishing to {} and {} at {} Hz",
            self.topics.joint_state, self.topics.pose_stamped, self.rate_hz
        );
        let mut rate = Rate::new(self.rate_hz)?;
        while running.load(Ordering::SeqCst) {
            if let Err(error) = self.transmit_once(sink) {
                warn!("Failed to publish tracking data: {}", error);
            }
            rate.sleep();
        }
        error!("Interrupt detected");
        debug!("Quit command sent to client");
        Err(TrackerError::Quit)
    }
}
