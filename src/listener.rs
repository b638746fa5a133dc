use crate::data::{BoneType, FingerType, Frame};
use crate::joints::{FINGER_BONES, FINGER_NAMES};
use crate::state::{SharedState, TrackingState};
use log::*;

/// Tracking device events.
///
/// Callbacks are fired from the controller thread.
pub trait Listener: Send {
    fn on_init(&mut self) {}
    fn on_connect(&mut self) {}
    fn on_disconnect(&mut self) {}
    fn on_exit(&mut self) {}
    fn on_frame(&mut self, frame: &Frame);
}

/// What [`show_data`] should print
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowData {
    Hand,
    Finger(FingerType),
}

impl ShowData {
    pub fn everything() -> Vec<ShowData> {
        let mut what = vec![ShowData::Hand];
        what.extend(FingerType::ALL.iter().map(|finger| ShowData::Finger(*finger)));
        what
    }
}

/// Level the per-frame dump is logged at. Visible with the default logger level.
pub const SHOW_DATA_LEVEL: Level = Level::Info;

pub fn hand_summary(state: &TrackingState) -> String {
    let normal = state.hand.palm_normal;
    let direction = state.hand.direction;
    let position = state.hand.palm_position;
    format!(
        "hand:\n\tpitch: {:>6.2} | x: {:>6.2}\n\t  yaw: {:>6.2} | y: {:>6.2}\n\t roll: {:>6.2} | z: {:>6.2}",
        direction.pitch(),
        position.x,
        direction.yaw(),
        position.y,
        normal.roll(),
        position.z
    )
}

/// Shows tracking data through the logger
pub fn show_data(state: &TrackingState, what: &[ShowData]) {
    if what.contains(&ShowData::Hand) {
        log!(SHOW_DATA_LEVEL, "{}", hand_summary(state));
    }
    for finger_type in FingerType::ALL.iter() {
        if !what.contains(&ShowData::Finger(*finger_type)) {
            continue;
        }
        let finger = state.finger(*finger_type);
        for bone_type in BoneType::ALL.iter() {
            let direction = finger.bone(*bone_type).direction;
            log!(
                SHOW_DATA_LEVEL,
                "{}.{}:\n\tpitch: {:>6.2}",
                FINGER_NAMES[finger_type.index()],
                FINGER_BONES[bone_type.index()],
                direction.pitch()
            );
        }
    }
}

/// Keeps the shared state up to date with the latest frame
pub struct FrameListener {
    state: SharedState,
    show: Vec<ShowData>,
}

impl FrameListener {
    pub fn new(state: SharedState) -> Self {
        Self {
            state,
            show: vec![ShowData::Hand],
        }
    }

    pub fn show(mut self, what: Vec<ShowData>) -> Self {
        self.show = what;
        self
    }
}

impl Listener for FrameListener {
    fn on_init(&mut self) {
        info!("Initialized");
    }

    fn on_connect(&mut self) {
        info!("Connected");
    }

    fn on_disconnect(&mut self) {
        info!("Disconnected");
    }

    fn on_exit(&mut self) {
        info!("Exited");
    }

    fn on_frame(&mut self, frame: &Frame) {
        trace!("Frame {} with {} hands", frame.id, frame.hands.len());
        match self.state.lock() {
            Ok(mut state) => {
                state.update(frame);
                show_data(&state, &self.show);
            }
            Err(_) => error!("Tracking state lock poisoned, dropping frame {}", frame.id),
        }
    }
}
