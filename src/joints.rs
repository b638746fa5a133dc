use crate::data::{BoneType, FingerType, Vector};
use crate::messages::{Header, JointState};
use crate::state::TrackingState;
use log::*;
use once_cell::sync::Lazy;

pub const FINGER_NAMES: [&str; 5] = ["thumb", "index", "middle", "ring", "pinky"];
pub const FINGER_BONES: [&str; 4] = ["meta", "prox", "mid", "dist"];
pub const ORI_ATTRIBUTES: [&str; 3] = ["roll", "pitch", "yaw"];

pub const JOINT_COUNT: usize =
    ORI_ATTRIBUTES.len() + FINGER_NAMES.len() * FINGER_BONES.len() * ORI_ATTRIBUTES.len();

static JOINT_NAMES: Lazy<Vec<String>> = Lazy::new(|| {
    let mut names = Vec::with_capacity(JOINT_COUNT);
    for attr in &ORI_ATTRIBUTES {
        names.push(format!("hand.{}", attr));
    }
    for finger in &FINGER_NAMES {
        for bone in &FINGER_BONES {
            for attr in &ORI_ATTRIBUTES {
                names.push(format!("{}.{}.{}", finger, bone, attr));
            }
        }
    }
    info!("Publishing JointState for the following joints: {:?}", names);
    names
});

/// Joint names in publishing order. The hand topology never changes so this is built once.
pub fn joint_names() -> &'static [String] {
    &JOINT_NAMES
}

fn orientation(vector: &Vector) -> [f32; 3] {
    [vector.roll(), vector.pitch(), vector.yaw()]
}

/// Joint values in the same order as [`joint_names`]
pub fn joint_positions(state: &TrackingState) -> Vec<f64> {
    let mut positions = Vec::with_capacity(JOINT_COUNT);

    // palm normal gives a steadier roll than the hand direction
    let hand = &state.hand;
    positions.push(hand.palm_normal.roll() as f64);
    positions.push(hand.direction.pitch() as f64);
    positions.push(hand.direction.yaw() as f64);

    for finger_type in FingerType::ALL.iter() {
        let finger = state.finger(*finger_type);
        for bone_type in BoneType::ALL.iter() {
            let direction = finger.bone(*bone_type).direction;
            positions.extend(orientation(&direction).iter().map(|value| *value as f64));
        }
    }
    positions
}

pub fn build_joint_state(state: &TrackingState, header: Header) -> JointState {
    JointState {
        header,
        name: joint_names().to_vec(),
        position: joint_positions(state),
        velocity: vec![],
        effort: vec![],
    }
}
