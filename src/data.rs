use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Vector as reported by the tracking device.
/// Units are millimetres for positions and unit length for directions.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Angle around the x axis, measured from the negative z axis
    pub fn pitch(&self) -> f32 {
        self.y.atan2(-self.z)
    }

    /// Angle around the y axis, measured from the negative z axis
    pub fn yaw(&self) -> f32 {
        self.x.atan2(-self.z)
    }

    /// Angle around the z axis, measured from the negative y axis
    pub fn roll(&self) -> f32 {
        self.x.atan2(-self.y)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BoneType {
    Metacarpal,
    Proximal,
    Intermediate,
    Distal,
}

impl BoneType {
    pub const ALL: [BoneType; 4] = [
        BoneType::Metacarpal,
        BoneType::Proximal,
        BoneType::Intermediate,
        BoneType::Distal,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Bone {
    pub bone_type: BoneType,
    pub direction: Vector,
}

impl Bone {
    /// Bone the device did not report
    pub fn invalid(bone_type: BoneType) -> Self {
        Self {
            bone_type,
            direction: Vector::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FingerType {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl FingerType {
    pub const ALL: [FingerType; 5] = [
        FingerType::Thumb,
        FingerType::Index,
        FingerType::Middle,
        FingerType::Ring,
        FingerType::Pinky,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Finger {
    pub finger_type: FingerType,
    #[serde(default)]
    pub bones: Vec<Bone>,
}

impl Finger {
    pub fn invalid(finger_type: FingerType) -> Self {
        Self {
            finger_type,
            bones: vec![],
        }
    }

    pub fn bone(&self, bone_type: BoneType) -> Bone {
        self.bones
            .iter()
            .find(|bone| bone.bone_type == bone_type)
            .copied()
            .unwrap_or_else(|| Bone::invalid(bone_type))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Hand {
    pub palm_position: Vector,
    pub palm_normal: Vector,
    pub direction: Vector,
    #[serde(default)]
    pub fingers: Vec<Finger>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub id: i64,
    /// Device timestamp in microseconds
    pub timestamp: i64,
    #[serde(default)]
    pub hands: Vec<Hand>,
}

impl Frame {
    pub fn deserialize(data: &[u8]) -> Result<Frame> {
        Ok(serde_json::from_slice::<Frame>(data)?)
    }

    pub fn first_hand(&self) -> Option<&Hand> {
        self.hands.first()
    }
}
