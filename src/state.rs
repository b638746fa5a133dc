use crate::data::{Finger, FingerType, Frame, Hand};
use std::sync::{Arc, Mutex};

/// Last known hand and fingers
#[derive(Debug, Clone)]
pub struct TrackingState {
    pub hand: Hand,
    pub fingers: [Finger; 5],
}

pub type SharedState = Arc<Mutex<TrackingState>>;

impl Default for TrackingState {
    fn default() -> Self {
        Self {
            hand: Hand::default(),
            fingers: [
                Finger::invalid(FingerType::Thumb),
                Finger::invalid(FingerType::Index),
                Finger::invalid(FingerType::Middle),
                Finger::invalid(FingerType::Ring),
                Finger::invalid(FingerType::Pinky),
            ],
        }
    }
}

impl TrackingState {
    pub fn shared() -> SharedState {
        Arc::new(Mutex::new(TrackingState::default()))
    }

    pub fn finger(&self, finger_type: FingerType) -> &Finger {
        &self.fingers[finger_type.index()]
    }

    /// Take the first hand of the frame and slot its fingers by type.
    /// Frames without hands leave the last known values in place.
    pub fn update(&mut self, frame: &Frame) {
        let hand = match frame.first_hand() {
            Some(hand) => hand,
            None => return,
        };
        self.hand = hand.clone();

        let mut fingers: Vec<&Finger> = hand.fingers.iter().collect();
        fingers.sort_by_key(|finger| finger.finger_type);
        for finger in fingers {
            self.fingers[finger.finger_type.index()] = finger.clone();
        }
    }
}
