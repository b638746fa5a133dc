use crate::data::Hand;
use crate::messages::{Header, Point, Pose, PoseStamped, Quaternion, TwistStamped};
use crate::test_pose::TestPose;
use nalgebra as na;

/// Rotation from static-axis roll, pitch, yaw (applied about x, then y, then z)
pub fn quaternion_from_euler(roll: f64, pitch: f64, yaw: f64) -> Quaternion {
    let rotation = na::UnitQuaternion::from_euler_angles(roll, pitch, yaw);
    Quaternion {
        x: rotation.i,
        y: rotation.j,
        z: rotation.k,
        w: rotation.w,
    }
}

pub fn hand_pose(hand: &Hand) -> Pose {
    let roll = hand.palm_normal.roll() as f64;
    let pitch = hand.palm_normal.pitch() as f64;
    let yaw = hand.direction.yaw() as f64;
    let position = hand.palm_position;
    Pose {
        position: Point {
            x: position.x as f64,
            y: position.y as f64,
            z: position.z as f64,
        },
        orientation: quaternion_from_euler(roll, pitch, yaw),
    }
}

pub fn synthetic_pose(test_pose: &TestPose) -> Pose {
    let [x, y, z] = test_pose.position;
    Pose {
        position: Point { x, y, z },
        orientation: quaternion_from_euler(test_pose.roll, test_pose.pitch, test_pose.yaw),
    }
}

/// Pose of the last known hand, or the synthetic sweep when a test pose is given
pub fn build_pose_stamped(hand: &Hand, header: Header, test_pose: Option<&TestPose>) -> PoseStamped {
    let pose = match test_pose {
        Some(test_pose) => synthetic_pose(test_pose),
        None => hand_pose(hand),
    };
    PoseStamped { header, pose }
}

/// Velocities are not tracked yet so the twist is always zero
pub fn build_twist_stamped(header: Header) -> TwistStamped {
    TwistStamped {
        header,
        ..TwistStamped::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Vector;
    use std::f64::consts::FRAC_PI_2;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_zero_angles_is_identity() {
        let q = quaternion_from_euler(0.0, 0.0, 0.0);
        assert_eq!((q.x, q.y, q.z, q.w), (0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_single_axis_rotations() {
        let half = (FRAC_PI_2 / 2.0).sin();
        let q = quaternion_from_euler(FRAC_PI_2, 0.0, 0.0);
        assert!(close(q.x, half) && close(q.y, 0.0) && close(q.z, 0.0) && close(q.w, half));
        let q = quaternion_from_euler(0.0, FRAC_PI_2, 0.0);
        assert!(close(q.x, 0.0) && close(q.y, half) && close(q.z, 0.0) && close(q.w, half));
        let q = quaternion_from_euler(0.0, 0.0, FRAC_PI_2);
        assert!(close(q.x, 0.0) && close(q.y, 0.0) && close(q.z, half) && close(q.w, half));
    }

    #[test]
    fn test_combined_rotation_order() {
        // roll then pitch then yaw, all about fixed axes
        let q = quaternion_from_euler(0.1, 0.2, 0.3);
        assert!(close(q.x, 0.034271));
        assert!(close(q.y, 0.106021));
        assert!(close(q.z, 0.143572));
        assert!(close(q.w, 0.983347));
    }

    #[test]
    fn test_live_pose_uses_palm() {
        let hand = Hand {
            palm_position: Vector::new(1.0, 2.0, 3.0),
            palm_normal: Vector::new(0.0, -1.0, 0.0),
            direction: Vector::new(0.0, 0.0, -1.0),
            fingers: vec![],
        };
        let message = build_pose_stamped(&hand, Header::default(), None);
        assert_eq!(message.pose.position, Point { x: 1.0, y: 2.0, z: 3.0 });
        // palm facing down and pointing forward, only pitch of the normal remains
        let expected = quaternion_from_euler(0.0, hand.palm_normal.pitch() as f64, 0.0);
        assert!(close(message.pose.orientation.y, expected.y));
        assert!(close(message.pose.orientation.w, expected.w));
    }

    #[test]
    fn test_synthetic_pose_overrides_hand() {
        let hand = Hand {
            palm_position: Vector::new(1.0, 2.0, 3.0),
            ..Hand::default()
        };
        let test_pose = TestPose {
            position: [0.0, 500.0, 0.0],
            ..TestPose::default()
        };
        let message = build_pose_stamped(&hand, Header::default(), Some(&test_pose));
        assert_eq!(message.pose.position, Point { x: 0.0, y: 500.0, z: 0.0 });
        assert_eq!(message.pose.orientation, Quaternion::default());
    }

    #[test]
    fn test_twist_is_zero() {
        let message = build_twist_stamped(Header::new(4, "leap_tracker"));
        assert_eq!(message.header.seq, 4);
        assert_eq!(message.twist.linear.x, 0.0);
        assert_eq!(message.twist.angular.z, 0.0);
    }
}
