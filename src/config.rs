use crate::error::{Result, TrackerError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub mqtt: MqttConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MqttConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_client_id")]
    pub client_id: String,
    /// Topic the device bridge publishes frames on
    #[serde(default = "default_frame_topic")]
    pub frame_topic: String,
    /// Seconds between reconnection attempts
    #[serde(default = "default_reconnect_secs")]
    pub reconnect_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Used as frame id and as prefix for the output topics
    #[serde(default = "default_node_name")]
    pub node_name: String,
    #[serde(default = "default_rate_hz")]
    pub rate_hz: f64,
    /// Time added to the test sweep per publish tick
    #[serde(default = "default_time_step")]
    pub time_step: f64,
    /// Publish the synthetic sweep instead of the live hand pose
    #[serde(default = "default_test_pose")]
    pub test_pose: bool,
    #[serde(default)]
    pub publish_twist: bool,
}

fn default_host() -> String {
    "mqtt.local".to_string()
}
fn default_port() -> u16 {
    1883
}
fn default_client_id() -> String {
    "leap_tracker".to_string()
}
fn default_frame_topic() -> String {
    "leap_motion/frame".to_string()
}
fn default_reconnect_secs() -> u64 {
    5
}
fn default_node_name() -> String {
    "leap_tracker".to_string()
}
fn default_rate_hz() -> f64 {
    50.0
}
fn default_time_step() -> f64 {
    0.01
}
fn default_test_pose() -> bool {
    true
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            client_id: default_client_id(),
            frame_topic: default_frame_topic(),
            reconnect_secs: default_reconnect_secs(),
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            node_name: default_node_name(),
            rate_hz: default_rate_hz(),
            time_step: default_time_step(),
            test_pose: default_test_pose(),
            publish_twist: false,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.rate_hz.is_finite() && self.rate_hz > 0.0) {
            return Err(TrackerError::Config(format!(
                "rate_hz must be positive, got {}",
                self.rate_hz
            )));
        }
        if !self.time_step.is_finite() {
            return Err(TrackerError::Config(format!(
                "time_step must be finite, got {}",
                self.time_step
            )));
        }
        if self.node_name.is_empty() {
            return Err(TrackerError::Config("node_name can't be empty".to_string()));
        }
        Ok(())
    }

    pub fn joint_state_topic(&self) -> String {
        format!("{}/joint_state_out", self.node_name)
    }

    pub fn pose_stamped_topic(&self) -> String {
        format!("{}/pose_stamped_out", self.node_name)
    }

    pub fn twist_stamped_topic(&self) -> String {
        format!("{}/twist_stamped_out", self.node_name)
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.tracker.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.mqtt.port, 1883);
        assert_eq!(config.tracker.rate_hz, 50.0);
        assert!(config.tracker.test_pose);
        assert!(!config.tracker.publish_twist);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_topics_use_node_name() {
        let config = TrackerConfig::default();
        assert_eq!(config.joint_state_topic(), "leap_tracker/joint_state_out");
        assert_eq!(config.pose_stamped_topic(), "leap_tracker/pose_stamped_out");
        assert_eq!(config.twist_stamped_topic(), "leap_tracker/twist_stamped_out");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"tracker": {"rate_hz": 100.0}}"#).unwrap();
        assert_eq!(config.tracker.rate_hz, 100.0);
        assert_eq!(config.tracker.node_name, "leap_tracker");
        assert_eq!(config.mqtt.host, "mqtt.local");
    }

    #[test]
    fn test_rejects_zero_rate() {
        let mut config = AppConfig::default();
        config.tracker.rate_hz = 0.0;
        assert!(matches!(config.validate(), Err(TrackerError::Config(_))));
    }

    #[test]
    fn test_rejects_bad_rates() {
        for rate_hz in &[-50.0, std::f64::NAN, std::f64::INFINITY] {
            let config = TrackerConfig {
                rate_hz: *rate_hz,
                ..TrackerConfig::default()
            };
            assert!(matches!(config.validate(), Err(TrackerError::Config(_))));
        }
    }

    #[test]
    fn test_rejects_non_finite_time_step() {
        let config = TrackerConfig {
            time_step: std::f64::NAN,
            ..TrackerConfig::default()
        };
        assert!(matches!(config.validate(), Err(TrackerError::Config(_))));
    }
}
