use crate::config::MqttConfig;
use crate::data::Frame;
use crate::error::{Result, TrackerError};
use crate::listener::Listener;
use crate::server::MessageSink;
use log::*;
use rumqtt::{MqttClient, MqttOptions, Notification, QoS, ReconnectOptions};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

fn transport_error<E: std::fmt::Debug>(error: E) -> TrackerError {
    TrackerError::Transport(format!("{:?}", error))
}

/// Publishes serialized messages through a shared MQTT client
#[derive(Clone)]
pub struct MqttSink {
    client: MqttClient,
}

impl MessageSink for MqttSink {
    fn publish(&mut self, topic: &str, payload: Vec<u8>) -> Result<()> {
        self.client
            .publish(topic, QoS::AtMostOnce, false, payload)
            .map_err(transport_error)
    }
}

/// What the device bridge can tell a listener
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    Connected,
    Disconnected,
    Frame(Vec<u8>),
}

/// Only messages on the frame topic carry frames
fn frame_event(topic_name: &str, payload: &[u8], frame_topic: &str) -> Option<DeviceEvent> {
    if topic_name == frame_topic {
        Some(DeviceEvent::Frame(payload.to_vec()))
    } else {
        None
    }
}

fn to_device_event(notification: Notification, frame_topic: &str) -> Option<DeviceEvent> {
    match notification {
        Notification::Publish(message) => {
            frame_event(&message.topic_name, &message.payload, frame_topic)
        }
        Notification::Reconnection => Some(DeviceEvent::Connected),
        Notification::Disconnection => Some(DeviceEvent::Disconnected),
        _ => None,
    }
}

/// Forward a device event to the listener. Frames that don't decode are skipped.
pub fn dispatch(listener: &mut dyn Listener, event: DeviceEvent) {
    match event {
        DeviceEvent::Connected => listener.on_connect(),
        DeviceEvent::Disconnected => listener.on_disconnect(),
        DeviceEvent::Frame(payload) => match Frame::deserialize(&payload) {
            Ok(frame) => listener.on_frame(&frame),
            Err(error) => warn!("Dropping undecodable frame: {}", error),
        },
    }
}

type SharedListener = Arc<Mutex<Box<dyn Listener>>>;

fn with_listener<F: FnOnce(&mut dyn Listener)>(listener: &SharedListener, action: F) {
    match listener.lock() {
        Ok(mut listener) => action(&mut **listener),
        Err(_) => error!("Listener lock poisoned"),
    }
}

/// Binds a [`Listener`] to tracking frames arriving over MQTT
pub struct MqttController {
    listener: SharedListener,
    running: Arc<AtomicBool>,
    sink: MqttSink,
}

impl MqttController {
    pub fn start(config: &MqttConfig, listener: Box<dyn Listener>) -> Result<Self> {
        let listener: SharedListener = Arc::new(Mutex::new(listener));
        with_listener(&listener, |listener| listener.on_init());

        let mqtt_options =
            MqttOptions::new(config.client_id.as_str(), config.host.as_str(), config.port)
                .set_reconnect_opts(ReconnectOptions::Always(config.reconnect_secs));
        let (mut mqtt_client, notifications) =
            MqttClient::start(mqtt_options).map_err(transport_error)?;
        info!("Connected to MQTT at {}:{}", config.host, config.port);

        mqtt_client
            .subscribe(config.frame_topic.as_str(), QoS::AtMostOnce)
            .map_err(transport_error)?;
        trace!("Subscribing to {}", config.frame_topic);
        with_listener(&listener, |listener| listener.on_connect());

        let running = Arc::new(AtomicBool::new(true));
        let thread_listener = listener.clone();
        let thread_running = running.clone();
        let frame_topic = config.frame_topic.clone();
        std::thread::spawn(move || {
            for notification in notifications {
                if !thread_running.load(Ordering::SeqCst) {
                    break;
                }
                if let Some(event) = to_device_event(notification, &frame_topic) {
                    with_listener(&thread_listener, |listener| dispatch(listener, event));
                }
            }
            debug!("Frame notifications ended");
        });

        Ok(Self {
            listener,
            running,
            sink: MqttSink {
                client: mqtt_client,
            },
        })
    }

    /// Sink sharing the controller's connection
    pub fn sink(&self) -> MqttSink {
        self.sink.clone()
    }

    /// Stop delivering events and notify the listener
    pub fn remove_listener(self) {
        self.running.store(false, Ordering::SeqCst);
        with_listener(&self.listener, |listener| listener.on_exit());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingListener {
        connects: usize,
        disconnects: usize,
        frames: Vec<i64>,
    }

    impl Listener for CountingListener {
        fn on_connect(&mut self) {
            self.connects += 1;
        }

        fn on_disconnect(&mut self) {
            self.disconnects += 1;
        }

        fn on_frame(&mut self, frame: &Frame) {
            self.frames.push(frame.id);
        }
    }

    #[test]
    fn test_dispatch_routes_events() {
        let mut listener = CountingListener::default();
        dispatch(&mut listener, DeviceEvent::Connected);
        dispatch(&mut listener, DeviceEvent::Disconnected);
        dispatch(&mut listener, DeviceEvent::Connected);
        dispatch(
            &mut listener,
            DeviceEvent::Frame(br#"{"id": 9, "timestamp": 5, "hands": []}"#.to_vec()),
        );
        assert_eq!(listener.connects, 2);
        assert_eq!(listener.disconnects, 1);
        assert_eq!(listener.frames, vec![9]);
    }

    #[test]
    fn test_dispatch_skips_bad_frames() {
        let mut listener = CountingListener::default();
        dispatch(&mut listener, DeviceEvent::Frame(b"{".to_vec()));
        assert!(listener.frames.is_empty());
    }

    #[test]
    fn test_connection_notifications_map_to_events() {
        assert_eq!(
            to_device_event(Notification::Reconnection, "leap_motion/frame"),
            Some(DeviceEvent::Connected)
        );
        assert_eq!(
            to_device_event(Notification::Disconnection, "leap_motion/frame"),
            Some(DeviceEvent::Disconnected)
        );
    }

    #[test]
    fn test_frames_only_come_from_frame_topic() {
        let payload = br#"{"id": 1, "timestamp": 0}"#;
        assert_eq!(
            frame_event("leap_motion/frame", payload, "leap_motion/frame"),
            Some(DeviceEvent::Frame(payload.to_vec()))
        );
        assert_eq!(
            frame_event("leap_tracker/pose_stamped_out", payload, "leap_motion/frame"),
            None
        );
    }

    #[test]
    fn test_reconnect_and_frames_reach_listener() {
        let mut listener = CountingListener::default();
        let events = vec![
            to_device_event(Notification::Disconnection, "frames"),
            to_device_event(Notification::Reconnection, "frames"),
            frame_event("other", br#"{"id": 1, "timestamp": 0}"#, "frames"),
            frame_event("frames", br#"{"id": 2, "timestamp": 0}"#, "frames"),
        ];
        for event in events.into_iter().flatten() {
            dispatch(&mut listener, event);
        }
        assert_eq!(listener.disconnects, 1);
        assert_eq!(listener.connects, 1);
        assert_eq!(listener.frames, vec![2]);
    }
}
