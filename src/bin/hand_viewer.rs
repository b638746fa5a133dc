use anyhow::{anyhow, Result};
use clap::Parser;
use kiss3d::window::Window;
use leap_tracker::config::{MqttConfig, TrackerConfig};
use leap_tracker::messages::{from_json, PoseStamped};
use leap_tracker::test_pose::POSITION_AMPLITUDE;
use log::*;
use nalgebra::{Isometry3, Point3, Quaternion, Translation3, UnitQuaternion, Vector3};
use rumqtt::{MqttClient, MqttOptions, Notification, QoS, ReconnectOptions};
use simplelog::{Config, LevelFilter, TermLogger, TerminalMode};
use std::collections::VecDeque;
use std::f32::consts::FRAC_PI_2;
use std::sync::{Arc, Mutex};

/// Tracker poses are in millimetres
const MM_TO_M: f32 = 0.001;
const TRAIL_LENGTH: usize = 200;
const SWEEP_EXTENT_MM: f32 = POSITION_AMPLITUDE as f32;
const GROUND_TILE_SIZE: f32 = 0.25;

/// Render the poses published by the tracker
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, default_value = "mqtt.local")]
    host: String,
    #[arg(long, default_value_t = 1883)]
    port: u16,
    #[arg(long, default_value = "leap_tracker")]
    node_name: String,
}

fn subscribe(args: &Args, latest: Arc<Mutex<Option<PoseStamped>>>) -> Result<()> {
    let tracker = TrackerConfig {
        node_name: args.node_name.clone(),
        ..TrackerConfig::default()
    };
    let pose_topic = tracker.pose_stamped_topic();
    let defaults = MqttConfig::default();

    let mqtt_options = MqttOptions::new("leap_hand_viewer", args.host.as_str(), args.port)
        .set_reconnect_opts(ReconnectOptions::Always(defaults.reconnect_secs));
    let (mut mqtt_client, notifications) = MqttClient::start(mqtt_options)
        .map_err(|error| anyhow!("Failed to connect to MQTT host: {:?}", error))?;
    info!("Connected to MQTT");
    mqtt_client
        .subscribe(pose_topic.as_str(), QoS::AtMostOnce)
        .map_err(|error| anyhow!("Failed to subscribe to topic {}: {:?}", pose_topic, error))?;
    trace!("Subscribing to {}", pose_topic);

    std::thread::spawn(move || {
        // keep the client alive for as long as notifications flow
        let _mqtt_client = mqtt_client;
        for notification in notifications {
            if let Notification::Publish(message) = notification {
                if message.topic_name != pose_topic {
                    continue;
                }
                match from_json::<PoseStamped>(&message.payload) {
                    Ok(pose) => {
                        if let Ok(mut latest) = latest.lock() {
                            *latest = Some(pose);
                        }
                    }
                    Err(error) => warn!("Bad pose message: {}", error),
                }
            }
        }
    });
    Ok(())
}

/// Offsets of the tiles along one axis, covering `-extent..extent`
fn tile_offsets(extent: f32, tile_size: f32) -> Vec<f32> {
    let count = (2.0 * extent / tile_size).ceil() as usize;
    (0..count)
        .map(|index| (index as f32 + 0.5) * tile_size - extent)
        .collect()
}

/// Checkerboard under the test sweep so the swept volume is visible
fn add_ground_plane(window: &mut Window) {
    let extent = SWEEP_EXTENT_MM * MM_TO_M;
    let offsets = tile_offsets(extent, GROUND_TILE_SIZE);
    let flat = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -FRAC_PI_2);
    for (i, z) in offsets.iter().enumerate() {
        for (j, x) in offsets.iter().enumerate() {
            let mut tile = window.add_cube(GROUND_TILE_SIZE, GROUND_TILE_SIZE, 0.001);
            if (i + j) % 2 == 0 {
                tile.set_color(1.0, 0.3, 0.2);
            } else {
                tile.set_color(0.5, 0.04, 0.17);
            }
            tile.set_local_transformation(Isometry3::from_parts(
                Translation3::new(*x, -extent, *z),
                flat,
            ));
        }
    }
}

fn to_isometry(pose: &PoseStamped) -> Isometry3<f32> {
    let position = &pose.pose.position;
    let orientation = &pose.pose.orientation;
    let rotation = UnitQuaternion::from_quaternion(Quaternion::new(
        orientation.w as f32,
        orientation.x as f32,
        orientation.y as f32,
        orientation.z as f32,
    ));
    Isometry3::from_parts(
        Translation3::new(
            position.x as f32 * MM_TO_M,
            position.y as f32 * MM_TO_M,
            position.z as f32 * MM_TO_M,
        ),
        rotation,
    )
}

fn main() -> Result<()> {
    let args = Args::parse();
    TermLogger::init(LevelFilter::Info, Config::default(), TerminalMode::Mixed)
        .map_err(|error| anyhow!("Failed to start logger: {:?}", error))?;

    let latest = Arc::new(Mutex::new(None));
    subscribe(&args, latest.clone())?;

    let mut window = Window::new("Leap hand viewer");
    window.set_background_color(0.5, 0.5, 0.5);
    window.set_point_size(5.0);
    add_ground_plane(&mut window);

    let mut palm = window.add_cube(0.08, 0.02, 0.1);
    palm.set_color(0.0, 1.0, 0.0);
    palm.set_visible(false);

    let mut trail: VecDeque<Point3<f32>> = VecDeque::with_capacity(TRAIL_LENGTH);
    let trail_color = Point3::new(0.5, 0.0, 0.5);

    while window.render() {
        let pose = match latest.lock() {
            Ok(latest) => latest.clone(),
            Err(_) => break,
        };
        if let Some(pose) = pose {
            let isometry = to_isometry(&pose);
            palm.set_local_transformation(isometry);
            palm.set_visible(true);
            if trail.len() == TRAIL_LENGTH {
                trail.pop_front();
            }
            trail.push_back(Point3::from(isometry.translation.vector));
        }
        for point in &trail {
            window.draw_point(point, &trail_color);
        }
    }
    Ok(())
}
