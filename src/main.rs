use anyhow::{anyhow, Result};
use clap::Parser;
use leap_tracker::config::AppConfig;
use leap_tracker::error::TrackerError;
use leap_tracker::listener::{FrameListener, ShowData};
use leap_tracker::mqtt_adaptor::MqttController;
use leap_tracker::server::LeapServer;
use leap_tracker::state::TrackingState;
use log::*;
use simplelog::{Config, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Republish hand tracking frames as joint states and poses
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// MQTT broker host
    #[arg(long)]
    host: Option<String>,
    /// MQTT broker port
    #[arg(long)]
    port: Option<u16>,
    /// Publish the live hand pose instead of the test sweep
    #[arg(long)]
    live: bool,
    /// Also publish the twist channel
    #[arg(long)]
    twist: bool,
    /// Log every finger bone on each frame
    #[arg(long)]
    show_fingers: bool,
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(host) = &args.host {
        config.mqtt.host = host.clone();
    }
    if let Some(port) = args.port {
        config.mqtt.port = port;
    }
    if args.live {
        config.tracker.test_pose = false;
    }
    if args.twist {
        config.tracker.publish_twist = true;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(level, Config::default(), TerminalMode::Mixed)
        .map_err(|error| anyhow!("Failed to start logger: {:?}", error))?;

    let config = load_config(&args)?;

    let running = Arc::new(AtomicBool::new(true));
    let handler_running = running.clone();
    ctrlc::set_handler(move || {
        handler_running.store(false, Ordering::SeqCst);
    })?;

    let state = TrackingState::shared();
    let show = if args.show_fingers {
        ShowData::everything()
    } else {
        vec![ShowData::Hand]
    };
    let listener = FrameListener::new(state.clone()).show(show);
    let controller = MqttController::start(&config.mqtt, Box::new(listener))?;
    let mut sink = controller.sink();
    let mut server = LeapServer::new(state, &config.tracker)?;

    info!("Press Ctrl-C to quit...");
    match server.start_transmit(&mut sink, &running) {
        Err(TrackerError::Quit) => error!("{}", TrackerError::Quit),
        Err(error) => error!("Publishing stopped: {}", error),
        Ok(()) => (),
    }

    controller.remove_listener();
    Ok(())
}
