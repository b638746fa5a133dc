pub mod config;
pub mod data;
pub mod error;
pub mod joints;
pub mod listener;
pub mod messages;
pub mod mqtt_adaptor;
pub mod pose;
pub mod server;
pub mod state;
pub mod test_pose;
