//! HTTP API handlers for artistdb-server

pub mod artist;
pub mod health;

pub use artist::get_artist;
pub use health::health_routes;
