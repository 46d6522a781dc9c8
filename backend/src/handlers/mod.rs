//! HTTP handlers for the TropoMetrics service

pub mod email;
pub mod health;
pub mod weather;

pub use email::send_email;
pub use health::{health_check, root};
pub use weather::weather_report;
