//! Business logic services for the TropoMetrics service

pub mod auth;
pub mod mailer;
pub mod report;

pub use auth::{KeyValidator, StaticKeyValidator};
pub use mailer::Mailer;
