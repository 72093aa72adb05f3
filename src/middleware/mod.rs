pub mod auth;
pub mod log_responses;
pub mod metrics;
pub mod platform;
