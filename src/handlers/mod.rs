pub mod health;
pub mod info;
pub mod webhook;

pub use health::{get_stats, health_check, HealthResponse};
pub use info::{fallback, info_page};
pub use webhook::receive_webhook;
