pub mod bot;
pub mod config;
pub mod models;
pub mod report;
pub mod shared;
pub mod storage;

pub use config::BotConfig;
pub use shared::{AppError, AppResult};
