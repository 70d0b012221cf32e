pub mod app;
pub mod config;
pub mod error;
pub mod fetch;
pub mod services;
pub mod utils;

pub use app::Gateway;
pub use error::{AppError, Result};
