//! Utility modules

pub mod logger;
pub mod time;

pub use logger::{init_logger, init_logger_with_file};
