pub mod config;
pub mod consumers;
pub mod logging;
