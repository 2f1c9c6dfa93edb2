pub mod cli;
pub mod config;
pub mod decode;
pub mod encode;
mod input;
pub mod types;

pub use config::Config;
