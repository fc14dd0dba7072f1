//! Error types

mod config;
mod export;

pub use config::*;
pub use export::*;
