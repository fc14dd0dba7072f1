//! Client-side table data pipeline.
//!
//! Turns an in-memory dataset plus user-controlled view state (filter, sort,
//! page, selection) into the exact rows a table should draw, without ever
//! touching the caller's data.

pub mod config;
pub mod debounce;
pub mod error;
pub mod export;
pub mod model;
pub mod pipeline;

mod shared;
mod table;

pub use shared::*;
pub use table::*;
