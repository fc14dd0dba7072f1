//! The filter → sort → paginate stages and selection tracking.
//!
//! Each stage is a pure function over row references. [`Table`](crate::Table)
//! composes them; they are public so callers can run a stage on its own.

mod filter;
mod paginate;
mod selection;
mod sort;
mod view_state;

pub use filter::*;
pub use paginate::*;
pub use selection::*;
pub use sort::*;
pub use view_state::*;
