//! Music library scanning.
//!
//! The scanner walks a root directory and produces the ordered track
//! list the playback session works from.

mod model;
mod scan;

pub use model::*;
pub use scan::*;
