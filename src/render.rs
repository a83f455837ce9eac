//! External decoder supervision.
//!
//! Audio rendering is delegated to one external single-track decoder
//! process per track; this module owns launching those children and
//! terminating them early when transport commands ask for it.

mod process;
mod types;

pub use process::*;
pub use types::*;
