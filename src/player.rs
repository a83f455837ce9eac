//! Playback controller: the singleton session, its transport operations
//! and the background playback loop.
//!
//! All session state lives behind one mutex. Transport operations take
//! the lock for their whole critical section; the loop thread takes it
//! around every read or write but never while a track renders.

mod control;
mod session;
mod thread;

pub use control::*;
pub use session::*;
