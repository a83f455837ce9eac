//! bluejay turns a single-board computer into a Bluetooth audio
//! receiver with an auxiliary local/removable-media music player.
//!
//! The crate owns the playback controller: the [`player::Player`]
//! session and its transport operations, the external decoder
//! supervision in [`render`], the [`library`] scanner and the
//! removable-media [`monitor`]. The HTTP surface that consumes the
//! transport operations lives outside this crate.

pub mod bluetooth;
pub mod config;
pub mod library;
pub mod monitor;
pub mod player;
pub mod render;
pub mod runtime;
