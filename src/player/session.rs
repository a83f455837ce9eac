//! Session state and the snapshot types shared with collaborators.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::library::Track;
use crate::render::RenderJob;

/// The mutable playback state. Exactly one exists per daemon, always
/// behind [`SessionHandle`]'s mutex.
pub struct Session {
    pub(super) playlist: Vec<Track>,
    pub(super) cursor: usize,
    pub(super) playing: bool,
    pub(super) paused: bool,
    pub(super) shuffle: bool,
    pub(super) loop_enabled: bool,
    pub(super) current: Option<Arc<dyn RenderJob>>,
    /// Bumped by every `start()`. A playback loop thread exits as soon
    /// as the session generation is no longer its own, so a stale loop
    /// from a stop/start cycle can never race the fresh one.
    pub(super) generation: u64,
}

impl Session {
    pub(super) fn new(shuffle: bool, loop_enabled: bool) -> Self {
        Self {
            playlist: Vec::new(),
            cursor: 0,
            playing: false,
            paused: false,
            shuffle,
            loop_enabled,
            current: None,
            generation: 0,
        }
    }
}

pub type SessionHandle = Arc<Mutex<Session>>;

/// Shared view of the active removable-media mount, published by the
/// media monitor.
pub type MountHandle = Arc<Mutex<Option<PathBuf>>>;

/// Flat snapshot of the session, as handed to the API layer.
#[derive(Debug, Clone, Serialize)]
pub struct Status {
    pub playing: bool,
    pub paused: bool,
    pub current_track: Option<String>,
    pub current_index: usize,
    pub total_tracks: usize,
    pub shuffle: bool,
    pub loop_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount: Option<String>,
}
