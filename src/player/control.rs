use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use rand::seq::SliceRandom;
use tracing::{info, warn};

use crate::bluetooth::BluetoothControl;
use crate::config::{LibrarySettings, Settings};
use crate::library::scan;
use crate::render::Renderer;

use super::session::{MountHandle, Session, SessionHandle, Status};
use super::thread::spawn_playback_thread;

/// The playback controller. Owns the session and the dependencies the
/// transport operations and the loop thread need.
pub struct Player {
    session: SessionHandle,
    root: Mutex<PathBuf>,
    library: LibrarySettings,
    renderer: Arc<dyn Renderer>,
    bluetooth: Arc<dyn BluetoothControl>,
    poll: Duration,
    join: Mutex<Option<JoinHandle<()>>>,
    mount: Mutex<Option<MountHandle>>,
}

impl Player {
    pub fn new(
        settings: &Settings,
        renderer: Arc<dyn Renderer>,
        bluetooth: Arc<dyn BluetoothControl>,
    ) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::new(
                settings.playback.shuffle,
                settings.playback.loop_enabled,
            ))),
            root: Mutex::new(settings.library.music_dir.clone()),
            library: settings.library.clone(),
            renderer,
            bluetooth,
            poll: Duration::from_millis(settings.renderer.poll_ms),
            join: Mutex::new(None),
            mount: Mutex::new(None),
        }
    }

    /// Attach the shared mount view published by the media monitor so
    /// `status()` can report it.
    pub fn set_mount_handle(&self, handle: MountHandle) {
        if let Ok(mut mount) = self.mount.lock() {
            *mount = Some(handle);
        }
    }

    /// Point the scanner at a different music root (used when removable
    /// media is attached).
    pub fn set_music_root(&self, root: &Path) {
        if let Ok(mut r) = self.root.lock() {
            *r = root.to_path_buf();
        }
    }

    /// Rescan the library and begin playback from the top. Reports
    /// failure when already playing or when the library is empty.
    pub fn start(&self) -> bool {
        let root = self.root.lock().unwrap().clone();

        let generation = {
            let mut s = self.session.lock().unwrap();
            if s.playing {
                warn!("start requested but playback is already running");
                return false;
            }

            let tracks = scan(&root, &self.library);
            if tracks.is_empty() {
                warn!(root = %root.display(), "no tracks found in library");
                return false;
            }
            info!(root = %root.display(), tracks = tracks.len(), "starting playback");

            s.playlist = tracks;
            if s.shuffle {
                s.playlist.shuffle(&mut rand::rng());
            }
            s.cursor = 0;
            s.playing = true;
            s.paused = false;
            s.generation += 1;

            // The receiver side has to release the output device first.
            self.bluetooth.pause_external_playback();

            s.generation
        };

        let handle = spawn_playback_thread(
            self.session.clone(),
            self.renderer.clone(),
            generation,
            self.poll,
        );
        if let Ok(mut join) = self.join.lock() {
            *join = Some(handle);
        }
        true
    }

    /// Stop playback and hand the output device back to the Bluetooth
    /// renderer. Safe to call when nothing is playing.
    pub fn stop(&self) {
        {
            let mut s = self.session.lock().unwrap();
            s.playing = false;
            s.paused = false;
            if let Some(job) = s.current.take() {
                job.terminate();
            }
        }
        self.bluetooth.resume_external_playback();
        info!("playback stopped");
    }

    /// Skip the current track. The loop advances the cursor once it
    /// observes the terminated render.
    pub fn next(&self) -> bool {
        let s = self.session.lock().unwrap();
        if !s.playing {
            warn!("next requested but not currently playing");
            return false;
        }
        if let Some(job) = s.current.as_ref() {
            job.terminate();
        }
        info!("skipping to next track");
        true
    }

    /// Go back one track. The loop increments the cursor by one after
    /// every render exit, including the termination below, so landing
    /// on the previous track means stepping back two slots first.
    pub fn previous(&self) -> bool {
        let mut s = self.session.lock().unwrap();
        if !s.playing {
            warn!("previous requested but not currently playing");
            return false;
        }
        s.cursor = s.cursor.saturating_sub(2);
        if let Some(job) = s.current.as_ref() {
            job.terminate();
        }
        info!("going back to the previous track");
        true
    }

    /// Flip shuffle. Enabling permutes the playlist in place, keeping
    /// the cursor on the track that was playing; disabling restores the
    /// scanner's deterministic order with a fresh scan.
    pub fn toggle_shuffle(&self) -> bool {
        let root = self.root.lock().unwrap().clone();

        let mut s = self.session.lock().unwrap();
        s.shuffle = !s.shuffle;
        if s.shuffle {
            let current = s.playlist.get(s.cursor).map(|t| t.path.clone());
            s.playlist.shuffle(&mut rand::rng());
            let new_cursor = current
                .and_then(|path| s.playlist.iter().position(|t| t.path == path))
                .unwrap_or(0);
            s.cursor = new_cursor;
            info!("shuffle enabled");
        } else {
            s.playlist = scan(&root, &self.library);
            info!("shuffle disabled");
        }
        s.shuffle
    }

    /// Read-only snapshot for the API layer.
    pub fn status(&self) -> Status {
        let mount = self
            .mount
            .lock()
            .ok()
            .and_then(|m| m.clone())
            .and_then(|handle| {
                handle
                    .lock()
                    .ok()
                    .and_then(|m| m.as_ref().map(|p| p.display().to_string()))
            });

        let s = self.session.lock().unwrap();
        let current_track = if s.playing {
            s.playlist.get(s.cursor).map(|t| t.display.clone())
        } else {
            None
        };

        Status {
            playing: s.playing,
            paused: s.paused,
            current_track,
            current_index: s.cursor,
            total_tracks: s.playlist.len(),
            shuffle: s.shuffle,
            loop_enabled: s.loop_enabled,
            mount,
        }
    }

    /// Display names in current playlist order.
    pub fn tracks(&self) -> Vec<String> {
        let s = self.session.lock().unwrap();
        s.playlist.iter().map(|t| t.display.clone()).collect()
    }

    /// Stop playback and wait for the loop thread to wind down. Called
    /// on daemon shutdown.
    pub fn shutdown(&self) {
        self.stop();
        if let Ok(mut join) = self.join.lock() {
            if let Some(handle) = join.take() {
                let _ = handle.join();
            }
        }
    }
}
