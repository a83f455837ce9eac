use std::sync::Arc;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::render::Renderer;

use super::session::SessionHandle;

/// Runs the playback loop until the playlist is exhausted, playback is
/// stopped, or a newer `start()` supersedes this generation.
///
/// Each iteration validates the session under the lock, renders the
/// cursor track outside it (the only long block), then increments the
/// cursor by one regardless of the render outcome. Failed tracks are
/// skipped, not retried, and `previous()` counts on exactly one
/// increment per render exit.
pub(super) fn spawn_playback_thread(
    session: SessionHandle,
    renderer: Arc<dyn Renderer>,
    generation: u64,
    poll: Duration,
) -> JoinHandle<()> {
    thread::spawn(move || {
        info!("playback loop started");
        loop {
            let track = {
                let mut s = session.lock().unwrap();
                if s.generation != generation || !s.playing {
                    break;
                }
                if s.playlist.is_empty() {
                    info!("playlist is empty, stopping");
                    s.playing = false;
                    break;
                }
                if s.cursor >= s.playlist.len() {
                    if s.loop_enabled {
                        debug!("end of playlist, wrapping around");
                        s.cursor = 0;
                    } else {
                        info!("end of playlist, stopping");
                        s.playing = false;
                        break;
                    }
                }
                s.playlist[s.cursor].clone()
            };

            let job = match renderer.start(&track) {
                Ok(job) => job,
                Err(e) => {
                    warn!(track = %track.display, error = %e, "could not launch decoder, skipping");
                    let mut s = session.lock().unwrap();
                    if s.generation != generation {
                        break;
                    }
                    s.cursor += 1;
                    continue;
                }
            };

            {
                let mut s = session.lock().unwrap();
                if s.generation != generation || !s.playing {
                    // Stopped between picking the track and launching it.
                    drop(s);
                    job.terminate();
                    break;
                }
                s.current = Some(job.clone());
            }

            info!(track = %track.display, "playing");
            let finished_cleanly = loop {
                match job.poll() {
                    Some(result) => break result,
                    None => thread::sleep(poll),
                }
            };
            if !finished_cleanly {
                warn!(track = %track.display, "track did not finish cleanly, skipping");
            }

            let mut s = session.lock().unwrap();
            if s.generation != generation {
                break;
            }
            s.current = None;
            s.cursor += 1;
        }
        info!("playback loop ended");
    })
}
