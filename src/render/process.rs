use std::io;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::RendererSettings;
use crate::library::Track;

use super::types::{RenderJob, Renderer};

/// Spawns `mpg123` for MP3s and `ffplay` for every other recognized
/// format. Both are opaque external tools; their stdio is discarded.
pub struct ProcessRenderer {
    settings: RendererSettings,
}

impl ProcessRenderer {
    pub fn new(settings: RendererSettings) -> Self {
        Self { settings }
    }
}

/// Decoder invocation for a file, dispatched on its extension.
fn invocation(path: &Path, alsa_device: &str) -> (String, Vec<String>) {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let file = path.to_string_lossy().into_owned();
    if ext == "mp3" {
        (
            "mpg123".to_string(),
            vec![
                "-q".to_string(),
                "-o".to_string(),
                "alsa".to_string(),
                "-a".to_string(),
                alsa_device.to_string(),
                file,
            ],
        )
    } else {
        (
            "ffplay".to_string(),
            vec![
                "-nodisp".to_string(),
                "-autoexit".to_string(),
                "-loglevel".to_string(),
                "quiet".to_string(),
                file,
            ],
        )
    }
}

impl Renderer for ProcessRenderer {
    fn start(&self, track: &Track) -> io::Result<Arc<dyn RenderJob>> {
        let (program, args) = invocation(&track.path, &self.settings.alsa_device);
        debug!(track = %track.display, %program, "launching decoder");

        let child = Command::new(&program)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        Ok(Arc::new(ProcessJob {
            child: Mutex::new(child),
            grace: Duration::from_millis(self.settings.grace_ms),
        }))
    }
}

/// Handle to a running decoder child.
pub struct ProcessJob {
    child: Mutex<Child>,
    grace: Duration,
}

impl RenderJob for ProcessJob {
    fn poll(&self) -> Option<bool> {
        let Ok(mut child) = self.child.lock() else {
            return Some(false);
        };
        match child.try_wait() {
            Ok(Some(status)) => Some(status.success()),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "decoder status check failed");
                Some(false)
            }
        }
    }

    fn terminate(&self) {
        let Ok(mut child) = self.child.lock() else {
            return;
        };
        if matches!(child.try_wait(), Ok(Some(_))) {
            return;
        }

        // SAFETY: the pid belongs to a child we spawned and have not
        // reaped yet.
        unsafe {
            libc::kill(child.id() as libc::pid_t, libc::SIGTERM);
        }

        let deadline = Instant::now() + self.grace;
        while Instant::now() < deadline {
            if matches!(child.try_wait(), Ok(Some(_))) {
                return;
            }
            thread::sleep(Duration::from_millis(50));
        }

        warn!("decoder ignored the termination signal, killing");
        let _ = child.kill();
        let _ = child.wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invocation_uses_mpg123_for_mp3() {
        let (program, args) = invocation(Path::new("/music/song.mp3"), "plughw:Headphones");
        assert_eq!(program, "mpg123");
        assert!(args.contains(&"plughw:Headphones".to_string()));
        assert_eq!(args.last().unwrap(), "/music/song.mp3");
    }

    #[test]
    fn invocation_is_case_insensitive_on_the_extension() {
        let (program, _) = invocation(Path::new("/music/SONG.MP3"), "default");
        assert_eq!(program, "mpg123");
    }

    #[test]
    fn invocation_falls_back_to_ffplay_for_other_formats() {
        for name in ["a.flac", "a.wav", "a.ogg", "a.opus", "a"] {
            let (program, args) = invocation(Path::new(name), "default");
            assert_eq!(program, "ffplay");
            assert!(args.contains(&"-autoexit".to_string()));
        }
    }

    #[test]
    fn poll_reports_a_clean_exit() {
        let child = Command::new("true").spawn().unwrap();
        let job = ProcessJob {
            child: Mutex::new(child),
            grace: Duration::from_millis(500),
        };

        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            match job.poll() {
                Some(ok) => {
                    assert!(ok);
                    return;
                }
                None if Instant::now() >= deadline => panic!("child never exited"),
                None => thread::sleep(Duration::from_millis(10)),
            }
        }
    }

    #[test]
    fn terminate_stops_a_long_running_child() {
        // `sleep` stands in for a decoder mid-track.
        let child = Command::new("sleep").arg("30").spawn().unwrap();
        let job = ProcessJob {
            child: Mutex::new(child),
            grace: Duration::from_millis(500),
        };
        assert!(job.poll().is_none());

        let started = Instant::now();
        job.terminate();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(job.poll(), Some(false));
    }

    #[test]
    fn terminate_after_natural_exit_is_a_no_op() {
        let child = Command::new("true").spawn().unwrap();
        let job = ProcessJob {
            child: Mutex::new(child),
            grace: Duration::from_millis(500),
        };
        while job.poll().is_none() {
            thread::sleep(Duration::from_millis(10));
        }
        job.terminate();
        assert_eq!(job.poll(), Some(true));
    }
}
