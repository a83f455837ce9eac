//! Bluetooth renderer coordination.
//!
//! Local playback and the incoming Bluetooth stream share one output
//! device, so whichever side starts asks the other to stand down. The
//! signals are best-effort: failures are logged and playback proceeds,
//! accepting that the two may transiently overlap.

use std::io;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::config::BluetoothSettings;

pub trait BluetoothControl: Send + Sync {
    /// Ask the Bluetooth renderer to release the output device before
    /// local playback starts.
    fn pause_external_playback(&self);

    /// Hand the output device back to the Bluetooth renderer.
    fn resume_external_playback(&self);
}

/// Controls the systemd unit that renders the incoming Bluetooth stream
/// (`bluealsa-aplay` unless configured otherwise).
pub struct BluealsaService {
    settings: BluetoothSettings,
}

impl BluealsaService {
    pub fn new(settings: BluetoothSettings) -> Self {
        Self { settings }
    }

    fn systemctl(&self, verb: &str) {
        let timeout = Duration::from_millis(self.settings.command_timeout_ms);
        match run_bounded("systemctl", &[verb, &self.settings.unit], timeout) {
            Ok(true) => info!(unit = %self.settings.unit, verb, "bluetooth playback unit signalled"),
            Ok(false) => warn!(unit = %self.settings.unit, verb, "systemctl reported failure"),
            Err(e) => warn!(unit = %self.settings.unit, verb, error = %e, "could not run systemctl"),
        }
    }
}

impl BluetoothControl for BluealsaService {
    fn pause_external_playback(&self) {
        self.systemctl("stop");
    }

    fn resume_external_playback(&self) {
        self.systemctl("start");
    }
}

/// Run a command to completion with an upper bound on the wait. A
/// command that outlives the bound is killed and counts as a failure.
fn run_bounded(program: &str, args: &[&str], timeout: Duration) -> io::Result<bool> {
    let mut child = Command::new(program)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait()? {
            Some(status) => return Ok(status.success()),
            None if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return Ok(false);
            }
            None => thread::sleep(Duration::from_millis(50)),
        }
    }
}
