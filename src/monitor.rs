//! Removable-media monitor.
//!
//! Polls the mount table and drives playback: media attached while idle
//! starts playback from the mount, media detached while playing stops
//! it. The check is level-triggered, comparing mount presence against
//! the playing flag on every tick, so a missed transition heals on the
//! next one.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::MediaSettings;
use crate::player::{MountHandle, Player};

pub struct MediaMonitor {
    mount: MountHandle,
}

impl MediaMonitor {
    /// Spawn the polling thread. The returned monitor exposes the mount
    /// handle so `status()` can report the active mount.
    pub fn spawn(player: Arc<Player>, settings: MediaSettings) -> Self {
        let mount: MountHandle = Arc::new(Mutex::new(None));

        let handle = mount.clone();
        thread::spawn(move || {
            let interval = Duration::from_secs(settings.poll_secs);
            info!(interval_secs = settings.poll_secs, "media monitor started");
            loop {
                tick(&player, &settings, &handle);
                thread::sleep(interval);
            }
        });

        Self { mount }
    }

    pub fn mount_handle(&self) -> MountHandle {
        self.mount.clone()
    }
}

fn tick(player: &Player, settings: &MediaSettings, handle: &MountHandle) {
    let mounted = match fs::read_to_string("/proc/mounts") {
        Ok(contents) => mount_targets(&contents),
        Err(e) => {
            warn!(error = %e, "could not read the mount table");
            return;
        }
    };
    let mount = pick_mount(&mounted, &settings.mount_points, &settings.media_root);

    if let Ok(mut m) = handle.lock() {
        *m = mount.clone();
    }

    let playing = player.status().playing;
    match (mount, playing) {
        (Some(path), false) => {
            info!(mount = %path.display(), "removable media attached, starting playback");
            player.set_music_root(&path);
            if !player.start() {
                debug!("start rejected, retrying on the next tick");
            }
        }
        (None, true) => {
            info!("removable media detached, stopping playback");
            player.stop();
        }
        _ => {}
    }
}

/// Mount targets from `/proc/mounts` contents: the second field of each
/// line, with octal escapes like `\040` decoded.
fn mount_targets(contents: &str) -> Vec<PathBuf> {
    contents
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .map(|target| PathBuf::from(unescape_mount_target(target)))
        .collect()
}

fn unescape_mount_target(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        match tail.get(..3).and_then(|d| u8::from_str_radix(d, 8).ok()) {
            Some(code) => {
                out.push(code as char);
                rest = &tail[3..];
            }
            None => {
                out.push('\\');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

/// First configured candidate that is currently mounted, or else the
/// lexicographically first mounted entry under the media root.
fn pick_mount(mounted: &[PathBuf], candidates: &[PathBuf], media_root: &Path) -> Option<PathBuf> {
    if let Some(hit) = candidates.iter().find(|c| mounted.contains(c)) {
        return Some(hit.clone());
    }

    let mut under: Vec<&PathBuf> = mounted
        .iter()
        .filter(|m| m.as_path() != media_root && m.starts_with(media_root))
        .collect();
    under.sort();
    under.first().map(|p| (*p).clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOUNTS: &str = "\
proc /proc proc rw,nosuid,nodev 0 0
/dev/mmcblk0p2 / ext4 rw,noatime 0 0
/dev/sda1 /media/usb0 vfat rw,noatime 0 0
/dev/sdb1 /media/pi/MUSIC\\040STICK vfat rw 0 0
";

    #[test]
    fn mount_targets_decodes_octal_escapes() {
        let targets = mount_targets(MOUNTS);
        assert!(targets.contains(&PathBuf::from("/media/usb0")));
        assert!(targets.contains(&PathBuf::from("/media/pi/MUSIC STICK")));
    }

    #[test]
    fn pick_mount_prefers_configured_candidates() {
        let mounted = mount_targets(MOUNTS);
        let candidates = vec![PathBuf::from("/media/usb"), PathBuf::from("/media/usb0")];
        let hit = pick_mount(&mounted, &candidates, Path::new("/media"));
        assert_eq!(hit, Some(PathBuf::from("/media/usb0")));
    }

    #[test]
    fn pick_mount_falls_back_to_entries_under_the_media_root() {
        let mounted = mount_targets(MOUNTS);
        let candidates = vec![PathBuf::from("/mnt/usb")];
        let hit = pick_mount(&mounted, &candidates, Path::new("/media"));
        // Both /media entries qualify; the lexicographically first wins.
        assert_eq!(hit, Some(PathBuf::from("/media/pi/MUSIC STICK")));
    }

    #[test]
    fn pick_mount_ignores_mounts_outside_the_media_root() {
        let mounted = mount_targets("proc /proc proc rw 0 0\n/dev/root / ext4 rw 0 0\n");
        let candidates = vec![PathBuf::from("/media/usb")];
        assert_eq!(pick_mount(&mounted, &candidates, Path::new("/media")), None);
    }
}
