use std::path::PathBuf;

use serde::Deserialize;

/// Top-level daemon settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path: `BLUEJAY_CONFIG_PATH`, else `/etc/bluejay/config.toml`
/// when present, else `$XDG_CONFIG_HOME/bluejay/config.toml` or
/// `~/.config/bluejay/config.toml`.
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `BLUEJAY__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub renderer: RendererSettings,
    pub playback: PlaybackSettings,
    pub bluetooth: BluetoothSettings,
    pub media: MediaSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            library: LibrarySettings::default(),
            renderer: RendererSettings::default(),
            playback: PlaybackSettings::default(),
            bluetooth: BluetoothSettings::default(),
            media: MediaSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Root directory scanned for music.
    pub music_dir: PathBuf,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            music_dir: PathBuf::from("/var/music"),
            extensions: vec![
                "mp3".into(),
                "flac".into(),
                "wav".into(),
                "m4a".into(),
                "aac".into(),
                "ogg".into(),
                "opus".into(),
                "wma".into(),
            ],
            follow_links: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    /// ALSA device handed to the MP3 decoder.
    pub alsa_device: String,
    /// How long a decoder gets to exit after the termination signal
    /// before it is force-killed (milliseconds).
    pub grace_ms: u64,
    /// Poll cadence of the playback loop while a track renders
    /// (milliseconds).
    pub poll_ms: u64,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            alsa_device: "plughw:Headphones".to_string(),
            grace_ms: 2000,
            poll_ms: 200,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Whether shuffle starts enabled.
    pub shuffle: bool,
    /// Wrap to the first track at the end of the playlist.
    pub loop_enabled: bool,
    /// Start playing the local library as soon as the daemon is up.
    pub autoplay: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            shuffle: false,
            loop_enabled: true,
            autoplay: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BluetoothSettings {
    /// systemd unit that renders the incoming Bluetooth stream.
    pub unit: String,
    /// Upper bound on a single systemctl invocation (milliseconds).
    pub command_timeout_ms: u64,
}

impl Default for BluetoothSettings {
    fn default() -> Self {
        Self {
            unit: "bluealsa-aplay".to_string(),
            command_timeout_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MediaSettings {
    /// Run the removable-media monitor instead of waiting for explicit
    /// start commands against the local library.
    pub enabled: bool,
    /// Poll interval for mount detection (seconds).
    pub poll_secs: u64,
    /// Well-known mount points checked first, in order.
    pub mount_points: Vec<PathBuf>,
    /// Any mounted entry under this root also counts as media.
    pub media_root: PathBuf,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            poll_secs: 5,
            mount_points: vec![
                PathBuf::from("/media/usb"),
                PathBuf::from("/media/usb0"),
                PathBuf::from("/media/usb1"),
                PathBuf::from("/mnt/usb"),
            ],
            media_root: PathBuf::from("/media"),
        }
    }
}
