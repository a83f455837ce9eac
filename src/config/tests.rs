use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn defaults_match_the_appliance_install() {
    let settings = Settings::default();
    assert_eq!(settings.library.music_dir, PathBuf::from("/var/music"));
    assert_eq!(settings.library.extensions.len(), 8);
    assert!(settings.library.extensions.contains(&"opus".to_string()));
    assert_eq!(settings.renderer.alsa_device, "plughw:Headphones");
    assert!(settings.playback.loop_enabled);
    assert!(!settings.playback.shuffle);
    assert_eq!(settings.bluetooth.unit, "bluealsa-aplay");
    assert!(!settings.media.enabled);
    assert_eq!(settings.media.poll_secs, 5);
    assert!(settings.media.mount_points.contains(&PathBuf::from("/media/usb0")));
}

#[test]
fn validate_rejects_zero_intervals_and_empty_extension_lists() {
    let mut settings = Settings::default();
    assert!(settings.validate().is_ok());

    settings.renderer.poll_ms = 0;
    assert!(settings.validate().is_err());

    settings.renderer.poll_ms = 200;
    settings.media.poll_secs = 0;
    assert!(settings.validate().is_err());

    settings.media.poll_secs = 5;
    settings.library.extensions.clear();
    assert!(settings.validate().is_err());
}

#[test]
fn resolve_config_path_prefers_bluejay_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("BLUEJAY_CONFIG_PATH", "/tmp/bluejay-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        PathBuf::from("/tmp/bluejay-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        PathBuf::from("/tmp/xdg-config-home")
            .join("bluejay")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("bluejay")
            .join("config.toml")
    );
}

#[test]
fn environment_overrides_reach_nested_settings() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("BLUEJAY__LIBRARY__MUSIC_DIR", "/tmp/other-music");
    let _g2 = EnvGuard::set("BLUEJAY__PLAYBACK__SHUFFLE", "true");
    let _g3 = EnvGuard::remove("BLUEJAY_CONFIG_PATH");

    let settings = Settings::load().unwrap();
    assert_eq!(settings.library.music_dir, PathBuf::from("/tmp/other-music"));
    assert!(settings.playback.shuffle);
}
