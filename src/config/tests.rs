use super::load::{default_config_path, default_log_dir, resolve_config_path};
use super::schema::*;
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
fn resolve_config_path_prefers_lyrebird_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("LYREBIRD_CONFIG_PATH", "/tmp/lyrebird-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/lyrebird-test-config.toml")
    );
}

#[test]
fn default_config_path_uses_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("LYREBIRD_CONFIG_PATH");
    let _g2 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config");
    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-config/lyrebird/config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home");
    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/home/.config/lyrebird/config.toml")
    );
}

#[test]
fn default_log_dir_uses_xdg_state_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_STATE_HOME", "/tmp/xdg-state");
    assert_eq!(
        default_log_dir().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-state/lyrebird/logs")
    );
}

#[test]
fn defaults_are_usable() {
    let settings = Settings::default();
    assert!(settings.validate().is_ok());
    assert!(settings.library.root.is_none());
    assert!(settings.library.extensions.iter().any(|e| e == "mp3"));
    assert!(settings.library.follow_links);
    assert!(!settings.library.include_hidden);
}

#[test]
fn validate_rejects_unusable_extension_list() {
    let mut settings = Settings::default();
    settings.library.extensions = vec!["".into(), " . ".into()];
    assert!(settings.validate().is_err());
}

#[test]
fn load_reads_settings_from_a_toml_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[library]
root = "/music"
extensions = ["opus"]
include_hidden = true

[ui]
header_text = " custom "
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("LYREBIRD_CONFIG_PATH", &path.to_string_lossy());

    let settings = Settings::load().unwrap();
    assert_eq!(
        settings.library.root,
        Some(std::path::PathBuf::from("/music"))
    );
    assert_eq!(settings.library.extensions, vec!["opus".to_string()]);
    assert!(settings.library.include_hidden);
    assert_eq!(settings.ui.header_text, " custom ");
    // Unspecified sections keep their defaults.
    assert!(settings.logging.dir.is_none());
}

#[test]
fn missing_config_file_yields_defaults() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("LYREBIRD_CONFIG_PATH", "/tmp/does-not-exist-lyrebird.toml");
    let settings = Settings::load().unwrap();
    assert!(settings.library.root.is_none());
    assert_eq!(settings.ui.header_text, UiSettings::default().header_text);
}
