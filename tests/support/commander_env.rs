use std::{
    path::PathBuf,
    sync::{Mutex, OnceLock},
};

const CONFIG_HOME_ENV: &str = "GESTURE_COMMANDER_CONFIG_HOME";
const DISABLE_KEYRING_ENV: &str = "GESTURE_COMMANDER_DISABLE_KEYRING";

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Points the app root at a temp dir and keeps the OS keyring out of the way.
pub struct CommanderEnvGuard {
    previous: Option<String>,
    _lock: std::sync::MutexGuard<'static, ()>,
}

impl CommanderEnvGuard {
    pub fn set_config_home(path: PathBuf) -> Self {
        let lock = ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|err| err.into_inner());
        let previous = std::env::var(CONFIG_HOME_ENV).ok();
        // SAFETY: tests run under a global lock to prevent concurrent env mutations.
        unsafe {
            std::env::set_var(CONFIG_HOME_ENV, path);
            std::env::set_var(DISABLE_KEYRING_ENV, "1");
        }
        Self {
            previous,
            _lock: lock,
        }
    }

    /// Set an extra variable for the guard's lifetime.
    pub fn set_var(&self, key: &str, value: &str) {
        // SAFETY: the env lock is held by this guard.
        unsafe {
            std::env::set_var(key, value);
        }
    }

    pub fn remove_var(&self, key: &str) {
        // SAFETY: the env lock is held by this guard.
        unsafe {
            std::env::remove_var(key);
        }
    }
}

impl Drop for CommanderEnvGuard {
    fn drop(&mut self) {
        // SAFETY: tests run under a global lock to prevent concurrent env mutations.
        unsafe {
            std::env::remove_var(DISABLE_KEYRING_ENV);
            match self.previous.take() {
                Some(value) => std::env::set_var(CONFIG_HOME_ENV, value),
                None => std::env::remove_var(CONFIG_HOME_ENV),
            }
        }
    }
}
