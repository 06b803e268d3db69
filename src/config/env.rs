//! Environment sources used to resolve configuration defaults.

use std::collections::HashMap;
use std::sync::Mutex;

/// Key/value source that configuration defaults are read from.
///
/// The dotenv loader seeds it through [`Environment::set_if_absent`], so
/// values already present always take precedence over the file.
pub trait Environment: Send + Sync {
    /// Value of `key`, if set.
    fn var(&self, key: &str) -> Option<String>;

    /// Set `key` only when it is not already present.
    fn set_if_absent(&self, key: &str, value: &str);
}

/// The real process environment.
///
/// [`Environment::set_if_absent`] calls `std::env::set_var`, so resolve with
/// this source before spawning threads (in `main`, ahead of the runtime).
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn set_if_absent(&self, key: &str, value: &str) {
        if std::env::var_os(key).is_none() {
            std::env::set_var(key, value);
        }
    }
}

/// In-memory environment, isolated from the process.
#[derive(Debug, Default)]
pub struct MapEnv {
    vars: Mutex<HashMap<String, String>>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite `key` unconditionally.
    pub fn set(&self, key: &str, value: &str) {
        self.lock().insert(key.to_string(), value.to_string());
    }

    pub fn remove(&self, key: &str) {
        self.lock().remove(key);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map.
        self.vars.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let vars = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            vars: Mutex::new(vars),
        }
    }
}

impl Environment for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set_if_absent(&self, key: &str, value: &str) {
        self.lock()
            .entry(key.to_string())
            .or_insert_with(|| value.to_string());
    }
}
