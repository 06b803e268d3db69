//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use ogen::config::{ConfigKey, ConfigResolver, FlagRegistry, MapEnv};
use ogen::lifecycle::{HandleError, Teardown};
use tempfile::NamedTempFile;

/// Resolver over an in-memory environment and the given flags.
pub fn resolver(env: &[(&str, &str)], flags: &[&str]) -> ConfigResolver<MapEnv> {
    let env = env.iter().copied().collect::<MapEnv>();
    let args = std::iter::once("ogen").chain(flags.iter().copied());
    ConfigResolver::new(env, FlagRegistry::new(args))
}

/// Dotenv file holding `lines`, removed when dropped.
pub fn dotenv_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file.flush().unwrap();
    file
}

/// `KEY=value` line for `key`.
pub fn env_line(key: ConfigKey, value: &str) -> String {
    format!("{}={value}", key.env_var())
}

/// Teardown handle appending its name to a shared journal.
#[derive(Clone)]
pub struct Recorder {
    name: &'static str,
    journal: Arc<Mutex<Vec<&'static str>>>,
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl Recorder {
    pub fn new(name: &'static str, journal: &Arc<Mutex<Vec<&'static str>>>) -> Self {
        Self {
            name,
            journal: journal.clone(),
            calls: Arc::new(AtomicUsize::new(0)),
            fail: false,
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Teardown for Recorder {
    fn name(&self) -> &str {
        self.name
    }

    fn shutdown(&self) -> Result<(), HandleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.journal.lock().unwrap().push(self.name);
        if self.fail {
            return Err(format!("{} refused to stop", self.name).into());
        }
        Ok(())
    }
}

/// Wraps a real teardown handle, journaling its name before delegating.
pub struct Journaled<T> {
    inner: T,
    journal: Arc<Mutex<Vec<&'static str>>>,
    name: &'static str,
}

impl<T: Teardown> Journaled<T> {
    pub fn new(name: &'static str, inner: T, journal: &Arc<Mutex<Vec<&'static str>>>) -> Self {
        Self {
            inner,
            journal: journal.clone(),
            name,
        }
    }
}

impl<T: Teardown> Teardown for Journaled<T> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn shutdown(&self) -> Result<(), HandleError> {
        self.journal.lock().unwrap().push(self.name);
        self.inner.shutdown()
    }
}
