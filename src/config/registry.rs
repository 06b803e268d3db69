//! Command-line flag registration.
//!
//! # Responsibilities
//! - Register one flag per configuration key, at most once
//! - Parse the argument list exactly once and cache the result
//! - Expose only the values explicitly passed on the command line
//!
//! # Design Decisions
//! - Registration is a check-and-set under a mutex, so concurrent or repeated
//!   resolver calls never register a flag twice
//! - Parsed matches live in a `OnceLock`; later calls reuse them
//! - Each flag also answers to its bare name (`--pprofurl`), and the
//!   single-dash spelling `-pprofurl` is rewritten to it before parsing

use std::collections::HashMap;
use std::ffi::OsString;
use std::sync::{Mutex, MutexGuard, OnceLock};

use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::config::schema::ConfigKey;

/// Explicit registry of command-line flags for the configuration keys.
pub struct FlagRegistry {
    args: Vec<OsString>,
    state: Mutex<RegistryState>,
    matches: OnceLock<ArgMatches>,
}

struct RegistryState {
    registered: HashMap<ConfigKey, bool>,
    command: Command,
}

impl FlagRegistry {
    /// Registry over an explicit argument list (first item is the program name).
    pub fn new<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let command = Command::new(env!("CARGO_PKG_NAME"))
            .version(env!("CARGO_PKG_VERSION"))
            .about("Generates synthetic traces, metrics and logs from simulated dice rolls");

        Self {
            args: normalize_args(args.into_iter().map(Into::into)),
            state: Mutex::new(RegistryState {
                registered: HashMap::new(),
                command,
            }),
            matches: OnceLock::new(),
        }
    }

    /// Registry over the arguments this process was started with.
    pub fn from_process() -> Self {
        Self::new(std::env::args_os())
    }

    /// Register the flag for `key`. Returns `false` if it was already registered.
    pub fn register(&self, key: ConfigKey) -> bool {
        let mut state = self.lock();
        if state.registered.get(&key).copied().unwrap_or(false) {
            return false;
        }

        let arg = Arg::new(key.flag())
            .long(key.flag())
            .alias(key.bare_name())
            .value_name("VALUE")
            .action(ArgAction::Set)
            .help(format!("{} [env: {}]", key.usage(), key.env_var()));
        state.command = std::mem::take(&mut state.command).arg(arg);
        state.registered.insert(key, true);

        tracing::trace!(flag = key.flag(), "Registered command-line flag");
        true
    }

    pub fn is_registered(&self, key: ConfigKey) -> bool {
        self.lock().registered.get(&key).copied().unwrap_or(false)
    }

    /// Number of flags registered so far.
    pub fn len(&self) -> usize {
        self.lock().registered.values().filter(|r| **r).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parse the argument list, or return the matches from the first parse.
    pub fn parse(&self) -> Result<&ArgMatches, clap::Error> {
        if let Some(matches) = self.matches.get() {
            return Ok(matches);
        }

        let command = self.lock().command.clone();
        let matches = command.try_get_matches_from(&self.args)?;
        Ok(self.matches.get_or_init(|| matches))
    }

    /// Value explicitly passed on the command line for `key`, once parsed.
    pub fn explicit(&self, key: ConfigKey) -> Option<String> {
        self.matches
            .get()?
            .try_get_one::<String>(key.flag())
            .ok()
            .flatten()
            .cloned()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Rewrite `-name` / `-name=value` to `--name...` for known flag names.
///
/// Everything after a `--` terminator is left untouched.
fn normalize_args(args: impl Iterator<Item = OsString>) -> Vec<OsString> {
    let mut terminated = false;
    args.enumerate()
        .map(|(i, arg)| {
            if i == 0 || terminated {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                terminated = true;
                return arg;
            }
            match text.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') => {
                    let name = rest.split('=').next().unwrap_or(rest);
                    if ConfigKey::from_flag_name(name).is_some() {
                        OsString::from(format!("-{text}"))
                    } else {
                        arg
                    }
                }
                _ => arg,
            }
        })
        .collect()
}

impl std::fmt::Debug for FlagRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlagRegistry")
            .field("args", &self.args)
            .field("registered", &self.len())
            .field("parsed", &self.matches.get().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        let registry = FlagRegistry::new(["ogen"]);
        assert!(registry.is_empty());

        assert!(registry.register(ConfigKey::ServiceName));
        assert!(!registry.register(ConfigKey::ServiceName));
        assert!(registry.is_registered(ConfigKey::ServiceName));
        assert!(!registry.is_registered(ConfigKey::PprofUrl));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_explicit_values_after_parse() {
        let registry = FlagRegistry::new(["ogen", "--service-name", "dice"]);
        for key in ConfigKey::ALL {
            registry.register(key);
        }

        assert!(registry.explicit(ConfigKey::ServiceName).is_none());
        registry.parse().unwrap();

        assert_eq!(registry.explicit(ConfigKey::ServiceName).as_deref(), Some("dice"));
        assert!(registry.explicit(ConfigKey::PprofUrl).is_none());
    }

    #[test]
    fn test_parse_happens_once() {
        let registry = FlagRegistry::new(["ogen", "--pprof-url", "127.0.0.1:6060"]);
        registry.register(ConfigKey::PprofUrl);

        let first = registry.parse().unwrap() as *const ArgMatches;
        let second = registry.parse().unwrap() as *const ArgMatches;
        assert_eq!(first, second);
    }

    #[test]
    fn test_bare_name_aliases() {
        let registry = FlagRegistry::new([
            "ogen",
            "-collectorgrpcurl",
            "localhost:4317",
            "--servicename=dice",
            "-pprofurl=localhost:1777",
        ]);
        for key in ConfigKey::ALL {
            registry.register(key);
        }
        registry.parse().unwrap();

        assert_eq!(
            registry.explicit(ConfigKey::CollectorGrpcUrl).as_deref(),
            Some("localhost:4317")
        );
        assert_eq!(registry.explicit(ConfigKey::ServiceName).as_deref(), Some("dice"));
        assert_eq!(registry.explicit(ConfigKey::PprofUrl).as_deref(), Some("localhost:1777"));
    }

    #[test]
    fn test_normalize_args_leaves_unknown_and_terminated_args() {
        let args = ["ogen", "-x", "-pprofurl", "--", "-servicename"]
            .into_iter()
            .map(OsString::from);
        assert_eq!(
            normalize_args(args),
            ["ogen", "-x", "--pprofurl", "--", "-servicename"]
                .map(OsString::from)
                .to_vec()
        );
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        let registry = FlagRegistry::new(["ogen", "--no-such-flag", "x"]);
        registry.register(ConfigKey::ServiceName);
        assert!(registry.parse().is_err());
    }
}
