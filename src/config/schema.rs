//! Configuration schema definitions.

/// Resolved settings for the generator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Collector endpoint receiving traces over gRPC (e.g. "localhost:4317").
    pub collector_grpc_url: String,

    /// Collector endpoint receiving metrics and logs over HTTP (e.g. "localhost:4318").
    pub collector_http_url: String,

    /// Logical service identity attached to every signal.
    pub service_name: String,

    /// Bind address for the debug (pprof) server.
    pub pprof_url: String,
}

impl Config {
    /// Value currently held for `key`.
    pub fn get(&self, key: ConfigKey) -> &str {
        match key {
            ConfigKey::CollectorGrpcUrl => &self.collector_grpc_url,
            ConfigKey::CollectorHttpUrl => &self.collector_http_url,
            ConfigKey::ServiceName => &self.service_name,
            ConfigKey::PprofUrl => &self.pprof_url,
        }
    }

    /// Replace the value for `key`.
    pub fn set(&mut self, key: ConfigKey, value: String) {
        match key {
            ConfigKey::CollectorGrpcUrl => self.collector_grpc_url = value,
            ConfigKey::CollectorHttpUrl => self.collector_http_url = value,
            ConfigKey::ServiceName => self.service_name = value,
            ConfigKey::PprofUrl => self.pprof_url = value,
        }
    }
}

/// The four required settings, in resolution and reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    CollectorGrpcUrl,
    CollectorHttpUrl,
    ServiceName,
    PprofUrl,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 4] = [
        ConfigKey::CollectorGrpcUrl,
        ConfigKey::CollectorHttpUrl,
        ConfigKey::ServiceName,
        ConfigKey::PprofUrl,
    ];

    /// Long command-line flag, without the leading dashes.
    pub fn flag(self) -> &'static str {
        match self {
            ConfigKey::CollectorGrpcUrl => "collector-grpc-url",
            ConfigKey::CollectorHttpUrl => "collector-http-url",
            ConfigKey::ServiceName => "service-name",
            ConfigKey::PprofUrl => "pprof-url",
        }
    }

    /// Environment variable (and dotenv key) providing the default.
    pub fn env_var(self) -> &'static str {
        match self {
            ConfigKey::CollectorGrpcUrl => "COLLECTOR_GRPC_URL",
            ConfigKey::CollectorHttpUrl => "COLLECTOR_HTTP_URL",
            ConfigKey::ServiceName => "SERVICE_NAME",
            ConfigKey::PprofUrl => "PPROF_URL",
        }
    }

    /// Undelimited lowercase name, e.g. `collectorgrpcurl`.
    ///
    /// Accepted as an environment/dotenv key and as a flag alias, so setups
    /// written with the short spelling keep resolving.
    pub fn bare_name(self) -> &'static str {
        match self {
            ConfigKey::CollectorGrpcUrl => "collectorgrpcurl",
            ConfigKey::CollectorHttpUrl => "collectorhttpurl",
            ConfigKey::ServiceName => "servicename",
            ConfigKey::PprofUrl => "pprofurl",
        }
    }

    /// Key for a flag or bare name as spelled on the command line.
    pub fn from_flag_name(name: &str) -> Option<ConfigKey> {
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.flag() == name || key.bare_name() == name)
    }

    pub fn usage(self) -> &'static str {
        match self {
            ConfigKey::CollectorGrpcUrl => "the collector grpc endpoint",
            ConfigKey::CollectorHttpUrl => "the collector http endpoint",
            ConfigKey::ServiceName => "the service name",
            ConfigKey::PprofUrl => "the pprof endpoint",
        }
    }

    /// Message reported when the setting is missing.
    pub fn requirement(self) -> &'static str {
        match self {
            ConfigKey::CollectorGrpcUrl => "collector grpc endpoint required",
            ConfigKey::CollectorHttpUrl => "collector http endpoint required",
            ConfigKey::ServiceName => "service name required",
            ConfigKey::PprofUrl => "pprof endpoint required",
        }
    }
}

impl std::fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.flag())
    }
}
