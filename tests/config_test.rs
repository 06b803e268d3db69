//! Configuration resolution across dotenv file, environment and flags.

use std::path::Path;

use ogen::config::{ConfigError, ConfigKey, Environment};

mod common;
use common::{dotenv_file, env_line, resolver};

const FULL_ENV: [(&str, &str); 4] = [
    ("COLLECTOR_GRPC_URL", "env-grpc:4317"),
    ("COLLECTOR_HTTP_URL", "env-http:4318"),
    ("SERVICE_NAME", "env-service"),
    ("PPROF_URL", "localhost:6060"),
];

fn no_file() -> &'static Path {
    Path::new("/nonexistent/ogen/.env")
}

#[test]
fn test_nothing_set_reports_every_missing_field() {
    let err = resolver(&[], &[]).resolve(Some(no_file())).unwrap_err();

    assert_eq!(err.missing(), ConfigKey::ALL.to_vec());
    let message = err.to_string();
    assert_eq!(message.lines().count(), 4, "{message}");
    assert!(message.contains("collector grpc endpoint required"));
    assert!(message.contains("pprof endpoint required"));
}

#[test]
fn test_environment_only() {
    let config = resolver(&FULL_ENV, &[]).resolve(Some(no_file())).unwrap();

    assert_eq!(config.collector_grpc_url, "env-grpc:4317");
    assert_eq!(config.collector_http_url, "env-http:4318");
    assert_eq!(config.service_name, "env-service");
    assert_eq!(config.pprof_url, "localhost:6060");
}

#[test]
fn test_partial_environment_reports_the_rest() {
    let err = resolver(&FULL_ENV[..2], &[])
        .resolve(Some(no_file()))
        .unwrap_err();

    assert_eq!(err.missing(), vec![ConfigKey::ServiceName, ConfigKey::PprofUrl]);
}

#[test]
fn test_dotenv_file_supplies_values() {
    let file = dotenv_file(&[
        "# collector endpoints",
        &env_line(ConfigKey::CollectorGrpcUrl, "file-grpc:4317"),
        &env_line(ConfigKey::CollectorHttpUrl, "file-http:4318"),
        &env_line(ConfigKey::ServiceName, "file-service"),
        &env_line(ConfigKey::PprofUrl, "localhost:6061"),
    ]);

    let resolver = resolver(&[], &[]);
    let config = resolver.resolve(Some(file.path())).unwrap();

    assert_eq!(config.service_name, "file-service");
    assert_eq!(config.pprof_url, "localhost:6061");
    assert_eq!(
        resolver.env().var("COLLECTOR_GRPC_URL").as_deref(),
        Some("file-grpc:4317")
    );
}

#[test]
fn test_environment_beats_dotenv_file() {
    let file = dotenv_file(&[
        &env_line(ConfigKey::CollectorGrpcUrl, "file-grpc:4317"),
        &env_line(ConfigKey::ServiceName, "file-service"),
    ]);

    let config = resolver(&FULL_ENV, &[]).resolve(Some(file.path())).unwrap();

    assert_eq!(config.collector_grpc_url, "env-grpc:4317");
    assert_eq!(config.service_name, "env-service");
}

#[test]
fn test_flag_beats_environment_and_file() {
    let file = dotenv_file(&[&env_line(ConfigKey::ServiceName, "file-service")]);

    let config = resolver(&FULL_ENV, &["--service-name", "flag-service"])
        .resolve(Some(file.path()))
        .unwrap();

    assert_eq!(config.service_name, "flag-service");
    assert_eq!(config.pprof_url, "localhost:6060");
}

#[test]
fn test_flags_alone_are_enough() {
    let config = resolver(
        &[],
        &[
            "--collector-grpc-url",
            "flag-grpc:4317",
            "--collector-http-url=flag-http:4318",
            "--service-name",
            "flag-service",
            "--pprof-url",
            "127.0.0.1:6060",
        ],
    )
    .resolve(Some(no_file()))
    .unwrap();

    assert_eq!(config.collector_grpc_url, "flag-grpc:4317");
    assert_eq!(config.collector_http_url, "flag-http:4318");
}

#[test]
fn test_second_resolve_is_idempotent() {
    let resolver = resolver(&FULL_ENV, &["--service-name", "flag-service"]);

    let first = resolver.resolve(Some(no_file())).unwrap();
    let second = resolver.resolve(Some(no_file())).unwrap();

    assert_eq!(first, second);
    assert_eq!(resolver.registry().len(), ConfigKey::ALL.len());
}

#[test]
fn test_malformed_dotenv_file() {
    let file = dotenv_file(&["THIS LINE HAS NO EQUALS SIGN"]);

    let err = resolver(&FULL_ENV, &[]).resolve(Some(file.path())).unwrap_err();

    assert!(matches!(err, ConfigError::Dotenv(_)), "{err:?}");
    assert!(err.missing().is_empty());
}

#[test]
fn test_unknown_flag() {
    let err = resolver(&FULL_ENV, &["--bogus", "1"])
        .resolve(Some(no_file()))
        .unwrap_err();

    assert!(matches!(err, ConfigError::Flags(_)), "{err:?}");
}

#[test]
fn test_bare_key_names_resolve() {
    let config = resolver(
        &[
            ("collectorgrpcurl", "localhost:4317"),
            ("collectorhttpurl", "localhost:4318"),
            ("servicename", "ogen"),
            ("pprofurl", "localhost:1777"),
        ],
        &[],
    )
    .resolve(Some(no_file()))
    .unwrap();

    assert_eq!(config.collector_grpc_url, "localhost:4317");
    assert_eq!(config.collector_http_url, "localhost:4318");
    assert_eq!(config.service_name, "ogen");
    assert_eq!(config.pprof_url, "localhost:1777");
}

#[test]
fn test_bare_names_in_dotenv_file_and_flags() {
    let file = dotenv_file(&[
        "collectorgrpcurl=file-grpc:4317",
        "collectorhttpurl=file-http:4318",
        "servicename=file-service",
        "pprofurl=localhost:1777",
    ]);

    let config = resolver(&[], &["-servicename", "flag-service", "--pprofurl=localhost:6060"])
        .resolve(Some(file.path()))
        .unwrap();

    assert_eq!(config.collector_grpc_url, "file-grpc:4317");
    assert_eq!(config.service_name, "flag-service");
    assert_eq!(config.pprof_url, "localhost:6060");
}

#[test]
fn test_primary_env_name_beats_bare_name() {
    let mut env = FULL_ENV.to_vec();
    env.push(("servicename", "bare-service"));

    let config = resolver(&env, &[]).resolve(Some(no_file())).unwrap();
    assert_eq!(config.service_name, "env-service");
}
