//! Configuration validation.
//!
//! Returns every violation, not just the first.

use crate::config::schema::{Config, ConfigKey};

/// A required setting that resolved to an empty value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationError {
    pub key: ConfigKey,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key.requirement())
    }
}

impl std::error::Error for ValidationError {}

/// Check that all required settings are present.
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let errors: Vec<ValidationError> = ConfigKey::ALL
        .into_iter()
        .filter(|key| config.get(*key).is_empty())
        .map(|key| ValidationError { key })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_config() -> Config {
        Config {
            collector_grpc_url: "localhost:4317".into(),
            collector_http_url: "localhost:4318".into(),
            service_name: "ogen".into(),
            pprof_url: "localhost:1777".into(),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&full_config()).is_ok());
    }

    #[test]
    fn test_each_missing_field_is_reported() {
        for key in ConfigKey::ALL {
            let mut config = full_config();
            config.set(key, String::new());

            let errors = validate_config(&config).unwrap_err();
            assert_eq!(errors, vec![ValidationError { key }], "missing {key}");
        }
    }

    #[test]
    fn test_all_combinations_report_exactly_the_empty_fields() {
        for mask in 0u8..16 {
            let mut config = full_config();
            let mut expected = Vec::new();
            for (i, key) in ConfigKey::ALL.into_iter().enumerate() {
                if mask & (1 << i) != 0 {
                    config.set(key, String::new());
                    expected.push(key);
                }
            }

            match validate_config(&config) {
                Ok(()) => assert!(expected.is_empty(), "mask {mask:04b} should fail"),
                Err(errors) => {
                    let keys: Vec<_> = errors.iter().map(|e| e.key).collect();
                    assert_eq!(keys, expected, "mask {mask:04b}");
                }
            }
        }
    }

    #[test]
    fn test_error_message() {
        let err = ValidationError { key: ConfigKey::PprofUrl };
        assert_eq!(err.to_string(), "pprof endpoint required");
    }
}
