//! Configuration loading via `ortho-config`.

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::classify::Action;

/// Base URL of the VaaS endpoint used when no override is configured.
pub const DEFAULT_SERVICE_URL: &str = "https://vaas.poc.segmentationpov.com";

/// VaaS endpoint configuration derived from environment variables and
/// configuration files.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(prefix = "VAAS")]
pub struct VaasConfig {
    /// Base URL of the VaaS service, without a trailing path.
    #[ortho_config(default = DEFAULT_SERVICE_URL.to_owned())]
    pub service_url: String,
}

impl VaasConfig {
    /// Loads configuration without attempting to parse CLI arguments. Values
    /// merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("autovaas")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Ensures the service URL is present after trimming whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] with remediation guidance when
    /// the URL is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_url.trim().is_empty() {
            return Err(ConfigError::MissingField(String::from(
                "missing VaaS service URL: set VAAS_SERVICE_URL or add service_url to autovaas.toml",
            )));
        }
        Ok(())
    }

    /// Returns the full endpoint URL for the given wire action.
    #[must_use]
    pub fn endpoint(&self, action: Action) -> String {
        format!(
            "{}{}",
            self.service_url.trim_end_matches('/'),
            action.endpoint_path()
        )
    }
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or missing.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Action::Create, "https://vaas.poc.segmentationpov.com/create")]
    #[case(Action::Delete, "https://vaas.poc.segmentationpov.com/delete")]
    fn endpoint_appends_action_path(#[case] action: Action, #[case] expected: &str) {
        let config = VaasConfig {
            service_url: DEFAULT_SERVICE_URL.to_owned(),
        };
        assert_eq!(config.endpoint(action), expected);
    }

    #[rstest]
    fn endpoint_tolerates_trailing_slash() {
        let config = VaasConfig {
            service_url: String::from("https://vaas.internal/"),
        };
        assert_eq!(config.endpoint(Action::Delete), "https://vaas.internal/delete");
    }

    #[rstest]
    fn validate_rejects_blank_url() {
        let config = VaasConfig {
            service_url: String::from("   "),
        };
        let err = config.validate().expect_err("blank URL should be rejected");
        assert!(matches!(err, ConfigError::MissingField(_)), "got {err:?}");
    }
}
