use core::fmt::{Debug, Display};

use bill_split_allocation::{CoefficientTable, Role};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "bill-split.toml";
pub const ENV_PREFIX: &str = "BILL_SPLIT_";

/// Bounds the input validation enforces before anything is allocated.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct Limits {
    pub max_name_length: usize,
    pub max_event_name_length: usize,
    pub max_total_amount: u64,
    pub max_participants: usize,
    pub max_coefficient: f64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_name_length: 20,
            max_event_name_length: 50,
            max_total_amount: 10_000_000,
            max_participants: 100,
            max_coefficient: 10.0,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub coefficients: CoefficientTable,
    pub limits: Limits,
    /// Prepended to generated share links, e.g. `https://example.org/`.
    pub share_base_url: String,
    /// Log filter used when `RUST_LOG` is not set.
    pub log_filter: Option<String>,
}

#[derive(thiserror::Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Figment(#[from] figment::Error),
    #[error("coefficient {value} for {role} exceeds the configured maximum of {max}")]
    CoefficientAboveLimit { role: Role, value: f64, max: f64 },
}

impl Debug for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

/// Defaults, then `bill-split.toml`, then `BILL_SPLIT_*` environment variables.
/// Nested keys are separated by `__`, e.g. `BILL_SPLIT_COEFFICIENTS__SENIOR`.
#[must_use]
pub fn figment() -> Figment {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(CONFIG_FILE))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

pub fn from_figment(figment: &Figment) -> Result<Config, ConfigError> {
    let config: Config = figment.extract()?;
    if let Some((role, value)) = config
        .coefficients
        .iter()
        .find(|(_, value)| *value > config.limits.max_coefficient)
    {
        return Err(ConfigError::CoefficientAboveLimit {
            role,
            value,
            max: config.limits.max_coefficient,
        });
    }
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

pub fn get_config() -> Result<Config, ConfigError> {
    from_figment(&figment())
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn defaults_without_file_or_env() {
        Jail::expect_with(|_jail| {
            let config = get_config().map_err(|e| e.to_string())?;
            assert_eq!(config, Config::default());
            assert_eq!(config.limits.max_total_amount, 10_000_000);
            Ok(())
        });
    }

    #[test]
    fn file_and_env_override_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                    share_base_url = "https://split.example"

                    [coefficients]
                    junior = 1.0
                    middle = 1.2
                    senior = 1.6
                    manager = 2.5
                "#,
            )?;
            jail.set_env("BILL_SPLIT_LIMITS__MAX_PARTICIPANTS", "20");
            jail.set_env("BILL_SPLIT_COEFFICIENTS__SENIOR", "1.8");

            let config = get_config().map_err(|e| e.to_string())?;
            assert_eq!(config.share_base_url, "https://split.example");
            assert_eq!(config.limits.max_participants, 20);
            assert_eq!(config.limits.max_name_length, 20);
            assert!((config.coefficients.get(Role::Middle) - 1.2).abs() < f64::EPSILON);
            assert!((config.coefficients.get(Role::Senior) - 1.8).abs() < f64::EPSILON);
            Ok(())
        });
    }

    #[test]
    fn partial_coefficient_override_keeps_other_roles() {
        Jail::expect_with(|jail| {
            jail.set_env("BILL_SPLIT_COEFFICIENTS__MANAGER", "3");
            let config = get_config().map_err(|e| e.to_string())?;
            assert!((config.coefficients.get(Role::Manager) - 3.0).abs() < f64::EPSILON);
            assert!((config.coefficients.get(Role::Middle) - 1.3).abs() < f64::EPSILON);
            Ok(())
        });
    }

    #[test]
    fn rejects_non_positive_coefficients() {
        Jail::expect_with(|jail| {
            jail.set_env("BILL_SPLIT_COEFFICIENTS__JUNIOR", "0");
            assert!(matches!(get_config(), Err(ConfigError::Figment(_))));
            Ok(())
        });
    }

    #[test]
    fn rejects_coefficients_above_the_limit() {
        Jail::expect_with(|jail| {
            jail.set_env("BILL_SPLIT_LIMITS__MAX_COEFFICIENT", "1.9");
            assert!(matches!(
                get_config(),
                Err(ConfigError::CoefficientAboveLimit {
                    role: Role::Manager,
                    ..
                })
            ));
            Ok(())
        });
    }
}
