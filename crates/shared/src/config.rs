//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Ledger engine configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Reconciliation engine configuration.
    #[serde(default)]
    pub reconciliation: ReconciliationConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Ledger engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Balance sheet rounding tolerance, in smallest currency units (paise).
    ///
    /// Per-entry balance is always exact; this tolerance only absorbs
    /// rounding accumulation across the whole chart in the balance sheet.
    #[serde(default = "default_rounding_tolerance_paise")]
    pub rounding_tolerance_paise: u32,
}

fn default_rounding_tolerance_paise() -> u32 {
    1
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            rounding_tolerance_paise: default_rounding_tolerance_paise(),
        }
    }
}

/// Reconciliation engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconciliationConfig {
    /// Date tolerance window for automatic matching, in days.
    #[serde(default = "default_match_window_days")]
    pub match_window_days: u32,
}

fn default_match_window_days() -> u32 {
    3
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            match_window_days: default_match_window_days(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("MANDIR").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_config_defaults() {
        let cfg = LedgerConfig::default();
        assert_eq!(cfg.rounding_tolerance_paise, 1);
    }

    #[test]
    fn test_reconciliation_config_defaults() {
        let cfg = ReconciliationConfig::default();
        assert_eq!(cfg.match_window_days, 3);
    }
}
