//! Configuration module - environment variable parsing

use std::env;
use std::path::PathBuf;

use crate::game::catalog::WeaponKind;
use crate::util::rng::RngKind;

/// Practice range configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Player id the local client was assigned by the server
    pub local_player_id: u8,
    /// Weapon the local player spawns with
    pub weapon: WeaponKind,

    /// Spread draw source
    pub spread_rng: RngKind,
    /// Seed for the spread draw source
    pub rng_seed: u64,

    /// Optional JSON file overriding the built-in weapon table
    pub weapon_table: Option<PathBuf>,
    /// How long the practice range runs before stopping (seconds)
    pub demo_seconds: f64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let local_player_id = match lookup("LOCAL_PLAYER_ID") {
            Some(raw) => raw
                .parse::<u8>()
                .map_err(|_| ConfigError::Invalid("LOCAL_PLAYER_ID", raw))?,
            None => 0,
        };

        let weapon = match lookup("WEAPON") {
            Some(raw) => raw
                .parse::<WeaponKind>()
                .map_err(|_| ConfigError::Invalid("WEAPON", raw))?,
            None => WeaponKind::Rifle,
        };

        let spread_rng = match lookup("SPREAD_RNG") {
            Some(raw) => raw
                .parse::<RngKind>()
                .map_err(|_| ConfigError::Invalid("SPREAD_RNG", raw))?,
            None => RngKind::Seeded,
        };

        let rng_seed = match lookup("RNG_SEED") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("RNG_SEED", raw))?,
            None => 1,
        };

        let demo_seconds = match lookup("DEMO_SECONDS") {
            Some(raw) => match raw.parse::<f64>() {
                Ok(secs) if secs > 0.0 => secs,
                _ => return Err(ConfigError::Invalid("DEMO_SECONDS", raw)),
            },
            None => 10.0,
        };

        Ok(Self {
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            local_player_id,
            weapon,
            spread_rng,
            rng_seed,
            weapon_table: lookup("WEAPON_TABLE").map(PathBuf::from),
            demo_seconds,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.local_player_id, 0);
        assert_eq!(config.weapon, WeaponKind::Rifle);
        assert_eq!(config.spread_rng, RngKind::Seeded);
        assert_eq!(config.rng_seed, 1);
        assert_eq!(config.weapon_table, None);
        assert_eq!(config.demo_seconds, 10.0);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            ("LOCAL_PLAYER_ID", "7"),
            ("WEAPON", "shotgun"),
            ("SPREAD_RNG", "legacy"),
            ("RNG_SEED", "42"),
            ("WEAPON_TABLE", "weapons.json"),
            ("DEMO_SECONDS", "2.5"),
        ])
        .unwrap();

        assert_eq!(config.local_player_id, 7);
        assert_eq!(config.weapon, WeaponKind::Shotgun);
        assert_eq!(config.spread_rng, RngKind::Legacy);
        assert_eq!(config.rng_seed, 42);
        assert_eq!(config.weapon_table, Some(PathBuf::from("weapons.json")));
        assert_eq!(config.demo_seconds, 2.5);
    }

    #[test]
    fn bad_values_name_the_variable() {
        let cases = [
            ("WEAPON", "railgun"),
            ("DEMO_SECONDS", "0"),
            ("DEMO_SECONDS", "-3"),
            ("LOCAL_PLAYER_ID", "300"),
            ("SPREAD_RNG", "dice"),
            ("RNG_SEED", "seed"),
        ];

        for (key, value) in cases {
            match load(&[(key, value)]) {
                Err(ConfigError::Invalid(name, raw)) => {
                    assert_eq!(name, key);
                    assert_eq!(raw, value);
                }
                other => panic!("{key}={value} gave {other:?}"),
            }
        }
    }
}
