//! Configuration file structures for the Dune RPG helper.
//!
//! The configuration is read from a YAML file, then overridden by environment
//! variables prefixed with `DUNE_`, nested keys being separated by `__`
//! (e.g. `DUNE_MATRIX__PASSWORD`, `DUNE_TRACKER__ROOM_ID`).
//!
//! # Configuration File Format
//!
//! ```yaml
//! matrix:
//!   # Fully qualified Matrix user ID for the bot account
//!   user_id: "@dune:matrix.org"
//!   # Matrix account password
//!   password: "secret-password"
//!   # E2EE recovery passphrase
//!   passphrase: "recovery-passphrase"
//!
//! tracker:
//!   # Room the bot listens and answers in
//!   room_id: "!table:matrix.org"
//!   # Word commands start with, optional
//!   trigger: "dune"
//!   # Periodic status reminder, optional
//!   reminder:
//!     reset_wait_time: 600
//!     message_wait_time: 30
//! ```

use std::{path::Path, time::Duration};

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::Deserialize;

/// Default trigger word.
const DEFAULT_TRIGGER: &str = "dune";

/// Root configuration structure.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Matrix account configuration
    pub matrix: Matrix,
    /// Tracker room and reminder configuration
    pub tracker: TrackerConfig,
}

impl Config {
    /// Loads the configuration from a YAML file and `DUNE_` environment variables.
    ///
    /// Environment variables take precedence over the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is not valid YAML, a required value is
    /// missing from both sources, or a reminder timing is zero.
    pub fn load(path: impl AsRef<Path>) -> Result<Config, figment::Error> {
        let config: Config = Figment::new()
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("DUNE_").split("__"))
            .extract()?;
        config.tracker.reminder.validate()?;
        Ok(config)
    }
}

/// Matrix account configuration.
#[derive(Debug, Deserialize)]
pub struct Matrix {
    /// Fully qualified Matrix user ID, e.g. `@dune:matrix.org`.
    pub user_id: String,

    /// Matrix account password.
    ///
    /// Used for initial login. After successful authentication, the session
    /// is persisted and the bot can restore without re-authenticating.
    pub password: String,

    /// E2EE recovery passphrase.
    pub passphrase: String,
}

/// Tracker configuration.
#[derive(Debug, Deserialize)]
pub struct TrackerConfig {
    /// Matrix room id where commands are read and answered.
    pub room_id: String,

    /// Word every command starts with.
    #[serde(default = "default_trigger")]
    pub trigger: String,

    /// Periodic reminder timings.
    #[serde(default)]
    pub reminder: ReminderConfig,
}

/// Periodic reminder timings, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    /// Minimum time between two reminders
    pub reset_wait_time: u64,
    /// Quiet time required before a reminder, also the polling cadence
    pub message_wait_time: u64,
}

impl ReminderConfig {
    /// Both timings must be at least one second.
    fn validate(&self) -> Result<(), figment::Error> {
        if self.reset_wait_time == 0 {
            return Err("tracker.reminder.reset_wait_time must be greater than 0".into());
        }
        if self.message_wait_time == 0 {
            return Err("tracker.reminder.message_wait_time must be greater than 0".into());
        }
        Ok(())
    }

    pub fn reset_wait(&self) -> Duration {
        Duration::from_secs(self.reset_wait_time)
    }

    pub fn message_wait(&self) -> Duration {
        Duration::from_secs(self.message_wait_time)
    }
}

impl Default for ReminderConfig {
    fn default() -> Self {
        ReminderConfig {
            reset_wait_time: 600,
            message_wait_time: 30,
        }
    }
}

fn default_trigger() -> String {
    DEFAULT_TRIGGER.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::{fs, path::PathBuf};
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("config.yaml");
        fs::write(&path, content).unwrap();
        path
    }

    const FULL_CONFIG: &str = r#"
matrix:
  user_id: "@dune:example.org"
  password: "secret"
  passphrase: "phrase"
tracker:
  room_id: "!table:example.org"
  trigger: "spice"
  reminder:
    reset_wait_time: 900
    message_wait_time: 45
"#;

    const MINIMAL_CONFIG: &str = r#"
matrix:
  user_id: "@dune:example.org"
  password: "secret"
  passphrase: "phrase"
tracker:
  room_id: "!table:example.org"
"#;

    #[test]
    #[serial]
    fn test_load_full_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, FULL_CONFIG);

        let config = Config::load(&path).unwrap();

        assert_eq!(config.matrix.user_id, "@dune:example.org");
        assert_eq!(config.matrix.password, "secret");
        assert_eq!(config.matrix.passphrase, "phrase");
        assert_eq!(config.tracker.room_id, "!table:example.org");
        assert_eq!(config.tracker.trigger, "spice");
        assert_eq!(config.tracker.reminder.reset_wait(), Duration::from_secs(900));
        assert_eq!(config.tracker.reminder.message_wait(), Duration::from_secs(45));
    }

    #[test]
    #[serial]
    fn test_load_applies_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, MINIMAL_CONFIG);

        let config = Config::load(&path).unwrap();

        assert_eq!(config.tracker.trigger, "dune");
        assert_eq!(config.tracker.reminder, ReminderConfig::default());
        assert_eq!(config.tracker.reminder.reset_wait_time, 600);
        assert_eq!(config.tracker.reminder.message_wait_time, 30);
    }

    #[test]
    #[serial]
    fn test_partial_reminder_keeps_other_default() {
        let dir = TempDir::new().unwrap();
        let content = format!("{}  reminder:\n    message_wait_time: 5\n", MINIMAL_CONFIG);
        let path = write_config(&dir, &content);

        let config = Config::load(&path).unwrap();

        assert_eq!(config.tracker.reminder.reset_wait_time, 600);
        assert_eq!(config.tracker.reminder.message_wait_time, 5);
    }

    #[test]
    #[serial]
    fn test_zero_message_wait_fails() {
        let dir = TempDir::new().unwrap();
        let content = format!("{}  reminder:\n    message_wait_time: 0\n", MINIMAL_CONFIG);
        let path = write_config(&dir, &content);

        let err = Config::load(&path).unwrap_err();

        assert!(err.to_string().contains("message_wait_time"));
    }

    #[test]
    #[serial]
    fn test_zero_reset_wait_fails() {
        let dir = TempDir::new().unwrap();
        let content = format!("{}  reminder:\n    reset_wait_time: 0\n", MINIMAL_CONFIG);
        let path = write_config(&dir, &content);

        let err = Config::load(&path).unwrap_err();

        assert!(err.to_string().contains("reset_wait_time"));
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, MINIMAL_CONFIG);

        // Tests touching the environment run serially
        unsafe {
            std::env::set_var("DUNE_MATRIX__PASSWORD", "from-env");
            std::env::set_var("DUNE_TRACKER__ROOM_ID", "!other:example.org");
        }
        let config = Config::load(&path);
        unsafe {
            std::env::remove_var("DUNE_MATRIX__PASSWORD");
            std::env::remove_var("DUNE_TRACKER__ROOM_ID");
        }

        let config = config.unwrap();
        assert_eq!(config.matrix.password, "from-env");
        assert_eq!(config.tracker.room_id, "!other:example.org");
    }

    #[test]
    #[serial]
    fn test_missing_room_fails() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "matrix:\n  user_id: \"@a:b\"\n  password: \"p\"\n  passphrase: \"q\"\n",
        );

        assert!(Config::load(&path).is_err());
    }

    #[test]
    #[serial]
    fn test_invalid_yaml_fails() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "matrix: [unclosed");

        assert!(Config::load(&path).is_err());
    }
}
