//! Layered runtime configuration.
//!
//! Sources, lowest precedence first: built-in defaults, an optional
//! `journal.toml` in the working directory, then `JOURNAL_*` environment
//! variables using `__` between nested keys (`JOURNAL_SESSION__SECRET`).

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::path::{Path, PathBuf};
use tower_sessions::cookie::Key;

/// Minimum secret length accepted for the cookie signing key.
pub const MIN_SECRET_BYTES: usize = 64;

/// Stylesheet and scripts shipped with the crate, served under `/static`.
pub const DEFAULT_STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

const CONFIG_FILE: &str = "journal.toml";
const ENV_PREFIX: &str = "JOURNAL";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub path: PathBuf,
}

#[derive(Clone, Deserialize)]
pub struct SessionSettings {
    pub secret: String,
    pub secure: bool,
    pub inactivity_minutes: i64,
}

impl SessionSettings {
    /// Cookie signing key derived from the configured secret.
    pub fn key(&self) -> Result<Key, SettingsError> {
        Key::try_from(self.secret.as_bytes()).map_err(|_| SettingsError::SecretTooShort {
            len: self.secret.len(),
        })
    }
}

impl Debug for SessionSettings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSettings")
            .field("secret", &"<redacted>")
            .field("secure", &self.secure)
            .field("inactivity_minutes", &self.inactivity_minutes)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    pub level: String,
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub session: SessionSettings,
    pub log: LogSettings,
    pub static_dir: PathBuf,
}

#[derive(Debug)]
pub enum SettingsError {
    Config(ConfigError),
    MissingSecret,
    SecretTooShort { len: usize },
    InvalidInactivity(i64),
    RelativeLogDir(String),
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::MissingSecret => write!(
                f,
                "session.secret is required (set {ENV_PREFIX}_SESSION__SECRET)"
            ),
            Self::SecretTooShort { len } => write!(
                f,
                "session.secret must be at least {MIN_SECRET_BYTES} bytes, got {len}"
            ),
            Self::InvalidInactivity(minutes) => write!(
                f,
                "session.inactivity_minutes must be positive, got {minutes}"
            ),
            Self::RelativeLogDir(dir) => write!(f, "log.dir must be an absolute path: {dir}"),
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for SettingsError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl Settings {
    /// Loads settings from `journal.toml` and the process environment.
    pub fn new() -> Result<Self, SettingsError> {
        Self::load(Some(Path::new(CONFIG_FILE)), env_source())
    }

    /// Loads settings from an explicit file and environment source.
    pub fn load(file: Option<&Path>, env: Environment) -> Result<Self, SettingsError> {
        let mut builder = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("database.path", "journal.db")?
            .set_default("session.secret", "")?
            .set_default("session.secure", false)?
            .set_default("session.inactivity_minutes", 1440)?
            .set_default("log.level", journal_core::default_log_level())?
            .set_default("static_dir", DEFAULT_STATIC_DIR)?;
        if let Some(file) = file {
            builder = builder.add_source(
                File::from(file)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }
        let settings: Self = builder.add_source(env).build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.session.secret.is_empty() {
            return Err(SettingsError::MissingSecret);
        }
        if self.session.secret.len() < MIN_SECRET_BYTES {
            return Err(SettingsError::SecretTooShort {
                len: self.session.secret.len(),
            });
        }
        if self.session.inactivity_minutes <= 0 {
            return Err(SettingsError::InvalidInactivity(
                self.session.inactivity_minutes,
            ));
        }
        if let Some(dir) = self.log.dir.as_deref() {
            if !Path::new(dir).is_absolute() {
                return Err(SettingsError::RelativeLogDir(dir.to_string()));
            }
        }
        Ok(())
    }
}

/// Environment source for `JOURNAL_*` variables.
pub fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        env_source().source(Some(map))
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let settings = Settings::load(None, env(&[("JOURNAL_SESSION__SECRET", SECRET)])).unwrap();
        assert_eq!(settings.server.bind_addr(), "127.0.0.1:5000");
        assert_eq!(settings.database.path, PathBuf::from("journal.db"));
        assert!(!settings.session.secure);
        assert_eq!(settings.session.inactivity_minutes, 1440);
        assert_eq!(settings.log.level, journal_core::default_log_level());
        assert!(settings.log.dir.is_none());
        assert_eq!(settings.static_dir, PathBuf::from(DEFAULT_STATIC_DIR));
        assert!(settings.static_dir.join("particles.js").is_file());
        assert!(settings.session.key().is_ok());
    }

    #[test]
    fn environment_overrides_nested_keys() {
        let settings = Settings::load(
            None,
            env(&[
                ("JOURNAL_SESSION__SECRET", SECRET),
                ("JOURNAL_SERVER__PORT", "8080"),
                ("JOURNAL_SESSION__SECURE", "true"),
                ("JOURNAL_DATABASE__PATH", "/tmp/other.db"),
            ]),
        )
        .unwrap();
        assert_eq!(settings.server.port, 8080);
        assert!(settings.session.secure);
        assert_eq!(settings.database.path, PathBuf::from("/tmp/other.db"));
    }

    #[test]
    fn file_values_are_read_and_env_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.toml");
        std::fs::write(
            &path,
            format!("[server]\nport = 7000\nhost = \"0.0.0.0\"\n\n[session]\nsecret = \"{SECRET}\"\n"),
        )
        .unwrap();

        let settings =
            Settings::load(Some(path.as_path()), env(&[("JOURNAL_SERVER__PORT", "7001")])).unwrap();
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 7001);
    }

    #[test]
    fn missing_or_short_secret_is_rejected() {
        assert!(matches!(
            Settings::load(None, env(&[])),
            Err(SettingsError::MissingSecret)
        ));
        assert!(matches!(
            Settings::load(None, env(&[("JOURNAL_SESSION__SECRET", "short")])),
            Err(SettingsError::SecretTooShort { len: 5 })
        ));
    }

    #[test]
    fn relative_log_dir_is_rejected() {
        let result = Settings::load(
            None,
            env(&[
                ("JOURNAL_SESSION__SECRET", SECRET),
                ("JOURNAL_LOG__DIR", "logs"),
            ]),
        );
        assert!(matches!(result, Err(SettingsError::RelativeLogDir(_))));
    }

    #[test]
    fn debug_output_redacts_secret() {
        let settings = Settings::load(None, env(&[("JOURNAL_SESSION__SECRET", SECRET)])).unwrap();
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains(SECRET));
        assert!(rendered.contains("<redacted>"));
    }
}
