//! Runtime settings: defaults, then `config.toml`, then the environment.

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    /// PostgreSQL URL. Empty selects the in-memory backend.
    pub url: String,
    pub connections: u32,
}

impl Database {
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

impl Default for Database {
    fn default() -> Self {
        Self {
            url: String::new(),
            connections: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Auth {
    /// Page that receives password-reset codes.
    pub redirect: String,
    /// Reset code lifetime in seconds.
    pub ttl: i64,
}

impl Default for Auth {
    fn default() -> Self {
        Self {
            redirect: "http://localhost:8080/reset-password".into(),
            ttl: 3600,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub secure: bool,
    /// Inactivity expiry in days.
    pub days: i64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            secure: false,
            days: 7,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    pub database: Database,
    pub auth: Auth,
    pub session: Session,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load_from(Environment::default())
    }

    fn load_from(environment: Environment) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("database.url", "")?
            .set_default("database.connections", 5)?
            .set_default("auth.redirect", "http://localhost:8080/reset-password")?
            .set_default("auth.ttl", 3600)?
            .set_default("session.secure", false)?
            .set_default("session.days", 7)?
            .add_source(
                File::with_name("config.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(environment.separator("_").try_parsing(true))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::Map;

    fn environment(vars: &[(&str, &str)]) -> Environment {
        let vars: Map<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Environment::default().source(Some(vars))
    }

    #[test]
    fn test_settings() {
        let settings = Settings::load_from(environment(&[
            ("AUTH_REDIRECT", "https://blog.example.com/reset-password"),
            ("SESSION_DAYS", "14"),
        ]))
        .unwrap();
        println!("Settings = {:?}", settings);
        assert_eq!(
            settings.auth.redirect,
            "https://blog.example.com/reset-password"
        );
        assert_eq!(settings.session.days, 14);
        assert_eq!(settings.auth.ttl, 3600);
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::load_from(environment(&[])).unwrap();
        assert!(!settings.database.is_configured());
        assert_eq!(settings.session.days, 7);
        assert!(!settings.session.secure);
    }

    #[test]
    fn test_default_database_is_memory() {
        assert!(!Database::default().is_configured());
    }
}
