use std::fmt;
use thiserror::Error;

/// HS512 key-strength floor: the secret must carry at least 512 bits.
pub const MIN_SECRET_BYTES: usize = 64;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_EXPIRATION_HOURS: i64 = 24;
/// One year; longer lifetimes are rejected at load time.
pub const MAX_EXPIRATION_HOURS: i64 = 24 * 365;
const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("JWT_SECRET must be at least {MIN_SECRET_BYTES} bytes, got {0}")]
    SecretTooShort(usize),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Validated signing settings for session tokens
#[derive(Clone)]
pub struct TokenSettings {
    secret: String,
    pub expiration_hours: i64,
}

impl TokenSettings {
    pub fn new(secret: impl Into<String>, expiration_hours: i64) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        if secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::SecretTooShort(secret.len()));
        }
        if expiration_hours <= 0 || expiration_hours > MAX_EXPIRATION_HOURS {
            return Err(ConfigError::Invalid {
                name: "SESSION_EXPIRATION_HOURS",
                value: expiration_hours.to_string(),
            });
        }

        Ok(Self {
            secret,
            expiration_hours,
        })
    }

    pub fn secret(&self) -> &[u8] {
        self.secret.as_bytes()
    }
}

impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

/// SMTP relay used for registration notices
#[derive(Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("from", &self.from)
            .finish()
    }
}

/// Process configuration, loaded once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_url: Option<String>,
    pub token: TokenSettings,
    pub smtp: Option<SmtpSettings>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let database_url = lookup("DATABASE_URL").filter(|url| !url.is_empty());

        let secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let expiration_hours = parse_or(
            &lookup,
            "SESSION_EXPIRATION_HOURS",
            DEFAULT_EXPIRATION_HOURS,
        )?;
        let token = TokenSettings::new(secret, expiration_hours)?;

        let smtp = match lookup("SMTP_HOST").filter(|host| !host.is_empty()) {
            Some(host) => Some(SmtpSettings {
                host,
                port: parse_or(&lookup, "SMTP_PORT", DEFAULT_SMTP_PORT)?,
                username: lookup("SMTP_USERNAME").ok_or(ConfigError::Missing("SMTP_USERNAME"))?,
                password: lookup("SMTP_PASSWORD").ok_or(ConfigError::Missing("SMTP_PASSWORD"))?,
                from: lookup("SMTP_FROM").ok_or(ConfigError::Missing("SMTP_FROM"))?,
            }),
            None => None,
        };

        Ok(Self {
            bind_addr,
            database_url,
            token,
            smtp,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_with_only_secret() {
        let config = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", SECRET)])).unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert!(config.database_url.is_none());
        assert!(config.smtp.is_none());
        assert_eq!(config.token.expiration_hours, 24);
        assert_eq!(config.token.secret(), SECRET.as_bytes());
    }

    #[test]
    fn test_missing_secret_fails() {
        let result = AppConfig::from_lookup(lookup_from(&[]));
        assert_eq!(result.unwrap_err(), ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn test_short_secret_fails() {
        let result = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "too-short")]));
        assert_eq!(result.unwrap_err(), ConfigError::SecretTooShort(9));
    }

    #[test]
    fn test_invalid_expiration_fails() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", SECRET),
            ("SESSION_EXPIRATION_HOURS", "soon"),
        ]));
        assert!(matches!(result, Err(ConfigError::Invalid { name: "SESSION_EXPIRATION_HOURS", .. })));

        let result = AppConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", SECRET),
            ("SESSION_EXPIRATION_HOURS", "0"),
        ]));
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_oversized_expiration_fails_at_load() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", SECRET),
            ("SESSION_EXPIRATION_HOURS", "10000000000"),
        ]));
        assert_eq!(
            result.unwrap_err(),
            ConfigError::Invalid {
                name: "SESSION_EXPIRATION_HOURS",
                value: "10000000000".to_string(),
            }
        );

        let config = AppConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", SECRET),
            ("SESSION_EXPIRATION_HOURS", "8760"),
        ]))
        .unwrap();
        assert_eq!(config.token.expiration_hours, MAX_EXPIRATION_HOURS);
    }

    #[test]
    fn test_smtp_group() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", SECRET),
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_USERNAME", "mailer"),
            ("SMTP_PASSWORD", "hunter2"),
            ("SMTP_FROM", "RentCar <noreply@example.com>"),
        ]))
        .unwrap();

        let smtp = config.smtp.unwrap();
        assert_eq!(smtp.host, "smtp.example.com");
        assert_eq!(smtp.port, 587);

        let result = AppConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", SECRET),
            ("SMTP_HOST", "smtp.example.com"),
        ]));
        assert_eq!(result.unwrap_err(), ConfigError::Missing("SMTP_USERNAME"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let settings = TokenSettings::new(SECRET, 24).unwrap();
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains(SECRET));
        assert!(rendered.contains("<redacted>"));
    }
}
