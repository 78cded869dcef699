use std::time::Duration;

use anyhow::{bail, Context, Result};

pub struct AppConfig {
    pub database: DatabaseConfig,
    pub store: StoreBackend,
    pub mail: MailConfig,
    pub lifecycle: LifecycleConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup instead of the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = match lookup("RESERVATION_STORE").as_deref() {
            None | Some("postgres") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::InMemory,
            Some(other) => bail!("unknown RESERVATION_STORE `{other}`"),
        };

        let database = if store == StoreBackend::Postgres {
            DatabaseConfig {
                host: required(&lookup, "DATABASE_HOST")?,
                port: parse_or(&lookup, "DATABASE_PORT", 5432)?,
                username: required(&lookup, "DATABASE_USERNAME")?,
                password: required(&lookup, "DATABASE_PASSWORD")?,
                database: required(&lookup, "DATABASE_NAME")?,
            }
        } else {
            DatabaseConfig::default()
        };

        let transport = match lookup("MAIL_TRANSPORT").as_deref() {
            None | Some("log") => MailTransport::Log,
            Some("gmail") => MailTransport::Gmail {
                access_token: required(&lookup, "GMAIL_ACCESS_TOKEN")?,
            },
            Some(other) => bail!("unknown MAIL_TRANSPORT `{other}`"),
        };
        let mail = MailConfig {
            transport,
            sender: lookup("MAIL_SENDER")
                .unwrap_or_else(|| "Reservaciones UNDelta <reservas@undelta.edu.ar>".into()),
        };

        let lifecycle = LifecycleConfig {
            store_timeout: Duration::from_millis(parse_or(&lookup, "STORE_TIMEOUT_MS", 5_000)?),
            notify_timeout: Duration::from_millis(parse_or(&lookup, "NOTIFY_TIMEOUT_MS", 10_000)?),
            notify_retries: parse_or(&lookup, "NOTIFY_RETRIES", 1)?,
            reject_overlaps: parse_or(&lookup, "RESERVATION_REJECT_OVERLAPS", false)?,
        }
        .clamped();

        let server = ServerConfig {
            port: parse_or(&lookup, "SERVER_PORT", 8080)?,
        };

        Ok(Self {
            database,
            store,
            mail,
            lifecycle,
            server,
        })
    }
}

#[derive(Default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    InMemory,
}

pub struct MailConfig {
    pub transport: MailTransport,
    pub sender: String,
}

pub enum MailTransport {
    Log,
    Gmail { access_token: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleConfig {
    pub store_timeout: Duration,
    pub notify_timeout: Duration,
    pub notify_retries: u32,
    pub reject_overlaps: bool,
}

impl LifecycleConfig {
    pub const MAX_NOTIFY_RETRIES: u32 = 1;

    pub fn clamped(self) -> Self {
        Self {
            notify_retries: self.notify_retries.min(Self::MAX_NOTIFY_RETRIES),
            ..self
        }
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_secs(5),
            notify_timeout: Duration::from_secs(10),
            notify_retries: 1,
            reject_overlaps: false,
        }
    }
}

pub struct ServerConfig {
    pub port: u16,
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).with_context(|| format!("environment variable `{key}` is not set"))
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("environment variable `{key}` has an invalid value `{raw}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn memory_store_needs_no_database_settings() -> Result<()> {
        let config = AppConfig::from_lookup(lookup_from(&[("RESERVATION_STORE", "memory")]))?;
        assert_eq!(config.store, StoreBackend::InMemory);
        assert!(matches!(config.mail.transport, MailTransport::Log));
        assert_eq!(config.lifecycle, LifecycleConfig::default());
        assert_eq!(config.server.port, 8080);
        Ok(())
    }

    #[test]
    fn postgres_store_requires_database_settings() {
        let res = AppConfig::from_lookup(lookup_from(&[("DATABASE_HOST", "localhost")]));
        assert!(res.is_err());
    }

    #[test]
    fn notify_retries_are_clamped_to_one() -> Result<()> {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("RESERVATION_STORE", "memory"),
            ("NOTIFY_RETRIES", "5"),
            ("STORE_TIMEOUT_MS", "250"),
        ]))?;
        assert_eq!(config.lifecycle.notify_retries, 1);
        assert_eq!(config.lifecycle.store_timeout, Duration::from_millis(250));
        Ok(())
    }

    #[test]
    fn gmail_transport_requires_token() {
        let res = AppConfig::from_lookup(lookup_from(&[
            ("RESERVATION_STORE", "memory"),
            ("MAIL_TRANSPORT", "gmail"),
        ]));
        assert!(res.is_err());
    }
}
