use crate::model::Variant;
use anyhow::{Context, Result};
use helper::{env_load, env_var};
use nutype::nutype;
use std::env::var;
use std::net::IpAddr;
use std::path::PathBuf;

env_var!(API2_HOST);
env_var!(API2_PORT);
env_var!(API2_LOG_FILE);
env_var!(API2_VARIANT);

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: &str = "3001";
pub const DEFAULT_LOG_FILE: &str = "api2_requests.log";
pub const DEFAULT_VARIANT: &str = "a";

#[nutype(derive(Clone, Copy, Debug, Display), validate(greater = 0))]
pub struct ListenPort(u16);

#[nutype(
    derive(Clone, Debug, Display),
    sanitize(trim),
    validate(not_empty)
)]
pub struct LogFilePath(String);

/// Settings of the mock server, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host:     IpAddr,
    pub port:     u16,
    pub log_file: PathBuf,
    pub variant:  Variant,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let host = var(API2_HOST)
            .unwrap_or_else(|_| DEFAULT_HOST.to_string())
            .parse::<IpAddr>()
            .with_context(|| format!("{} is not an IP address", API2_HOST))?;
        let port = env_load!(ListenPort, API2_PORT, u16, DEFAULT_PORT);
        let log_file = env_load!(LogFilePath, API2_LOG_FILE, DEFAULT_LOG_FILE);
        let variant = var(API2_VARIANT)
            .unwrap_or_else(|_| DEFAULT_VARIANT.to_string())
            .parse::<Variant>()
            .with_context(|| {
                format!("{} was not formatted right", API2_VARIANT)
            })?;

        Ok(Self {
            host,
            port: port.into_inner(),
            log_file: PathBuf::from(log_file.into_inner()),
            variant,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[test]
    fn test_defaults() -> Result<()> {
        for name in [API2_HOST, API2_PORT, API2_LOG_FILE, API2_VARIANT] {
            std::env::remove_var(name);
        }

        let config = Config::from_env()?;
        assert_eq!(
            config,
            Config {
                host:     "0.0.0.0".parse()?,
                port:     3001,
                log_file: PathBuf::from("api2_requests.log"),
                variant:  Variant::A,
            }
        );
        Ok(())
    }

    #[parameterized(
        zero = { 0, false },
        lowest = { 1, true },
        usual = { 3001, true }
    )]
    fn test_listen_port(port: u16, valid: bool) {
        assert_eq!(ListenPort::new(port).is_ok(), valid);
    }

    #[parameterized(
        empty = { "", None },
        blank = { "   ", None },
        padded = { " requests.log ", Some("requests.log") }
    )]
    fn test_log_file_path(raw: &str, expected: Option<&str>) {
        let parsed = LogFilePath::new(raw.to_string()).ok();
        assert_eq!(
            parsed.map(LogFilePath::into_inner),
            expected.map(str::to_string)
        );
    }
}
