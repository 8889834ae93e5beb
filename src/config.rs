//! Relay configuration parsed from environment variables.
//!
//! Variables:
//! - `PORT`: listen port, default 5000
//! - `BIND_ADDR`: listen address, default `0.0.0.0`
//! - `RELAY_ROOM`: name of the room every connection joins, default `default`
//! - `RELAY_CLIENT_BUFFER`: per-connection outbound queue depth, default 256
//!
//! Unset variables take their defaults. A variable that is set but does not
//! parse is a startup error.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_ROOM: &str = "default";
pub const DEFAULT_CLIENT_BUFFER: usize = 256;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
    #[error("{var} must be greater than zero")]
    Zero { var: &'static str },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelayConfig {
    pub bind: SocketAddr,
    pub room: String,
    pub client_buffer: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            room: DEFAULT_ROOM.to_owned(),
            client_buffer: DEFAULT_CLIENT_BUFFER,
        }
    }
}

impl RelayConfig {
    /// Read the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set to a value that does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup. Tests feed a map here instead
    /// of mutating the process environment.
    ///
    /// # Errors
    ///
    /// Same as [`RelayConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = parse_var(&lookup, "PORT")?.unwrap_or(DEFAULT_PORT);
        let ip = parse_var::<IpAddr>(&lookup, "BIND_ADDR")?.unwrap_or(defaults.bind.ip());
        let room = lookup("RELAY_ROOM")
            .map(|room| room.trim().to_owned())
            .filter(|room| !room.is_empty())
            .unwrap_or(defaults.room);
        let client_buffer = parse_var(&lookup, "RELAY_CLIENT_BUFFER")?.unwrap_or(DEFAULT_CLIENT_BUFFER);
        if client_buffer == 0 {
            return Err(ConfigError::Zero { var: "RELAY_CLIENT_BUFFER" });
        }

        Ok(Self { bind: SocketAddr::new(ip, port), room, client_buffer })
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => match value.trim().parse() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(_) => Err(ConfigError::Invalid { var, value }),
        },
    }
}
