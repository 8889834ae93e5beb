//! Client configuration parsed from environment variables.
//!
//! Variables:
//! - `ALIGNMENT_HOST`: relay host (and port), default `localhost:5000`
//! - `ALIGNMENT_RECONNECT_MIN_MS`: first reconnect delay, default 1000
//! - `ALIGNMENT_RECONNECT_MAX_MS`: reconnect delay cap, default 10000
//!
//! Unparseable values fall back to the defaults.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::fmt;
use std::time::Duration;

use rand::Rng;

pub const DEFAULT_HOST: &str = "localhost:5000";
pub const DEFAULT_RECONNECT_MIN_MS: u64 = 1000;
pub const DEFAULT_RECONNECT_MAX_MS: u64 = 10_000;

/// Session tags are drawn from `[0, SESSION_TAG_LIMIT)`.
pub const SESSION_TAG_LIMIT: u32 = 1_000_000;

/// Per-session random tag. The relay uses it to skip echoing a client's own moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionTag(u32);

impl SessionTag {
    /// Draw a fresh tag.
    #[must_use]
    pub fn random() -> Self {
        Self(rand::rng().random_range(0..SESSION_TAG_LIMIT))
    }

    /// Wrap an existing tag; `None` if it is out of range.
    #[must_use]
    pub fn new(value: u32) -> Option<Self> {
        (value < SESSION_TAG_LIMIT).then_some(Self(value))
    }

    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SessionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Capped exponential backoff used by the socket driver between connection attempts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Backoff {
    pub min: Duration,
    pub max: Duration,
}

impl Backoff {
    /// Bounds are normalized so `max >= min`.
    #[must_use]
    pub fn new(min: Duration, max: Duration) -> Self {
        Self { min, max: max.max(min) }
    }

    /// Delay that follows `current`.
    #[must_use]
    pub fn next(self, current: Duration) -> Duration {
        current.saturating_mul(2).clamp(self.min, self.max)
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(DEFAULT_RECONNECT_MIN_MS),
            Duration::from_millis(DEFAULT_RECONNECT_MAX_MS),
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub session_tag: SessionTag,
    pub reconnect: Backoff,
}

impl ClientConfig {
    /// Config for `host` with a fresh session tag and default backoff.
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into(), session_tag: SessionTag::random(), reconnect: Backoff::default() }
    }

    /// Build config from environment variables with defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let host = match std::env::var("ALIGNMENT_HOST") {
            Ok(host) if !host.trim().is_empty() => host.trim().to_owned(),
            _ => DEFAULT_HOST.to_owned(),
        };
        let min = env_parse("ALIGNMENT_RECONNECT_MIN_MS", DEFAULT_RECONNECT_MIN_MS);
        let max = env_parse("ALIGNMENT_RECONNECT_MAX_MS", DEFAULT_RECONNECT_MAX_MS);

        Self {
            host,
            session_tag: SessionTag::random(),
            reconnect: Backoff::new(Duration::from_millis(min), Duration::from_millis(max)),
        }
    }

    /// Relay endpoint for this session: `ws://<host>/ws?sid=<tag>`.
    #[must_use]
    pub fn endpoint(&self) -> String {
        let host = self.host.trim_end_matches('/');
        format!("ws://{host}/ws?sid={}", self.session_tag)
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
