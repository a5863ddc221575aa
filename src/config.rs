//! Client configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Every key has a default, so running
//! the binary with an empty environment reproduces the scripted demo.

use std::time::Duration;

use crate::error::ClientError;

/// Default agent server endpoint.
pub const DEFAULT_URL: &str = "ws://localhost:3000/ws";

/// Prompt sent as soon as the connection opens.
pub const DEFAULT_FIRST_PROMPT: &str = "Hello! Can you tell me a short joke about programming?";

/// Prompt sent after the follow-up delay.
pub const DEFAULT_FOLLOW_UP_PROMPT: &str = "Now tell me one about TypeScript.";

/// Upper bound for every timer setting (one day).
pub const MAX_TIMER: Duration = Duration::from_secs(24 * 60 * 60);

/// Top-level client configuration.
///
/// Loaded once at startup via [`ClientConfig::from_env`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// WebSocket endpoint of the agent server (e.g. `ws://localhost:3000/ws`).
    pub url: String,

    /// Content of the first user message.
    pub first_prompt: String,

    /// Content of the follow-up user message.
    pub follow_up_prompt: String,

    /// Delay between connection open and the follow-up message.
    pub follow_up_delay: Duration,

    /// Delay between connection open and the client-initiated close.
    pub session_duration: Duration,

    /// How long to wait for the peer to finish the close handshake.
    pub close_timeout: Duration,

    /// Emit logs as JSON lines instead of the human-readable format.
    pub log_json: bool,
}

impl ClientConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file,
    /// then falls back to defaults for every key that is not set.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidConfig`] if the resulting
    /// configuration fails validation.
    pub fn from_env() -> Result<Self, ClientError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidConfig`] if the resulting
    /// configuration fails validation.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            url: lookup("AGENT_WS_URL").unwrap_or(defaults.url),
            first_prompt: lookup("AGENT_FIRST_PROMPT").unwrap_or(defaults.first_prompt),
            follow_up_prompt: lookup("AGENT_FOLLOW_UP_PROMPT")
                .unwrap_or(defaults.follow_up_prompt),
            follow_up_delay: Duration::from_secs(parse_var(
                &lookup,
                "FOLLOW_UP_DELAY_SECS",
                defaults.follow_up_delay.as_secs(),
            )),
            session_duration: Duration::from_secs(parse_var(
                &lookup,
                "SESSION_DURATION_SECS",
                defaults.session_duration.as_secs(),
            )),
            close_timeout: Duration::from_secs(parse_var(
                &lookup,
                "CLOSE_TIMEOUT_SECS",
                defaults.close_timeout.as_secs(),
            )),
            log_json: parse_bool(lookup("LOG_JSON").as_deref(), defaults.log_json),
        };

        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for values the client cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidConfig`] describing the first
    /// rejected field.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.url.is_empty() {
            return Err(ClientError::InvalidConfig(
                "AGENT_WS_URL cannot be empty".to_string(),
            ));
        }

        if !self.url.starts_with("ws://") {
            return Err(ClientError::InvalidConfig(format!(
                "AGENT_WS_URL must use the ws:// scheme, got {}",
                self.url
            )));
        }

        if self.first_prompt.is_empty() || self.follow_up_prompt.is_empty() {
            return Err(ClientError::InvalidConfig(
                "prompts cannot be empty".to_string(),
            ));
        }

        if self.close_timeout.is_zero() {
            return Err(ClientError::InvalidConfig(
                "CLOSE_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }

        for (key, value) in [
            ("FOLLOW_UP_DELAY_SECS", self.follow_up_delay),
            ("SESSION_DURATION_SECS", self.session_duration),
            ("CLOSE_TIMEOUT_SECS", self.close_timeout),
        ] {
            if value > MAX_TIMER {
                return Err(ClientError::InvalidConfig(format!(
                    "{key} must be at most {} seconds",
                    MAX_TIMER.as_secs()
                )));
            }
        }

        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            first_prompt: DEFAULT_FIRST_PROMPT.to_string(),
            follow_up_prompt: DEFAULT_FOLLOW_UP_PROMPT.to_string(),
            follow_up_delay: Duration::from_secs(5),
            session_duration: Duration::from_secs(15),
            close_timeout: Duration::from_secs(5),
            log_json: false,
        }
    }
}

/// Parses a variable as `T`, returning `default` on missing or invalid
/// values.
fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Parses a boolean. Accepts `"true"`, `"1"`, `"false"`, `"0"`
/// (case-insensitive). Returns `default` otherwise.
fn parse_bool(value: Option<&str>, default: bool) -> bool {
    match value.map(str::to_ascii_lowercase).as_deref() {
        Some("true") | Some("1") => true,
        Some("false") | Some("0") => false,
        _ => default,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ClientConfig, ClientError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ClientConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn empty_environment_yields_scripted_defaults() {
        let Ok(config) = load(&[]) else {
            panic!("defaults must validate");
        };
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.url, "ws://localhost:3000/ws");
        assert_eq!(config.follow_up_delay, Duration::from_secs(5));
        assert_eq!(config.session_duration, Duration::from_secs(15));
        assert!(!config.log_json);
    }

    #[test]
    fn overrides_are_applied() {
        let Ok(config) = load(&[
            ("AGENT_WS_URL", "ws://10.0.0.2:4000/agent"),
            ("AGENT_FIRST_PROMPT", "hi"),
            ("FOLLOW_UP_DELAY_SECS", "2"),
            ("SESSION_DURATION_SECS", "30"),
            ("LOG_JSON", "TRUE"),
        ]) else {
            panic!("overrides must validate");
        };
        assert_eq!(config.url, "ws://10.0.0.2:4000/agent");
        assert_eq!(config.first_prompt, "hi");
        assert_eq!(config.follow_up_prompt, DEFAULT_FOLLOW_UP_PROMPT);
        assert_eq!(config.follow_up_delay, Duration::from_secs(2));
        assert_eq!(config.session_duration, Duration::from_secs(30));
        assert!(config.log_json);
    }

    #[test]
    fn unparsable_numbers_fall_back_to_defaults() {
        let Ok(config) = load(&[("FOLLOW_UP_DELAY_SECS", "soon")]) else {
            panic!("fallback must validate");
        };
        assert_eq!(config.follow_up_delay, Duration::from_secs(5));
    }

    #[test]
    fn non_websocket_url_is_rejected() {
        let result = load(&[("AGENT_WS_URL", "http://localhost:3000/ws")]);
        assert!(matches!(result, Err(ClientError::InvalidConfig(_))));
    }

    #[test]
    fn empty_url_is_rejected() {
        let mut config = ClientConfig::default();
        config.url.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_close_timeout_is_rejected() {
        let result = load(&[("CLOSE_TIMEOUT_SECS", "0")]);
        assert!(result.is_err());
    }

    #[test]
    fn timers_above_one_day_are_rejected() {
        let max = u64::MAX.to_string();
        for key in [
            "FOLLOW_UP_DELAY_SECS",
            "SESSION_DURATION_SECS",
            "CLOSE_TIMEOUT_SECS",
        ] {
            let result = load(&[(key, max.as_str())]);
            let Err(ClientError::InvalidConfig(reason)) = result else {
                panic!("{key}=u64::MAX must be rejected");
            };
            assert!(reason.contains(key));
        }

        let Ok(config) = load(&[("SESSION_DURATION_SECS", "86400")]) else {
            panic!("exactly one day must be accepted");
        };
        assert_eq!(config.session_duration, MAX_TIMER);
    }

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert!(parse_bool(Some("1"), false));
        assert!(!parse_bool(Some("False"), true));
        assert!(parse_bool(Some("maybe"), true));
        assert!(!parse_bool(None, false));
    }
}
