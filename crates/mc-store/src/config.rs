//! Client configuration, loaded from `~/.mission-control/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub timers: TimerConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the backend REST API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Cadence of the agent-status / monitoring poll.
    #[serde(default = "default_poll_secs")]
    pub agent_poll_secs: u64,
    /// Delay before the fallback refresh that guards against a missed
    /// WebSocket event after a confirm-then-refresh action.
    #[serde(default = "default_fallback_ms")]
    pub fallback_refresh_ms: u64,
    /// Fixed (not exponential) WebSocket reconnect delay.
    #[serde(default = "default_reconnect_secs")]
    pub ws_reconnect_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Agent that receives chat messages when mention routing finds zero or
    /// more than one match.
    #[serde(default = "default_agent")]
    pub default_agent: String,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_poll_secs() -> u64 {
    30
}

fn default_fallback_ms() -> u64 {
    500
}

fn default_reconnect_secs() -> u64 {
    3
}

fn default_agent() -> String {
    "main".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            agent_poll_secs: default_poll_secs(),
            fallback_refresh_ms: default_fallback_ms(),
            ws_reconnect_secs: default_reconnect_secs(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_agent: default_agent(),
        }
    }
}

impl Config {
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".mission-control")
            .join("config.toml")
    }

    /// Load the config file, falling back to defaults when it is absent or
    /// unparseable (a broken config should not keep the dashboard down).
    pub fn load() -> Self {
        let path = Self::config_path();
        match std::fs::read_to_string(&path) {
            Ok(text) => toml::from_str(&text).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), %err, "invalid config, using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// WebSocket endpoint derived from the REST base URL.
    pub fn ws_url(&self) -> String {
        let base = self.server.base_url.trim_end_matches('/');
        let base = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            format!("ws://{base}")
        };
        format!("{base}/ws")
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.timers.agent_poll_secs)
    }

    pub fn fallback_refresh_delay(&self) -> Duration {
        Duration::from_millis(self.timers.fallback_refresh_ms)
    }

    pub fn ws_reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.timers.ws_reconnect_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.server.base_url, "http://127.0.0.1:8000");
        assert_eq!(cfg.timers.agent_poll_secs, 30);
        assert_eq!(cfg.timers.fallback_refresh_ms, 500);
        assert_eq!(cfg.timers.ws_reconnect_secs, 3);
        assert_eq!(cfg.chat.default_agent, "main");
    }

    #[test]
    fn test_ws_url_derivation() {
        let mut cfg = Config::default();
        assert_eq!(cfg.ws_url(), "ws://127.0.0.1:8000/ws");
        cfg.server.base_url = "https://mission.example.com/".into();
        assert_eq!(cfg.ws_url(), "wss://mission.example.com/ws");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let cfg: Config = toml::from_str("[server]\nbase_url = \"http://10.0.0.2:9000\"\n").unwrap();
        assert_eq!(cfg.server.base_url, "http://10.0.0.2:9000");
        assert_eq!(cfg.timers.agent_poll_secs, 30);
        assert_eq!(cfg.chat.default_agent, "main");
    }

    #[test]
    fn test_round_trips_through_toml() {
        let cfg = Config::default();
        let text = cfg.to_toml().unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.server.base_url, cfg.server.base_url);
        assert_eq!(back.timers.fallback_refresh_ms, cfg.timers.fallback_refresh_ms);
    }
}
