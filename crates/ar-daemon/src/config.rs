// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Process environment knobs, all optional with documented defaults.

use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub redis_host: String,
    pub redis_port: u16,
    pub redis_password: Option<String>,
    pub redis_db: i64,
    pub max_concurrent_sessions: usize,
    pub heartbeat_interval: Duration,
    pub stale_threshold: Duration,
    pub health_check_interval: Duration,
    pub provider_timeout: Duration,
    pub anthropic_base_url: Option<String>,
    pub openai_base_url: Option<String>,
    pub google_ai_base_url: Option<String>,
    pub deepseek_base_url: Option<String>,
    pub model_registry_api_url: Option<String>,
    pub log_level: String,
}

impl Config {
    /// Reads every knob from `std::env`; never fails — missing or
    /// unparsable values fall back to the documented default.
    pub fn load() -> Self {
        Self {
            redis_host: env_string("REDIS_HOST", "localhost"),
            redis_port: env_parsed("REDIS_PORT", 6379),
            redis_password: std::env::var("REDIS_PASSWORD").ok(),
            redis_db: env_parsed("REDIS_DB", 0),
            max_concurrent_sessions: env_parsed("MAX_CONCURRENT_SESSIONS", 10),
            heartbeat_interval: env_millis("HEARTBEAT_INTERVAL", 30_000),
            stale_threshold: env_millis("STALE_THRESHOLD", 300_000),
            health_check_interval: env_millis("HEALTH_CHECK_INTERVAL", 60_000),
            provider_timeout: env_millis("PROVIDER_TIMEOUT_MS", 120_000),
            anthropic_base_url: std::env::var("ANTHROPIC_BASE_URL").ok(),
            openai_base_url: std::env::var("OPENAI_BASE_URL").ok(),
            google_ai_base_url: std::env::var("GOOGLE_AI_BASE_URL").ok(),
            deepseek_base_url: std::env::var("DEEPSEEK_BASE_URL").ok(),
            model_registry_api_url: std::env::var("MODEL_REGISTRY_API_URL").ok(),
            log_level: env_string("LOG_LEVEL", "info"),
        }
    }
    /// Resolve log directory: `AR_STATE_DIR` > `XDG_STATE_HOME`/ar >
    /// `~/.local/state/ar`, falling back to the current directory if none
    /// of those resolve.
    pub fn log_path(&self) -> PathBuf {
        let dir = if let Ok(dir) = std::env::var("AR_STATE_DIR") {
            PathBuf::from(dir)
        } else if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
            PathBuf::from(xdg).join("ar")
        } else if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home).join(".local/state/ar")
        } else {
            PathBuf::from(".")
        };
        dir.join("daemon.log")
    }
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn env_millis(key: &str, default_ms: u64) -> Duration {
    Duration::from_millis(env_parsed(key, default_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_when_env_unset() {
        std::env::remove_var("REDIS_HOST");
        std::env::remove_var("MAX_CONCURRENT_SESSIONS");
        let config = Config::load();
        assert_eq!(config.redis_host, "localhost");
        assert_eq!(config.redis_port, 6379);
        assert_eq!(config.max_concurrent_sessions, 10);
        assert_eq!(config.heartbeat_interval, Duration::from_secs(30));
        assert_eq!(config.stale_threshold, Duration::from_secs(300));
    }

    #[test]
    fn overrides_are_parsed_from_env() {
        std::env::set_var("MAX_CONCURRENT_SESSIONS", "25");
        let config = Config::load();
        assert_eq!(config.max_concurrent_sessions, 25);
        std::env::remove_var("MAX_CONCURRENT_SESSIONS");
    }

    #[test]
    fn log_path_honors_ar_state_dir_override() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::env::set_var("AR_STATE_DIR", dir.path());
        let config = Config::load();
        assert_eq!(config.log_path(), dir.path().join("daemon.log"));
        std::env::remove_var("AR_STATE_DIR");
    }
}
