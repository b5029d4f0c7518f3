use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Listener settings. Unparseable values fall back to the defaults with a
/// warning rather than aborting startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub address: SocketAddr,
    pub max_body_size: usize,
    pub request_timeout: Duration,
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            log_filter: "info".into(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    pub fn from_env_with<F>(mut get: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let mut get = move |k: &str| get(k).filter(|v| !v.trim().is_empty());

        let address = parsed(get("ADDRESS"), "ADDRESS").unwrap_or(defaults.address);
        let max_body_size =
            parsed(get("MAX_HTTP_BODY_SIZE"), "MAX_HTTP_BODY_SIZE").unwrap_or(defaults.max_body_size);
        let request_timeout = parsed::<u64>(get("REQUEST_TIMEOUT_SECS"), "REQUEST_TIMEOUT_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);
        let log_filter = get("WELLWHEEL_LOG_LEVEL")
            .or_else(|| get("RUST_LOG"))
            .unwrap_or(defaults.log_filter);

        Self {
            address,
            max_body_size,
            request_timeout,
            log_filter,
        }
    }
}

fn parsed<T: std::str::FromStr>(raw: Option<String>, name: &str) -> Option<T> {
    let raw = raw?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(name, value = %raw, "ignoring unparseable setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_env() {
        assert_eq!(ServerConfig::from_env_with(|_| None), ServerConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let cfg = ServerConfig::from_env_with(|k| match k {
            "ADDRESS" => Some("0.0.0.0:8080".into()),
            "MAX_HTTP_BODY_SIZE" => Some("2048".into()),
            "REQUEST_TIMEOUT_SECS" => Some("5".into()),
            "RUST_LOG" => Some("debug".into()),
            _ => None,
        });
        assert_eq!(cfg.address, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(cfg.max_body_size, 2048);
        assert_eq!(cfg.request_timeout, Duration::from_secs(5));
        assert_eq!(cfg.log_filter, "debug");
    }

    #[test]
    fn own_log_level_wins_over_rust_log() {
        let cfg = ServerConfig::from_env_with(|k| match k {
            "WELLWHEEL_LOG_LEVEL" => Some("warn".into()),
            "RUST_LOG" => Some("debug".into()),
            _ => None,
        });
        assert_eq!(cfg.log_filter, "warn");
    }

    #[test]
    fn garbage_falls_back() {
        let cfg = ServerConfig::from_env_with(|k| match k {
            "ADDRESS" => Some("not-an-addr".into()),
            "MAX_HTTP_BODY_SIZE" => Some("big".into()),
            _ => None,
        });
        assert_eq!(cfg.address, ServerConfig::default().address);
        assert_eq!(cfg.max_body_size, DEFAULT_MAX_BODY_SIZE);
    }
}
