use std::time::Duration;

use secrecy::SecretString;

use crate::ClientError;

pub const DEFAULT_YOUTUBE_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 15;

#[derive(Clone, Debug)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: SecretString,
}

/// Upstream settings. Every upstream is optional; the server decides how to
/// degrade when one is missing.
#[derive(Clone, Debug)]
pub struct Config {
    pub youtube_api_key: Option<SecretString>,
    pub youtube_base_url: String,
    pub openai_api_key: Option<SecretString>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub supabase: Option<SupabaseConfig>,
    pub upstream_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Reads configuration through `get` so tests never touch the process
    /// environment. Blank values count as unset.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, ClientError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut get = move |k: &str| get(k).filter(|v| !v.trim().is_empty());

        let youtube_api_key = get("YOUTUBE_API_KEY")
            .or_else(|| get("GOOGLE_YT_API_KEY"))
            .map(|k| SecretString::new(k.into()));
        let youtube_base_url =
            get("YOUTUBE_BASE_URL").unwrap_or_else(|| DEFAULT_YOUTUBE_BASE_URL.into());
        let openai_api_key = get("OPENAI_API_KEY").map(|k| SecretString::new(k.into()));
        let openai_base_url =
            get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.into());
        let openai_model = get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.into());

        let supabase = match (get("SUPABASE_URL"), get("SUPABASE_ANON_KEY")) {
            (Some(url), Some(key)) => Some(SupabaseConfig {
                url,
                anon_key: SecretString::new(key.into()),
            }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ClientError::Config("SUPABASE_ANON_KEY missing".into()));
            }
            (None, Some(_)) => return Err(ClientError::Config("SUPABASE_URL missing".into())),
        };

        let upstream_timeout = match get("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| {
                    ClientError::Config(format!("UPSTREAM_TIMEOUT_SECS is not a number: {raw}"))
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        };

        Ok(Self {
            youtube_api_key,
            youtube_base_url,
            openai_api_key,
            openai_base_url,
            openai_model,
            supabase,
            upstream_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = Config::from_env_with(|_| None).expect("cfg");
        assert!(cfg.youtube_api_key.is_none());
        assert!(cfg.supabase.is_none());
        assert_eq!(cfg.openai_model, "gpt-4o-mini");
        assert_eq!(cfg.youtube_base_url, DEFAULT_YOUTUBE_BASE_URL);
        assert_eq!(cfg.upstream_timeout, Duration::from_secs(15));
    }

    #[test]
    fn legacy_youtube_key_name_is_accepted() {
        let get = |k: &str| match k {
            "GOOGLE_YT_API_KEY" => Some("yt".into()),
            "YOUTUBE_API_KEY" => Some("  ".into()),
            _ => None,
        };
        let cfg = Config::from_env_with(get).expect("cfg");
        assert_eq!(cfg.youtube_api_key.unwrap().expose_secret(), "yt");
    }

    #[test]
    fn supabase_needs_both_values() {
        let get = |k: &str| match k {
            "SUPABASE_URL" => Some("http://localhost:54321".into()),
            _ => None,
        };
        assert!(matches!(Config::from_env_with(get), Err(ClientError::Config(_))));

        let get = |k: &str| match k {
            "SUPABASE_URL" => Some("http://localhost:54321".into()),
            "SUPABASE_ANON_KEY" => Some("anon".into()),
            _ => None,
        };
        let cfg = Config::from_env_with(get).expect("cfg");
        assert_eq!(cfg.supabase.unwrap().url, "http://localhost:54321");
    }

    #[test]
    fn bad_timeout_is_a_config_error() {
        let get = |k: &str| match k {
            "UPSTREAM_TIMEOUT_SECS" => Some("soon".into()),
            _ => None,
        };
        assert!(Config::from_env_with(get).is_err());
    }
}
