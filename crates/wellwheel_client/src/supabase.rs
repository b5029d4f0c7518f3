//! Supabase-style backend: GoTrue for bearer verification, PostgREST for
//! reads and RPC functions for writes. Every data request carries the
//! caller's own token so row-level security applies.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::NaiveDate;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use wellwheel_core::WellnessScoreRecord;

use crate::http_client::{build_http, execute_empty, execute_json};
use crate::{AuthUser, AuthVerifier, ClientError, Profile, ScoreStore};

const SERVICE: &str = "supabase";
const SCORE_COLUMNS: &str = "day,topic,score,raw_points,max_points,user_id";

#[derive(Serialize)]
struct UpsertParams<'a> {
    p_topic: &'a str,
    p_score: f64,
    p_raw_points: Option<f64>,
    p_max_points: Option<f64>,
    p_day: NaiveDate,
    p_tz: Option<&'a str>,
}

#[derive(Serialize)]
struct ResetParams<'a> {
    p_day: NaiveDate,
    p_tz: Option<&'a str>,
}

#[derive(Deserialize)]
struct DayRow {
    day: NaiveDate,
}

#[derive(Deserialize)]
struct UserResponse {
    id: String,
    email: Option<String>,
}

#[derive(Clone, Debug)]
pub struct SupabaseClient {
    base_url: String,
    anon_key: SecretString,
    client: reqwest::Client,
}

impl SupabaseClient {
    pub fn new(base_url: &str, anon_key: SecretString, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
            client,
        }
    }

    pub fn with_timeout(
        base_url: &str,
        anon_key: SecretString,
        timeout: std::time::Duration,
    ) -> Result<Self, ClientError> {
        Ok(Self::new(base_url, anon_key, build_http(timeout)?))
    }

    fn authed(&self, builder: reqwest::RequestBuilder, token: &str) -> reqwest::RequestBuilder {
        builder
            .header("apikey", self.anon_key.expose_secret())
            .bearer_auth(token)
    }

    fn get_rest(&self, table: &str, user: &AuthUser) -> reqwest::RequestBuilder {
        let url = format!("{}/rest/v1/{table}", self.base_url);
        self.authed(self.client.get(url), user.token.expose_secret())
    }

    fn post_rpc(&self, function: &str, user: &AuthUser) -> reqwest::RequestBuilder {
        let url = format!("{}/rest/v1/rpc/{function}", self.base_url);
        self.authed(self.client.post(url), user.token.expose_secret())
    }

    fn user_filter(user: &AuthUser) -> String {
        format!("eq.{}", user.id)
    }

    // Profile timezone for the RPCs; missing profiles fall back to the server default.
    async fn tz(&self, user: &AuthUser) -> Option<String> {
        self.profile(user).await.ok().flatten().and_then(|p| p.tz)
    }
}

#[async_trait]
impl AuthVerifier for SupabaseClient {
    async fn verify(&self, token: &str) -> Result<AuthUser, ClientError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ClientError::Auth("missing bearer token".into()));
        }
        let url = format!("{}/auth/v1/user", self.base_url);
        let user: UserResponse =
            execute_json(SERVICE, self.authed(self.client.get(url), token), "Invalid session")
                .await?;
        Ok(AuthUser {
            id: user.id,
            email: user.email,
            token: SecretString::new(token.into()),
        })
    }
}

#[async_trait]
impl ScoreStore for SupabaseClient {
    async fn upsert_score(
        &self,
        user: &AuthUser,
        record: &WellnessScoreRecord,
    ) -> Result<(), ClientError> {
        let tz = self.tz(user).await;
        let params = UpsertParams {
            p_topic: &record.topic,
            p_score: record.score,
            p_raw_points: record.raw_points,
            p_max_points: record.max_points,
            p_day: record.day,
            p_tz: tz.as_deref(),
        };
        tracing::debug!(topic = %record.topic, day = %record.day, "upserting score");
        execute_empty(
            SERVICE,
            self.post_rpc("api_upsert_wellness_score", user).json(&params),
            "Failed to save score",
        )
        .await
    }

    async fn scores_for_day(
        &self,
        user: &AuthUser,
        day: NaiveDate,
    ) -> Result<Vec<WellnessScoreRecord>, ClientError> {
        let qp = [
            ("select", SCORE_COLUMNS.to_string()),
            ("user_id", Self::user_filter(user)),
            ("day", format!("eq.{day}")),
        ];
        execute_json(
            SERVICE,
            self.get_rest("wellness_scores", user).query(&qp),
            "Failed to load scores",
        )
        .await
    }

    async fn all_scores(&self, user: &AuthUser) -> Result<Vec<WellnessScoreRecord>, ClientError> {
        let qp = [
            ("select", SCORE_COLUMNS.to_string()),
            ("user_id", Self::user_filter(user)),
            ("order", "day.asc".to_string()),
        ];
        execute_json(
            SERVICE,
            self.get_rest("wellness_scores", user).query(&qp),
            "Failed to load scores",
        )
        .await
    }

    async fn filled_days(&self, user: &AuthUser) -> Result<Vec<NaiveDate>, ClientError> {
        let qp = [
            ("select", "day".to_string()),
            ("user_id", Self::user_filter(user)),
        ];
        let rows: Vec<DayRow> = execute_json(
            SERVICE,
            self.get_rest("wellness_scores", user).query(&qp),
            "Failed to load days",
        )
        .await?;
        let days: BTreeSet<NaiveDate> = rows.into_iter().map(|r| r.day).collect();
        Ok(days.into_iter().collect())
    }

    async fn reset_day(&self, user: &AuthUser, day: NaiveDate) -> Result<(), ClientError> {
        let tz = self.tz(user).await;
        tracing::info!(%day, "resetting scores for day");
        execute_empty(
            SERVICE,
            self.post_rpc("api_reset_scores_for_day", user)
                .json(&ResetParams {
                    p_day: day,
                    p_tz: tz.as_deref(),
                }),
            "Failed to reset day",
        )
        .await
    }

    async fn profile(&self, user: &AuthUser) -> Result<Option<Profile>, ClientError> {
        let qp = [
            ("select", "tz,full_name,email".to_string()),
            ("id", Self::user_filter(user)),
            ("limit", "1".to_string()),
        ];
        let rows: Vec<Profile> = execute_json(
            SERVICE,
            self.get_rest("profiles", user).query(&qp),
            "Failed to load profile",
        )
        .await?;
        Ok(rows.into_iter().next())
    }
}
