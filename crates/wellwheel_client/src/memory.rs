//! In-process store and development auth, used when no Supabase project is
//! configured and in tests.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::NaiveDate;
use secrecy::SecretString;
use tokio::sync::RwLock;
use wellwheel_core::WellnessScoreRecord;

use crate::{AuthUser, AuthVerifier, ClientError, Profile, ScoreStore};

type RowKey = (String, NaiveDate, String);

#[derive(Debug, Default)]
pub struct InMemoryScoreStore {
    rows: RwLock<BTreeMap<RowKey, WellnessScoreRecord>>,
    profiles: RwLock<HashMap<String, Profile>>,
}

impl InMemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_profile(&self, user_id: &str, profile: Profile) {
        self.profiles
            .write()
            .await
            .insert(user_id.to_string(), profile);
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl ScoreStore for InMemoryScoreStore {
    async fn upsert_score(
        &self,
        user: &AuthUser,
        record: &WellnessScoreRecord,
    ) -> Result<(), ClientError> {
        let mut row = record.clone();
        row.user_id = user.id.clone();
        let key = (user.id.clone(), row.day, row.topic.clone());
        self.rows.write().await.insert(key, row);
        Ok(())
    }

    async fn scores_for_day(
        &self,
        user: &AuthUser,
        day: NaiveDate,
    ) -> Result<Vec<WellnessScoreRecord>, ClientError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|((uid, d, _), _)| *uid == user.id && *d == day)
            .map(|(_, r)| r.clone())
            .collect())
    }

    async fn all_scores(&self, user: &AuthUser) -> Result<Vec<WellnessScoreRecord>, ClientError> {
        let rows = self.rows.read().await;
        let mut out: Vec<WellnessScoreRecord> = rows
            .iter()
            .filter(|((uid, _, _), _)| *uid == user.id)
            .map(|(_, r)| r.clone())
            .collect();
        out.sort_by_key(|r| r.day);
        Ok(out)
    }

    async fn filled_days(&self, user: &AuthUser) -> Result<Vec<NaiveDate>, ClientError> {
        let rows = self.rows.read().await;
        let days: BTreeSet<NaiveDate> = rows
            .keys()
            .filter(|(uid, _, _)| *uid == user.id)
            .map(|(_, d, _)| *d)
            .collect();
        Ok(days.into_iter().collect())
    }

    async fn reset_day(&self, user: &AuthUser, day: NaiveDate) -> Result<(), ClientError> {
        self.rows
            .write()
            .await
            .retain(|(uid, d, _), _| !(*uid == user.id && *d == day));
        Ok(())
    }

    async fn profile(&self, user: &AuthUser) -> Result<Option<Profile>, ClientError> {
        Ok(self.profiles.read().await.get(&user.id).cloned())
    }
}

/// Development auth: any non-blank bearer token is accepted as the user id.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokenAsUser;

#[async_trait]
impl AuthVerifier for TokenAsUser {
    async fn verify(&self, token: &str) -> Result<AuthUser, ClientError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ClientError::Auth("missing bearer token".into()));
        }
        Ok(AuthUser {
            id: token.to_string(),
            email: None,
            token: SecretString::new(token.into()),
        })
    }
}
