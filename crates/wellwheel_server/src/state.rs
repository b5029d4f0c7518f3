use std::sync::Arc;

use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use wellwheel_client::config::DEFAULT_OPENAI_MODEL;
use wellwheel_client::youtube::Channels;
use wellwheel_client::{AuthVerifier, ChatClient, ScoreStore, VideoSearchClient};

/// Source of "today" for day-scoped operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Clock {
    #[default]
    System,
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => chrono::Local::now().date_naive(),
            Clock::Fixed(day) => *day,
        }
    }
}

/// Shared handler state. Upstreams are trait objects so tests can inject mocks.
pub struct AppState {
    /// `None` when no YouTube key is configured; video routes then fail with 500.
    pub video: Option<Arc<dyn VideoSearchClient>>,
    /// `None` when no chat key is configured; tips fall back to the canned text.
    pub chat: Option<Arc<dyn ChatClient>>,
    pub store: Arc<dyn ScoreStore>,
    pub auth: Arc<dyn AuthVerifier>,
    pub channels: Channels,
    pub model: String,
    pub metrics: Option<PrometheusHandle>,
    pub clock: Clock,
}

impl AppState {
    pub fn new(store: Arc<dyn ScoreStore>, auth: Arc<dyn AuthVerifier>) -> Self {
        Self {
            video: None,
            chat: None,
            store,
            auth,
            channels: Channels::default(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            metrics: None,
            clock: Clock::System,
        }
    }

    pub fn with_video(mut self, video: Arc<dyn VideoSearchClient>) -> Self {
        self.video = Some(video);
        self
    }

    pub fn with_chat(mut self, chat: Arc<dyn ChatClient>) -> Self {
        self.chat = Some(chat);
        self
    }

    pub fn with_channels(mut self, channels: Channels) -> Self {
        self.channels = channels;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}
