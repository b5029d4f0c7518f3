use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::signal;
use tracing::info;

use wellwheel_client::chat::ReqwestChatClient;
use wellwheel_client::config::Config;
use wellwheel_client::memory::{InMemoryScoreStore, TokenAsUser};
use wellwheel_client::supabase::SupabaseClient;
use wellwheel_client::youtube::ReqwestYoutubeClient;
use wellwheel_client::{AuthVerifier, ScoreStore};
use wellwheel_server::{AppState, ServerConfig, app};

fn init_logging(filter: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_new(filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .compact()
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
}

fn build_state(upstream: &Config) -> anyhow::Result<AppState> {
    let timeout = upstream.upstream_timeout;

    let (store, auth): (Arc<dyn ScoreStore>, Arc<dyn AuthVerifier>) = match &upstream.supabase {
        Some(sb) => {
            let client = Arc::new(SupabaseClient::with_timeout(
                &sb.url,
                sb.anon_key.clone(),
                timeout,
            )?);
            info!(url = %sb.url, "using Supabase score store");
            let store: Arc<dyn ScoreStore> = client.clone();
            let auth: Arc<dyn AuthVerifier> = client;
            (store, auth)
        }
        None => {
            tracing::warn!("SUPABASE_URL not set; using in-memory store with token-as-user auth");
            let store: Arc<dyn ScoreStore> = Arc::new(InMemoryScoreStore::new());
            let auth: Arc<dyn AuthVerifier> = Arc::new(TokenAsUser);
            (store, auth)
        }
    };

    let mut state = AppState::new(store, auth).with_model(upstream.openai_model.clone());
    match &upstream.youtube_api_key {
        Some(key) => {
            state = state.with_video(Arc::new(ReqwestYoutubeClient::with_timeout(
                &upstream.youtube_base_url,
                key.clone(),
                timeout,
            )?));
        }
        None => tracing::warn!("YOUTUBE_API_KEY not set; video search will fail"),
    }
    match &upstream.openai_api_key {
        Some(key) => {
            state = state.with_chat(Arc::new(ReqwestChatClient::with_timeout(
                &upstream.openai_base_url,
                key.clone(),
                timeout,
            )?));
        }
        None => tracing::warn!("OPENAI_API_KEY not set; smart tips use the canned text"),
    }
    Ok(state)
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let server = ServerConfig::from_env();
    init_logging(&server.log_filter);
    info!(log_filter = %server.log_filter, "wellwheel: log filter");

    let handle = PrometheusBuilder::new().install_recorder()?;
    let upstream = Config::from_env()?;
    let state = Arc::new(build_state(&upstream)?.with_metrics(handle));

    let router = app(state, &server);
    info!(
        addr = %server.address,
        max_body_bytes = server.max_body_size,
        timeout_secs = server.request_timeout.as_secs(),
        "starting HTTP server"
    );
    let listener = tokio::net::TcpListener::bind(server.address).await?;
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
            info!("shutting down");
        })
        .await?;
    Ok(())
}
