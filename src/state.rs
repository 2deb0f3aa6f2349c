use crate::ai::{AiClient, GeminiClient};
use crate::config::AppConfig;
use crate::storage::{FileStore, KeyValueStore};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn KeyValueStore>,
    pub ai: Arc<dyn AiClient>,
    /// Serializes read-modify-write of the stored profile, plan and log.
    pub writes: Arc<Mutex<()>>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store = Arc::new(FileStore::new(&config.data_dir).await?) as Arc<dyn KeyValueStore>;
        let ai = Arc::new(GeminiClient::new(&config.ai)?) as Arc<dyn AiClient>;

        if config.ai.api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY not set; AI calls need a per-request x-api-key header");
        }

        Ok(Self::from_parts(config, store, ai))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        store: Arc<dyn KeyValueStore>,
        ai: Arc<dyn AiClient>,
    ) -> Self {
        Self {
            config,
            store,
            ai,
            writes: Arc::new(Mutex::new(())),
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::with_ai(crate::ai::fake::FakeAi::default())
    }

    #[cfg(test)]
    pub fn with_ai(ai: impl Into<Arc<crate::ai::fake::FakeAi>>) -> Self {
        use crate::config::AiConfig;
        use crate::storage::MemoryStore;

        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            data_dir: "unused".into(),
            upload_limit_mb: 1,
            ai: AiConfig {
                api_key: Some("test".into()),
                model: "fake".into(),
                base_url: "http://fake.local".into(),
                timeout_secs: 1,
            },
        });
        let ai: Arc<crate::ai::fake::FakeAi> = ai.into();
        Self::from_parts(config, Arc::new(MemoryStore::new()), ai)
    }
}
