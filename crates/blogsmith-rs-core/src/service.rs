//! Service object wiring config, collaborators, and per-user stores.

use crate::error::BlogsmithCoreError;
use crate::gateway::GenerationGateway;
use crate::history_store::HistoryStore;
use crate::llm::build_llm_provider;
use autoagents_llm::LLMProvider;
use blogsmith_rs_config::{BlogsmithConfig, HistoryProviderKind};
use blogsmith_rs_history::{FileHistoryProvider, HistoryProvider, InMemoryHistoryProvider};
use blogsmith_rs_protocol::UserIdentity;
use log::info;
use std::sync::Arc;

/// Application service holding the collaborators created at startup.
///
/// Collaborators are built once and shared by every history store and
/// generation call made through this value. A service opened with
/// [`Blogsmith::connect_history`] has no generation model.
#[derive(Clone)]
pub struct Blogsmith {
    config: BlogsmithConfig,
    history: Arc<dyn HistoryProvider>,
    gateway: Option<GenerationGateway>,
}

impl Blogsmith {
    pub fn new(
        config: BlogsmithConfig,
        history: Arc<dyn HistoryProvider>,
        llm: Arc<dyn LLMProvider>,
    ) -> Self {
        let gateway = GenerationGateway::new(llm)
            .with_instructions(config.generation.system_prompt.clone());
        Self {
            config,
            history,
            gateway: Some(gateway),
        }
    }

    /// Service limited to history; `gateway` returns an error.
    pub fn history_only(config: BlogsmithConfig, history: Arc<dyn HistoryProvider>) -> Self {
        Self {
            config,
            history,
            gateway: None,
        }
    }

    /// Build both collaborators from `config`.
    pub fn connect(config: BlogsmithConfig) -> Result<Self, BlogsmithCoreError> {
        let history = build_history_provider(&config)?;
        let llm = build_llm_provider(&config.generation)?;
        Ok(Self::new(config, history, llm))
    }

    /// Build only the history provider, so no API key is needed.
    pub fn connect_history(config: BlogsmithConfig) -> Result<Self, BlogsmithCoreError> {
        let history = build_history_provider(&config)?;
        Ok(Self::history_only(config, history))
    }

    pub fn config(&self) -> &BlogsmithConfig {
        &self.config
    }

    pub fn gateway(&self) -> Result<&GenerationGateway, BlogsmithCoreError> {
        self.gateway.as_ref().ok_or_else(|| {
            BlogsmithCoreError::Config("generation model is not configured".to_string())
        })
    }

    pub fn history_provider(&self) -> Arc<dyn HistoryProvider> {
        self.history.clone()
    }

    /// Fresh history store bound to `user`. Call `load` before reading it.
    pub fn history_store(&self, user: UserIdentity) -> HistoryStore {
        HistoryStore::new(self.history.clone(), user)
    }
}

/// Create the history provider selected in `config`.
pub fn build_history_provider(
    config: &BlogsmithConfig,
) -> Result<Arc<dyn HistoryProvider>, BlogsmithCoreError> {
    match config.history.provider {
        HistoryProviderKind::File => {
            let root = config.history_root().ok_or_else(|| {
                BlogsmithCoreError::Config("unable to resolve history directory".to_string())
            })?;
            info!("using file history provider (root={})", root.display());
            Ok(Arc::new(FileHistoryProvider::new(root)?))
        }
        HistoryProviderKind::Memory => {
            info!("using in-memory history provider");
            Ok(Arc::new(InMemoryHistoryProvider::new()))
        }
    }
}
