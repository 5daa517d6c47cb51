use crate::error::BlogsmithCoreError;
use autoagents_llm::LLMProvider;
use autoagents_llm::backends::google::Google;
use autoagents_llm::backends::openai::OpenAI;
use autoagents_llm::builder::LLMBuilder;
use blogsmith_rs_config::{GenerationConfig, LlmProviderKind};
use log::info;
use std::sync::Arc;

/// Build the generation model client described by `config`.
///
/// The API key is read from the environment variable named in the config.
pub fn build_llm_provider(
    config: &GenerationConfig,
) -> Result<Arc<dyn LLMProvider>, BlogsmithCoreError> {
    let key_var = config.api_key_env();
    let api_key = std::env::var(key_var)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| BlogsmithCoreError::Config(format!("{key_var} is not set")))?;

    info!(
        "building LLM provider (provider={:?}, model={})",
        config.provider, config.model
    );
    let llm: Arc<dyn LLMProvider> = match config.provider {
        LlmProviderKind::Google => LLMBuilder::<Google>::new()
            .api_key(api_key)
            .model(config.model.clone())
            .temperature(config.temperature)
            .top_p(config.top_p)
            .top_k(config.top_k)
            .max_tokens(config.max_output_tokens)
            .build()
            .map_err(|err| BlogsmithCoreError::Llm(err.to_string()))?,
        LlmProviderKind::OpenAI => LLMBuilder::<OpenAI>::new()
            .api_key(api_key)
            .model(config.model.clone())
            .temperature(config.temperature)
            .top_p(config.top_p)
            .max_tokens(config.max_output_tokens)
            .build()
            .map_err(|err| BlogsmithCoreError::Llm(err.to_string()))?,
    };
    Ok(llm)
}
