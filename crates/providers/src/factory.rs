//! Provider construction from configuration.

use std::sync::Arc;

use padhai_config::AppConfig;
use padhai_core::error::ProviderError;
use padhai_core::provider::Provider;

use crate::openai_compat::OpenAiCompatProvider;

/// Build the shared provider from the `[provider]` section.
///
/// Local endpoints (`ollama`, `vllm`, `llamacpp`) run without a key; every
/// other provider needs `api_key` or one of its environment overrides.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let name = config.provider.name.as_str();
    let api_key = match (&config.api_key, requires_key(name)) {
        (Some(key), _) => key.clone(),
        (None, false) => String::new(),
        (None, true) => {
            return Err(ProviderError::NotConfigured(format!(
                "provider '{name}' needs an API key (set api_key or PADHAI_API_KEY)"
            )));
        }
    };

    let provider = OpenAiCompatProvider::new(name, &config.provider.api_url, api_key)
        .with_timeout(config.provider.timeout_secs);

    tracing::debug!(
        provider = name,
        url = %config.provider.api_url,
        timeout_secs = config.provider.timeout_secs,
        "Built provider"
    );

    Ok(Arc::new(provider))
}

fn requires_key(provider_name: &str) -> bool {
    !matches!(provider_name, "ollama" | "vllm" | "llamacpp" | "llama.cpp")
}
