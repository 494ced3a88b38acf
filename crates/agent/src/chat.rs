//! One round trip to the model, and the dependencies every agent shares.

use std::sync::Arc;

use padhai_config::AppConfig;
use padhai_core::message::Message;
use padhai_core::provider::{Provider, ProviderRequest};
use padhai_core::store::ProfileStore;
use tracing::debug;

use crate::locks::ProfileLocks;

/// A provider bound to a model and sampling settings.
#[derive(Clone)]
pub struct ChatModel {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl ChatModel {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
        }
    }

    pub fn from_config(provider: Arc<dyn Provider>, config: &AppConfig) -> Self {
        Self::new(provider, &config.default_model)
            .with_temperature(config.default_temperature)
            .with_max_tokens(config.default_max_tokens)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Send `system`, then the replayed `history`, then `prompt` as the user
    /// turn. Returns the completion text.
    pub async fn ask(
        &self,
        system: &str,
        prompt: &str,
        history: &[Message],
    ) -> padhai_core::Result<String> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(system));
        messages.extend(history.iter().cloned());
        messages.push(Message::user(prompt));

        let request = ProviderRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(
            provider = self.provider.name(),
            model = %self.model,
            replayed = history.len(),
            prompt_chars = prompt.len(),
            "Asking model"
        );

        let response = self.provider.complete(request).await?;
        Ok(response.message.content)
    }
}

/// Injected into every agent: the model, the profile store, and the
/// per-profile write locks.
#[derive(Clone)]
pub struct AgentDeps {
    pub chat: ChatModel,
    pub store: Arc<dyn ProfileStore>,
    pub locks: ProfileLocks,
}

impl AgentDeps {
    pub fn new(chat: ChatModel, store: Arc<dyn ProfileStore>) -> Self {
        Self {
            chat,
            store,
            locks: ProfileLocks::new(),
        }
    }
}
