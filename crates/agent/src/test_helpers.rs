//! Shared test helpers for agent tests.

use async_trait::async_trait;
use padhai_core::error::{ProviderError, StoreError};
use padhai_core::message::Message;
use padhai_core::profile::{Interaction, StudentId, StudentIdentity, StudentProfile, SummaryField};
use padhai_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use padhai_core::store::ProfileStore;
use padhai_store::InMemoryStore;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::chat::{AgentDeps, ChatModel};

/// A mock provider that returns a sequence of scripted responses and
/// records every request it receives.
///
/// Calls beyond the script fail with an `ApiError` so tests can assert
/// that no extra model call happened.
pub struct SequentialMockProvider {
    responses: Vec<ProviderResponse>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl SequentialMockProvider {
    pub fn new(responses: Vec<ProviderResponse>) -> Self {
        Self {
            responses,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| make_text_response(t)).collect())
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn request(&self, index: usize) -> ProviderRequest {
        self.requests.lock().unwrap()[index].clone()
    }

    /// The last user-turn text of request `index`.
    pub fn prompt(&self, index: usize) -> String {
        let req = self.request(index);
        req.messages.last().map(|m| m.content.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let index = requests.len();
        requests.push(request);
        self.responses
            .get(index)
            .cloned()
            .ok_or_else(|| ProviderError::ApiError {
                status_code: 500,
                message: format!(
                    "SequentialMockProvider: no more responses (call #{index}, have {})",
                    self.responses.len()
                ),
            })
    }
}

/// Create a simple text response.
pub fn make_text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock-model".into(),
    }
}

/// Wraps a store and counts writes.
pub struct CountingStore {
    inner: InMemoryStore,
    pub summary_writes: AtomicUsize,
    pub appends: AtomicUsize,
    /// When set, summary writes match no row, as if the profile vanished.
    miss_summary_writes: AtomicBool,
}

impl CountingStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryStore::new(),
            summary_writes: AtomicUsize::new(0),
            appends: AtomicUsize::new(0),
            miss_summary_writes: AtomicBool::new(false),
        }
    }

    pub fn summary_writes(&self) -> usize {
        self.summary_writes.load(Ordering::SeqCst)
    }

    pub fn appends(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }

    pub fn miss_summary_writes(&self) {
        self.miss_summary_writes.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProfileStore for CountingStore {
    fn name(&self) -> &str {
        "counting"
    }

    async fn insert(&self, profile: StudentProfile) -> Result<StudentId, StoreError> {
        self.inner.insert(profile).await
    }

    async fn get(&self, id: &StudentId) -> Result<Option<StudentProfile>, StoreError> {
        self.inner.get(id).await
    }

    async fn set_summary(
        &self,
        id: &StudentId,
        field: SummaryField,
        text: &str,
    ) -> Result<bool, StoreError> {
        self.summary_writes.fetch_add(1, Ordering::SeqCst);
        if self.miss_summary_writes.load(Ordering::SeqCst) {
            return Ok(false);
        }
        self.inner.set_summary(id, field, text).await
    }

    async fn append_interaction(
        &self,
        id: &StudentId,
        interaction: Interaction,
    ) -> Result<bool, StoreError> {
        self.appends.fetch_add(1, Ordering::SeqCst);
        self.inner.append_interaction(id, interaction).await
    }

    async fn count(&self) -> Result<usize, StoreError> {
        self.inner.count().await
    }
}

pub struct Fixture {
    pub deps: AgentDeps,
    pub provider: Arc<SequentialMockProvider>,
    pub store: Arc<CountingStore>,
}

/// Deps wired to a scripted provider and a counting in-memory store.
pub fn fixture(responses: &[&str]) -> Fixture {
    let provider = Arc::new(SequentialMockProvider::texts(responses));
    let store = Arc::new(CountingStore::new());
    let deps = AgentDeps::new(ChatModel::new(provider.clone(), "mock-model"), store.clone());
    Fixture {
        deps,
        provider,
        store,
    }
}

pub fn identity() -> StudentIdentity {
    StudentIdentity {
        name: "Riya".into(),
        standard: "8th".into(),
        subject: "Science".into(),
        like_study: "hands-on experiments".into(),
    }
}

/// Insert a profile directly, bypassing the model. Does not count as a write.
pub async fn seed_profile(store: &CountingStore, basic_summary: &str) -> StudentId {
    store
        .inner
        .insert(StudentProfile::new(identity(), basic_summary))
        .await
        .unwrap()
}
