//! Test helper utilities for emotibot-analysis tests
//!
//! IMPORTANT: These helpers are test-only and should NEVER be used in production code.

// Allow dead code in test utilities - functions are used across different test files
#![allow(dead_code)]

use crate::category::AnalysisCategory;
use crate::error::{AnalysisError, AnalysisOutcome};
use crate::providers::AnalysisProvider;
use crate::registry::ProviderRegistry;
use crate::result::AnalysisResult;
use crate::store::{AnalysisRecord, ResultStore};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use uuid::Uuid;

/// What a [`StubProvider`] answers with
pub enum StubReply {
    /// A result whose summary names the provider
    Success,
    /// A fixed result, returned as-is
    Result(AnalysisResult),
    /// A network failure
    NetworkError,
    /// Raw model output, parsed and normalized like a real provider reply
    Raw(&'static str),
}

/// Hand-written provider fake with call counting and an optional gate
pub struct StubProvider {
    name: &'static str,
    available: bool,
    model: Mutex<String>,
    reply: StubReply,
    gate: Option<Arc<Notify>>,
    started: Arc<Notify>,
    calls: AtomicUsize,
}

impl StubProvider {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            available: true,
            model: Mutex::new(format!("{name}-model")),
            reply: StubReply::Success,
            gate: None,
            started: Arc::new(Notify::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    pub fn with_reply(mut self, reply: StubReply) -> Self {
        self.reply = reply;
        self
    }

    /// Block `analyze` until the returned handle is notified
    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    /// Notified once `analyze` has been entered
    pub fn started(&self) -> Arc<Notify> {
        Arc::clone(&self.started)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisProvider for StubProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn is_available(&self) -> bool {
        self.available
    }

    fn set_model(&self, model: &str) {
        *self.model.lock().unwrap() = model.to_string();
    }

    fn model(&self) -> String {
        self.model.lock().unwrap().clone()
    }

    async fn analyze(
        &self,
        _text: &str,
        category: AnalysisCategory,
    ) -> AnalysisOutcome<AnalysisResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.started.notify_one();
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        match &self.reply {
            StubReply::Success => Ok(result_from(self.name, category)),
            StubReply::Result(result) => Ok(result.clone()),
            StubReply::NetworkError => Err(AnalysisError::transport_error(
                self.name,
                crate::error::TransportFailure::Network,
                "connection refused",
                Some(Box::new(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "connection refused",
                ))),
            )),
            StubReply::Raw(raw) => {
                crate::response_parser::parse_and_normalize(self.name, raw, category)
            }
        }
    }
}

/// Complete result for `category` with every metric at 50
pub fn result_from(provider: &str, category: AnalysisCategory) -> AnalysisResult {
    AnalysisResult {
        metrics: category
            .metric_names()
            .map(|name| (name.to_string(), 50.0))
            .collect(),
        analysis: BTreeMap::new(),
        summary: format!("from {provider}"),
        suggestions: vec!["Keep going".to_string()],
    }
}

/// Registry over the given stubs, the first one active
pub fn registry_of(providers: Vec<Arc<StubProvider>>) -> ProviderRegistry {
    let default = providers[0].name();
    let providers = providers
        .into_iter()
        .map(|p| p as Arc<dyn AnalysisProvider>)
        .collect();
    ProviderRegistry::new(providers, default).expect("stub registry should build")
}

/// Store whose backend rejects every write and read
#[derive(Default)]
pub struct FailingStore {
    saves: AtomicUsize,
}

impl FailingStore {
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResultStore for FailingStore {
    async fn save(&self, _record: AnalysisRecord) -> AnalysisOutcome<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Err(AnalysisError::storage_failed("history backend is offline"))
    }

    async fn get(&self, _id: Uuid) -> AnalysisOutcome<Option<AnalysisRecord>> {
        Err(AnalysisError::storage_failed("history backend is offline"))
    }

    async fn list(
        &self,
        _category: Option<AnalysisCategory>,
    ) -> AnalysisOutcome<Vec<AnalysisRecord>> {
        Err(AnalysisError::storage_failed("history backend is offline"))
    }
}
