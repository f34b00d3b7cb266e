//! Result persistence seam
//!
//! The analysis core never persists anything itself. Callers that keep a
//! history implement [`ResultStore`] over their backend of choice and hand it
//! to [`crate::TextAnalyzer::analyze_and_record`].

use crate::category::AnalysisCategory;
use crate::error::AnalysisOutcome;
use crate::logging::log_debug;
use crate::result::AnalysisResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

/// One analysed text with its result, as stored in history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub text: String,
    pub category: AnalysisCategory,
    /// Provider that produced `result`
    pub provider: String,
    pub result: AnalysisResult,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRecord {
    pub fn new(
        text: impl Into<String>,
        category: AnalysisCategory,
        provider: impl Into<String>,
        result: AnalysisResult,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            category,
            provider: provider.into(),
            result,
            created_at: Utc::now(),
        }
    }
}

/// Storage for analysis history
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Persist a record
    async fn save(&self, record: AnalysisRecord) -> AnalysisOutcome<()>;

    /// Record by id
    async fn get(&self, id: Uuid) -> AnalysisOutcome<Option<AnalysisRecord>>;

    /// Records newest first, optionally restricted to one category
    async fn list(&self, category: Option<AnalysisCategory>)
        -> AnalysisOutcome<Vec<AnalysisRecord>>;
}

/// Process-local store, for tests and demos
#[derive(Debug, Default)]
pub struct InMemoryResultStore {
    records: RwLock<Vec<AnalysisRecord>>,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ResultStore for InMemoryResultStore {
    async fn save(&self, record: AnalysisRecord) -> AnalysisOutcome<()> {
        log_debug!(
            record_id = %record.id,
            category = %record.category,
            provider = %record.provider,
            "Storing analysis record"
        );
        self.records.write().await.push(record);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> AnalysisOutcome<Option<AnalysisRecord>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn list(
        &self,
        category: Option<AnalysisCategory>,
    ) -> AnalysisOutcome<Vec<AnalysisRecord>> {
        let mut records: Vec<AnalysisRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|r| category.map_or(true, |c| r.category == c))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}
