//! Analysis sessions: each holds an immutable view of a loaded source table
//! and the category universe captured when it was opened.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use insights_core::{CategoryUniverse, InsightsError, InsightsResult, RecordTable, ViewsConfig};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::filter::FilterSelection;
use crate::pipeline::{DashboardReport, InsightsPipeline};

pub struct AnalysisSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    source: Arc<RecordTable>,
    universe: CategoryUniverse,
}

impl AnalysisSession {
    pub fn new(source: Arc<RecordTable>) -> Self {
        let universe = CategoryUniverse::snapshot(source.as_ref());
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            source,
            universe,
        }
    }

    pub fn source(&self) -> &RecordTable {
        &self.source
    }

    pub fn universe(&self) -> &CategoryUniverse {
        &self.universe
    }

    /// Every value observed at load time, on every dimension.
    pub fn default_selection(&self) -> FilterSelection {
        FilterSelection::all(&self.universe)
    }

    pub fn run(&self, pipeline: &InsightsPipeline, selection: &FilterSelection) -> DashboardReport {
        let mut report = pipeline.run(&self.source, &self.universe, selection);
        report.session_id = Some(self.id);
        report
    }
}

/// Open sessions keyed by id. Sessions may share one source table; none of
/// them can change it.
pub struct SessionRegistry {
    sessions: DashMap<Uuid, AnalysisSession>,
    pipeline: InsightsPipeline,
}

impl SessionRegistry {
    pub fn new(views: ViewsConfig) -> Self {
        Self {
            sessions: DashMap::new(),
            pipeline: InsightsPipeline::new(views),
        }
    }

    pub fn open(&self, source: Arc<RecordTable>) -> Uuid {
        let session = AnalysisSession::new(source);
        let id = session.id;
        info!(session_id = %id, rows = session.source().len(), "Analysis session opened");
        self.sessions.insert(id, session);
        id
    }

    pub fn default_selection(&self, id: &Uuid) -> InsightsResult<FilterSelection> {
        self.sessions
            .get(id)
            .map(|s| s.default_selection())
            .ok_or(InsightsError::UnknownSession(*id))
    }

    pub fn universe(&self, id: &Uuid) -> InsightsResult<CategoryUniverse> {
        self.sessions
            .get(id)
            .map(|s| s.universe().clone())
            .ok_or(InsightsError::UnknownSession(*id))
    }

    pub fn run(&self, id: &Uuid, selection: &FilterSelection) -> InsightsResult<DashboardReport> {
        let session = self
            .sessions
            .get(id)
            .ok_or(InsightsError::UnknownSession(*id))?;
        Ok(session.run(&self.pipeline, selection))
    }

    pub fn close(&self, id: &Uuid) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(ViewsConfig::default())
    }
}
