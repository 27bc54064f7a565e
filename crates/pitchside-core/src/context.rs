// Dashboard context shared by every page, and the session that holds it.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::dataset::{DataSourceError, DatasetCache, PlayerTable};
use crate::photo::PhotoResolver;

/// Message shown instead of a page when the dashboard was never initialized.
pub const LOOKUP_MISS_GUIDANCE: &str =
    "Please open the home page first, then come back to this page.";

/// A page asked for the dashboard table before the home page loaded it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("dashboard data is not loaded; open the home page first")]
pub struct LookupMiss;

/// Everything a page reads: the final player table, its club list and the
/// photo resolver. Built once and passed by reference.
#[derive(Debug, Clone)]
pub struct DashboardContext {
    table: Arc<PlayerTable>,
    clubs: Vec<String>,
    photos: PhotoResolver,
}

impl DashboardContext {
    /// Run (or reuse) the dataset pipeline for the configured files.
    pub fn build(config: &Config, cache: &DatasetCache) -> Result<Self, DataSourceError> {
        let table = cache.dashboard(&config.current_season_path(), &config.prior_season_path())?;
        Ok(Self::from_table(table, config.photo_resolver()))
    }

    pub fn from_table(table: Arc<PlayerTable>, photos: PhotoResolver) -> Self {
        let clubs = table.clubs();
        info!(
            players = table.len(),
            clubs = clubs.len(),
            "dashboard context ready"
        );
        Self {
            table,
            clubs,
            photos,
        }
    }

    pub fn table(&self) -> &PlayerTable {
        &self.table
    }

    pub fn shared_table(&self) -> Arc<PlayerTable> {
        Arc::clone(&self.table)
    }

    /// Unique club names, in table order.
    pub fn clubs(&self) -> &[String] {
        &self.clubs
    }

    pub fn photos(&self) -> &PhotoResolver {
        &self.photos
    }
}

/// Per-user session. Only the home page initializes it; the other pages
/// read through `context()`.
#[derive(Debug, Default)]
pub struct Session {
    context: Option<DashboardContext>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initialize(&mut self, context: DashboardContext) -> &DashboardContext {
        self.context.insert(context)
    }

    pub fn is_initialized(&self) -> bool {
        self.context.is_some()
    }

    pub fn context(&self) -> Result<&DashboardContext, LookupMiss> {
        self.context.as_ref().ok_or(LookupMiss)
    }
}
