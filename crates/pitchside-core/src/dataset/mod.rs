// Player dataset: CSV loading, cross-season enrichment, caching.

pub mod cache;
pub mod enrich;
pub mod loader;
pub mod record;
pub mod table;

pub use cache::DatasetCache;
pub use enrich::{build_dashboard_table, enrich, load_prior_season, PriorSeason};
pub use loader::{load_season, normalize_name, DataSourceError, LoadOptions};
pub use record::PlayerRecord;
pub use table::PlayerTable;
