// Cross-season enrichment: join the current table against the prior season
// by normalized name, compute monetary deltas, then drop duplicate names.

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::dataset::loader::{
    check_required, csv_reader, drop_first, load_season, normalize_name, strip_row_id,
    DataSourceError, LoadOptions,
};
use crate::dataset::record::{RawPriorRow, PRIOR_REQUIRED};
use crate::dataset::table::PlayerTable;

/// Prior-season monetary amounts for one player.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriorAmounts {
    pub value: Option<f64>,
    pub wage: Option<f64>,
    pub release_clause: Option<f64>,
}

/// Prior-season amounts keyed by normalized name. When a name repeats, the
/// first occurrence in file order is the one joined.
#[derive(Debug, Clone, Default)]
pub struct PriorSeason {
    by_name: HashMap<String, PriorAmounts>,
}

impl PriorSeason {
    pub fn get(&self, name: &str) -> Option<&PriorAmounts> {
        self.by_name.get(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    fn insert_first(&mut self, name: String, amounts: PriorAmounts) {
        self.by_name.entry(name).or_insert(amounts);
    }
}

fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

/// Read the prior season from any reader. Only `Name` and the three monetary
/// columns are used; rows are neither filtered nor sorted.
pub fn load_prior_season_from_reader<R: Read>(
    rdr: R,
    source: &str,
) -> Result<PriorSeason, DataSourceError> {
    let csv_err = |e: csv::Error| DataSourceError::Csv {
        path: source.to_string(),
        source: e,
    };

    let mut reader = csv_reader(rdr);
    let raw_headers = reader.headers().map_err(csv_err)?.clone();
    let (has_row_id, headers) = strip_row_id(&raw_headers);
    check_required(&headers, PRIOR_REQUIRED, source)?;

    let mut prior = PriorSeason::default();
    let mut rows = 0usize;
    for result in reader.records() {
        let row = result.map_err(csv_err)?;
        let row = if has_row_id { drop_first(&row) } else { row };
        let raw: RawPriorRow = row.deserialize(Some(&headers)).map_err(csv_err)?;
        rows += 1;
        prior.insert_first(
            normalize_name(&raw.name),
            PriorAmounts {
                value: finite(raw.value),
                wage: finite(raw.wage),
                release_clause: finite(raw.release_clause),
            },
        );
    }

    info!(source, rows, players = prior.len(), "loaded prior season");
    Ok(prior)
}

/// Read the prior season from a CSV file.
pub fn load_prior_season(path: &Path) -> Result<PriorSeason, DataSourceError> {
    let file = std::fs::File::open(path).map_err(|e| DataSourceError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_prior_season_from_reader(file, &path.display().to_string())
}

fn delta(current: Option<f64>, prior: Option<f64>) -> Option<f64> {
    Some(current? - prior?)
}

/// Fill the season deltas of every current row, then keep only the first
/// row per name. The table is already in descending-overall order, so the
/// highest-rated instance of a repeated name survives.
///
/// A player missing from the prior season is expected (new entries) and
/// simply keeps undefined deltas.
pub fn enrich(current: PlayerTable, prior: &PriorSeason) -> PlayerTable {
    let mut matched = 0usize;
    let mut players = current.into_players();

    for player in &mut players {
        match prior.get(&player.name) {
            Some(before) => {
                matched += 1;
                player.previous_value = delta(Some(player.value), before.value);
                player.previous_wage = delta(Some(player.wage), before.wage);
                player.previous_release_clause =
                    delta(player.release_clause, before.release_clause);
            }
            None => {
                debug!("no prior-season entry for '{}'", player.name);
                player.previous_value = None;
                player.previous_wage = None;
                player.previous_release_clause = None;
            }
        }
    }

    let before_dedup = players.len();
    let mut seen = HashSet::new();
    players.retain(|p| seen.insert(p.name.clone()));

    info!(
        matched,
        unmatched = before_dedup - matched,
        duplicates_removed = before_dedup - players.len(),
        "enriched player table"
    );
    PlayerTable::new(players)
}

/// The full pipeline: load the current season, join the prior season, and
/// de-duplicate.
pub fn build_dashboard_table(
    current_path: &Path,
    prior_path: &Path,
    options: &LoadOptions,
) -> Result<PlayerTable, DataSourceError> {
    let current = load_season(current_path, options)?;
    let prior = load_prior_season(prior_path)?;
    Ok(enrich(current, &prior))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
