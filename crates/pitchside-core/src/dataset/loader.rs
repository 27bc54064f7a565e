// Season CSV loading: header validation, value filter, rating sort, name
// normalization and unit derivation.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info};

use crate::dataset::record::{
    find_column, is_typed_column, ColumnNames, RawPlayerRow, CURRENT_REQUIRED,
};
use crate::dataset::table::PlayerTable;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("{path} is missing required column(s): {}", .columns.join(", "))]
    MissingColumns { path: String, columns: Vec<String> },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Row filters applied on top of the mandatory `value > 0` filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LoadOptions {
    /// Drop players whose contract ends before this year. Rows without a
    /// contract year are dropped too when this is set.
    pub min_contract_year: Option<i32>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn digit_runs() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    DIGITS.get_or_init(|| Regex::new(r"\d+").expect("digit pattern is valid"))
}

/// Strip every decimal digit from a player name, then trim surrounding
/// whitespace. Source names carry kit numbers and IDs ("L. Messi10").
/// Superscripts and roman numerals are not decimal digits and stay.
pub fn normalize_name(raw: &str) -> String {
    digit_runs().replace_all(raw, "").trim().to_string()
}

/// Split off the leading row-identifier column. A file whose first header is
/// already a data column (e.g. "Name") has no identifier column and is kept
/// whole.
pub(crate) fn strip_row_id(headers: &csv::StringRecord) -> (bool, csv::StringRecord) {
    match headers.get(0) {
        Some(first) if !is_typed_column(first.trim()) => {
            (true, headers.iter().skip(1).collect())
        }
        _ => (false, headers.clone()),
    }
}

pub(crate) fn drop_first(record: &csv::StringRecord) -> csv::StringRecord {
    record.iter().skip(1).collect()
}

/// Fail with `MissingColumns` listing every required column not present.
pub(crate) fn check_required(
    headers: &csv::StringRecord,
    required: &[ColumnNames],
    source: &str,
) -> Result<(), DataSourceError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|names| find_column(headers, names).is_none())
        .map(|names| names[0].to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(DataSourceError::MissingColumns {
            path: source.to_string(),
            columns: missing,
        })
    }
}

pub(crate) fn csv_reader<R: Read>(rdr: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(false)
        .from_reader(rdr)
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load a season table from any reader. `source` names the input in errors
/// and log lines.
pub fn load_season_from_reader<R: Read>(
    rdr: R,
    source: &str,
    options: &LoadOptions,
) -> Result<PlayerTable, DataSourceError> {
    let csv_err = |e: csv::Error| DataSourceError::Csv {
        path: source.to_string(),
        source: e,
    };

    let mut reader = csv_reader(rdr);
    let raw_headers = reader.headers().map_err(csv_err)?.clone();
    let (has_row_id, headers) = strip_row_id(&raw_headers);
    check_required(&headers, CURRENT_REQUIRED, source)?;

    let extra_columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !h.is_empty() && !is_typed_column(h))
        .map(|(i, h)| (i, h.to_string()))
        .collect();

    let mut total = 0usize;
    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.map_err(csv_err)?;
        let row = if has_row_id { drop_first(&row) } else { row };
        let raw: RawPlayerRow = row.deserialize(Some(&headers)).map_err(csv_err)?;
        total += 1;

        let Some(value) = raw.value.filter(|v| *v > 0.0) else {
            debug!("dropping '{}': no positive value ({:?})", raw.name.trim(), raw.value);
            continue;
        };
        if let Some(min_year) = options.min_contract_year {
            let ends = raw.contract_valid_until.filter(|y| y.is_finite());
            if !ends.is_some_and(|y| y >= f64::from(min_year)) {
                debug!("dropping '{}': contract ends before {}", raw.name.trim(), min_year);
                continue;
            }
        }

        let extra: BTreeMap<String, String> = extra_columns
            .iter()
            .map(|(i, h)| (h.clone(), row.get(*i).unwrap_or_default().to_string()))
            .collect();
        let name = normalize_name(&raw.name);
        records.push(raw.into_record(name, value, extra));
    }

    // Stable: equal ratings keep file order.
    records.sort_by(|a, b| b.overall.cmp(&a.overall));

    info!(
        source,
        rows = total,
        kept = records.len(),
        "loaded season table"
    );
    Ok(PlayerTable::new(records))
}

/// Load a season table from a CSV file.
pub fn load_season(path: &Path, options: &LoadOptions) -> Result<PlayerTable, DataSourceError> {
    let file = std::fs::File::open(path).map_err(|e| DataSourceError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_season_from_reader(file, &path.display().to_string(), options)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = ",Name,Overall,Value(£),Wage(£),Release Clause(£),Height(cm.),Weight(lbs.),Club";

    fn load(body: &str) -> PlayerTable {
        let csv_data = format!("{HEADER}\n{body}");
        load_season_from_reader(csv_data.as_bytes(), "test.csv", &LoadOptions::default())
            .unwrap()
    }

    #[test]
    fn normalize_name_strips_digits_and_trims() {
        assert_eq!(normalize_name("Lionel10"), "Lionel");
        assert_eq!(normalize_name("  K. Mbappé 7 "), "K. Mbappé");
        assert_eq!(normalize_name("20 De Bruyne"), "De Bruyne");
        assert_eq!(normalize_name("123"), "");
    }

    #[test]
    fn normalize_name_keeps_non_decimal_numerals() {
        assert_eq!(normalize_name("Player²"), "Player²");
        assert_eq!(normalize_name("Ⅳ Smith"), "Ⅳ Smith");
        // Other scripts' decimal digits are still kit numbers.
        assert_eq!(normalize_name("Salah١١"), "Salah");
    }

    #[test]
    fn non_positive_values_are_dropped() {
        let table = load(
            "0,Lionel10,90,100,10,200,170,159,Paris\n\
             1,Leo10,95,0,10,200,170,159,Paris\n\
             2,Negative,80,-5,10,200,170,159,Paris",
        );
        assert_eq!(table.len(), 1);
        let p = &table.players()[0];
        assert_eq!(p.name, "Lionel");
        assert_eq!(p.overall, 90);
        assert!((p.value - 100.0).abs() < 1e-9);
        assert_eq!(p.previous_value, None);
    }

    #[test]
    fn blank_value_row_is_dropped() {
        let table = load(
            "0,Lionel10,90,100,10,200,170,159,Paris\n\
             1,Unvalued7,80,,10,200,170,159,Paris",
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table.players()[0].name, "Lionel");
        assert!(table.find("Unvalued").is_none());
    }

    #[test]
    fn sorted_by_overall_descending_and_stable() {
        let table = load(
            "0,A,80,1,1,1,180,150,X\n\
             1,B,90,1,1,1,180,150,X\n\
             2,C,80,1,1,1,180,150,X\n\
             3,D,85,1,1,1,180,150,X",
        );
        let names: Vec<&str> = table.players().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["B", "D", "A", "C"]);
    }

    #[test]
    fn derived_units() {
        let table = load("0,A,80,1,1,1,185,176,X");
        let p = &table.players()[0];
        assert!((p.height_m - 1.85).abs() < 1e-9);
        assert!((p.weight_kg - 176.0 * 0.453592).abs() < 1e-9);
    }

    #[test]
    fn missing_required_columns_reported() {
        let csv_data = ",Name,Overall,Value(£)\n0,A,80,1";
        let err =
            load_season_from_reader(csv_data.as_bytes(), "bad.csv", &LoadOptions::default())
                .unwrap_err();
        match err {
            DataSourceError::MissingColumns { path, columns } => {
                assert_eq!(path, "bad.csv");
                assert!(columns.contains(&"Wage(£)".to_string()));
                assert!(columns.contains(&"Club".to_string()));
                assert!(!columns.contains(&"Name".to_string()));
            }
            other => panic!("expected MissingColumns, got: {other}"),
        }
    }

    #[test]
    fn plain_header_aliases_accepted() {
        let csv_data = "\
id,Name,Overall,Value,Wage,Release Clause,Height(cm),Weight(lbs),Club
7,Someone,70,5,1,,180,160,Club A";
        let table =
            load_season_from_reader(csv_data.as_bytes(), "alias.csv", &LoadOptions::default())
                .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.players()[0].release_clause, None);
    }

    #[test]
    fn file_without_index_column_is_kept_whole() {
        let csv_data = "\
Name,Overall,Value,Wage,Release Clause,Height(cm),Weight(lbs),Club
Someone,70,5,1,9,180,160,Club A";
        let table =
            load_season_from_reader(csv_data.as_bytes(), "noid.csv", &LoadOptions::default())
                .unwrap();
        assert_eq!(table.players()[0].name, "Someone");
    }

    #[test]
    fn malformed_numeric_cell_fails() {
        let csv_data = format!("{HEADER}\n0,A,eighty,1,1,1,180,150,X");
        let err = load_season_from_reader(csv_data.as_bytes(), "t.csv", &LoadOptions::default())
            .unwrap_err();
        assert!(matches!(err, DataSourceError::Csv { .. }));
    }

    #[test]
    fn extra_columns_pass_through() {
        let csv_data = "\
,Name,Overall,Value(£),Wage(£),Release Clause(£),Height(cm.),Weight(lbs.),Club,Best Overall Rating,Age
0,A,80,1,1,1,180,150,X,Gold,23";
        let table =
            load_season_from_reader(csv_data.as_bytes(), "t.csv", &LoadOptions::default())
                .unwrap();
        let p = &table.players()[0];
        assert_eq!(p.extra.get("Best Overall Rating").map(String::as_str), Some("Gold"));
        assert!(!p.extra.contains_key("Age"));
        assert_eq!(p.age, Some(23));
    }

    #[test]
    fn contract_filter_drops_expired_and_unknown() {
        let csv_data = "\
,Name,Overall,Value(£),Wage(£),Release Clause(£),Height(cm.),Weight(lbs.),Club,Contract Valid Until
0,Expired,80,1,1,1,180,150,X,2022.0
1,Current,79,1,1,1,180,150,X,2023
2,Unknown,78,1,1,1,180,150,X,";
        let options = LoadOptions {
            min_contract_year: Some(2023),
        };
        let table = load_season_from_reader(csv_data.as_bytes(), "t.csv", &options).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.players()[0].name, "Current");
        assert_eq!(table.players()[0].contract_valid_until, Some(2023));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_season(
            Path::new("/definitely/not/here.csv"),
            &LoadOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DataSourceError::Io { .. }));
    }
}
