// Player record types and the raw CSV row they are parsed from.
//
// The source export uses decorated headers ("Value(£)", "Height(cm.)"); the
// plain forms ("Value", "Height(cm)") are accepted as aliases everywhere a
// column is looked up.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Accepted header spellings for one logical column. The first entry is the
/// canonical name used on export.
pub type ColumnNames = &'static [&'static str];

pub const COL_NAME: ColumnNames = &["Name"];
pub const COL_OVERALL: ColumnNames = &["Overall"];
pub const COL_CLUB: ColumnNames = &["Club"];
pub const COL_VALUE: ColumnNames = &["Value(£)", "Value"];
pub const COL_WAGE: ColumnNames = &["Wage(£)", "Wage"];
pub const COL_RELEASE_CLAUSE: ColumnNames = &["Release Clause(£)", "Release Clause"];
pub const COL_HEIGHT_CM: ColumnNames = &["Height(cm.)", "Height(cm)"];
pub const COL_WEIGHT_LBS: ColumnNames = &["Weight(lbs.)", "Weight(lbs)"];

/// Columns a current-season file must carry.
pub const CURRENT_REQUIRED: &[ColumnNames] = &[
    COL_NAME,
    COL_OVERALL,
    COL_VALUE,
    COL_WAGE,
    COL_RELEASE_CLAUSE,
    COL_HEIGHT_CM,
    COL_WEIGHT_LBS,
    COL_CLUB,
];

/// Columns a prior-season file must carry.
pub const PRIOR_REQUIRED: &[ColumnNames] = &[COL_NAME, COL_VALUE, COL_WAGE, COL_RELEASE_CLAUSE];

/// Descriptive columns parsed into typed fields. Anything not listed here or
/// in `CURRENT_REQUIRED` lands in `PlayerRecord::extra`.
const DESCRIPTIVE: &[ColumnNames] = &[
    &["Age"],
    &["Photo"],
    &["Nationality"],
    &["Flag"],
    &["Potential"],
    &["Club Logo"],
    &["Special"],
    &["Preferred Foot"],
    &["International Reputation"],
    &["Weak Foot"],
    &["Skill Moves"],
    &["Work Rate"],
    &["Body Type"],
    &["Real Face"],
    &["Position"],
    &["Joined"],
    &["Loaned From"],
    &["Contract Valid Until"],
    &["Kit Number"],
];

/// Returns true if `header` is consumed by a typed field.
pub(crate) fn is_typed_column(header: &str) -> bool {
    CURRENT_REQUIRED
        .iter()
        .chain(DESCRIPTIVE.iter())
        .any(|names| names.contains(&header))
}

/// Position of the first header matching any of `names`.
pub(crate) fn find_column(headers: &csv::StringRecord, names: ColumnNames) -> Option<usize> {
    headers.iter().position(|h| names.contains(&h.trim()))
}

// ---------------------------------------------------------------------------
// Public record
// ---------------------------------------------------------------------------

/// One player row of the dashboard table.
///
/// `height_m` and `weight_kg` are derived from the source units when the row
/// is loaded. The `previous_*` fields hold the season-over-season change of
/// each monetary amount; `None` means the player had no prior-season match,
/// which is not the same as a change of zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRecord {
    pub name: String,
    pub club: String,
    pub overall: u32,
    pub potential: Option<u32>,
    pub age: Option<u32>,
    pub position: Option<String>,
    pub nationality: Option<String>,

    pub height_cm: f64,
    pub height_m: f64,
    pub weight_lbs: f64,
    pub weight_kg: f64,

    pub value: f64,
    pub wage: f64,
    pub release_clause: Option<f64>,
    pub previous_value: Option<f64>,
    pub previous_wage: Option<f64>,
    pub previous_release_clause: Option<f64>,

    pub photo: Option<String>,
    pub flag: Option<String>,
    pub club_logo: Option<String>,
    pub special: Option<u32>,
    pub preferred_foot: Option<String>,
    pub international_reputation: Option<u32>,
    pub weak_foot: Option<u32>,
    pub skill_moves: Option<u32>,
    pub work_rate: Option<String>,
    pub body_type: Option<String>,
    pub real_face: Option<bool>,
    pub joined: Option<String>,
    pub loaned_from: Option<String>,
    pub contract_valid_until: Option<i32>,
    pub kit_number: Option<u32>,

    /// Source columns without a typed field, passed through verbatim.
    pub extra: BTreeMap<String, String>,
}

/// Pounds to kilograms.
pub const LBS_TO_KG: f64 = 0.453592;

impl PlayerRecord {
    /// `Joined` parsed as a calendar date, if it is in one of the formats the
    /// exports have used.
    pub fn joined_date(&self) -> Option<NaiveDate> {
        self.joined.as_deref().and_then(parse_joined)
    }
}

fn parse_joined(raw: &str) -> Option<NaiveDate> {
    const FORMATS: &[&str] = &["%b %d, %Y", "%Y-%m-%d", "%d/%m/%Y", "%B %d, %Y"];
    let raw = raw.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

// ---------------------------------------------------------------------------
// Raw CSV row (crate-private)
// ---------------------------------------------------------------------------

/// Current-season CSV row. Numeric columns are read as f64 because the
/// cleaned exports write integers with a trailing ".0" wherever the column
/// had gaps.
#[derive(Debug, Deserialize)]
pub(crate) struct RawPlayerRow {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Club", default)]
    pub club: Option<String>,
    #[serde(rename = "Overall")]
    pub overall: f64,
    #[serde(rename = "Value(£)", alias = "Value", default)]
    pub value: Option<f64>,
    #[serde(rename = "Wage(£)", alias = "Wage")]
    pub wage: f64,
    #[serde(rename = "Release Clause(£)", alias = "Release Clause", default)]
    pub release_clause: Option<f64>,
    #[serde(rename = "Height(cm.)", alias = "Height(cm)")]
    pub height_cm: f64,
    #[serde(rename = "Weight(lbs.)", alias = "Weight(lbs)")]
    pub weight_lbs: f64,

    #[serde(rename = "Age", default)]
    pub age: Option<f64>,
    #[serde(rename = "Photo", default)]
    pub photo: Option<String>,
    #[serde(rename = "Nationality", default)]
    pub nationality: Option<String>,
    #[serde(rename = "Flag", default)]
    pub flag: Option<String>,
    #[serde(rename = "Potential", default)]
    pub potential: Option<f64>,
    #[serde(rename = "Club Logo", default)]
    pub club_logo: Option<String>,
    #[serde(rename = "Special", default)]
    pub special: Option<f64>,
    #[serde(rename = "Preferred Foot", default)]
    pub preferred_foot: Option<String>,
    #[serde(rename = "International Reputation", default)]
    pub international_reputation: Option<f64>,
    #[serde(rename = "Weak Foot", default)]
    pub weak_foot: Option<f64>,
    #[serde(rename = "Skill Moves", default)]
    pub skill_moves: Option<f64>,
    #[serde(rename = "Work Rate", default)]
    pub work_rate: Option<String>,
    #[serde(rename = "Body Type", default)]
    pub body_type: Option<String>,
    #[serde(rename = "Real Face", default)]
    pub real_face: Option<String>,
    #[serde(rename = "Position", default)]
    pub position: Option<String>,
    #[serde(rename = "Joined", default)]
    pub joined: Option<String>,
    #[serde(rename = "Loaned From", default)]
    pub loaned_from: Option<String>,
    #[serde(rename = "Contract Valid Until", default)]
    pub contract_valid_until: Option<f64>,
    #[serde(rename = "Kit Number", default)]
    pub kit_number: Option<f64>,
}

/// Prior-season CSV row: only the join key and the monetary columns.
#[derive(Debug, Deserialize)]
pub(crate) struct RawPriorRow {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Value(£)", alias = "Value", default)]
    pub value: Option<f64>,
    #[serde(rename = "Wage(£)", alias = "Wage", default)]
    pub wage: Option<f64>,
    #[serde(rename = "Release Clause(£)", alias = "Release Clause", default)]
    pub release_clause: Option<f64>,
}

fn whole(v: Option<f64>) -> Option<u32> {
    v.filter(|x| x.is_finite() && *x >= 0.0).map(|x| x.round() as u32)
}

fn text(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn yes_no(v: Option<String>) -> Option<bool> {
    match v?.trim().to_ascii_lowercase().as_str() {
        "yes" | "true" | "1" => Some(true),
        "no" | "false" | "0" => Some(false),
        _ => None,
    }
}

impl RawPlayerRow {
    /// Build the public record. `name` is the already-normalized name and
    /// `value` the checked market value; derived fields are computed here
    /// and nowhere else.
    pub(crate) fn into_record(
        self,
        name: String,
        value: f64,
        extra: BTreeMap<String, String>,
    ) -> PlayerRecord {
        PlayerRecord {
            name,
            club: self.club.map(|c| c.trim().to_string()).unwrap_or_default(),
            overall: self.overall.round().max(0.0) as u32,
            potential: whole(self.potential),
            age: whole(self.age),
            position: text(self.position),
            nationality: text(self.nationality),

            height_cm: self.height_cm,
            height_m: self.height_cm / 100.0,
            weight_lbs: self.weight_lbs,
            weight_kg: self.weight_lbs * LBS_TO_KG,

            value,
            wage: self.wage,
            release_clause: self.release_clause.filter(|v| v.is_finite()),
            previous_value: None,
            previous_wage: None,
            previous_release_clause: None,

            photo: text(self.photo),
            flag: text(self.flag),
            club_logo: text(self.club_logo),
            special: whole(self.special),
            preferred_foot: text(self.preferred_foot),
            international_reputation: whole(self.international_reputation),
            weak_foot: whole(self.weak_foot),
            skill_moves: whole(self.skill_moves),
            work_rate: text(self.work_rate),
            body_type: text(self.body_type),
            real_face: yes_no(self.real_face),
            joined: text(self.joined),
            loaned_from: text(self.loaned_from),
            contract_valid_until: self
                .contract_valid_until
                .filter(|v| v.is_finite())
                .map(|v| v.round() as i32),
            kit_number: whole(self.kit_number),

            extra,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
