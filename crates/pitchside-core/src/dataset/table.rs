// Read model over the final player table.
//
// Pages only ever read from a `PlayerTable`; nothing mutates it once the
// pipeline has produced it.

use std::collections::HashSet;
use std::io::Write;

use serde::Serialize;

use crate::dataset::record::PlayerRecord;

/// Ordered collection of player records (descending overall rating).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerTable {
    players: Vec<PlayerRecord>,
}

impl PlayerTable {
    pub fn new(players: Vec<PlayerRecord>) -> Self {
        Self { players }
    }

    /// The full table.
    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn into_players(self) -> Vec<PlayerRecord> {
        self.players
    }

    /// Distinct club names in order of first appearance.
    pub fn clubs(&self) -> Vec<String> {
        unique_in_order(self.players.iter().map(|p| p.club.as_str()))
    }

    /// Distinct player names within `club`, in order of first appearance.
    pub fn players_in_club(&self, club: &str) -> Vec<String> {
        unique_in_order(self.club_roster(club).map(|p| p.name.as_str()))
    }

    /// Every row belonging to `club`.
    pub fn club_roster<'a>(&'a self, club: &'a str) -> impl Iterator<Item = &'a PlayerRecord> + 'a {
        self.players.iter().filter(move |p| p.club == club)
    }

    /// First (highest-rated) row with the given name.
    pub fn find(&self, name: &str) -> Option<&PlayerRecord> {
        self.players.iter().find(|p| p.name == name)
    }

    /// Write the table as CSV with a leading index column, source header
    /// names, the derived metric columns and the season deltas, followed by
    /// any pass-through source columns. Undefined values are written as
    /// empty cells.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let extras = self.extra_columns();
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(
            EXPORT_COLUMNS
                .iter()
                .copied()
                .chain(extras.iter().map(String::as_str)),
        )?;
        for (index, player) in self.players.iter().enumerate() {
            let mut row = export_fields(index, player);
            row.extend(
                extras
                    .iter()
                    .map(|c| player.extra.get(c).cloned().unwrap_or_default()),
            );
            wtr.write_record(&row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Pass-through column names across all rows, first appearance first.
    /// Names that clash with an exported column are left out.
    fn extra_columns(&self) -> Vec<String> {
        unique_in_order(
            self.players
                .iter()
                .flat_map(|p| p.extra.keys().map(String::as_str)),
        )
        .into_iter()
        .filter(|c| !EXPORT_COLUMNS.contains(&c.as_str()))
        .collect()
    }
}

fn unique_in_order<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .filter(|n| seen.insert(*n))
        .map(str::to_string)
        .collect()
}

/// Typed export columns, in order.
const EXPORT_COLUMNS: &[&str] = &[
    "",
    "Name",
    "Age",
    "Photo",
    "Nationality",
    "Flag",
    "Overall",
    "Potential",
    "Club",
    "Club Logo",
    "Value(£)",
    "Wage(£)",
    "Special",
    "Preferred Foot",
    "International Reputation",
    "Weak Foot",
    "Skill Moves",
    "Work Rate",
    "Body Type",
    "Real Face",
    "Position",
    "Joined",
    "Loaned From",
    "Contract Valid Until",
    "Height(cm.)",
    "Weight(lbs.)",
    "Release Clause(£)",
    "Kit Number",
    "Weight(Kg.)",
    "Height(m.)",
    "Previous Value(£)",
    "Previous Wage(£)",
    "Previous Release Clause(£)",
];

fn cell<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

/// One exported row, matching `EXPORT_COLUMNS`.
fn export_fields(index: usize, p: &PlayerRecord) -> Vec<String> {
    vec![
        index.to_string(),
        p.name.clone(),
        cell(p.age),
        cell(p.photo.as_deref()),
        cell(p.nationality.as_deref()),
        cell(p.flag.as_deref()),
        p.overall.to_string(),
        cell(p.potential),
        p.club.clone(),
        cell(p.club_logo.as_deref()),
        p.value.to_string(),
        p.wage.to_string(),
        cell(p.special),
        cell(p.preferred_foot.as_deref()),
        cell(p.international_reputation),
        cell(p.weak_foot),
        cell(p.skill_moves),
        cell(p.work_rate.as_deref()),
        cell(p.body_type.as_deref()),
        cell(p.real_face.map(|yes| if yes { "Yes" } else { "No" })),
        cell(p.position.as_deref()),
        cell(p.joined.as_deref()),
        cell(p.loaned_from.as_deref()),
        cell(p.contract_valid_until),
        p.height_cm.to_string(),
        p.weight_lbs.to_string(),
        cell(p.release_clause),
        cell(p.kit_number),
        p.weight_kg.to_string(),
        p.height_m.to_string(),
        cell(p.previous_value),
        cell(p.previous_wage),
        cell(p.previous_release_clause),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::loader::{load_season_from_reader, LoadOptions};

    fn sample() -> PlayerTable {
        let csv_data = "\
,Name,Overall,Value(£),Wage(£),Release Clause(£),Height(cm.),Weight(lbs.),Club
0,Striker9,88,50,5,90,182,170,Blue FC
1,Keeper1,84,30,4,,190,190,Red FC
2,Winger11,86,40,5,70,175,150,Blue FC
3,Striker,70,2,1,3,180,160,Blue FC";
        load_season_from_reader(csv_data.as_bytes(), "t.csv", &LoadOptions::default()).unwrap()
    }

    #[test]
    fn clubs_in_first_appearance_order() {
        assert_eq!(sample().clubs(), vec!["Blue FC", "Red FC"]);
    }

    #[test]
    fn players_in_club_unique_and_ordered() {
        let table = sample();
        assert_eq!(table.players_in_club("Blue FC"), vec!["Striker", "Winger"]);
        assert_eq!(table.players_in_club("Red FC"), vec!["Keeper"]);
        assert!(table.players_in_club("Nobody FC").is_empty());
    }

    #[test]
    fn find_returns_highest_rated() {
        let table = sample();
        assert_eq!(table.find("Striker").map(|p| p.overall), Some(88));
        assert!(table.find("Missing").is_none());
    }

    #[test]
    fn csv_export_has_derived_and_delta_columns() {
        let mut out = Vec::new();
        sample().write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let header = text.lines().next().unwrap();
        assert!(header.starts_with(",Name,Age"));
        assert!(header.contains("Height(m.)"));
        assert!(header.ends_with("Previous Release Clause(£)"));
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn csv_export_reloads() {
        let table = sample();
        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();
        let reloaded =
            load_season_from_reader(out.as_slice(), "export.csv", &LoadOptions::default()).unwrap();
        assert_eq!(reloaded.len(), table.len());
        assert_eq!(reloaded.players()[2].name, "Keeper");
        assert_eq!(reloaded.players()[2].release_clause, None);
    }

    #[test]
    fn csv_export_keeps_extra_columns() {
        let csv_data = "\
,Name,Overall,Value(£),Wage(£),Release Clause(£),Height(cm.),Weight(lbs.),Club,Best Overall Rating
0,Striker9,88,50,5,90,182,170,Blue FC,89
1,Keeper1,84,30,4,,190,190,Red FC,";
        let table =
            load_season_from_reader(csv_data.as_bytes(), "t.csv", &LoadOptions::default()).unwrap();
        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out.clone()).unwrap();
        assert!(text.lines().next().unwrap().ends_with(",Best Overall Rating"));

        let reloaded =
            load_season_from_reader(out.as_slice(), "export.csv", &LoadOptions::default()).unwrap();
        let striker = reloaded.find("Striker").unwrap();
        assert_eq!(striker.extra.get("Best Overall Rating").map(String::as_str), Some("89"));
        let keeper = reloaded.find("Keeper").unwrap();
        assert_eq!(keeper.extra.get("Best Overall Rating").map(String::as_str), Some(""));
        assert!((striker.height_m - 1.82).abs() < 1e-9);
    }

    #[test]
    fn re_export_does_not_duplicate_derived_columns() {
        let mut first = Vec::new();
        sample().write_csv(&mut first).unwrap();
        let reloaded =
            load_season_from_reader(first.as_slice(), "export.csv", &LoadOptions::default()).unwrap();
        // Derived columns come back as pass-through columns on reload.
        assert!(reloaded.players()[0].extra.contains_key("Height(m.)"));

        let mut second = Vec::new();
        reloaded.write_csv(&mut second).unwrap();
        let second = String::from_utf8(second).unwrap();
        let header = second.lines().next().unwrap();
        assert_eq!(header.matches("Height(m.)").count(), 1);
        assert!(header.ends_with("Previous Release Clause(£)"));
    }
}
