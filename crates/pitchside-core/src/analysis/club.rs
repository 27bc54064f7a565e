// Club-level aggregates shown on the teams page.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::analysis::mean;
use crate::dataset::PlayerRecord;

/// Totals and averages over one club's roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClubSummary {
    pub club: String,
    pub club_logo: Option<String>,
    pub total_players: usize,
    pub total_market_value: f64,
    pub weekly_wage_spend: f64,
    /// Mean age rounded to whole years.
    pub average_age: Option<u32>,
    pub overall_average: f64,
    pub average_height_m: f64,
    pub average_weight_kg: f64,
    /// Most frequent contract end year; the earliest year wins a tie.
    pub most_common_contract_end: Option<i32>,
}

impl ClubSummary {
    /// Summarize a roster. Returns `None` for an empty roster.
    pub fn from_roster<'a>(
        club: &str,
        roster: impl IntoIterator<Item = &'a PlayerRecord>,
    ) -> Option<Self> {
        let roster: Vec<&PlayerRecord> = roster.into_iter().collect();
        let first = roster.first()?;

        let mut contract_counts: BTreeMap<i32, usize> = BTreeMap::new();
        for year in roster.iter().filter_map(|p| p.contract_valid_until) {
            *contract_counts.entry(year).or_default() += 1;
        }
        // max_by_key keeps the last maximum; iterate descending so that is the earliest year.
        let most_common_contract_end = contract_counts
            .iter()
            .rev()
            .max_by_key(|(_, count)| **count)
            .map(|(year, _)| *year);

        Some(Self {
            club: club.to_string(),
            club_logo: first.club_logo.clone(),
            total_players: roster.len(),
            total_market_value: roster.iter().map(|p| p.value).sum(),
            weekly_wage_spend: roster.iter().map(|p| p.wage).sum(),
            average_age: mean(roster.iter().filter_map(|p| p.age).map(f64::from))
                .map(|a| a.round_ties_even() as u32),
            overall_average: mean(roster.iter().map(|p| f64::from(p.overall))).unwrap_or(0.0),
            average_height_m: mean(roster.iter().map(|p| p.height_m)).unwrap_or(0.0),
            average_weight_kg: mean(roster.iter().map(|p| p.weight_kg)).unwrap_or(0.0),
            most_common_contract_end,
        })
    }
}
