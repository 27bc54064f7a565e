// Single-player profile: details block, rating charts and value metrics.

use chrono::NaiveDate;
use serde::Serialize;

use crate::dataset::PlayerRecord;
use crate::format::{format_currency, format_thousands};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Descriptive attributes shown in the player's details table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerDetails {
    pub age: Option<u32>,
    pub real_face: Option<bool>,
    pub joined: Option<NaiveDate>,
    pub contract_valid_until: Option<i32>,
    pub loaned_from: Option<String>,
    pub position: Option<String>,
    pub preferred_foot: Option<String>,
    pub special: Option<u32>,
    pub work_rate: Option<String>,
    pub body_type: Option<String>,
    pub height_m: f64,
    /// Rounded to whole kilograms.
    pub weight_kg: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: &'static str,
    pub value: Option<u32>,
}

/// A bar chart with a fixed value axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: &'static str,
    pub min: u32,
    pub max: u32,
    pub bars: Vec<Bar>,
}

/// One monetary metric with its season-over-season change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueMetric {
    pub label: &'static str,
    pub help: &'static str,
    pub value: Option<f64>,
    /// Raw delta from the enriched table.
    pub delta: Option<f64>,
}

impl ValueMetric {
    /// Delta worth displaying. Hidden when undefined or zero, and when it
    /// equals the current amount (the prior amount was zero).
    pub fn display_delta(&self) -> Option<f64> {
        let delta = self.delta.filter(|d| d.is_finite() && *d != 0.0)?;
        match self.value {
            Some(v) if v == delta => None,
            _ => Some(delta),
        }
    }

    pub fn formatted_value(&self) -> String {
        match self.value {
            Some(v) => format_currency(v),
            None => "-".to_string(),
        }
    }

    pub fn formatted_delta(&self) -> Option<String> {
        self.display_delta().map(format_thousands)
    }
}

/// Everything the players page shows for one player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerProfile {
    pub name: String,
    pub club: String,
    pub club_logo: Option<String>,
    pub nationality: Option<String>,
    pub flag: Option<String>,
    pub photo: Option<String>,
    pub details: PlayerDetails,
    pub features: BarChart,
    pub ratings: BarChart,
    pub metrics: Vec<ValueMetric>,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl PlayerProfile {
    pub fn from_record(p: &PlayerRecord) -> Self {
        Self {
            name: p.name.clone(),
            club: p.club.clone(),
            club_logo: p.club_logo.clone(),
            nationality: p.nationality.clone(),
            flag: p.flag.clone(),
            photo: p.photo.clone(),
            details: PlayerDetails {
                age: p.age,
                real_face: p.real_face,
                joined: p.joined_date(),
                contract_valid_until: p.contract_valid_until,
                loaned_from: p.loaned_from.clone(),
                position: p.position.clone(),
                preferred_foot: p.preferred_foot.clone(),
                special: p.special,
                work_rate: p.work_rate.clone(),
                body_type: p.body_type.clone(),
                height_m: p.height_m,
                weight_kg: p.weight_kg.round_ties_even().max(0.0) as u32,
            },
            features: BarChart {
                title: "Player Features",
                min: 1,
                max: 5,
                bars: vec![
                    Bar {
                        label: "International Reputation",
                        value: p.international_reputation,
                    },
                    Bar {
                        label: "Weak Foot",
                        value: p.weak_foot,
                    },
                    Bar {
                        label: "Skill Moves",
                        value: p.skill_moves,
                    },
                ],
            },
            ratings: BarChart {
                title: "Player Ratings",
                min: 1,
                max: 100,
                bars: vec![
                    Bar {
                        label: "Overall",
                        value: Some(p.overall),
                    },
                    Bar {
                        label: "Potential",
                        value: p.potential,
                    },
                ],
            },
            metrics: vec![
                ValueMetric {
                    label: "Value(£)",
                    help: "The estimated market value of the player in pounds (£).",
                    value: Some(p.value),
                    delta: p.previous_value,
                },
                ValueMetric {
                    label: "Wage(£)",
                    help: "The player's weekly wage in pounds (£).",
                    value: Some(p.wage),
                    delta: p.previous_wage,
                },
                ValueMetric {
                    label: "Release Clause(£)",
                    help: "The release clause value of the player in pounds (£).",
                    value: p.release_clause,
                    delta: p.previous_release_clause,
                },
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
