// Teams page: club roster, club statistics and per-position averages.

use chrono::NaiveDate;
use serde::Serialize;

use pitchside_core::analysis::club::ClubSummary;
use pitchside_core::analysis::position::{position_means, Feature, PositionMean};
use pitchside_core::context::DashboardContext;
use pitchside_core::dataset::PlayerRecord;
use pitchside_core::format::format_currency;

use super::{field, or_dash, select_club, PageError, PageView};
use crate::cli::TeamsArgs;

/// One row of the club roster table. `photo` and `flag` are image URLs,
/// carried for JSON consumers; the text table leaves them out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterRow {
    pub photo: Option<String>,
    pub name: String,
    pub age: Option<u32>,
    pub position: Option<String>,
    pub overall: u32,
    pub flag: Option<String>,
    pub joined: Option<NaiveDate>,
    pub height_m: f64,
    pub weight_kg: f64,
    pub contract_valid_until: Option<i32>,
    pub wage: f64,
    pub value: f64,
    pub release_clause: Option<f64>,
}

impl From<&PlayerRecord> for RosterRow {
    fn from(p: &PlayerRecord) -> Self {
        Self {
            photo: p.photo.clone(),
            name: p.name.clone(),
            age: p.age,
            position: p.position.clone(),
            overall: p.overall,
            flag: p.flag.clone(),
            joined: p.joined_date(),
            height_m: p.height_m,
            weight_kg: p.weight_kg,
            contract_valid_until: p.contract_valid_until,
            wage: p.wage,
            value: p.value,
            release_clause: p.release_clause,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamsView {
    pub summary: ClubSummary,
    pub roster: Vec<RosterRow>,
    pub feature: Feature,
    pub position_means: Vec<PositionMean>,
}

impl TeamsView {
    pub fn build(ctx: &DashboardContext, args: &TeamsArgs) -> Result<Self, PageError> {
        let club = select_club(ctx.clubs(), args.club.as_deref())?;
        let table = ctx.table();
        let summary = ClubSummary::from_roster(&club, table.club_roster(&club))
            .ok_or_else(|| PageError::UnknownClub(club.clone()))?;
        Ok(Self {
            roster: table.club_roster(&club).map(RosterRow::from).collect(),
            position_means: position_means(table.club_roster(&club), args.feature),
            feature: args.feature,
            summary,
        })
    }
}

impl PageView for TeamsView {
    fn render_text(&self) -> String {
        let s = &self.summary;
        let mut out = String::new();

        out.push_str(&format!("{}\n{}\n", s.club, "=".repeat(s.club.chars().count())));
        if let Some(logo) = &s.club_logo {
            field(&mut out, "Logo:", logo, 8);
        }

        out.push_str("\nClub Info\n");
        out.push_str(&format!(
            "  {:<24} {:>3} {:<4} {:>3} {:>10} {:>6} {:>6} {:>8} {:>14} {:>16} {:>16}\n",
            "Name", "Age", "Pos", "Ovr", "Joined", "Height", "Weight", "Contract", "Weekly Wage",
            "Market Value", "Release Clause"
        ));
        for r in &self.roster {
            out.push_str(&format!(
                "  {:<24} {:>3} {:<4} {:>3} {:>10} {:>6} {:>6} {:>8} {:>14} {:>16} {:>16}\n",
                r.name,
                or_dash(r.age),
                or_dash(r.position.as_deref()),
                r.overall,
                or_dash(r.joined.map(|j| j.format("%m/%d/%Y"))),
                format!("{:.2} m", r.height_m),
                format!("{:.0} kg", r.weight_kg),
                or_dash(r.contract_valid_until),
                format_currency(r.wage),
                format_currency(r.value),
                r.release_clause.map_or_else(|| "-".to_string(), format_currency),
            ));
        }

        out.push_str("\nClub Statistics\n");
        field(&mut out, "  Total players", s.total_players, 24);
        field(&mut out, "  Total market value", format_currency(s.total_market_value), 24);
        field(&mut out, "  Weekly players spend", format_currency(s.weekly_wage_spend), 24);
        field(&mut out, "  Average age", or_dash(s.average_age), 24);
        field(&mut out, "  Overall average", format!("{:.0}", s.overall_average), 24);
        field(&mut out, "  Average height", format!("{:.2} m", s.average_height_m), 24);
        field(&mut out, "  Average weight", format!("{:.2} kg", s.average_weight_kg), 24);
        field(&mut out, "  Most contract end", or_dash(s.most_common_contract_end), 24);

        out.push_str(&format!("\nAverage {} by position\n", self.feature));
        for m in &self.position_means {
            field(&mut out, &format!("  {}", m.position), m.mean, 8);
        }
        out
    }
}
