// Players page: one player's details, rating charts and value metrics.

use serde::Serialize;

use pitchside_core::analysis::player::{BarChart, PlayerProfile};
use pitchside_core::context::DashboardContext;
use pitchside_core::dataset::PlayerRecord;
use pitchside_core::photo::Photo;

use super::{field, or_dash, select_club, PageError, PageView};
use crate::cli::PlayersArgs;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayersView {
    /// Club filter in effect; `None` when every club was searched.
    pub club_filter: Option<String>,
    /// Names offered for selection, in table order.
    pub choices: Vec<String>,
    pub profile: PlayerProfile,
    pub photo: Photo,
}

/// Pick the player for a selection. With a club filter the candidates are
/// that club's players; otherwise every player in the table.
pub fn select_player<'a>(
    ctx: &'a DashboardContext,
    args: &PlayersArgs,
) -> Result<(Option<String>, Vec<String>, &'a PlayerRecord), PageError> {
    let table = ctx.table();
    let club = if args.all_clubs {
        None
    } else {
        Some(select_club(ctx.clubs(), args.club.as_deref())?)
    };

    let choices = match &club {
        Some(club) => table.players_in_club(club),
        None => table.players().iter().map(|p| p.name.clone()).collect(),
    };

    let name = match args.player.as_deref() {
        Some(name) => name,
        None => choices.first().map(String::as_str).ok_or(PageError::EmptyTable)?,
    };
    let record = match &club {
        Some(club) => table
            .players()
            .iter()
            .find(|p| p.club == *club && p.name == name),
        None => table.find(name),
    }
    .ok_or_else(|| PageError::UnknownPlayer {
        name: name.to_string(),
        club: club.clone(),
    })?;

    Ok((club, choices, record))
}

impl PlayersView {
    pub async fn build(ctx: &DashboardContext, args: &PlayersArgs) -> Result<Self, PageError> {
        let (club_filter, choices, record) = select_player(ctx, args)?;
        let profile = PlayerProfile::from_record(record);
        let photo = ctx.photos().resolve(profile.photo.as_deref()).await;
        Ok(Self {
            club_filter,
            choices,
            profile,
            photo,
        })
    }
}

fn render_chart(out: &mut String, chart: &BarChart) {
    out.push_str(&format!("\n{} ({}..{})\n", chart.title, chart.min, chart.max));
    for bar in &chart.bars {
        let filled = bar
            .value
            .map(|v| (v.saturating_sub(chart.min) * 20 / (chart.max - chart.min).max(1)) as usize)
            .unwrap_or(0);
        out.push_str(&format!(
            "  {:<26} {:<20} {}\n",
            bar.label,
            "#".repeat(filled),
            or_dash(bar.value)
        ));
    }
}

impl PageView for PlayersView {
    fn render_text(&self) -> String {
        let p = &self.profile;
        let d = &p.details;
        let mut out = String::new();

        out.push_str(&format!("{}\n{}\n", p.name, "=".repeat(p.name.chars().count())));
        let photo_note = if self.photo.is_placeholder() {
            " (placeholder)"
        } else {
            ""
        };
        field(&mut out, "Photo:", format!("{}{}", self.photo.url(), photo_note), 16);
        field(&mut out, "Club:", &p.club, 16);
        field(&mut out, "Nationality:", or_dash(p.nationality.as_deref()), 16);

        out.push_str("\nPlayer's details\n");
        field(&mut out, "  Age", or_dash(d.age), 16);
        field(
            &mut out,
            "  Real Face",
            or_dash(d.real_face.map(|f| if f { "yes" } else { "no" })),
            16,
        );
        field(
            &mut out,
            "  Joined",
            or_dash(d.joined.map(|j| j.format("%d/%m/%Y"))),
            16,
        );
        field(&mut out, "  Contract", or_dash(d.contract_valid_until), 16);
        field(&mut out, "  Loaned From", or_dash(d.loaned_from.as_deref()), 16);
        field(&mut out, "  Position", or_dash(d.position.as_deref()), 16);
        field(&mut out, "  Preferred Foot", or_dash(d.preferred_foot.as_deref()), 16);
        field(&mut out, "  Special", or_dash(d.special), 16);
        field(&mut out, "  Work Rate", or_dash(d.work_rate.as_deref()), 16);
        field(&mut out, "  Body Type", or_dash(d.body_type.as_deref()), 16);
        field(&mut out, "  Height", format!("{:.2} m", d.height_m), 16);
        field(&mut out, "  Weight", format!("{} kg", d.weight_kg), 16);

        render_chart(&mut out, &p.features);
        render_chart(&mut out, &p.ratings);

        out.push('\n');
        for metric in &p.metrics {
            let delta = metric
                .formatted_delta()
                .map(|d| if d.starts_with('-') { format!(" ({d})") } else { format!(" (+{d})") })
                .unwrap_or_default();
            field(
                &mut out,
                &format!("{}:", metric.label),
                format!("{}{}", metric.formatted_value(), delta),
                20,
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitchside_core::dataset::enrich::{enrich, load_prior_season_from_reader};
    use pitchside_core::dataset::loader::{load_season_from_reader, LoadOptions};
    use pitchside_core::photo::PhotoResolver;
    use std::sync::Arc;

    fn context() -> DashboardContext {
        let current = "\
,Name,Overall,Value(£),Wage(£),Release Clause(£),Height(cm.),Weight(lbs.),Club,Age
0,J. Kimmich6,89,105500000,130000,182000000,177,163,FC Bayern München,27
1,L. Goretzka8,87,91000000,115000,157000000,189,181,FC Bayern München,27
2,N. Barella23,86,89500000,110000,154400000,172,150,Inter,25";
        let prior = "\
,Name,Value(£),Wage(£),Release Clause(£)
0,J. Kimmich6,108000000,160000,199800000";
        let table =
            load_season_from_reader(current.as_bytes(), "c.csv", &LoadOptions::default()).unwrap();
        let prior = load_prior_season_from_reader(prior.as_bytes(), "p.csv").unwrap();
        DashboardContext::from_table(Arc::new(enrich(table, &prior)), PhotoResolver::default())
    }

    #[test]
    fn defaults_to_first_player_of_first_club() {
        let ctx = context();
        let (club, choices, record) = select_player(&ctx, &PlayersArgs::default()).unwrap();
        assert_eq!(club.as_deref(), Some("FC Bayern München"));
        assert_eq!(choices, vec!["J. Kimmich", "L. Goretzka"]);
        assert_eq!(record.name, "J. Kimmich");
    }

    #[test]
    fn player_must_belong_to_selected_club() {
        let ctx = context();
        let args = PlayersArgs {
            club: Some("Inter".into()),
            player: Some("J. Kimmich".into()),
            ..Default::default()
        };
        assert_eq!(
            select_player(&ctx, &args).unwrap_err(),
            PageError::UnknownPlayer {
                name: "J. Kimmich".into(),
                club: Some("Inter".into())
            }
        );

        let all = PlayersArgs {
            all_clubs: true,
            player: Some("N. Barella".into()),
            ..Default::default()
        };
        let (club, choices, record) = select_player(&ctx, &all).unwrap();
        assert_eq!(club, None);
        assert_eq!(choices.len(), 3);
        assert_eq!(record.club, "Inter");
    }

    #[tokio::test]
    async fn profile_without_photo_uses_placeholder() {
        let ctx = context();
        let view = PlayersView::build(&ctx, &PlayersArgs::default()).await.unwrap();
        assert!(view.photo.is_placeholder());

        let text = view.render_text();
        assert!(text.starts_with("J. Kimmich\n"));
        assert!(text.contains("(placeholder)"));
        // Wage dropped by 30,000 against the prior season.
        assert!(text.contains("£ 130,000 (-30,000)"));
    }
}
