// Application state: configuration, the dataset cache and the session the
// pages share. Page visits are dispatched here.

use anyhow::Context;
use tracing::{info, warn};

use pitchside_core::config::Config;
use pitchside_core::context::{DashboardContext, Session};
use pitchside_core::dataset::DatasetCache;

use crate::cli::{HomeArgs, PageCommand};
use crate::pages::home::{self, HomeView};
use crate::pages::players::PlayersView;
use crate::pages::teams::TeamsView;
use crate::pages::{render, Guidance};

pub struct App {
    config: Config,
    cache: DatasetCache,
    session: Session,
    json: bool,
}

impl App {
    pub fn new(config: Config, json: bool) -> Self {
        let cache = DatasetCache::new(config.load_options());
        Self {
            config,
            cache,
            session: Session::new(),
            json,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Render `page`. Pages other than home show the lookup-miss guidance
    /// until the home page has initialized the session.
    pub async fn open(&mut self, page: &PageCommand) -> anyhow::Result<String> {
        match page {
            PageCommand::Home(args) => self.home(args),
            PageCommand::Players(args) => {
                let Ok(ctx) = self.session.context() else {
                    warn!("players page opened before home");
                    return render(&Guidance::lookup_miss(), self.json);
                };
                let view = PlayersView::build(ctx, args).await?;
                render(&view, self.json)
            }
            PageCommand::Teams(args) => {
                let Ok(ctx) = self.session.context() else {
                    warn!("teams page opened before home");
                    return render(&Guidance::lookup_miss(), self.json);
                };
                let view = TeamsView::build(ctx, args)?;
                render(&view, self.json)
            }
        }
    }

    fn home(&mut self, args: &HomeArgs) -> anyhow::Result<String> {
        let ctx = DashboardContext::build(&self.config, &self.cache)
            .context("failed to load player data")?;
        let ctx = self.session.initialize(ctx);
        info!(players = ctx.table().len(), "session initialized");

        let mut view = HomeView::build(ctx);
        if let Some(path) = &args.export {
            view.exported_to = Some(home::export_csv(ctx, path)?);
        }
        render(&view, self.json)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::cli::{PlayersArgs, TeamsArgs};
    use pitchside_core::config::{load_config_from, CONFIG_FILE};
    use pitchside_core::context::LOOKUP_MISS_GUIDANCE;
    use std::fs;
    use std::path::{Path, PathBuf};

    const CURRENT: &str = "\
,Name,Age,Overall,Value(£),Wage(£),Release Clause(£),Height(cm.),Weight(lbs.),Club,Position
0,J. Kimmich6,27,89,105500000,130000,182000000,177,163,FC Bayern München,CDM
1,N. Barella23,25,86,89500000,110000,154400000,172,150,Inter,RCM
2,L. Goretzka8,27,87,91000000,115000,157000000,189,181,FC Bayern München,CAM
";
    const PRIOR: &str = "\
,Name,Value(£),Wage(£),Release Clause(£)
0,N. Barella,70500000,100000,129000000
";

    /// Project directory with a config and two small season files.
    pub(crate) fn project(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("config")).unwrap();
        fs::create_dir_all(dir.join("data")).unwrap();
        fs::write(dir.join("data/current.csv"), CURRENT).unwrap();
        fs::write(dir.join("data/prior.csv"), PRIOR).unwrap();
        fs::write(
            dir.join("config").join(CONFIG_FILE),
            "[data]\ncurrent_season = \"data/current.csv\"\nprior_season = \"data/prior.csv\"\n\n[photos]\ntimeout_secs = 1\n",
        )
        .unwrap();
        dir
    }

    pub(crate) fn app(dir: &Path, json: bool) -> App {
        App::new(load_config_from(dir).unwrap(), json)
    }

    #[tokio::test]
    async fn pages_before_home_show_guidance() {
        let dir = project("pitchside_app_guidance");
        let mut app = app(&dir, false);

        let text = app
            .open(&PageCommand::Teams(TeamsArgs::default()))
            .await
            .unwrap();
        assert_eq!(text, LOOKUP_MISS_GUIDANCE);
        let text = app
            .open(&PageCommand::Players(PlayersArgs::default()))
            .await
            .unwrap();
        assert_eq!(text, LOOKUP_MISS_GUIDANCE);
        assert!(!app.session().is_initialized());

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn home_initializes_session_for_other_pages() {
        let dir = project("pitchside_app_home_first");
        let mut app = app(&dir, false);

        app.open(&PageCommand::Home(HomeArgs::default()))
            .await
            .unwrap();
        assert!(app.session().is_initialized());

        let text = app
            .open(&PageCommand::Teams(TeamsArgs::default()))
            .await
            .unwrap();
        assert!(text.starts_with("FC Bayern München\n"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn json_players_page_carries_deltas() {
        let dir = project("pitchside_app_json");
        let mut app = app(&dir, true);
        app.open(&PageCommand::Home(HomeArgs::default()))
            .await
            .unwrap();

        let args = PlayersArgs {
            club: Some("Inter".into()),
            ..Default::default()
        };
        let text = app.open(&PageCommand::Players(args)).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["profile"]["name"], "N. Barella");
        assert_eq!(json["profile"]["metrics"][0]["delta"], 19_000_000.0);
        assert_eq!(json["photo"]["kind"], "placeholder");

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn home_export_writes_csv() {
        let dir = project("pitchside_app_export");
        let mut app = app(&dir, false);
        let target = dir.join("export.csv");

        let text = app
            .open(&PageCommand::Home(HomeArgs {
                export: Some(target.clone()),
            }))
            .await
            .unwrap();
        assert!(text.contains("Exported to"));
        let written = fs::read_to_string(&target).unwrap();
        assert!(written.lines().next().unwrap().contains("Previous Value(£)"));
        assert_eq!(written.lines().count(), 4);

        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn unknown_club_is_reported() {
        let dir = project("pitchside_app_unknown_club");
        let mut app = app(&dir, false);
        app.open(&PageCommand::Home(HomeArgs::default()))
            .await
            .unwrap();

        let err = app
            .open(&PageCommand::Teams(TeamsArgs {
                club: Some("Ajax".into()),
                ..Default::default()
            }))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "unknown club 'Ajax'");

        let _ = fs::remove_dir_all(&dir);
    }
}
