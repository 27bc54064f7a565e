// Home page: initializes the session and offers the table as a CSV download.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use tracing::info;

use pitchside_core::context::DashboardContext;
use pitchside_core::format::format_currency;

use super::{field, or_dash, PageView};

pub const TITLE: &str = "FIFA23 Official Dataset";
pub const DATASET_URL: &str =
    "https://www.kaggle.com/datasets/kevwesophia/fifa23-official-datasetclean-data";
pub const DOWNLOAD_FILE_NAME: &str = "CLEAN_FIFA23_official_data.csv";

const ABOUT: &str = "\
The Football Player Dataset from 2017 to 2023 provides comprehensive information about \
professional football players: demographics, physical characteristics, playing statistics, \
contract details and club affiliations.";

/// Rows listed in the overview.
pub const TOP_PLAYERS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPlayer {
    pub name: String,
    pub club: String,
    pub position: Option<String>,
    pub overall: u32,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeView {
    pub title: &'static str,
    pub dataset_url: &'static str,
    pub about: &'static str,
    pub total_players: usize,
    pub total_clubs: usize,
    pub top_players: Vec<TopPlayer>,
    pub exported_to: Option<PathBuf>,
}

impl HomeView {
    pub fn build(ctx: &DashboardContext) -> Self {
        let table = ctx.table();
        Self {
            title: TITLE,
            dataset_url: DATASET_URL,
            about: ABOUT,
            total_players: table.len(),
            total_clubs: ctx.clubs().len(),
            top_players: table
                .players()
                .iter()
                .take(TOP_PLAYERS)
                .map(|p| TopPlayer {
                    name: p.name.clone(),
                    club: p.club.clone(),
                    position: p.position.clone(),
                    overall: p.overall,
                    value: p.value,
                })
                .collect(),
            exported_to: None,
        }
    }
}

/// Write the final table to `path`. A directory target receives the
/// default download file name.
pub fn export_csv(ctx: &DashboardContext, path: &Path) -> anyhow::Result<PathBuf> {
    let target = if path.is_dir() {
        path.join(DOWNLOAD_FILE_NAME)
    } else {
        path.to_path_buf()
    };
    let file = File::create(&target)
        .with_context(|| format!("failed to create {}", target.display()))?;
    ctx.table()
        .write_csv(BufWriter::new(file))
        .with_context(|| format!("failed to write {}", target.display()))?;
    info!(rows = ctx.table().len(), path = %target.display(), "player table exported");
    Ok(target)
}

impl PageView for HomeView {
    fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n{}\n\n", self.title, "=".repeat(self.title.len())));
        field(&mut out, "Players:", self.total_players, 10);
        field(&mut out, "Clubs:", self.total_clubs, 10);
        field(&mut out, "Source:", self.dataset_url, 10);
        out.push_str("\nAbout this dataset\n");
        out.push_str(self.about);
        out.push_str("\n\nTop rated\n");
        for (rank, p) in self.top_players.iter().enumerate() {
            out.push_str(&format!(
                "{:>3}. {:<24} {:<22} {:<4} {:>3}  {}\n",
                rank + 1,
                p.name,
                p.club,
                or_dash(p.position.as_deref()),
                p.overall,
                format_currency(p.value),
            ));
        }
        if let Some(path) = &self.exported_to {
            out.push_str(&format!("\nExported to {}\n", path.display()));
        }
        out
    }
}
