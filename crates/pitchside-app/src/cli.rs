// Command-line surface: one subcommand per dashboard page, plus an
// interactive shell that keeps a session across page visits.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pitchside_core::analysis::position::Feature;

/// Command-line arguments for pitchside
#[derive(Parser, Debug)]
#[command(name = "pitchside")]
#[command(about = "Football player dashboard over season CSV exports")]
#[command(version)]
pub struct Cli {
    /// Project directory holding config/, defaults/ and data/
    #[arg(long, env = "PITCHSIDE_ROOT")]
    pub root: Option<PathBuf>,

    /// Print pages as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(flatten)]
    Page(PageCommand),

    /// Read page commands from stdin, keeping one session
    Shell,
}

/// A dashboard page and its selections.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum PageCommand {
    /// Load the dataset and show the overview
    Home(HomeArgs),
    /// Show one player's profile
    Players(PlayersArgs),
    /// Show one club's roster and statistics
    Teams(TeamsArgs),
}

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct HomeArgs {
    /// Write the final player table as CSV
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct PlayersArgs {
    /// Club to pick the player from (defaults to the first club)
    #[arg(long, conflicts_with = "all_clubs")]
    pub club: Option<String>,

    /// Search every club instead of a single one
    #[arg(long)]
    pub all_clubs: bool,

    /// Player name (defaults to the first player listed)
    #[arg(long)]
    pub player: Option<String>,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct TeamsArgs {
    /// Club to summarize (defaults to the first club)
    #[arg(long)]
    pub club: Option<String>,

    /// Metric averaged per position: wage, age, overall, height, weight, value
    #[arg(long, default_value = "wage")]
    pub feature: Feature,
}

impl Default for TeamsArgs {
    fn default() -> Self {
        Self {
            club: None,
            feature: Feature::Wage,
        }
    }
}

/// One line typed into the shell.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub page: PageCommand,
}
