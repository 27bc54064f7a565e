// Pitchside entry point.
//
// Startup sequence:
// 1. Parse the command line
// 2. Load config (copying defaults on first run)
// 3. Initialize tracing (log to file, not terminal)
// 4. Open the requested page, or run the shell

use anyhow::Context;
use clap::Parser;
use tracing::info;

use pitchside_app::app::App;
use pitchside_app::cli::{Cli, Command, HomeArgs, PageCommand};
use pitchside_app::shell;
use pitchside_core::config::{self, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Parse the command line
    let cli = Cli::parse();

    // 2. Load config
    let base_dir = match &cli.root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("failed to resolve working directory")?,
    };
    let config = config::load_config(&base_dir).context("failed to load configuration")?;

    // 3. Initialize tracing
    init_tracing(&config)?;
    info!("Pitchside starting up");
    info!(
        "Config loaded: current={}, prior={}",
        config.current_season_path().display(),
        config.prior_season_path().display()
    );

    let mut app = App::new(config, cli.json);

    // 4. Dispatch
    match cli.command {
        Command::Shell => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            shell::run(&mut app, stdin, tokio::io::stdout()).await?;
        }
        Command::Page(page) => {
            // A direct visit lands on the home page first, which loads the data.
            if !matches!(page, PageCommand::Home(_)) {
                app.open(&PageCommand::Home(HomeArgs::default())).await?;
            }
            let output = app.open(&page).await?;
            println!("{output}");
        }
    }

    info!("Pitchside shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (stdout carries the rendered pages).
fn init_tracing(config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let log_file = std::fs::File::create(log_dir.join("pitchside.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
