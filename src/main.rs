use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use runboard::api::{build_router, state::AppState};
use runboard::config::AppConfig;
use runboard::models::{format_display, Selection};
use runboard::nav::Navigator;
use runboard::session::{self, Session};
use runboard::store::SelectionStore;
use runboard::upstream::{SpeedrunClient, StatsSource};

#[derive(Parser)]
#[command(name = "runboard")]
#[command(about = "Speedrun leaderboard viewer with drill-down navigation and page rotation")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the proxy API server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Watch a leaderboard rotate in the terminal
    Watch {
        /// Game id
        #[arg(long)]
        game: String,

        /// Category id
        #[arg(long)]
        category: String,

        /// Sub-category variable id (requires --value)
        #[arg(long)]
        variable: Option<String>,

        /// Sub-category value id (requires --variable)
        #[arg(long)]
        value: Option<String>,

        /// Stop after this many page renders
        #[arg(long, default_value = "6")]
        pages: usize,

        /// Remember this selection for the next start
        #[arg(long)]
        remember: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting runboard v{}", env!("CARGO_PKG_VERSION"));

    let config = if cli.config.exists() {
        AppConfig::from_file(&cli.config)?
    } else {
        tracing::info!("No config file at {:?}, using defaults", cli.config);
        AppConfig::default()
    };

    let client = SpeedrunClient::new(config.client_config()?)
        .context("Failed to build upstream client")?;
    let source: Arc<dyn StatsSource> = Arc::new(client);

    match cli.command {
        Commands::Serve { host, port } => {
            let state = AppState { source };
            let app = build_router(state);
            let addr = format!(
                "{}:{}",
                host.unwrap_or_else(|| config.server.host.clone()),
                port.unwrap_or(config.server.port)
            );
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Proxy listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Watch {
            game,
            category,
            variable,
            value,
            pages,
            remember,
        } => {
            let selection = match (variable, value) {
                (Some(variable), Some(value)) => {
                    Selection::new(game, category).with_value(variable, value)
                }
                (None, None) => Selection::new(game, category),
                _ => bail!("--variable and --value must be supplied together"),
            };

            let store = config
                .persistence
                .enabled
                .then(|| SelectionStore::new(config.persistence.state_dir.clone()));
            let mut watch_session = Session::new(
                Navigator::new(config.variable_overrides()),
                config.rotation.clone(),
                store,
            );

            if remember {
                watch_session.handle_input(session::UserInput::SetRemember(true), 0);
            }
            let requests = watch_session.restore(selection, 0);
            for request in requests {
                let outcome = session::execute(request, source.as_ref()).await;
                watch_session.fetch_done(outcome, 0);
            }

            let Some(board) = watch_session.nav().leaderboard() else {
                bail!("Leaderboard fetch did not complete");
            };
            if board.is_empty() {
                println!("No leaderboard data available.");
                return Ok(());
            }
            tracing::info!(
                "{} entries, {} rotating pages",
                board.len(),
                watch_session.rotator().page_count()
            );

            // Hand the pre-fetched session to the event loop and let the
            // rotation clock drive the page renders.
            let (_inputs_tx, inputs_rx) = mpsc::channel(1);
            let mut rendered = 0usize;
            let mut last_page = None;
            session::run(watch_session, source, inputs_rx, move |s| {
                if s.nav().leaderboard().is_none() || s.rotator().is_transitioning() {
                    return true;
                }
                let page = s.rotator().current_page();
                if last_page == Some(page) {
                    return true;
                }
                last_page = Some(page);
                print_page(s);
                rendered += 1;
                // A board that fits on one page has nothing left to show.
                rendered < pages && s.rotator().page_count() > 1
            })
            .await;
        }
    }

    Ok(())
}

/// Print the pinned prefix and the currently visible page.
fn print_page(session: &Session) {
    println!(
        "\n=== Page {}/{} ===",
        session.rotator().current_page() + 1,
        session.rotator().page_count().max(1)
    );
    for entry in session.pinned_entries() {
        println!(
            "  * #{:<3} {:<24} {:>3}  {}",
            entry.rank,
            entry.player,
            entry.country.as_deref().unwrap_or("--"),
            format_display(entry.time_seconds)
        );
    }
    for entry in session.page_entries() {
        println!(
            "    #{:<3} {:<24} {:>3}  {}",
            entry.rank,
            entry.player,
            entry.country.as_deref().unwrap_or("--"),
            format_display(entry.time_seconds)
        );
    }
}
