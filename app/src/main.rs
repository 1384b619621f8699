// In app/src/main.rs

use anyhow::Result;
use app_config::{Settings, SimulationSettings};
use clap::{Parser, Subcommand};
use core_types::MarketScenario;
use engine::{DayOutcome, Session, SessionHandle};
use events::SessionEvent;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;

mod report;
mod telemetry;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "TenorArb: a cash-and-carry basis trading simulator."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Opens a hedged position, steps the market and reports the result.
    Simulate {
        #[command(flatten)]
        run: RunArgs,

        /// Number of days to advance. Runs to maturity when omitted.
        #[arg(short, long)]
        days: Option<u32>,

        /// Leave the position open instead of closing it at the end.
        #[arg(long)]
        hold: bool,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Plays a session in real time, one day per timer tick.
    Play {
        #[command(flatten)]
        run: RunArgs,

        /// Milliseconds between simulated days. Overrides the configuration.
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// Asks the AI tutor a question about basis trading.
    Ask {
        /// The question to ask.
        question: String,

        /// What the learner is currently looking at.
        #[arg(short, long, default_value = "TenorArb basis trading simulator")]
        context: String,
    },

    /// Runs a session and asks the AI tutor to explain the outcome.
    Summarize {
        #[command(flatten)]
        run: RunArgs,

        /// Number of days to advance. Runs to maturity when omitted.
        #[arg(short, long)]
        days: Option<u32>,
    },
}

#[derive(clap::Args, Debug, Clone)]
struct RunArgs {
    /// Market scenario: normal, bull-run, bear-crash or high-volatility.
    #[arg(short, long, default_value = "normal")]
    scenario: MarketScenario,

    /// Seed for a reproducible price path. Overrides the configuration.
    #[arg(long)]
    seed: Option<u64>,
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    let settings = app_config::load_settings()?;
    telemetry::init(&settings.app.log_level);

    // Parse command-line arguments.
    let cli = Cli::parse();

    tracing::info!(environment = %settings.app.environment, "Starting TenorArb.");
    tracing::debug!(?settings, "Settings loaded.");

    // Match on the parsed command and call the appropriate handler.
    match cli.command {
        Commands::Simulate {
            run,
            days,
            hold,
            json,
        } => handle_simulate(&settings, run, days, hold, json)?,
        Commands::Play { run, interval_ms } => handle_play(&settings, run, interval_ms).await?,
        Commands::Ask { question, context } => handle_ask(&settings, &context, &question).await,
        Commands::Summarize { run, days } => handle_summarize(&settings, run, days).await?,
    }

    tracing::info!("TenorArb has finished successfully.");

    Ok(())
}

/// Builds a session from the configured parameters.
fn build_session(simulation: &SimulationSettings, run: &RunArgs) -> Result<Session> {
    let params = simulation.to_params();
    let session = match run.seed.or(simulation.seed) {
        Some(seed) => {
            tracing::info!(seed, scenario = %run.scenario, "Creating seeded session.");
            Session::seeded(params, run.scenario, seed)?
        }
        None => {
            tracing::info!(scenario = %run.scenario, "Creating session with a random seed.");
            Session::from_entropy(params, run.scenario)?
        }
    };
    Ok(session)
}

/// Opens the hedge and advances `days` days, or to maturity.
fn run_to_horizon(session: &mut Session, days: Option<u32>) -> Result<()> {
    let opened = session.open_positions()?;
    report::print_opened(&opened);

    match days {
        Some(days) => {
            for _ in 0..days {
                if let DayOutcome::Halted = session.next_day()? {
                    break;
                }
            }
        }
        None => {
            let simulated = session.skip_to_maturity()?;
            tracing::info!(days = simulated, "Advanced to the end of the run.");
        }
    }
    Ok(())
}

// --- "Simulate" Subcommand Logic ---

fn handle_simulate(
    settings: &Settings,
    run: RunArgs,
    days: Option<u32>,
    hold: bool,
    json: bool,
) -> Result<()> {
    let mut session = build_session(&settings.simulation, &run)?;
    run_to_horizon(&mut session, days)?;

    if session.state().is_liquidated {
        println!("The account was liquidated before the run finished.");
    } else if !hold {
        let closed = session.close_positions()?;
        report::print_closed(&closed);
    }

    let summary = session.summary();
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        report::print_report(&summary);
    }
    Ok(())
}

// --- "Play" Subcommand Logic ---

async fn handle_play(settings: &Settings, run: RunArgs, interval_ms: Option<u64>) -> Result<()> {
    let session = build_session(&settings.simulation, &run)?;
    let params = session.params().clone();
    let interval = Duration::from_millis(interval_ms.unwrap_or(settings.simulation.tick_interval_ms));

    let (handle, task) = SessionHandle::spawn(session, interval);
    let mut events = handle.subscribe();

    let opened = handle.open_positions().await?;
    report::print_opened(&opened);
    handle.set_running(true).await?;
    println!("Running one day every {interval:?}. Press Ctrl-C to stop early.");

    // --- Event Loop ---
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(SessionEvent::DayAdvanced(update)) => report::print_day(&update),
                Ok(SessionEvent::Liquidated(liquidation)) => {
                    report::print_liquidation(&liquidation);
                    break;
                }
                Ok(SessionEvent::Matured { day }) => {
                    println!("Contract matured on day {day}.");
                    break;
                }
                Ok(SessionEvent::Notice(notice)) => println!("[{}] {}", notice.level, notice.message),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Display fell behind the session.");
                }
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                println!("Stopping.");
                handle.set_running(false).await?;
                break;
            }
        }
    }

    if handle.state().has_open_position() {
        let closed = handle.close_positions().await?;
        report::print_closed(&closed);
    }

    let summary = accounting::SessionSummary::from_state(&handle.state(), &params);
    report::print_report(&summary);

    handle.shutdown().await;
    task.await?;
    Ok(())
}

// --- Tutor Subcommands ---

async fn handle_ask(settings: &Settings, context: &str, question: &str) {
    let tutor = tutor::tutor_from_settings(&settings.tutor);
    tracing::info!(tutor = tutor.name(), "Asking the tutor.");

    let answer = tutor.explain(context, question).await;
    println!("{answer}");
}

async fn handle_summarize(settings: &Settings, run: RunArgs, days: Option<u32>) -> Result<()> {
    let mut session = build_session(&settings.simulation, &run)?;
    run_to_horizon(&mut session, days)?;
    report::print_report(&session.summary());

    let tutor = tutor::tutor_from_settings(&settings.tutor);
    tracing::info!(tutor = tutor.name(), "Requesting session analysis.");
    let analysis = tutor.summarize(&session.state().history).await;

    println!("\n--- Tutor Analysis ---");
    println!("{analysis}");
    Ok(())
}
