mod cli;
mod config;
mod main_lib;
mod scheduler;

use clap::Parser;
use tierfolio_core::profile::UserRiskProfile;

use cli::{Cli, Command, DraftAction};
use config::Config;
use main_lib::{build_state, init_tracing};

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env();
    init_tracing(&config.log_format);
    let state = build_state(&config).await?;

    match cli.command {
        Command::Analyze => {
            let snapshot = state.pipeline.run_market_analysis().await?;
            print_json(&snapshot)?;
        }
        Command::Schedule => {
            let handle = scheduler::start_market_analysis_scheduler(
                state.clone(),
                config.initial_delay,
                config.refresh_interval,
            );
            tokio::signal::ctrl_c().await?;
            tracing::info!("Shutting down scheduler ({})", state.db_path);
            handle.abort();
        }
        Command::Portfolio(args) => {
            let portfolio = state.pipeline.generate_portfolio(args.into_request()?).await?;
            print_json(&portfolio)?;
        }
        Command::Answers { owner, grades } => {
            let profile = UserRiskProfile::new(&grades)?;
            state.answers.save_answers(&owner, &profile).await?;
            tracing::info!("Stored answers {:?} for {}", profile.answers(), owner);
        }
        Command::Draft { action } => match action {
            DraftAction::Show { owner } => match state.pipeline.get_draft(&owner)? {
                Some(portfolio) => print_json(&portfolio)?,
                None => tracing::info!("No draft stored for {}", owner),
            },
            DraftAction::Delete { owner } => {
                let deleted = state.pipeline.delete_draft(&owner).await?;
                tracing::info!("Deleted {} draft(s) for {}", deleted, owner);
            }
        },
    }
    Ok(())
}
