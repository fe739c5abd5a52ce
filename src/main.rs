//! Entry point: parse CLI and dispatch to command handlers.

use anyhow::Context;
use clap::Parser;
use lol_stats::{
    cli::{Cli, Commands},
    commands::{
        champions::handle_champions,
        lookup::handle_lookup,
        mastery::handle_mastery,
        match_history::{handle_matches, MatchesParams},
        open_repository,
        player_stats::handle_stats,
        riot_client,
        sync_matches::handle_sync,
        timeline::handle_timeline,
    },
};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose { "warn,lol_stats=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run the CLI.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let app = Cli::parse();
    init_tracing(app.verbose);

    let mut repo = open_repository(app.db).context("failed to open the match store")?;

    match app.command {
        Commands::Lookup { riot_id } => {
            let client = riot_client()?;
            handle_lookup(&mut repo, &client, &riot_id)
                .await
                .with_context(|| format!("lookup of {} failed", riot_id))?;
        }

        Commands::Sync { player, count } => {
            let client = riot_client()?;
            handle_sync(&mut repo, &client, &player, count)
                .await
                .context("match sync failed")?;
        }

        Commands::Matches {
            player,
            year,
            page,
            per_page,
            json,
            details,
        } => {
            // The history is served from the store; the API is only needed
            // for unknown Riot IDs and champion names.
            let client = riot_client().ok();
            handle_matches(
                &mut repo,
                client.as_ref(),
                MatchesParams {
                    player,
                    year,
                    page,
                    per_page,
                    as_json: json,
                    details,
                },
            )
            .await
            .context("failed to list stored matches")?;
        }

        Commands::Stats { player, year, json } => {
            let client = riot_client().ok();
            handle_stats(&mut repo, client.as_ref(), &player, year, json)
                .await
                .context("failed to compute statistics")?;
        }

        Commands::Timeline { match_id, json } => {
            let client = riot_client().ok();
            handle_timeline(&mut repo, client.as_ref(), &match_id, json)
                .await
                .with_context(|| format!("failed to load timeline for {}", match_id))?;
        }

        Commands::Mastery { player, top, json } => {
            let client = riot_client()?;
            handle_mastery(&mut repo, &client, &player, top, json)
                .await
                .context("failed to load champion mastery")?;
        }

        Commands::Champions { refresh } => {
            let client = riot_client()?;
            handle_champions(&client, refresh)
                .await
                .context("failed to load champion data")?;
        }
    }

    repo.close()?;
    Ok(())
}
