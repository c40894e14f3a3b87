//! `decleanup` command-line client
//!
//! ## Usage
//!
//! ```bash
//! # Status of the latest cleanup of an address
//! decleanup status 0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266
//!
//! # Submit a cleanup (signs with DECLEANUP_PRIVATE_KEY)
//! decleanup submit --before-photo Qm... --after-photo Qm... --latitude 52.52 --longitude 13.40
//!
//! # Debug logging
//! RUST_LOG=decleanup=debug decleanup latest 0x...
//! ```
//!
//! ## Environment Variables
//!
//! - `DECLEANUP_CONFIG`: configuration file (default `decleanup.toml`)
//! - `DECLEANUP_RPC_URL`, `DECLEANUP_WALLET_RPC_URL`, `DECLEANUP_PRIVATE_KEY`: overrides
//! - `RUST_LOG`: log filter, defaults to `decleanup=<log-level>,reqwest=warn`

use anyhow::Result;
use clap::Parser;
use decleanup_client::cli::{read, write, Cli, Commands};
use decleanup_client::App;
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if not found)
    dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "decleanup={level},decleanup_client={level},decleanup_contracts_ethereum={level},reqwest=warn",
                    level = cli.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let config = cli.load_config()?;
    let app = App::new(config).await?;

    let result = match cli.command {
        Commands::Status { address } => read::handle_status_command(&app, address).await,
        Commands::Latest { address } => read::handle_latest_command(&app, address).await,
        Commands::Eligibility {
            address,
            cleanup_id,
        } => read::handle_eligibility_command(&app, address, cleanup_id).await,
        Commands::Submission { id } => read::handle_submission_command(&app, id).await,
        Commands::Fee => read::handle_fee_command(&app).await,
        Commands::Level { address } => read::handle_level_command(&app, address).await,
        Commands::Balance { address } => read::handle_balance_command(&app, address).await,
        Commands::Hypercert { address, number } => {
            read::handle_hypercert_command(&app, address, number).await
        }

        Commands::Submit {
            before_photo,
            after_photo,
            data_uri,
            impact_report,
            latitude,
            longitude,
            referrer,
        } => {
            write::handle_submit_command(
                &app,
                before_photo,
                after_photo,
                data_uri,
                impact_report,
                latitude,
                longitude,
                referrer,
            )
            .await
        }
        Commands::Approve { id } => write::handle_approve_command(&app, id).await,
        Commands::Reject { id } => write::handle_reject_command(&app, id).await,
        Commands::Claim => write::handle_claim_command(&app).await,
        Commands::AttachRecyclables { id, photo, receipt } => {
            write::handle_attach_recyclables_command(&app, id, photo, receipt).await
        }
        Commands::ClaimHypercertReward { number } => {
            write::handle_claim_hypercert_reward_command(&app, number).await
        }
        Commands::EnsureChain => write::handle_ensure_chain_command(&app).await,
        Commands::Disconnect => write::handle_disconnect_command(&app).await,
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) if e.is_silent() => {
            info!("Request rejected in wallet");
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            Err(e.into())
        }
    }
}
