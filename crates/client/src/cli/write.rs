use crate::app::App;
use crate::cache::PendingLocation;
use crate::error::Result;
use crate::resolver::parse_address;
use alloy_primitives::U256;
use decleanup_contracts_trait::{CleanupContracts, NewSubmission};
use tracing::info;

/// Connect the signer and make sure the wallet is on the required chain.
/// Returns the chain id to pass to the gateway as hint.
async fn prepare_write(app: &App, context: &str) -> Result<u64> {
    app.connect_signer().await?;
    Ok(app.session.ensure_required_chain(context).await?)
}

pub async fn handle_ensure_chain_command(app: &App) -> Result<()> {
    let chain_id = prepare_write(app, "ensure-chain").await?;
    println!(
        "Wallet is on {} (Chain ID: {})",
        app.session.guard().required_network().name,
        chain_id
    );
    Ok(())
}

pub async fn handle_disconnect_command(app: &App) -> Result<()> {
    app.session.disconnect().await;
    println!("Wallet session cleared");
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn handle_submit_command(
    app: &App,
    before_photo: String,
    after_photo: String,
    data_uri: String,
    impact_report: Option<String>,
    latitude: f64,
    longitude: f64,
    referrer: Option<String>,
) -> Result<()> {
    let referrer = referrer.as_deref().map(parse_address).transpose()?;
    let chain_id = prepare_write(app, "submit").await?;

    let fee = app.contracts.submission_fee().await?;
    let submission = NewSubmission {
        data_uri,
        before_photo_hash: before_photo,
        after_photo_hash: after_photo,
        impact_report_hash: impact_report,
        latitude,
        longitude,
        referrer,
        fee: if fee.enabled { fee.fee } else { U256::ZERO },
    };

    let id = app
        .contracts
        .create_submission(&submission, Some(chain_id))
        .await?;

    if let Some(user) = app.session.active_address().await {
        app.resolver
            .remember_submission(
                &user,
                id,
                Some(PendingLocation {
                    latitude,
                    longitude,
                }),
            )
            .await?;
    }

    match id {
        Some(id) => {
            info!("Created submission {}", id);
            println!("Submission created: {}", id);
        }
        None => println!("Submission confirmed; run `decleanup latest` to look up its id"),
    }
    Ok(())
}

pub async fn handle_approve_command(app: &App, id: u64) -> Result<()> {
    let chain_id = prepare_write(app, "approve").await?;
    let tx_hash = app.contracts.approve_submission(id, Some(chain_id)).await?;
    println!("Submission {} approved: {}", id, tx_hash);
    Ok(())
}

pub async fn handle_reject_command(app: &App, id: u64) -> Result<()> {
    let chain_id = prepare_write(app, "reject").await?;
    let tx_hash = app.contracts.reject_submission(id, Some(chain_id)).await?;
    println!("Submission {} rejected: {}", id, tx_hash);
    Ok(())
}

pub async fn handle_claim_command(app: &App) -> Result<()> {
    let chain_id = prepare_write(app, "claim").await?;
    let tx_hash = app.contracts.claim_rewards(Some(chain_id)).await?;
    println!("Rewards claimed: {}", tx_hash);
    Ok(())
}

pub async fn handle_attach_recyclables_command(
    app: &App,
    id: u64,
    photo: String,
    receipt: Option<String>,
) -> Result<()> {
    let chain_id = prepare_write(app, "attach-recyclables").await?;
    let tx_hash = app
        .contracts
        .attach_recyclables(id, &photo, receipt.as_deref(), Some(chain_id))
        .await?;
    println!("Recyclables attached to submission {}: {}", id, tx_hash);
    Ok(())
}

pub async fn handle_claim_hypercert_reward_command(app: &App, number: u64) -> Result<()> {
    let chain_id = prepare_write(app, "claim-hypercert-reward").await?;
    let tx_hash = app
        .contracts
        .claim_hypercert_reward(number, Some(chain_id))
        .await?;
    println!("Hypercert #{} reward claimed: {}", number, tx_hash);
    Ok(())
}
