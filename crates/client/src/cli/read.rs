use crate::app::App;
use crate::error::Result;
use crate::hypercert::{check_hypercert_eligibility, prepare_hypercert};
use crate::resolver::{parse_address, Resolution};
use alloy_primitives::utils::format_ether;
use chrono::{DateTime, Utc};
use decleanup_contracts_trait::CleanupContracts;
use serde::Serialize;
use tracing::warn;

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn format_timestamp(secs: u64) -> String {
    DateTime::<Utc>::from_timestamp(secs as i64, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| secs.to_string())
}

pub async fn handle_status_command(app: &App, address: String) -> Result<()> {
    let status = app.resolver.user_status(&address).await?;
    print_json(&status)
}

pub async fn handle_latest_command(app: &App, address: String) -> Result<()> {
    match app.resolver.resolve_latest(&address).await? {
        Resolution::Found(status) => print_json(&status),
        Resolution::NotFound => {
            println!("No submissions found for {}", address);
            Ok(())
        }
    }
}

pub async fn handle_eligibility_command(
    app: &App,
    address: String,
    cleanup_id: Option<u64>,
) -> Result<()> {
    let eligibility = app.resolver.can_claim_level(&address, cleanup_id).await?;
    print_json(&eligibility)
}

pub async fn handle_submission_command(app: &App, id: u64) -> Result<()> {
    let submission = app.contracts.get_submission(id).await?;

    println!("Submission {{");
    println!("    id: {},", submission.id);
    println!("    submitter: {},", submission.submitter);
    println!("    status: {},", submission.status);
    println!("    data_uri: \"{}\",", submission.data_uri);
    println!("    before_photo: \"{}\",", submission.before_photo_hash);
    println!("    after_photo: \"{}\",", submission.after_photo_hash);
    match submission.impact_report_hash {
        Some(ref hash) => println!("    impact_report: Some(\"{}\"),", hash),
        None => println!("    impact_report: None,"),
    }
    println!(
        "    location: ({:.6}, {:.6}),",
        submission.latitude(),
        submission.longitude()
    );
    println!("    created_at: {},", format_timestamp(submission.created_at));
    if let Some(approver) = submission.approver {
        println!("    approver: {},", approver);
    }
    if let Some(processed_at) = submission.processed_at {
        println!("    processed_at: {},", format_timestamp(processed_at));
    }
    println!("    reward_paid: {},", submission.reward_paid);
    println!("    fee_paid: {} CELO,", format_ether(submission.fee_paid));
    println!("    fee_refunded: {},", submission.fee_refunded);
    println!("    has_impact_form: {},", submission.has_impact_form);
    println!("}}");
    Ok(())
}

pub async fn handle_fee_command(app: &App) -> Result<()> {
    let fee = app.contracts.submission_fee().await?;
    if fee.enabled {
        println!("Submission fee: {} CELO", format_ether(fee.fee));
    } else {
        println!("Submission fee: disabled");
    }
    Ok(())
}

#[derive(Serialize)]
struct LevelReport {
    level: u8,
    token_id: Option<u64>,
    metadata_uri: Option<String>,
}

pub async fn handle_level_command(app: &App, address: String) -> Result<()> {
    let user = parse_address(&address)?;
    let level = app.contracts.user_level(user).await?;

    let (token_id, metadata_uri) = if level > 0 {
        let token_id = match app.contracts.user_token_id(user).await {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("Could not read token id: {}", e);
                None
            }
        };
        (token_id, Some(app.contracts.token_uri_for_level(level).await?))
    } else {
        (None, None)
    };

    print_json(&LevelReport {
        level,
        token_id,
        metadata_uri,
    })
}

pub async fn handle_balance_command(app: &App, address: String) -> Result<()> {
    let user = parse_address(&address)?;
    let balance = app.contracts.points_balance(user).await?;
    let claimable = app.contracts.claimable_rewards(user).await?;

    println!(
        "cDCU balance: {} ({})",
        balance.amount,
        if balance.is_token_balance {
            "token"
        } else {
            "points"
        }
    );
    println!("Claimable rewards: {} cDCU", format_ether(claimable));
    Ok(())
}

pub async fn handle_hypercert_command(
    app: &App,
    address: String,
    number: Option<u64>,
) -> Result<()> {
    let user = parse_address(&address)?;
    let on_chain = app.contracts.hypercert_eligibility(user).await?;
    let milestone = check_hypercert_eligibility(on_chain.cleanup_count);

    println!(
        "Verified cleanups: {} (hypercerts minted: {})",
        on_chain.cleanup_count, on_chain.hypercert_count
    );
    println!(
        "Eligible: {}, next milestone: {}",
        milestone.is_eligible, milestone.next_milestone
    );

    let number = match number {
        Some(number) => number,
        None if milestone.hypercert_number > 0 => milestone.hypercert_number,
        None => return Ok(()),
    };

    let draft = prepare_hypercert(
        app.contracts.as_ref(),
        &app.reports,
        &user,
        number,
        None,
    )
    .await?;
    print_json(&draft.metadata)
}
