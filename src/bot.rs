//! Long-running scan loop and task wiring.
//!
//! `start` builds the initial index, spawns the periodic rebuild task and
//! the scan loop, then parks on the shutdown signal. Each scan takes one
//! index snapshot, dispatches a breakeven search per triangle, reduces the
//! hits to a pool-disjoint selection and writes the batch report.

use std::sync::Arc;
use std::time::Instant;

use eyre::Result;
use log::{error, info};

use crate::arb::dispatch::run_batch;
use crate::arb::opportunity::{Opportunity, Outcome};
use crate::arb::selector::{estimate_total_cost, select_disjoint};
use crate::oracle::eth_call::{EthCallOracle, EthCostEstimator};
use crate::oracle::RoiOracle;
use crate::report::BatchReport;
use crate::sync;
use crate::utils::app_context::AppContext;

/// Starts the bot and runs until a shutdown signal arrives.
///
/// # Errors
/// * If the initial index build fails; later rebuild failures only log
/// * If waiting on the shutdown signal fails
pub async fn start(ctx: AppContext) -> Result<()> {
    let started = Instant::now();
    let count = sync::triangles::rebuild(&ctx).await?;
    info!("bot: initial index of {count} triangles ready in {:?}", started.elapsed());

    let ctx = Arc::new(ctx);

    // Spawn the index refresh task
    let refresh_ctx = Arc::clone(&ctx);
    tokio::spawn(async move {
        info!("Starting triangle index refresh task");
        if let Err(e) = sync::triangles::triangles(&refresh_ctx).await {
            error!("Error in triangle index refresh task: {e:#}");
        }
    });

    // Spawn the scan loop
    let scan_ctx = Arc::clone(&ctx);
    tokio::spawn(async move {
        info!("Starting scan loop");
        loop {
            match scan_once(&scan_ctx).await {
                Ok(report) => info!("bot: scan reported {} candidates", report.len()),
                Err(e) => error!("Error in scan loop: {e:#}"),
            }
            tokio::time::sleep(scan_ctx.config.scan_interval).await;
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("Received shutdown signal, stopping");
    Ok(())
}

/// Runs one scan batch end to end and writes its report.
///
/// # Errors
/// * If the report cannot be written; resolution failures of individual
///   candidates are recorded in the report instead
pub async fn scan_once(ctx: &AppContext) -> Result<BatchReport> {
    let total_started = Instant::now();

    let snapshot = ctx.triangles.snapshot().await;
    let working_set = snapshot.working_set();
    info!("bot: scanning {} triangles", working_set.len());

    let oracle: Arc<dyn RoiOracle> = Arc::new(EthCallOracle::new(
        ctx.provider.clone(),
        ctx.config.quoter_from,
        ctx.config.quoter_to,
    ));
    let outcomes = run_batch(
        oracle,
        ctx.config.resolver(),
        working_set,
        ctx.config.workers,
    )
    .await;

    let select_started = Instant::now();
    let hits: Vec<Opportunity> = outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            Outcome::Hit(opportunity) => Some(opportunity.clone()),
            _ => None,
        })
        .collect();
    let selected = select_disjoint(hits);

    let estimator = EthCostEstimator::new(
        ctx.provider.clone(),
        ctx.config.quoter_from,
        ctx.config.quoter_to,
    );
    let total_gas = estimate_total_cost(&estimator, &selected).await;
    let select_elapsed = select_started.elapsed();

    info!(
        "bot: selected {} disjoint opportunities, estimated cost {total_gas} gas",
        selected.len()
    );

    let report = BatchReport::from_outcomes(&outcomes, select_elapsed, total_started.elapsed());
    report.write(&ctx.config.report_path).await?;
    Ok(report)
}
