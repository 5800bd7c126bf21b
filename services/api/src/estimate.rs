use crate::infra::build_arv_service;
use arv_engine::config::AppConfig;
use arv_engine::error::AppError;
use arv_engine::telemetry;
use arv_engine::workflows::arv::{parse_request, ArvResponse};
use clap::Args;
use serde_json::Value;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct EstimateArgs {
    /// JSON file holding `{ "mainProperty": ..., "comps": [...] }`
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Print single-line JSON instead of pretty output
    #[arg(long)]
    pub(crate) compact: bool,
}

pub(crate) async fn run_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let raw = tokio::fs::read_to_string(&args.input).await?;
    let payload: Value = serde_json::from_str(&raw)?;
    let (main, comps) = parse_request(&payload)?;

    let service = build_arv_service(&config)?;
    let result = service.find_arv(&main, comps).await?;

    println!("{}", render(&ArvResponse::from(result), args.compact)?);
    Ok(())
}

fn render(response: &ArvResponse, compact: bool) -> Result<String, AppError> {
    let rendered = if compact {
        serde_json::to_string(response)?
    } else {
        serde_json::to_string_pretty(response)?
    };
    Ok(rendered)
}
