use anyhow::Context;
use eps_core::{ConversionService, EndpointConfig, RunConfig};
use fhir::Format;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the EPS conversion runner
///
/// Performs one batch conversion configured entirely from the environment (a `.env` file
/// is honoured):
/// - `EPS_PRESCRIPTIONS_FILE`: prescription (header) records file
/// - `EPS_ITEMS_FILE`: line-item records file
/// - `EPS_OUTPUT_DIR`: directory for one bundle per prescription
/// - `EPS_FORMAT`: `json` or `xml` (default: `json`)
/// - `EPS_ASID`, `EPS_ODS`, `EPS_URL`: sending endpoint description
/// - `EPS_SHARED_DIR`: optional directory for deduplicated shared resources
/// - `EPS_DETERMINISTIC_IDS`: `true` to mint counter-backed identifiers
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("eps=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config_from_env()?;

    tracing::info!(
        "++ Converting {} and {} into {}",
        config.prescriptions_file().display(),
        config.items_file().display(),
        config.output_dir().display()
    );

    let summary = ConversionService::new(config)
        .execute()
        .context("conversion run failed")?;
    println!("Converted {summary}");

    Ok(())
}

fn required(name: &str) -> anyhow::Result<String> {
    std::env::var(name).with_context(|| format!("{name} must be set"))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn config_from_env() -> anyhow::Result<RunConfig> {
    let format = optional("EPS_FORMAT")
        .unwrap_or_else(|| Format::Json.to_string())
        .parse::<Format>()?;
    let endpoint = EndpointConfig::from_raw(
        &required("EPS_ASID")?,
        &required("EPS_ODS")?,
        &required("EPS_URL")?,
    )?;
    let deterministic = optional("EPS_DETERMINISTIC_IDS")
        .map(|v| v.parse::<bool>())
        .transpose()
        .context("EPS_DETERMINISTIC_IDS must be true or false")?
        .unwrap_or(false);

    Ok(RunConfig::new(
        PathBuf::from(required("EPS_PRESCRIPTIONS_FILE")?),
        PathBuf::from(required("EPS_ITEMS_FILE")?),
        PathBuf::from(required("EPS_OUTPUT_DIR")?),
        format,
        endpoint,
        optional("EPS_SHARED_DIR").map(PathBuf::from),
    )
    .with_deterministic_ids(deterministic))
}
