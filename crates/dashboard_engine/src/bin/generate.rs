use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use dashboard_engine::{write_dashboard_json, BatchOutcome, Dashboard, DashboardExport};
use finance_client::{FinanceClient, FinanceClientConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dashboard_engine=info,finance_client=info")),
        )
        .init();

    let settings = env::args()
        .position(|a| a == "--settings")
        .and_then(|i| env::args().nth(i + 1))
        .map(PathBuf::from);
    let out = env::args()
        .position(|a| a == "--out")
        .and_then(|i| env::args().nth(i + 1))
        .unwrap_or("dashboard/dashboard.json".to_string());

    let settings = settings_loader::load_with_env(settings.as_ref())
        .context("load settings")?;
    let out_path = PathBuf::from(&out);

    println!(
        "Generating dashboard...\n  backend: {}\n  output : {}",
        settings.api.base_url,
        out_path.display()
    );

    let client = FinanceClient::new(FinanceClientConfig::from_settings(&settings.api))
        .context("build finance client")?;
    let dashboard = Dashboard::from_settings(Arc::new(client), &settings);
    let report = dashboard.mount().await;
    if report.outcome == BatchOutcome::Failed {
        println!(
            "Warning: {} of 3 reports failed, placeholders may be shown",
            report.failures()
        );
    }

    let export = DashboardExport::new(dashboard.view().await, settings.settings_version);
    write_dashboard_json(&export, &out_path).context("write dashboard.json")?;

    println!("Done. Generated at {}", export.metadata.generated_at);
    Ok(())
}
