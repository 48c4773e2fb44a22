mod bootstrap;

use anyhow::{Context, Result};
use txn_core::settings::Settings;
use txn_data::analysis::{analyze_transactions, monthly_breakdown, render_monthly_table, render_text};

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("txn-analyzer v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!("View: {}, Format: {}", settings.view, settings.format);

    let data_path = settings
        .data_path
        .clone()
        .or_else(bootstrap::discover_data_path)
        .context(
            "no transactions file found; pass --data-path or create ./transactions.json",
        )?;

    let analysis = analyze_transactions(&data_path, &settings.report_queries())
        .with_context(|| format!("analyzing {}", data_path.display()))?;

    let json = settings.format == "json";

    match settings.view.as_str() {
        "report" => {
            if json {
                println!("{}", serde_json::to_string_pretty(&analysis.report)?);
            } else {
                print!("{}", render_text(&analysis.report)?);
            }
        }

        "monthly" => {
            let breakdown = monthly_breakdown(&analysis.analyzer)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&breakdown)?);
            } else {
                print!("{}", render_monthly_table(&breakdown));
            }
        }

        unknown => {
            anyhow::bail!("unknown view mode: {}", unknown);
        }
    }

    Ok(())
}
