//! Stats command handler

use anyhow::{Context, Result};

use wlr::cli::StatsArgs;
use wlr::{render_statistics, Config, CorrelationModel, StatisticsSummary};

#[cfg(not(tarpaulin_include))]
pub fn handle(args: StatsArgs) -> Result<()> {
    let config = Config::load()?;
    let settings = super::engine_settings(&config, &args.engine)?;

    if !args.file.is_file() {
        return Err(wlr::ReconcileError::NotAFile { path: args.file }.into());
    }
    let model = CorrelationModel::build_from_path(&args.file, settings)
        .with_context(|| format!("Failed to analyze {}", args.file.display()))?;

    if args.json {
        let summary = StatisticsSummary::from_model(&model);
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render_statistics(&model));
    }
    Ok(())
}
