mod bootstrap;

use anyhow::{Context, Result};
use dashboard_core::settings::Settings;
use dashboard_runtime::data_manager::DataStore;
use dashboard_runtime::session::DashboardSession;
use dashboard_ui::app::App;
use dashboard_ui::report_text;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    let app_dir = bootstrap::ensure_directories()?;
    // The TUI owns the terminal, so its logs go to a file unless told otherwise.
    let log_file = settings.log_file.clone().or_else(|| {
        (settings.view == "dashboard")
            .then(|| app_dir.join("logs").join(bootstrap::DEFAULT_LOG_FILE))
    });
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("Sales Dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Theme: {}, Top N: {}",
        settings.view,
        settings.theme,
        settings.top_n
    );

    let data_dir = settings
        .data_dir
        .clone()
        .or_else(bootstrap::discover_data_path)
        .context("no data directory found; pass --data-dir or put the CSV exports in ./data")?;

    let store = DataStore::load_from_dir(&data_dir, &settings.sales_file, &settings.rfm_file)
        .with_context(|| format!("failed to load datasets from {}", data_dir.display()))?;

    let mut session = DashboardSession::from_requested(
        &store,
        &settings.branches,
        &settings.months,
        settings.top_n as usize,
    );

    match settings.view.as_str() {
        "dashboard" => {
            App::new(&settings.theme).run(&mut session)?;
        }
        "report" => {
            let options = store.options();
            print!(
                "{}",
                report_text::render_report(
                    session.report(),
                    options.branches.len(),
                    options.months.len()
                )
            );
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(session.report())?);
        }
        unknown => {
            eprintln!("Unknown view mode: {}", unknown);
        }
    }

    Ok(())
}
