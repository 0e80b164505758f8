//! Main application entry point

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use pw_core::events::events::{
    DataLoaded, DisplayModeChanged, DrillFocusChanged, SelectionChanged, ViewRegistered,
};
use pw_core::events::typed_handler;
use pw_core::EventBus;
use pw_data::{load_from, CsvSource, TableSource};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info};

mod config;
mod console;
mod dashboard;

use config::AppConfig;
use console::{Console, ConsoleCommand, Flow, TerminalPanel, HELP};
use dashboard::Dashboard;

/// Log every dashboard event
fn subscribe_logging(bus: &EventBus) {
    bus.subscribe::<DataLoaded>(typed_handler(|e: &DataLoaded| {
        info!(source = %e.source_name, rows = e.row_count, "Data loaded");
    }));
    bus.subscribe::<ViewRegistered>(typed_handler(|e: &ViewRegistered| {
        debug!(view = %e.view_id, view_type = %e.view_type, "View registered");
    }));
    bus.subscribe::<SelectionChanged>(typed_handler(|e: &SelectionChanged| {
        info!(origin = ?e.origin, selected = e.selected.len(), everything = e.everything, "Selection changed");
    }));
    bus.subscribe::<DisplayModeChanged>(typed_handler(|e: &DisplayModeChanged| {
        info!(view = %e.view_id, mode = ?e.mode, "Display mode changed");
    }));
    bus.subscribe::<DrillFocusChanged>(typed_handler(|e: &DrillFocusChanged| {
        info!(view = %e.view_id, focus = ?e.focus, "Drill focus changed");
    }));
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let Some(data_path) = args.next().map(PathBuf::from) else {
        bail!("usage: pitwall <laps.csv> [config.json]");
    };
    let config_path = args.next().map(PathBuf::from);

    let config = AppConfig::resolve(&data_path, config_path.as_deref())?;
    info!(path = %data_path.display(), "Starting pitwall");

    let bus = Arc::new(EventBus::new());
    subscribe_logging(&bus);

    let source = CsvSource::new(config.load.clone());
    let store = Arc::new(load_from(&source, &config.load).await?);
    bus.publish(DataLoaded {
        source_name: source.source_name().to_string(),
        row_count: store.len(),
    });

    let mut dashboard = Dashboard::build(store, &config, bus);
    dashboard.add_sink(Box::new(TerminalPanel));

    let mut console = Console::new(dashboard);
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<ConsoleCommand>() {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        match console.execute(command, &mut stdout) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => {
                error!("{e:#}");
                println!("error: {e:#}");
            }
        }
    }

    info!("Shutting down");
    Ok(())
}
