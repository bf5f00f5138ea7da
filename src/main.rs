mod config;
mod domain;
mod firestore;
mod google;
mod routines;
mod sheets;

use std::collections::HashMap;

use crate::config::app_config::CONFIG;
use crate::domain::routine::{Routine, RoutineError};
use crate::routines::sheet_sync::SheetSyncRoutine;
use tracing::instrument;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Registry};

#[instrument]
async fn run_routines() {
    let routines_to_run: Vec<Box<dyn Routine>> = vec![Box::new(SheetSyncRoutine::new(
        CONFIG.sheets.clone(),
        CONFIG.firestore.clone(),
    ))];

    let mut routine_results: HashMap<String, error_stack::Result<(), RoutineError>> =
        HashMap::new();

    for routine in &routines_to_run {
        let result = routine.run().await;
        if let Err(report) = &result {
            tracing::error!("❌ {}: {:?}", routine.name(), report);
        } else {
            tracing::info!("✅ {}: OK", routine.name());
        }
        routine_results.insert(routine.name().to_string(), result);
    }

    tracing::info!("Routine results:");
    for (name, result) in routine_results {
        match result {
            Ok(()) => {
                tracing::info!("✅ {}: OK", name);
            }
            Err(report) => {
                tracing::error!("❌ {}: {:?}", name, report);
            }
        }
    }
}

fn setup_tracing() {
    Registry::default()
        .with(
            tracing_subscriber::filter::Targets::new()
                .with_target("sheetsync", tracing::Level::TRACE),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn setup_panic_hook() {
    tracing::trace!("Setting panic hook");
    std::panic::set_hook(Box::new(|info| {
        tracing::error!("panic: {info}");
    }));
}

#[tokio::main]
async fn main() {
    setup_tracing();
    setup_panic_hook();

    run_routines().await;
}
