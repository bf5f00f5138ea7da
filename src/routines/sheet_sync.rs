use error_stack::ResultExt;
use tracing::instrument;

use crate::config::firestore_config::FirestoreConfig;
use crate::config::sheets_config::SpreadsheetConfig;
use crate::domain::routine::{Routine, RoutineError};
use crate::firestore::client::FirestoreClient;
use crate::firestore::document::stage_writes;
use crate::sheets::spreadsheet_manager::SpreadsheetManager;

/// One full synchronization pass: read the worksheet, map every row to a
/// document keyed by the configured column, commit everything as one batch.
#[derive(Debug)]
pub struct SheetSyncRoutine {
    sheets_config: SpreadsheetConfig,
    firestore_config: FirestoreConfig,
}

impl SheetSyncRoutine {
    pub fn new(sheets_config: SpreadsheetConfig, firestore_config: FirestoreConfig) -> Self {
        SheetSyncRoutine {
            sheets_config,
            firestore_config,
        }
    }
}

#[async_trait::async_trait]
impl Routine for SheetSyncRoutine {
    fn name(&self) -> &str {
        "SheetSyncRoutine"
    }

    #[instrument(skip(self), name = "SheetSyncRoutine::run")]
    async fn run(&self) -> error_stack::Result<(), RoutineError> {
        tracing::info!("Authenticating with Google Sheets...");
        let spreadsheet_manager = SpreadsheetManager::new(self.sheets_config.clone())
            .await
            .change_context(RoutineError::routine_failure(
                "Failed to authenticate with Google Sheets",
            ))?;

        tracing::info!("Initializing Firestore client...");
        let firestore = FirestoreClient::instance(&self.firestore_config)
            .await
            .change_context(RoutineError::routine_failure(
                "Failed to initialize Firestore client",
            ))?;

        tracing::info!(
            "Reading all data from worksheet '{}'...",
            self.sheets_config.worksheet
        );
        let table = spreadsheet_manager
            .read_worksheet()
            .await
            .change_context(RoutineError::routine_failure("Failed to fetch sheet data"))?;
        tracing::info!("Fetched {} rows from sheet", table.row_count());

        if table.is_empty() {
            tracing::info!("No data from sheet. Skipping Firestore update.");
            return Ok(());
        }

        let writes = stage_writes(
            &table,
            &self.firestore_config.key_column,
            firestore.project_id(),
            firestore.collection(),
        )
        .change_context(RoutineError::routine_failure(
            "Sheet rows could not be mapped to documents",
        ))?;

        tracing::info!(
            "Committing batch write for {} documents to collection '{}'...",
            writes.len(),
            firestore.collection()
        );
        firestore
            .commit(writes)
            .await
            .change_context(RoutineError::routine_failure("Failed to update Firestore"))?;

        tracing::info!("Firestore update complete.");
        Ok(())
    }
}
