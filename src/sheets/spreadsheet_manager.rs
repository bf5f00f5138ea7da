use std::fmt::Debug;

use error_stack::{Result, ResultExt};
use google_sheets4::{hyper, hyper_rustls, Sheets};
use thiserror::Error;
use tracing::instrument;

use crate::config::sheets_config::SpreadsheetConfig;
use crate::domain::table::SheetTable;
use crate::google::auth::{self, AuthenticationError};
use crate::google::http_client;

pub struct SpreadsheetManager {
    pub config: SpreadsheetConfig,
    hub: Sheets<hyper_rustls::HttpsConnector<hyper::client::HttpConnector>>,
}

impl Debug for SpreadsheetManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SpreadsheetManager {{ config: {:?} }}", self.config)
    }
}

#[derive(Error, Debug)]
pub enum SheetAccessError {
    #[error("failed to read worksheet '{worksheet}' of spreadsheet '{spreadsheet_id}'")]
    WorksheetUnavailable {
        spreadsheet_id: String,
        worksheet: String,
    },
}

impl SpreadsheetManager {
    #[instrument(name = "SpreadsheetManager::new")]
    pub async fn new(config: SpreadsheetConfig) -> Result<Self, AuthenticationError> {
        let client = http_client::http_client();
        let auth = auth::auth(&config.priv_key, client.clone()).await?;
        let hub = Sheets::new(client, auth);

        Ok(SpreadsheetManager { config, hub })
    }

    /// Reads the configured worksheet in full, first row as the header.
    ///
    /// Not-found, permission and transient API failures all collapse into
    /// `SheetAccessError` with the underlying cause attached. A worksheet
    /// with no values at all yields an empty table.
    #[instrument]
    pub async fn read_worksheet(&self) -> Result<SheetTable, SheetAccessError> {
        // Quoting the title keeps it a valid A1 range even with spaces.
        let range = format!("'{}'", self.config.worksheet);
        let response = self
            .hub
            .spreadsheets()
            .values_get(&self.config.spreadsheet_id, &range)
            .value_render_option("UNFORMATTED_VALUE")
            .doit()
            .await
            .change_context_lazy(|| SheetAccessError::WorksheetUnavailable {
                spreadsheet_id: self.config.spreadsheet_id.to_string(),
                worksheet: self.config.worksheet.to_string(),
            })?;

        let values = response.1.values.unwrap_or_default();
        Ok(SheetTable::from_values(values))
    }
}
