use std::fmt::Debug;

use error_stack::{report, Result, ResultExt};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::instrument;

use crate::config::firestore_config::FirestoreConfig;
use crate::google::auth::{self, AuthenticationError, GoogleAuthenticator};
use crate::google::http_client;

const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";
const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

#[derive(Error, Debug)]
pub enum StoreWriteError {
    #[error("could not obtain an access token for Firestore")]
    TokenUnavailable,
    #[error("HTTP request to Firestore failed")]
    HttpError,
    #[error("Firestore commit rejected with status {0}")]
    CommitRejected(String),
}

/// One staged write: a full-document set (no field mask, so an existing
/// document is overwritten entirely).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Write {
    pub update: FirestoreDocument,
}

impl Write {
    pub fn set(name: String, fields: Map<String, Value>) -> Self {
        Write {
            update: FirestoreDocument { name, fields },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirestoreDocument {
    pub name: String,
    pub fields: Map<String, Value>,
}

#[derive(Debug, Serialize)]
struct CommitRequest {
    writes: Vec<Write>,
}

pub struct FirestoreClient {
    config: FirestoreConfig,
    http: reqwest::Client,
    authenticator: GoogleAuthenticator,
}

impl Debug for FirestoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FirestoreClient {{ config: {:?} }}", self.config)
    }
}

static INSTANCE: OnceCell<FirestoreClient> = OnceCell::const_new();

impl FirestoreClient {
    /// Process-wide initialize-if-absent: the first call authenticates and
    /// stores the client, later calls return the existing one.
    #[instrument(name = "FirestoreClient::instance", skip(config))]
    pub async fn instance(
        config: &FirestoreConfig,
    ) -> Result<&'static FirestoreClient, AuthenticationError> {
        INSTANCE
            .get_or_try_init(|| FirestoreClient::new(config.clone()))
            .await
    }

    async fn new(config: FirestoreConfig) -> Result<Self, AuthenticationError> {
        let authenticator = auth::auth(&config.priv_key, http_client::http_client()).await?;

        Ok(FirestoreClient {
            config,
            http: reqwest::Client::new(),
            authenticator,
        })
    }

    pub fn project_id(&self) -> &str {
        &self.config.project_id
    }

    pub fn collection(&self) -> &str {
        &self.config.collection
    }

    async fn access_token(&self) -> Result<String, StoreWriteError> {
        let token = self
            .authenticator
            .token(&[DATASTORE_SCOPE])
            .await
            .change_context(StoreWriteError::TokenUnavailable)?;

        token
            .token()
            .map(str::to_string)
            .ok_or_else(|| report!(StoreWriteError::TokenUnavailable))
    }

    /// Commits all staged writes as a single batch. Either the whole batch
    /// is accepted or the run fails; there is no retry and no compensation
    /// for server-side partial application.
    #[instrument(skip(writes), fields(write_count = writes.len()))]
    pub async fn commit(&self, writes: Vec<Write>) -> Result<(), StoreWriteError> {
        let url = format!(
            "{}/projects/{}/databases/(default)/documents:commit",
            FIRESTORE_BASE_URL, self.config.project_id
        );

        let token = self.access_token().await?;
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&CommitRequest { writes })
            .send()
            .await
            .change_context(StoreWriteError::HttpError)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(report!(StoreWriteError::CommitRejected(status.to_string())))
                .attach_printable(body);
        }

        Ok(())
    }
}
