use error_stack::{Result, ResultExt};
use google_sheets4::oauth2::{self, authenticator::Authenticator};
use google_sheets4::{hyper, hyper_rustls};
use thiserror::Error;

use super::http_client::GoogleHttpClient;

pub type GoogleAuthenticator =
    Authenticator<hyper_rustls::HttpsConnector<hyper::client::HttpConnector>>;

#[derive(Error, Debug)]
pub enum AuthenticationError {
    #[error("could not read service account key at '{0}'")]
    KeyUnreadable(String),
    #[error("could not build service account authenticator")]
    AuthenticatorBuild,
}

/// Builds a service-account authenticator from the on-disk JSON key. Both
/// Google clients (Sheets and Firestore) go through here with the same
/// credential file.
pub async fn auth(
    priv_key: &str,
    client: GoogleHttpClient,
) -> Result<GoogleAuthenticator, AuthenticationError> {
    let secret: oauth2::ServiceAccountKey = oauth2::read_service_account_key(priv_key)
        .await
        .change_context_lazy(|| AuthenticationError::KeyUnreadable(priv_key.to_string()))?;

    oauth2::ServiceAccountAuthenticator::with_client(secret, client)
        .build()
        .await
        .change_context(AuthenticationError::AuthenticatorBuild)
}
