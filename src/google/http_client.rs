use google_sheets4::{hyper, hyper_rustls};

pub type GoogleHttpClient =
    hyper::Client<hyper_rustls::HttpsConnector<hyper::client::HttpConnector>>;

pub fn http_client() -> GoogleHttpClient {
    hyper::Client::builder().build(
        hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .https_or_http()
            .enable_http1()
            .build(),
    )
}
