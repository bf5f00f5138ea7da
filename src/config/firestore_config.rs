#[derive(serde::Deserialize, Debug, Clone)]
pub struct FirestoreConfig {
    pub priv_key: Box<str>,
    pub project_id: Box<str>,
    pub collection: Box<str>,
    pub key_column: Box<str>,
}
