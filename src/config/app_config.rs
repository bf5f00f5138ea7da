use std::sync::LazyLock;

use config::Config;

#[derive(serde::Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub sheets: super::sheets_config::SpreadsheetConfig,
    pub firestore: super::firestore_config::FirestoreConfig,
}

pub static CONFIG: LazyLock<AppConfig> = LazyLock::new(|| {
    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "Config".to_string());
    let config = match Config::builder()
        .add_source(config::File::with_name(&config_path))
        .build()
    {
        Ok(config) => config,
        Err(e) => match e {
            config::ConfigError::NotFound(property) => {
                panic!(
                    "[CONFIG ERROR] Missing property {:?} in config file: {}",
                    property, config_path
                );
            }
            _ => {
                panic!(
                    "[CONFIG ERROR] Error reading config file '{}': {:?}",
                    config_path, e
                );
            }
        },
    };

    config.try_deserialize::<AppConfig>().unwrap_or_else(|e| {
        panic!(
            "[CONFIG ERROR] Failed to deserialize config file '{}': {}\nMake sure all required fields are present in the configuration file.",
            config_path, e
        )
    })
});
