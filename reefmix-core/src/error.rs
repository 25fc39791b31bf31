use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReefmixError {
    #[error("Tank '{0}' not found in the catalog")]
    TankNotFound(String),

    #[error("Salt mix '{0}' not found in the catalog")]
    SaltMixNotFound(String),

    #[error("No parameter readings logged for tank '{0}'")]
    NoReadingLogged(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error for file '{0}': {1}")]
    FileIO(String, #[source] std::io::Error),

    #[error("Failed to parse YAML from '{0}': {1}")]
    YamlParsing(String, #[source] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Failed to process CSV file '{0}': {1}")]
    CsvError(String, #[source] csv::Error),

    #[error("An error occurred during logging: {0}")]
    LoggingError(#[from] anyhow::Error),
}
