use thiserror::Error;

#[derive(Error, Debug)]
pub enum BloomMapError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Prediction dataset error: {0}")]
    Dataset(String),

    #[error("Unknown species: {0}")]
    UnknownSpecies(String),

    #[error("Unknown growth stage: {0}")]
    UnknownStage(String),
}
