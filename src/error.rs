use thiserror::Error;

/// Errors that abort a pipeline run. Rows that are merely bad (missing game
/// ids, sentinel entities, wrong game sizes) are filtered, not raised; these
/// variants cover schema- and type-level problems that make the whole table
/// unusable.
#[derive(Debug, Error)]
pub enum CleanError {
    #[error("column `{column}`: cannot parse value `{value}`")]
    Format { column: String, value: String },

    #[error("granularity must be `team` or `player`, got `{0}`")]
    InvalidGranularity(String),

    #[error("opponent pairing ran past the end of the dataset at row {index}")]
    IndexOutOfRange { index: usize },

    #[error("required column `{0}` is missing from the input table")]
    MissingColumn(String),
}
