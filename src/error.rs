use thiserror::Error;

pub type Result<T> = std::result::Result<T, InstacheckError>;

/// Fatal pipeline failures. Per-entry problems (malformed JSON, oversized
/// entries, bad encodings) are logged and skipped instead.
#[derive(Error, Debug)]
pub enum InstacheckError {
    #[error("No files provided")]
    NoFiles,

    #[error("Could not open archive '{name}': {source}")]
    UnreadableArchive {
        name: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error(
        "No valid JSON found. Upload the complete export archive or the JSON files from the connections folder."
    )]
    NoJson,

    #[error(
        "No follower or following data located. Check that the upload is the complete export archive or the JSON files from the connections folder."
    )]
    NoRelationshipData,

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid classification rules: {0}")]
    InvalidRules(String),
}
