use std::path::PathBuf;

/// Structural failures that abort a conversion run.
///
/// Per-field problems in the source data are never reported through this type; they degrade
/// to a default value and a logged warning (see [`crate::fields`]).
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to read {}: {source}", .path.display())]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("output directory {} does not exist", .0.display())]
    OutputDirMissing(PathBuf),

    #[error("failed to write {}: {source}", .path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("prescription {0} is not in the loaded record store")]
    MissingPrescription(String),

    #[error("failed to render document: {0}")]
    Render(#[from] fhir::FhirError),

    #[error("failed to read configuration file: {0}")]
    ConfigRead(std::io::Error),

    #[error("invalid configuration: {0}")]
    ConfigParse(String),
}

pub type ConversionResult<T> = std::result::Result<T, ConversionError>;
