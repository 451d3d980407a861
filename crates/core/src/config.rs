//! Run configuration.
//!
//! Configuration is resolved once at process startup, from positional arguments, a YAML file
//! or environment variables, and then passed into the conversion service. Nothing in the core
//! reads the process environment while a run is in progress.

use crate::{ConversionError, ConversionResult};
use eps_types::NonEmptyText;
use fhir::Format;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Sending-endpoint description copied into every message header.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointConfig {
    asid: NonEmptyText,
    ods: NonEmptyText,
    url: NonEmptyText,
}

impl EndpointConfig {
    pub fn new(asid: NonEmptyText, ods: NonEmptyText, url: NonEmptyText) -> Self {
        Self { asid, ods, url }
    }

    /// Build from raw text, rejecting blank values.
    pub fn from_raw(asid: &str, ods: &str, url: &str) -> ConversionResult<Self> {
        let field = |name: &str, value: &str| {
            NonEmptyText::new(value)
                .map_err(|_| ConversionError::InvalidInput(format!("endpoint {name} cannot be empty")))
        };
        Ok(Self {
            asid: field("asid", asid)?,
            ods: field("ods", ods)?,
            url: field("url", url)?,
        })
    }

    /// Spine ASID of the sending system.
    pub fn asid(&self) -> &NonEmptyText {
        &self.asid
    }

    /// Short system name (ODS code).
    pub fn ods(&self) -> &NonEmptyText {
        &self.ods
    }

    pub fn url(&self) -> &NonEmptyText {
        &self.url
    }
}

/// Everything one conversion run needs.
#[derive(Clone, Debug)]
pub struct RunConfig {
    prescriptions_file: PathBuf,
    items_file: PathBuf,
    output_dir: PathBuf,
    format: Format,
    endpoint: EndpointConfig,
    shared_dir: Option<PathBuf>,
    deterministic_ids: bool,
}

/// YAML form of [`RunConfig`].
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RunConfigFile {
    prescriptions: PathBuf,
    items: PathBuf,
    output_dir: PathBuf,
    #[serde(default = "default_format")]
    format: String,
    endpoint: EndpointConfig,
    #[serde(default)]
    shared_dir: Option<PathBuf>,
    #[serde(default)]
    deterministic_ids: bool,
}

fn default_format() -> String {
    Format::Json.to_string()
}

impl RunConfig {
    pub fn new(
        prescriptions_file: PathBuf,
        items_file: PathBuf,
        output_dir: PathBuf,
        format: Format,
        endpoint: EndpointConfig,
        shared_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            prescriptions_file,
            items_file,
            output_dir,
            format,
            endpoint,
            shared_dir,
            deterministic_ids: false,
        }
    }

    /// Mint counter-backed identifiers instead of random ones.
    pub fn with_deterministic_ids(mut self, deterministic: bool) -> Self {
        self.deterministic_ids = deterministic;
        self
    }

    /// Parse a YAML configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::ConfigParse`] naming the failing key when the document does
    /// not match the schema (unknown keys included), and [`ConversionError::InvalidInput`]
    /// for an unrecognised format.
    pub fn from_yaml_str(yaml_text: &str) -> ConversionResult<Self> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
        let file: RunConfigFile = match serde_path_to_error::deserialize(deserializer) {
            Ok(parsed) => parsed,
            Err(err) => {
                let path = err.path().to_string();
                let source = err.into_inner();
                let path = if path.is_empty() { "<root>" } else { path.as_str() };
                return Err(ConversionError::ConfigParse(format!(
                    "schema mismatch at {path}: {source}"
                )));
            }
        };

        let format = file
            .format
            .parse::<Format>()
            .map_err(|e| ConversionError::InvalidInput(e.to_string()))?;

        Ok(Self::new(
            file.prescriptions,
            file.items,
            file.output_dir,
            format,
            file.endpoint,
            file.shared_dir,
        )
        .with_deterministic_ids(file.deterministic_ids))
    }

    pub fn from_yaml_file(path: &Path) -> ConversionResult<Self> {
        let text = std::fs::read_to_string(path).map_err(ConversionError::ConfigRead)?;
        Self::from_yaml_str(&text)
    }

    /// Check that the output directory, and the shared directory when set, exist.
    pub fn validate_output_dirs(&self) -> ConversionResult<()> {
        let dirs = std::iter::once(self.output_dir.as_path()).chain(self.shared_dir.as_deref());
        for dir in dirs {
            if !dir.is_dir() {
                return Err(ConversionError::OutputDirMissing(dir.to_path_buf()));
            }
        }
        Ok(())
    }

    pub fn prescriptions_file(&self) -> &Path {
        &self.prescriptions_file
    }

    pub fn items_file(&self) -> &Path {
        &self.items_file
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    /// Directory for deduplicated shared entities; `None` disables shared emission.
    pub fn shared_dir(&self) -> Option<&Path> {
        self.shared_dir.as_deref()
    }

    pub fn deterministic_ids(&self) -> bool {
        self.deterministic_ids
    }
}
