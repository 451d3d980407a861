//! Document emission.
//!
//! The service hands every finished document to a [`DocumentSink`]. [`FileSink`] writes one
//! file per document; tests substitute an in-memory sink.

use crate::{ConversionError, ConversionResult};
use fhir::{Format, Resource};
use std::path::{Path, PathBuf};

pub trait DocumentSink {
    /// Persist the bundle of one prescription, named by the prescription id.
    fn write_bundle(&mut self, prescription_id: &str, bundle: &Resource) -> ConversionResult<()>;

    /// Persist one shared entity, named by its synthetic identifier.
    fn write_shared(&mut self, resource: &Resource) -> ConversionResult<()>;
}

/// Writes `<dir>/<name>.<json|xml>` files.
#[derive(Clone, Debug)]
pub struct FileSink {
    output_dir: PathBuf,
    shared_dir: Option<PathBuf>,
    format: Format,
}

impl FileSink {
    pub fn new(output_dir: PathBuf, shared_dir: Option<PathBuf>, format: Format) -> Self {
        Self {
            output_dir,
            shared_dir,
            format,
        }
    }

    fn write(&self, dir: &Path, name: &str, resource: &Resource) -> ConversionResult<PathBuf> {
        let name = file_stem(name)?;
        let document = resource.render(self.format)?;
        let path = dir.join(format!("{name}.{}", self.format.extension()));
        std::fs::write(&path, document).map_err(|source| ConversionError::FileWrite {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// `name` as a single file-name component; it must not step outside its directory.
fn file_stem(name: &str) -> ConversionResult<&str> {
    let unsafe_name = name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.chars().any(std::path::is_separator);
    if unsafe_name {
        return Err(ConversionError::InvalidInput(format!(
            "{name:?} cannot be used as an output file name"
        )));
    }
    Ok(name)
}

impl DocumentSink for FileSink {
    fn write_bundle(&mut self, prescription_id: &str, bundle: &Resource) -> ConversionResult<()> {
        let path = self.write(&self.output_dir, prescription_id, bundle)?;
        tracing::info!(prescription = %prescription_id, path = %path.display(), "wrote bundle");
        Ok(())
    }

    fn write_shared(&mut self, resource: &Resource) -> ConversionResult<()> {
        let Some(dir) = &self.shared_dir else {
            return Ok(());
        };
        let path = self.write(dir, &resource.id().to_string(), resource)?;
        tracing::debug!(
            resource_type = resource.resource_type(),
            path = %path.display(),
            "wrote shared resource"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eps_uuid::{ResourceId, Uuid};
    use fhir::{HumanName, Identifier, Practitioner};

    fn practitioner() -> Resource {
        Resource::Practitioner(Practitioner {
            id: ResourceId::from_uuid(Uuid::from_u128(7)),
            identifier: vec![Identifier::new(fhir::systems::SDS_USER_ID, "687227875014")],
            name: vec![HumanName::text("DR A SMITH")],
        })
    }

    #[test]
    fn writes_bundle_named_by_prescription_id() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut sink = FileSink::new(dir.path().to_path_buf(), None, Format::Xml);
        sink.write_bundle("RX1", &practitioner()).expect("write");

        let text = std::fs::read_to_string(dir.path().join("RX1.xml")).expect("read back");
        assert!(text.contains("<Practitioner xmlns=\"http://hl7.org/fhir\">"));
    }

    #[test]
    fn writes_shared_resource_named_by_id() {
        let out = tempfile::tempdir().expect("tempdir");
        let shared = tempfile::tempdir().expect("tempdir");
        let mut sink = FileSink::new(
            out.path().to_path_buf(),
            Some(shared.path().to_path_buf()),
            Format::Json,
        );
        sink.write_shared(&practitioner()).expect("write");

        let path = shared
            .path()
            .join("00000000-0000-0000-0000-000000000007.json");
        let text = std::fs::read_to_string(path).expect("read back");
        assert!(text.contains("\"resourceType\": \"Practitioner\""));
    }

    #[test]
    fn shared_write_without_directory_is_a_no_op() {
        let out = tempfile::tempdir().expect("tempdir");
        let mut sink = FileSink::new(out.path().to_path_buf(), None, Format::Json);
        sink.write_shared(&practitioner()).expect("no-op");
        assert_eq!(std::fs::read_dir(out.path()).expect("list").count(), 0);
    }

    #[test]
    fn prescription_id_cannot_leave_the_output_directory() {
        let root = tempfile::tempdir().expect("tempdir");
        let out = root.path().join("out");
        std::fs::create_dir(&out).expect("mkdir");
        let mut sink = FileSink::new(out.clone(), None, Format::Json);

        for id in ["../escape", "", "..", "nested/RX1"] {
            assert!(
                matches!(
                    sink.write_bundle(id, &practitioner()),
                    Err(ConversionError::InvalidInput(_))
                ),
                "id {id:?} should be rejected"
            );
        }
        assert!(!root.path().join("escape.json").exists());
        assert_eq!(std::fs::read_dir(&out).expect("list").count(), 0);
    }

    #[test]
    fn unwritable_target_is_a_file_write_error() {
        let out = tempfile::tempdir().expect("tempdir");
        let missing = out.path().join("gone");
        let mut sink = FileSink::new(missing, None, Format::Json);
        assert!(matches!(
            sink.write_bundle("RX1", &practitioner()),
            Err(ConversionError::FileWrite { .. })
        ));
    }
}
