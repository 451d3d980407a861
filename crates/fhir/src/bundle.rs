//! FHIR Bundle wire model and the [`Resource`] enum over every emitted resource type.

use crate::medication_request::MedicationRequest;
use crate::message_header::MessageHeader;
use crate::participant::{Organization, Practitioner, PractitionerRole};
use crate::patient::Patient;
use crate::render::{self, Format};
use crate::{FhirResult, ResourceId};
use serde::{Deserialize, Serialize};

/// Any resource the converter can emit.
///
/// Serialises with a leading `resourceType` member, as FHIR JSON requires.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "resourceType")]
pub enum Resource {
    Bundle(Bundle),
    MessageHeader(MessageHeader),
    Patient(Patient),
    Practitioner(Practitioner),
    Organization(Organization),
    PractitionerRole(PractitionerRole),
    MedicationRequest(MedicationRequest),
}

impl Resource {
    pub fn id(&self) -> ResourceId {
        match self {
            Resource::Bundle(r) => r.id,
            Resource::MessageHeader(r) => r.id,
            Resource::Patient(r) => r.id,
            Resource::Practitioner(r) => r.id,
            Resource::Organization(r) => r.id,
            Resource::PractitionerRole(r) => r.id,
            Resource::MedicationRequest(r) => r.id,
        }
    }

    pub fn resource_type(&self) -> &'static str {
        match self {
            Resource::Bundle(_) => "Bundle",
            Resource::MessageHeader(_) => "MessageHeader",
            Resource::Patient(_) => "Patient",
            Resource::Practitioner(_) => "Practitioner",
            Resource::Organization(_) => "Organization",
            Resource::PractitionerRole(_) => "PractitionerRole",
            Resource::MedicationRequest(_) => "MedicationRequest",
        }
    }

    /// Render this resource as a complete document in the given format.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FhirError`] if serialisation fails.
    pub fn render(&self, format: Format) -> FhirResult<String> {
        match format {
            Format::Json => render::to_json(self),
            Format::Xml => render::to_xml(self),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleType {
    Message,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    pub id: ResourceId,
    #[serde(rename = "type")]
    pub bundle_type: BundleType,
    #[serde(default)]
    pub entry: Vec<BundleEntry>,
}

impl Bundle {
    pub fn message(id: ResourceId) -> Self {
        Self {
            id,
            bundle_type: BundleType::Message,
            entry: Vec::new(),
        }
    }

    /// Append a resource, addressed by its `urn:uuid:` full URL.
    pub fn push(&mut self, resource: Resource) {
        self.entry.push(BundleEntry {
            full_url: resource.id().urn(),
            resource,
        });
    }

    /// Look up an entry by the full URL an internal reference points at.
    pub fn resolve(&self, full_url: &str) -> Option<&Resource> {
        self.entry
            .iter()
            .find(|e| e.full_url == full_url)
            .map(|e| &e.resource)
    }

    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.entry.iter().map(|e| &e.resource)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    pub full_url: String,
    pub resource: Resource,
}
