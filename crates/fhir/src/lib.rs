//! FHIR R4 wire support for EPS prescription-order messages.
//!
//! This crate provides the **wire models** for the resources emitted by the converter and the
//! **rendering** of those resources into the two supported document representations:
//! - pretty-printed FHIR JSON
//! - FHIR XML (`http://hl7.org/fhir` namespace)
//!
//! This crate focuses on:
//! - FHIR structural alignment (element names and element order)
//! - serialisation of complete resources
//! - small constructors for the recurring data types (identifiers, codings, references)
//!
//! Coded values are opaque pass-through: no terminology lookup or profile validation happens
//! here.

pub mod bundle;
pub mod datatypes;
pub mod medication_request;
pub mod message_header;
pub mod participant;
pub mod patient;
pub mod render;
pub mod systems;

// Re-export facades
pub use bundle::{Bundle, BundleEntry, BundleType, Resource};
pub use datatypes::{
    Address, AddressUse, CodeableConcept, Coding, ContactPoint, ContactPointSystem,
    ContactPointUse, Extension, ExtensionValue, HumanName, Identifier, NameUse, Quantity,
    Reference,
};
pub use medication_request::{
    DispenseRequest, Dosage, MedicationRequest, MedicationRequestIntent, MedicationRequestStatus,
};
pub use message_header::{MessageHeader, MessageSource};
pub use participant::{Organization, Practitioner, PractitionerRole};
pub use patient::{AdministrativeGender, Patient};
pub use render::Format;

// Re-export the identifier type used by every resource.
pub use eps_uuid::ResourceId;

/// Errors returned by the `fhir` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum FhirError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML rendering failed: {0}")]
    Xml(String),

    #[error("translation error: {0}")]
    Translation(String),
}

/// Type alias for Results that can fail with a [`FhirError`].
pub type FhirResult<T> = Result<T, FhirError>;
