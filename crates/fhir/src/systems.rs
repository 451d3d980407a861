//! Naming-system, code-system and extension URLs used by EPS prescription messages.

// Identifier systems
pub const SDS_USER_ID: &str = "https://fhir.nhs.uk/Id/sds-user-id";
pub const SDS_ROLE_PROFILE_ID: &str = "https://fhir.nhs.uk/Id/sds-role-profile-id";
pub const ODS_ORGANIZATION_CODE: &str = "https://fhir.nhs.uk/Id/ods-organization-code";
pub const NHS_NUMBER: &str = "https://fhir.nhs.uk/Id/nhs-number";
pub const PRESCRIPTION_LINE_ID: &str = "https://fhir.nhs.uk/Id/prescription-line-id";
pub const PRESCRIPTION_SHORT_FORM: &str = "https://fhir.nhs.uk/Id/prescription-short-form";
pub const PRESCRIPTION_ID: &str = "https://fhir.nhs.uk/Id/prescription";
pub const SPINE_ASID: &str = "https://fhir.nhs.uk/Id/spine-ASID";

// Code systems
pub const SNOMED_CT: &str = "http://snomed.info/sct";
pub const ORGANISATION_TYPE: &str = "https://fhir.nhs.uk/R4/CodeSystem/organisation-type";
pub const MESSAGE_EVENT: &str = "https://fhir.nhs.uk/R4/CodeSystem/message-event";
pub const PRESCRIPTION_TYPE: &str = "https://fhir.nhs.uk/R4/CodeSystem/prescription-type";
pub const COURSE_OF_THERAPY_TYPE: &str =
    "https://fhir.nhs.uk/R4/CodeSystem/UKCore-PrescriptionType";
pub const DISPENSING_SITE_PREFERENCE: &str =
    "https://fhir.nhs.uk/R4/CodeSystem/dispensing-site-preference";
pub const NHS_NUMBER_VERIFICATION_STATUS: &str =
    "https://fhir.nhs.uk/R4/CodeSystem/UKCore-NHSNumberVerificationStatus";

// Extensions
pub const EXT_SPINE_ENDPOINT: &str =
    "https://fhir.nhs.uk/R4/StructureDefinition/Extension-spineEndpoint";
pub const EXT_PRESCRIPTION_TYPE: &str =
    "https://fhir.nhs.uk/R4/StructureDefinition/Extension-prescriptionType";
pub const EXT_RESPONSIBLE_PRACTITIONER: &str =
    "https://fhir.nhs.uk/R4/StructureDefinition/Extension-DM-ResponsiblePractitioner";
pub const EXT_PRESCRIPTION_ID: &str =
    "https://fhir.nhs.uk/R4/StructureDefinition/Extension-PrescriptionId";
pub const EXT_PERFORMER_TYPE: &str =
    "https://fhir.nhs.uk/R4/StructureDefinition/Extension-performerType";
pub const EXT_NHS_NUMBER_VERIFICATION_STATUS: &str =
    "https://fhir.nhs.uk/R4/StructureDefinition/Extension-UKCore-NHSNumberVerificationStatus";

/// XML namespace of every FHIR resource document.
pub const FHIR_XML_NS: &str = "http://hl7.org/fhir";
