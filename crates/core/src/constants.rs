//! Constants used throughout the EPS core crate.
//!
//! Column positions of the two flat-file schemas live here so that record decoding is the
//! only place positional offsets are ever used.

/// Number of columns in a prescription (header) record.
pub const PRESCRIPTION_FIELD_COUNT: usize = 94;

/// Number of columns in a line-item record.
pub const LINE_ITEM_FIELD_COUNT: usize = 18;

/// Number of columns in one embedded participant block.
pub const PARTICIPANT_BLOCK_WIDTH: usize = 17;

/// Field delimiter of both flat files.
pub const FIELD_DELIMITER: char = '\t';

/// Event code carried by every message header.
pub const PRESCRIPTION_ORDER_EVENT: &str = "prescription-order";

/// Display text of [`PRESCRIPTION_ORDER_EVENT`].
pub const PRESCRIPTION_ORDER_DISPLAY: &str = "Prescription Order";

/// Prescription type code for GP prescribing.
pub const GP_PRESCRIBING_TYPE: &str = "0001";

/// Display text of [`GP_PRESCRIBING_TYPE`].
pub const GP_PRESCRIBING_DISPLAY: &str = "General Practitioner Prescribing";

/// NHS number verification status code for a verified number.
pub const NHS_NUMBER_VERIFIED_CODE: &str = "01";

/// Display text of [`NHS_NUMBER_VERIFIED_CODE`].
pub const NHS_NUMBER_VERIFIED_DISPLAY: &str = "Number present and verified";

/// Column positions in a prescription record.
pub mod prescription_columns {
    pub const ID: usize = 0;
    pub const URGENT: usize = 1;
    pub const PATIENT_ID: usize = 2;
    pub const PATIENT_ADDRESS_LINE_1: usize = 3;
    pub const PATIENT_ADDRESS_POSTCODE: usize = 8;
    pub const PATIENT_NAME_TITLE: usize = 13;
    pub const PATIENT_GIVEN_NAME_1: usize = 14;
    pub const PATIENT_GIVEN_NAME_2: usize = 15;
    pub const PATIENT_SURNAME: usize = 16;
    pub const PATIENT_GENDER: usize = 21;
    pub const PATIENT_BIRTH_TIME: usize = 22;
    pub const PATIENT_PRIMARY_CARE_PROVIDER_SDS_ID: usize = 24;
    pub const REPEAT_NUMBER: usize = 25;
    pub const MAX_REPEAT_PRESCRIPTIONS: usize = 26;
    pub const MAX_REPEAT_DISPENSES: usize = 27;
    pub const DAYS_SUPPLY_FROM: usize = 28;
    pub const DAYS_SUPPLY_TO: usize = 29;
    pub const EXPECTED_USE: usize = 30;
    pub const TOKEN_ISSUED: usize = 31;
    pub const PRESCRIPTION_TREATMENT_TYPE: usize = 32;
    pub const PRESCRIPTION_TYPE: usize = 33;
    pub const REVIEW_DATE: usize = 37;
    pub const ORIGINAL_PRESCRIPTION_REFERENCE: usize = 38;
    pub const NOMINATED_PHARMACY_ID: usize = 39;
    pub const DISPENSING_SITE_PREFERENCE: usize = 40;
    pub const AUTHOR_BLOCK: usize = 41;
    pub const RESPONSIBLE_PARTY_BLOCK: usize = 58;
    pub const LEGAL_AUTHENTICATOR_BLOCK: usize = 75;
    pub const HANDLING: usize = 92;
    pub const PRESCRIPTION_CLINICAL_STATEMENT_ID: usize = 93;
}

/// Column positions relative to the start of a participant block.
pub mod participant_columns {
    pub const ROLE_PROFILE: usize = 0;
    pub const JOB_CODE: usize = 1;
    pub const SDS_USER_ID: usize = 2;
    pub const PERSON_NAME: usize = 3;
    pub const PERSON_TELECOM: usize = 4;
    pub const SDS_ORGANISATION_ID: usize = 5;
    pub const ORGANISATION_NAME: usize = 6;
    pub const ORGANISATION_TYPE: usize = 7;
    pub const ORGANISATION_TELECOM: usize = 8;
    pub const ORGANISATION_ADDRESS_LINE_1: usize = 9;
    pub const ORGANISATION_POSTCODE: usize = 14;
    pub const PARENT_ORGANISATION_SDS_ID: usize = 15;
    pub const PARTICIPATION_TIME: usize = 16;
}

/// Column positions in a line-item record.
pub mod line_item_columns {
    pub const PRESCRIPTION_ID: usize = 0;
    pub const SUBSTANCE_CODE: usize = 1;
    pub const DISPLAY_NAME: usize = 2;
    pub const ORIGINAL_TEXT: usize = 3;
    pub const QUANTITY_TEXT: usize = 4;
    pub const QUANTITY_CODE: usize = 5;
    pub const QUANTITY_COUNT: usize = 6;
    pub const DOSAGE_INSTRUCTIONS: usize = 7;
    pub const ADDITIONAL_INSTRUCTIONS: usize = 8;
    pub const ORIGINAL_ITEM_REF: usize = 9;
    pub const PRESCRIBER_ENDORSEMENT: usize = 10;
    pub const INTENDED_MEDICATION_REF: usize = 11;
    pub const INTENDED_MEDICATION_MOOD: usize = 12;
    pub const DOSE_QUANTITY: usize = 13;
    pub const RATE_QUANTITY: usize = 14;
    pub const ITEM_REPEAT_NUMBER: usize = 15;
    pub const MAX_REPEATS: usize = 16;
    pub const LINE_ITEM_ID: usize = 17;
}

/// Number of address lines in both patient and organisation addresses.
pub const ADDRESS_LINE_COUNT: usize = 5;
