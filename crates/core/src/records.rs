//! Typed views over decoded flat-file rows.
//!
//! Rows arrive as positional field sequences. They are decoded once, here, into structs with
//! named fields; nothing downstream indexes by column number. Missing trailing columns decode
//! as empty text.

use crate::constants::{
    line_item_columns as item, participant_columns as block, prescription_columns as rx,
    ADDRESS_LINE_COUNT,
};

fn field(fields: &[String], index: usize) -> String {
    fields.get(index).cloned().unwrap_or_default()
}

fn address_lines(fields: &[String], first: usize) -> [String; ADDRESS_LINE_COUNT] {
    std::array::from_fn(|i| field(fields, first + i))
}

/// Which of the three embedded participant blocks to read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticipantRole {
    Author,
    ResponsibleParty,
    LegalAuthenticator,
}

impl ParticipantRole {
    /// Column at which this participant's block starts.
    pub fn offset(self) -> usize {
        match self {
            ParticipantRole::Author => rx::AUTHOR_BLOCK,
            ParticipantRole::ResponsibleParty => rx::RESPONSIBLE_PARTY_BLOCK,
            ParticipantRole::LegalAuthenticator => rx::LEGAL_AUTHENTICATOR_BLOCK,
        }
    }
}

/// The fixed 17-column practitioner / organisation / role group.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParticipantBlock {
    pub role_profile_id: String,
    pub job_code: String,
    pub sds_user_id: String,
    pub person_name: String,
    pub person_telecom: String,
    pub ods_code: String,
    pub organisation_name: String,
    pub organisation_type: String,
    pub organisation_telecom: String,
    pub address_lines: [String; ADDRESS_LINE_COUNT],
    pub postcode: String,
    pub parent_ods_code: String,
    pub participation_time: String,
}

impl ParticipantBlock {
    /// Read the block whose first column is `offset`.
    pub fn parse(fields: &[String], offset: usize) -> Self {
        let at = |column: usize| field(fields, offset + column);
        Self {
            role_profile_id: at(block::ROLE_PROFILE),
            job_code: at(block::JOB_CODE),
            sds_user_id: at(block::SDS_USER_ID),
            person_name: at(block::PERSON_NAME),
            person_telecom: at(block::PERSON_TELECOM),
            ods_code: at(block::SDS_ORGANISATION_ID),
            organisation_name: at(block::ORGANISATION_NAME),
            organisation_type: at(block::ORGANISATION_TYPE),
            organisation_telecom: at(block::ORGANISATION_TELECOM),
            address_lines: address_lines(fields, offset + block::ORGANISATION_ADDRESS_LINE_1),
            postcode: at(block::ORGANISATION_POSTCODE),
            parent_ods_code: at(block::PARENT_ORGANISATION_SDS_ID),
            participation_time: at(block::PARTICIPATION_TIME),
        }
    }
}

/// Patient demographic columns of a prescription record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatientDemographics {
    pub nhs_number: String,
    pub address_lines: [String; ADDRESS_LINE_COUNT],
    pub postcode: String,
    pub title: String,
    pub given_name_1: String,
    pub given_name_2: String,
    pub surname: String,
    pub gender_code: String,
    pub birth_time: String,
    pub gp_ods_code: String,
}

/// Repeat and supply-period columns of a prescription record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RepeatSchedule {
    pub repeat_number: String,
    pub max_repeat_prescriptions: String,
    pub max_repeat_dispenses: String,
    pub days_supply_from: String,
    pub days_supply_to: String,
    pub expected_use: String,
    pub review_date: String,
}

/// One prescription (header) row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrescriptionRecord {
    pub id: String,
    pub urgent: String,
    pub patient: PatientDemographics,
    pub repeats: RepeatSchedule,
    pub token_issued: String,
    pub treatment_type: String,
    pub prescription_type: String,
    pub original_prescription_reference: String,
    pub nominated_pharmacy_id: String,
    pub dispensing_site_preference: String,
    pub author: ParticipantBlock,
    pub responsible_party: ParticipantBlock,
    pub legal_authenticator: ParticipantBlock,
    pub handling: String,
    pub clinical_statement_id: String,
}

impl PrescriptionRecord {
    pub fn from_fields(fields: &[String]) -> Self {
        Self {
            id: field(fields, rx::ID),
            urgent: field(fields, rx::URGENT),
            patient: PatientDemographics {
                nhs_number: field(fields, rx::PATIENT_ID),
                address_lines: address_lines(fields, rx::PATIENT_ADDRESS_LINE_1),
                postcode: field(fields, rx::PATIENT_ADDRESS_POSTCODE),
                title: field(fields, rx::PATIENT_NAME_TITLE),
                given_name_1: field(fields, rx::PATIENT_GIVEN_NAME_1),
                given_name_2: field(fields, rx::PATIENT_GIVEN_NAME_2),
                surname: field(fields, rx::PATIENT_SURNAME),
                gender_code: field(fields, rx::PATIENT_GENDER),
                birth_time: field(fields, rx::PATIENT_BIRTH_TIME),
                gp_ods_code: field(fields, rx::PATIENT_PRIMARY_CARE_PROVIDER_SDS_ID),
            },
            repeats: RepeatSchedule {
                repeat_number: field(fields, rx::REPEAT_NUMBER),
                max_repeat_prescriptions: field(fields, rx::MAX_REPEAT_PRESCRIPTIONS),
                max_repeat_dispenses: field(fields, rx::MAX_REPEAT_DISPENSES),
                days_supply_from: field(fields, rx::DAYS_SUPPLY_FROM),
                days_supply_to: field(fields, rx::DAYS_SUPPLY_TO),
                expected_use: field(fields, rx::EXPECTED_USE),
                review_date: field(fields, rx::REVIEW_DATE),
            },
            token_issued: field(fields, rx::TOKEN_ISSUED),
            treatment_type: field(fields, rx::PRESCRIPTION_TREATMENT_TYPE),
            prescription_type: field(fields, rx::PRESCRIPTION_TYPE),
            original_prescription_reference: field(fields, rx::ORIGINAL_PRESCRIPTION_REFERENCE),
            nominated_pharmacy_id: field(fields, rx::NOMINATED_PHARMACY_ID),
            dispensing_site_preference: field(fields, rx::DISPENSING_SITE_PREFERENCE),
            author: ParticipantBlock::parse(fields, ParticipantRole::Author.offset()),
            responsible_party: ParticipantBlock::parse(
                fields,
                ParticipantRole::ResponsibleParty.offset(),
            ),
            legal_authenticator: ParticipantBlock::parse(
                fields,
                ParticipantRole::LegalAuthenticator.offset(),
            ),
            handling: field(fields, rx::HANDLING),
            clinical_statement_id: field(fields, rx::PRESCRIPTION_CLINICAL_STATEMENT_ID),
        }
    }

    pub fn participant(&self, role: ParticipantRole) -> &ParticipantBlock {
        match role {
            ParticipantRole::Author => &self.author,
            ParticipantRole::ResponsibleParty => &self.responsible_party,
            ParticipantRole::LegalAuthenticator => &self.legal_authenticator,
        }
    }
}

/// One line-item row: a single medication order within a prescription.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineItemRecord {
    /// Owning prescription, not the line's own id.
    pub prescription_id: String,
    pub substance_code: String,
    pub display_name: String,
    pub original_text: String,
    pub quantity_text: String,
    pub quantity_code: String,
    pub quantity_count: String,
    pub dosage_instructions: String,
    pub additional_instructions: String,
    pub original_item_ref: String,
    pub prescriber_endorsement: String,
    pub intended_medication_ref: String,
    pub intended_medication_mood: String,
    pub dose_quantity: String,
    pub rate_quantity: String,
    /// Which issue of a repeat this line is.
    pub item_repeat_number: String,
    pub max_repeats: String,
    pub line_item_id: String,
}

impl LineItemRecord {
    pub fn from_fields(fields: &[String]) -> Self {
        Self {
            prescription_id: field(fields, item::PRESCRIPTION_ID),
            substance_code: field(fields, item::SUBSTANCE_CODE),
            display_name: field(fields, item::DISPLAY_NAME),
            original_text: field(fields, item::ORIGINAL_TEXT),
            quantity_text: field(fields, item::QUANTITY_TEXT),
            quantity_code: field(fields, item::QUANTITY_CODE),
            quantity_count: field(fields, item::QUANTITY_COUNT),
            dosage_instructions: field(fields, item::DOSAGE_INSTRUCTIONS),
            additional_instructions: field(fields, item::ADDITIONAL_INSTRUCTIONS),
            original_item_ref: field(fields, item::ORIGINAL_ITEM_REF),
            prescriber_endorsement: field(fields, item::PRESCRIBER_ENDORSEMENT),
            intended_medication_ref: field(fields, item::INTENDED_MEDICATION_REF),
            intended_medication_mood: field(fields, item::INTENDED_MEDICATION_MOOD),
            dose_quantity: field(fields, item::DOSE_QUANTITY),
            rate_quantity: field(fields, item::RATE_QUANTITY),
            item_repeat_number: field(fields, item::ITEM_REPEAT_NUMBER),
            max_repeats: field(fields, item::MAX_REPEATS),
            line_item_id: field(fields, item::LINE_ITEM_ID),
        }
    }
}
