//! Bundle Assembler: builds the prescription-order graph for one prescription id.
//!
//! For each prescription the assembler:
//! - resolves the author participant triple and deduplicates it through the identity cache
//! - builds the patient and deduplicates it by NHS number
//! - builds the message header from the run's endpoint configuration
//! - builds one medication request per line item, in file order
//!
//! Every graph is self-contained: shared entities are always present in the bundle, carrying
//! the identifier the cache settled on. Only the entities first seen in this graph are
//! flagged for separate emission.

use crate::config::EndpointConfig;
use crate::constants::{
    NHS_NUMBER_VERIFIED_CODE, NHS_NUMBER_VERIFIED_DISPLAY, PRESCRIPTION_ORDER_DISPLAY,
    PRESCRIPTION_ORDER_EVENT,
};
use crate::fields::{self, CourseOfTherapy, FieldOutcome};
use crate::identity::{EntityKind, IdentityCache, Resolution};
use crate::participant::{self, build_address, ParticipantDrafts};
use crate::records::{LineItemRecord, ParticipantRole, PrescriptionRecord};
use crate::store::RecordStore;
use crate::ConversionResult;
use chrono::NaiveDate;
use eps_types::NaturalKey;
use eps_uuid::{IdSource, ResourceId};
use fhir::systems;
use fhir::{
    AddressUse, Bundle, Coding, DispenseRequest, Dosage, Extension, ExtensionValue, HumanName,
    Identifier, MedicationRequest, MedicationRequestIntent, MedicationRequestStatus,
    MessageHeader, MessageSource, NameUse, Organization, Patient, Practitioner,
    PractitionerRole, Quantity, Reference, Resource,
};

/// The assembled graph for one prescription.
#[derive(Clone, Debug)]
pub struct PrescriptionGraph {
    pub bundle_id: ResourceId,
    pub header: MessageHeader,
    pub patient: Patient,
    pub practitioner: Practitioner,
    pub organisation: Organization,
    pub role: PractitionerRole,
    pub medication_requests: Vec<MedicationRequest>,
    /// Shared entities first seen in this graph.
    pub newly_assigned: Vec<EntityKind>,
    pub cache_hits: usize,
    pub field_warnings: usize,
}

impl PrescriptionGraph {
    /// Shared entities to persist once, in practitioner, organisation, role, patient order.
    pub fn shared_to_emit(&self) -> Vec<Resource> {
        EntityKind::ALL
            .into_iter()
            .filter(|kind| self.newly_assigned.contains(kind))
            .map(|kind| match kind {
                EntityKind::Practitioner => Resource::Practitioner(self.practitioner.clone()),
                EntityKind::Organisation => Resource::Organization(self.organisation.clone()),
                EntityKind::Role => Resource::PractitionerRole(self.role.clone()),
                EntityKind::Patient => Resource::Patient(self.patient.clone()),
            })
            .collect()
    }

    /// Message bundle with entries ordered header, patient, practitioner, organisation, role
    /// and then the medication requests.
    pub fn into_bundle(self) -> Bundle {
        let mut bundle = Bundle::message(self.bundle_id);
        bundle.push(Resource::MessageHeader(self.header));
        bundle.push(Resource::Patient(self.patient));
        bundle.push(Resource::Practitioner(self.practitioner));
        bundle.push(Resource::Organization(self.organisation));
        bundle.push(Resource::PractitionerRole(self.role));
        for request in self.medication_requests {
            bundle.push(Resource::MedicationRequest(request));
        }
        bundle
    }
}

/// Counts and logs field defaults for one prescription.
struct FieldLog<'a> {
    prescription_id: &'a str,
    warnings: usize,
}

impl FieldLog<'_> {
    fn settle<T>(&mut self, field: &'static str, outcome: FieldOutcome<T>) -> T {
        if let Some(reason) = outcome.reason() {
            tracing::warn!(prescription = %self.prescription_id, field, "{reason}");
            self.warnings += 1;
        }
        outcome.into_value()
    }
}

pub struct BundleAssembler<'a> {
    endpoint: &'a EndpointConfig,
    ids: &'a dyn IdSource,
    cache: &'a IdentityCache,
    run_date: NaiveDate,
}

impl<'a> BundleAssembler<'a> {
    /// `run_date` is the fallback for unparsable birth dates, fixed once per run.
    pub fn new(
        endpoint: &'a EndpointConfig,
        ids: &'a dyn IdSource,
        cache: &'a IdentityCache,
        run_date: NaiveDate,
    ) -> Self {
        Self {
            endpoint,
            ids,
            cache,
            run_date,
        }
    }

    /// Assemble the graph for `prescription_id`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConversionError::MissingPrescription`] if the id is not in `store`.
    pub fn assemble(
        &self,
        store: &RecordStore,
        prescription_id: &str,
    ) -> ConversionResult<PrescriptionGraph> {
        let record = store.prescription(prescription_id)?;
        let items = store.line_items(prescription_id);
        let mut log = FieldLog {
            prescription_id,
            warnings: 0,
        };
        let mut newly_assigned = Vec::new();
        let mut cache_hits = 0;
        let mut settle = |kind: EntityKind, resolution: Resolution| {
            if resolution.newly_assigned {
                newly_assigned.push(kind);
            } else {
                cache_hits += 1;
            }
            resolution.id
        };

        let bundle_id = self.ids.next_id();

        let mut author = participant::resolve(record, ParticipantRole::Author, self.ids);
        let practitioner_id = settle(
            EntityKind::Practitioner,
            self.cache.resolve_or_assign(
                EntityKind::Practitioner,
                author.keys.practitioner.as_ref(),
                author.practitioner.id,
            ),
        );
        let organisation_id = settle(
            EntityKind::Organisation,
            self.cache.resolve_or_assign(
                EntityKind::Organisation,
                author.keys.organisation.as_ref(),
                author.organisation.id,
            ),
        );
        let role_id = settle(
            EntityKind::Role,
            self.cache.resolve_or_assign(
                EntityKind::Role,
                author.keys.role.as_ref(),
                author.role.id,
            ),
        );
        author.rebind(practitioner_id, organisation_id, role_id);

        let mut patient = self.build_patient(record, &mut log);
        patient.id = settle(
            EntityKind::Patient,
            self.cache.resolve_or_assign(
                EntityKind::Patient,
                NaturalKey::new(&record.patient.nhs_number).as_ref(),
                patient.id,
            ),
        );

        let nominated = nominated_pharmacy(record);
        let medication_requests: Vec<MedicationRequest> = items
            .iter()
            .map(|item| {
                self.build_medication_request(
                    record,
                    item,
                    &author,
                    &patient.id,
                    nominated.as_ref(),
                    &mut log,
                )
            })
            .collect();

        let mut header = self.build_header(&author);
        header.focus = medication_requests
            .iter()
            .map(|request| Reference::internal(&request.id))
            .chain([
                Reference::internal(&patient.id),
                Reference::internal(&author.role.id),
            ])
            .collect();

        tracing::debug!(
            prescription = %prescription_id,
            line_items = medication_requests.len(),
            "assembled prescription bundle"
        );

        let ParticipantDrafts {
            practitioner,
            organisation,
            role,
            ..
        } = author;

        Ok(PrescriptionGraph {
            bundle_id,
            header,
            patient,
            practitioner,
            organisation,
            role,
            medication_requests,
            newly_assigned,
            cache_hits,
            field_warnings: log.warnings,
        })
    }

    fn build_patient(&self, record: &PrescriptionRecord, log: &mut FieldLog<'_>) -> Patient {
        let demographics = &record.patient;

        let mut name = HumanName {
            use_type: Some(NameUse::Official),
            family: Some(demographics.surname.clone()),
            ..HumanName::default()
        };
        if !demographics.title.trim().is_empty() {
            name.prefix.push(demographics.title.clone());
        }
        name.given.push(demographics.given_name_1.clone());
        if !demographics.given_name_2.trim().is_empty() {
            name.given.push(demographics.given_name_2.clone());
        }

        let verification = Coding::new(
            systems::NHS_NUMBER_VERIFICATION_STATUS,
            NHS_NUMBER_VERIFIED_CODE,
        )
        .with_display(NHS_NUMBER_VERIFIED_DISPLAY);
        let nhs_number = Identifier::new(systems::NHS_NUMBER, &demographics.nhs_number)
            .with_extension(Extension::new(
                systems::EXT_NHS_NUMBER_VERIFICATION_STATUS,
                ExtensionValue::CodeableConcept(verification.into()),
            ));

        let gp = demographics.gp_ods_code.trim();

        Patient {
            id: self.ids.next_id(),
            identifier: vec![nhs_number],
            name: vec![name],
            gender: log.settle("gender", fields::gender(&demographics.gender_code)),
            birth_date: log.settle(
                "birth date",
                fields::birth_date(&demographics.birth_time, self.run_date),
            ),
            address: vec![build_address(
                &demographics.address_lines,
                &demographics.postcode,
                Some(AddressUse::Home),
            )],
            managing_organization: (!gp.is_empty())
                .then(|| Reference::natural_key(systems::ODS_ORGANIZATION_CODE, gp)),
        }
    }

    fn build_header(&self, author: &ParticipantDrafts) -> MessageHeader {
        MessageHeader {
            id: self.ids.next_id(),
            event_coding: Coding::new(systems::MESSAGE_EVENT, PRESCRIPTION_ORDER_EVENT)
                .with_display(PRESCRIPTION_ORDER_DISPLAY),
            sender: author.role_reference(),
            source: MessageSource {
                extension: vec![Extension::new(
                    systems::EXT_SPINE_ENDPOINT,
                    ExtensionValue::Identifier(Identifier::new(
                        systems::SPINE_ASID,
                        self.endpoint.asid().as_str(),
                    )),
                )],
                name: self.endpoint.ods().to_string(),
                endpoint: self.endpoint.url().to_string(),
            },
            focus: Vec::new(),
        }
    }

    fn build_medication_request(
        &self,
        record: &PrescriptionRecord,
        item: &LineItemRecord,
        author: &ParticipantDrafts,
        patient_id: &ResourceId,
        nominated: Option<&Reference>,
        log: &mut FieldLog<'_>,
    ) -> MedicationRequest {
        let prescription_type = {
            let coding = Coding::new(systems::PRESCRIPTION_TYPE, &record.prescription_type);
            match fields::prescription_type_display(&record.prescription_type) {
                Some(display) => coding.with_display(display),
                None => coding,
            }
        };

        let medication = {
            let coding = Coding::new(systems::SNOMED_CT, &item.substance_code);
            if item.display_name.trim().is_empty() {
                coding
            } else {
                coding.with_display(&item.display_name)
            }
        };

        let course = CourseOfTherapy::from_treatment_type(&record.treatment_type);

        let group_identifier = Identifier::new(systems::PRESCRIPTION_SHORT_FORM, &record.id)
            .with_extension(Extension::new(
                systems::EXT_PRESCRIPTION_ID,
                ExtensionValue::Identifier(Identifier::new(
                    systems::PRESCRIPTION_ID,
                    &record.clinical_statement_id,
                )),
            ));

        let dosage = Dosage {
            text: non_blank(&item.dosage_instructions),
            patient_instruction: non_blank(&item.additional_instructions),
        };

        let quantity = log
            .settle("quantity count", fields::quantity(&item.quantity_count))
            .map(|value| Quantity {
                value,
                unit: item.quantity_text.clone(),
                system: systems::SNOMED_CT.to_string(),
                code: item.quantity_code.clone(),
            });

        MedicationRequest {
            id: self.ids.next_id(),
            extension: vec![
                Extension::new(
                    systems::EXT_PRESCRIPTION_TYPE,
                    ExtensionValue::Coding(prescription_type),
                ),
                Extension::new(
                    systems::EXT_RESPONSIBLE_PRACTITIONER,
                    ExtensionValue::Reference(Reference::internal(&author.role.id)),
                ),
            ],
            identifier: vec![Identifier::new(
                systems::PRESCRIPTION_LINE_ID,
                &item.line_item_id,
            )],
            status: MedicationRequestStatus::Active,
            intent: MedicationRequestIntent::Order,
            medication_codeable_concept: medication.into(),
            subject: Reference::internal(patient_id),
            authored_on: record.author.participation_time.clone(),
            requester: author.role_reference(),
            group_identifier,
            course_of_therapy_type: Coding::new(systems::COURSE_OF_THERAPY_TYPE, course.code())
                .with_display(course.display())
                .into(),
            dosage_instruction: if dosage == Dosage::default() {
                Vec::new()
            } else {
                vec![dosage]
            },
            dispense_request: DispenseRequest {
                extension: vec![Extension::new(
                    systems::EXT_PERFORMER_TYPE,
                    ExtensionValue::Coding(Coding::new(
                        systems::DISPENSING_SITE_PREFERENCE,
                        &record.dispensing_site_preference,
                    )),
                )],
                quantity,
                performer: nominated.cloned(),
            },
        }
    }
}

/// Natural-key reference to the nominated pharmacy, if one is nominated.
fn nominated_pharmacy(record: &PrescriptionRecord) -> Option<Reference> {
    let ods = record.nominated_pharmacy_id.trim();
    (!ods.is_empty()).then(|| Reference::natural_key(systems::ODS_ORGANIZATION_CODE, ods))
}

fn non_blank(text: &str) -> Option<String> {
    (!text.trim().is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{line_item_columns as item, prescription_columns as rx};
    use crate::records::fixtures::{line_item_fields, prescription_fields, to_line};
    use eps_uuid::SequentialIds;
    use std::io::Cursor;

    fn endpoint() -> EndpointConfig {
        EndpointConfig::from_raw("200000001234", "X26", "https://example.org/eps")
            .expect("endpoint")
    }

    fn run_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).expect("valid date")
    }

    fn store(prescriptions: &[Vec<String>], items: &[Vec<String>]) -> RecordStore {
        let rx: Vec<String> = prescriptions.iter().map(|f| to_line(f)).collect();
        let it: Vec<String> = items.iter().map(|f| to_line(f)).collect();
        RecordStore::load_from_readers(Cursor::new(rx.join("\n")), Cursor::new(it.join("\n")))
            .expect("load")
    }

    fn assemble_all(store: &RecordStore) -> Vec<PrescriptionGraph> {
        let endpoint = endpoint();
        let ids = SequentialIds::new();
        let cache = IdentityCache::new();
        let assembler = BundleAssembler::new(&endpoint, &ids, &cache, run_date());
        store
            .prescription_ids()
            .map(|id| assembler.assemble(store, id).expect("assemble"))
            .collect()
    }

    fn single(rx_fields: Vec<String>, items: &[Vec<String>]) -> PrescriptionGraph {
        let store = store(&[rx_fields], items);
        assemble_all(&store).remove(0)
    }

    #[test]
    fn entry_order_and_cardinality() {
        let graph = single(
            prescription_fields("RX1"),
            &[line_item_fields("RX1", "L1"), line_item_fields("RX1", "L2")],
        );
        let bundle = graph.into_bundle();
        let types: Vec<&str> = bundle.resources().map(Resource::resource_type).collect();
        assert_eq!(
            types,
            [
                "MessageHeader",
                "Patient",
                "Practitioner",
                "Organization",
                "PractitionerRole",
                "MedicationRequest",
                "MedicationRequest"
            ]
        );
    }

    #[test]
    fn prescription_without_items_still_yields_a_bundle() {
        let graph = single(prescription_fields("RX1"), &[]);
        assert!(graph.medication_requests.is_empty());
        assert_eq!(graph.header.focus.len(), 2);
        assert_eq!(graph.into_bundle().entry.len(), 5);
    }

    #[test]
    fn every_internal_reference_resolves_within_the_bundle() {
        let graph = single(
            prescription_fields("RX1"),
            &[line_item_fields("RX1", "L1"), line_item_fields("RX1", "L2")],
        );
        let bundle = graph.into_bundle();
        let json = serde_json::to_value(&bundle).expect("serialise");
        let mut targets = Vec::new();
        collect_references(&json, &mut targets);
        assert!(!targets.is_empty());
        for target in targets {
            assert!(bundle.resolve(&target).is_some(), "dangling reference {target}");
        }
    }

    fn collect_references(value: &serde_json::Value, out: &mut Vec<String>) {
        match value {
            serde_json::Value::Object(members) => {
                for (name, member) in members {
                    match (name.as_str(), member) {
                        ("reference", serde_json::Value::String(target)) => {
                            out.push(target.clone())
                        }
                        _ => collect_references(member, out),
                    }
                }
            }
            serde_json::Value::Array(items) => {
                items.iter().for_each(|item| collect_references(item, out))
            }
            _ => {}
        }
    }

    #[test]
    fn header_carries_endpoint_sender_and_focus_order() {
        let graph = single(prescription_fields("RX1"), &[line_item_fields("RX1", "L1")]);
        let header = &graph.header;
        assert_eq!(header.event_coding.code, "prescription-order");
        assert_eq!(header.source.name, "X26");
        assert_eq!(header.source.endpoint, "https://example.org/eps");
        match &header.source.extension[0].value {
            ExtensionValue::Identifier(asid) => assert_eq!(asid.value, "200000001234"),
            other => panic!("expected identifier extension, got {other:?}"),
        }
        assert_eq!(header.sender.target(), Some(graph.role.id.urn().as_str()));
        assert_eq!(header.sender.display.as_deref(), Some("DR A SMITH"));

        let focus: Vec<Option<&str>> = header.focus.iter().map(Reference::target).collect();
        let expected = [
            graph.medication_requests[0].id.urn(),
            graph.patient.id.urn(),
            graph.role.id.urn(),
        ];
        assert_eq!(
            focus,
            expected.iter().map(|s| Some(s.as_str())).collect::<Vec<_>>()
        );
    }

    #[test]
    fn patient_demographics() {
        let mut fields = prescription_fields("RX1");
        fields[rx::PATIENT_GIVEN_NAME_2] = "MIDDLE".into();
        fields[rx::PATIENT_ADDRESS_LINE_1 + 1] = "   ".into();
        let graph = single(fields, &[]);
        let patient = &graph.patient;

        assert_eq!(patient.identifier[0].value, "9990548609");
        assert_eq!(
            patient.identifier[0].extension[0].url,
            systems::EXT_NHS_NUMBER_VERIFICATION_STATUS
        );
        let name = &patient.name[0];
        assert_eq!(name.use_type, Some(NameUse::Official));
        assert_eq!(name.family.as_deref(), Some("XXTESTPATIENT"));
        assert_eq!(name.given, vec!["DONOTUSE", "MIDDLE"]);
        assert_eq!(name.prefix, vec!["MR"]);
        assert_eq!(patient.gender, fhir::AdministrativeGender::Male);
        assert_eq!(patient.birth_date, "1932-01-06");
        assert_eq!(patient.address[0].line, vec!["1 TRINITY STREET", "LEEDS"]);
        assert_eq!(patient.address[0].postal_code, "LS1 6QE");
        let gp = patient
            .managing_organization
            .as_ref()
            .and_then(|r| r.identifier.as_ref())
            .expect("managing organisation");
        assert_eq!(gp.value, "B81001");
        assert_eq!(graph.field_warnings, 0);
    }

    #[test]
    fn malformed_fields_degrade_and_are_counted() {
        let mut fields = prescription_fields("RX1");
        fields[rx::PATIENT_BIRTH_TIME] = "1932XX06".into();
        fields[rx::PATIENT_GENDER] = "7".into();
        let mut bad_item = line_item_fields("RX1", "L1");
        bad_item[item::QUANTITY_COUNT] = "abc".into();
        let graph = single(fields, &[bad_item, line_item_fields("RX1", "L2")]);

        assert_eq!(graph.patient.birth_date, "2026-03-14");
        assert_eq!(graph.patient.gender, fhir::AdministrativeGender::Other);
        assert!(graph.medication_requests[0].dispense_request.quantity.is_none());
        let quantity = graph.medication_requests[1]
            .dispense_request
            .quantity
            .as_ref()
            .expect("numeric quantity");
        assert_eq!(quantity.value.to_string(), "60");
        assert_eq!(quantity.unit, "tablet");
        assert_eq!(graph.field_warnings, 3);
    }

    #[test]
    fn medication_request_details() {
        let graph = single(prescription_fields("RX1"), &[line_item_fields("RX1", "L1")]);
        let request = &graph.medication_requests[0];

        assert_eq!(request.identifier[0].value, "L1");
        assert_eq!(request.subject.target(), Some(graph.patient.id.urn().as_str()));
        assert_eq!(request.requester.target(), Some(graph.role.id.urn().as_str()));
        assert_eq!(request.requester.display.as_deref(), Some("DR A SMITH"));
        assert_eq!(request.authored_on, "20200921101500");
        assert_eq!(request.group_identifier.value, "RX1");
        match &request.group_identifier.extension[0].value {
            ExtensionValue::Identifier(id) => assert_eq!(id.value, "RX1-CSID"),
            other => panic!("expected identifier extension, got {other:?}"),
        }
        match &request.extension[0].value {
            ExtensionValue::Coding(coding) => assert_eq!(
                coding.display.as_deref(),
                Some("General Practitioner Prescribing")
            ),
            other => panic!("expected coding extension, got {other:?}"),
        }
        assert_eq!(request.course_of_therapy_type.coding[0].code, "acute");
        assert_eq!(
            request.dosage_instruction,
            vec![Dosage {
                text: Some("One tablet four times a day".into()),
                patient_instruction: None,
            }]
        );
        assert_eq!(request.medication_codeable_concept.coding[0].code, "322237000");
    }

    #[test]
    fn each_instruction_text_is_carried_on_its_own() {
        let mut instructions_only = line_item_fields("RX1", "L1");
        instructions_only[item::DOSAGE_INSTRUCTIONS] = "  ".into();
        instructions_only[item::ADDITIONAL_INSTRUCTIONS] = "With food".into();
        let mut neither = line_item_fields("RX1", "L2");
        neither[item::DOSAGE_INSTRUCTIONS] = String::new();
        let graph = single(prescription_fields("RX1"), &[instructions_only, neither]);

        assert_eq!(
            graph.medication_requests[0].dosage_instruction,
            vec![Dosage {
                text: None,
                patient_instruction: Some("With food".into()),
            }]
        );
        assert!(graph.medication_requests[1].dosage_instruction.is_empty());
    }

    #[test]
    fn nominated_pharmacy_is_a_natural_key_reference() {
        let graph = single(prescription_fields("RX1"), &[line_item_fields("RX1", "L1")]);
        assert!(graph.medication_requests[0].dispense_request.performer.is_none());

        let mut fields = prescription_fields("RX2");
        fields[rx::NOMINATED_PHARMACY_ID] = "FHX01".into();
        let graph = single(fields, &[line_item_fields("RX2", "L1")]);
        let performer = graph.medication_requests[0]
            .dispense_request
            .performer
            .as_ref()
            .expect("performer");
        assert!(performer.target().is_none());
        assert_eq!(
            performer.identifier.as_ref().map(|i| i.value.as_str()),
            Some("FHX01")
        );
    }

    #[test]
    fn repeat_treatment_type_sets_course_of_therapy() {
        let mut fields = prescription_fields("RX1");
        fields[rx::PRESCRIPTION_TREATMENT_TYPE] = "0003".into();
        let graph = single(fields, &[line_item_fields("RX1", "L1")]);
        assert_eq!(
            graph.medication_requests[0].course_of_therapy_type.coding[0].code,
            "repeat-dispensing"
        );
    }

    #[test]
    fn shared_entities_are_assigned_once_across_prescriptions() {
        let store = store(
            &[
                prescription_fields("RX1"),
                prescription_fields("RX2"),
                prescription_fields("RX3"),
            ],
            &[line_item_fields("RX2", "L1")],
        );
        let graphs = assemble_all(&store);

        assert_eq!(
            graphs[0].newly_assigned,
            vec![
                EntityKind::Practitioner,
                EntityKind::Organisation,
                EntityKind::Role,
                EntityKind::Patient
            ]
        );
        assert_eq!(graphs[0].shared_to_emit().len(), 4);
        for later in &graphs[1..] {
            assert!(later.newly_assigned.is_empty());
            assert!(later.shared_to_emit().is_empty());
            assert_eq!(later.cache_hits, 4);
            assert_eq!(later.practitioner.id, graphs[0].practitioner.id);
            assert_eq!(later.patient.id, graphs[0].patient.id);
            assert_eq!(
                later.role.organization.target(),
                Some(graphs[0].organisation.id.urn().as_str())
            );
        }
        assert_eq!(
            graphs[1].medication_requests[0].subject.target(),
            Some(graphs[0].patient.id.urn().as_str())
        );
    }

    #[test]
    fn empty_author_keys_never_collapse() {
        let mut a = prescription_fields("RX1");
        let mut b = prescription_fields("RX2");
        for fields in [&mut a, &mut b] {
            let offset = ParticipantRole::Author.offset();
            for column in offset..offset + crate::constants::PARTICIPANT_BLOCK_WIDTH {
                fields[column].clear();
            }
        }
        b[rx::PATIENT_ID] = "9990548617".into();
        let graphs = assemble_all(&store(&[a, b], &[]));
        assert_ne!(graphs[0].practitioner.id, graphs[1].practitioner.id);
        assert_ne!(graphs[0].role.id, graphs[1].role.id);
        assert_eq!(graphs[1].newly_assigned.len(), 4);
    }

    #[test]
    fn missing_prescription_is_an_error() {
        let store = store(&[prescription_fields("RX1")], &[]);
        let endpoint = endpoint();
        let ids = SequentialIds::new();
        let cache = IdentityCache::new();
        let assembler = BundleAssembler::new(&endpoint, &ids, &cache, run_date());
        assert!(matches!(
            assembler.assemble(&store, "RX404"),
            Err(crate::ConversionError::MissingPrescription(_))
        ));
    }

    #[test]
    fn sequential_ids_make_output_reproducible() {
        let store = store(
            &[prescription_fields("RX1"), prescription_fields("RX2")],
            &[line_item_fields("RX1", "L1"), line_item_fields("RX2", "L2")],
        );
        let render = |graphs: Vec<PrescriptionGraph>| -> Vec<String> {
            graphs
                .into_iter()
                .map(|g| {
                    Resource::Bundle(g.into_bundle())
                        .render(fhir::Format::Json)
                        .expect("render")
                })
                .collect()
        };
        assert_eq!(render(assemble_all(&store)), render(assemble_all(&store)));
    }
}
