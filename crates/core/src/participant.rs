//! Participant Resolver: turns one embedded participant block into a linked
//! practitioner / organisation / role triple.
//!
//! Drafts are built with fresh identifiers. The caller consults the identity cache with the
//! returned natural keys and then calls [`ParticipantDrafts::rebind`] so the role's internal
//! references follow any identifiers the cache handed back.

use crate::constants::ADDRESS_LINE_COUNT;
use crate::records::{ParticipantBlock, ParticipantRole, PrescriptionRecord};
use eps_types::NaturalKey;
use eps_uuid::{IdSource, ResourceId};
use fhir::systems;
use fhir::{
    Address, AddressUse, Coding, ContactPoint, HumanName, Identifier, Organization, Practitioner,
    PractitionerRole, Reference,
};

/// Natural business keys of a participant triple. `None` where the source key is blank.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParticipantKeys {
    /// SDS user id.
    pub practitioner: Option<NaturalKey>,
    /// ODS organisation code.
    pub organisation: Option<NaturalKey>,
    /// SDS role profile id.
    pub role: Option<NaturalKey>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParticipantDrafts {
    pub practitioner: Practitioner,
    pub organisation: Organization,
    pub role: PractitionerRole,
    pub keys: ParticipantKeys,
}

impl ParticipantDrafts {
    /// Build the triple from a decoded block.
    pub fn from_block(block: &ParticipantBlock, ids: &dyn IdSource) -> Self {
        let practitioner = Practitioner {
            id: ids.next_id(),
            identifier: vec![Identifier::new(systems::SDS_USER_ID, &block.sds_user_id)],
            name: vec![HumanName::text(&block.person_name)],
        };

        let parent = block.parent_ods_code.trim();
        let organisation = Organization {
            id: ids.next_id(),
            identifier: vec![Identifier::new(
                systems::ODS_ORGANIZATION_CODE,
                &block.ods_code,
            )],
            org_type: vec![Coding::new(systems::ORGANISATION_TYPE, &block.organisation_type).into()],
            name: block.organisation_name.clone(),
            telecom: vec![ContactPoint::work_phone(&block.organisation_telecom)],
            address: vec![build_address(&block.address_lines, &block.postcode, None)],
            part_of: (!parent.is_empty())
                .then(|| Reference::natural_key(systems::ODS_ORGANIZATION_CODE, parent)),
        };

        let role = PractitionerRole {
            id: ids.next_id(),
            identifier: vec![Identifier::new(
                systems::SDS_ROLE_PROFILE_ID,
                &block.role_profile_id,
            )],
            practitioner: Reference::internal(&practitioner.id),
            organization: Reference::internal(&organisation.id),
            telecom: vec![ContactPoint::work_phone(&block.organisation_telecom)],
        };

        let keys = ParticipantKeys {
            practitioner: NaturalKey::new(&block.sds_user_id),
            organisation: NaturalKey::new(&block.ods_code),
            role: NaturalKey::new(&block.role_profile_id),
        };

        Self {
            practitioner,
            organisation,
            role,
            keys,
        }
    }

    /// Adopt final identifiers and re-point the role at them.
    pub fn rebind(
        &mut self,
        practitioner: ResourceId,
        organisation: ResourceId,
        role: ResourceId,
    ) {
        self.practitioner.id = practitioner;
        self.organisation.id = organisation;
        self.role.id = role;
        self.role.practitioner = Reference::internal(&practitioner);
        self.role.organization = Reference::internal(&organisation);
    }

    /// Internal reference to the role, displayed with the practitioner's name.
    pub fn role_reference(&self) -> Reference {
        let reference = Reference::internal(&self.role.id);
        match self.practitioner.display_name() {
            Some(name) => reference.with_display(name),
            None => reference,
        }
    }
}

/// Resolve the participant block of `role` within `record`.
pub fn resolve(
    record: &PrescriptionRecord,
    role: ParticipantRole,
    ids: &dyn IdSource,
) -> ParticipantDrafts {
    ParticipantDrafts::from_block(record.participant(role), ids)
}

/// Postal address from up to five lines: blank lines are dropped, the rest are trimmed and
/// kept in order. The postcode is carried verbatim, even when empty.
pub(crate) fn build_address(
    lines: &[String; ADDRESS_LINE_COUNT],
    postcode: &str,
    use_type: Option<AddressUse>,
) -> Address {
    Address {
        use_type,
        line: lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
        postal_code: postcode.to_string(),
    }
}
