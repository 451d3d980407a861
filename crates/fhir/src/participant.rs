//! FHIR Practitioner, Organization and PractitionerRole wire models.
//!
//! These three resources are always produced together from one participant block of a
//! prescription record. The role links the other two through internal references.

use crate::datatypes::{
    Address, CodeableConcept, ContactPoint, HumanName, Identifier, Reference,
};
use crate::ResourceId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Practitioner {
    pub id: ResourceId,
    pub identifier: Vec<Identifier>,
    pub name: Vec<HumanName>,
}

impl Practitioner {
    /// The rendered name used as display text on references to this practitioner's role.
    pub fn display_name(&self) -> Option<&str> {
        self.name.first().and_then(|n| n.text.as_deref())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: ResourceId,
    pub identifier: Vec<Identifier>,
    #[serde(rename = "type")]
    pub org_type: Vec<CodeableConcept>,
    pub name: String,
    pub telecom: Vec<ContactPoint>,
    pub address: Vec<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_of: Option<Reference>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PractitionerRole {
    pub id: ResourceId,
    pub identifier: Vec<Identifier>,
    pub practitioner: Reference,
    pub organization: Reference,
    pub telecom: Vec<ContactPoint>,
}
