//! FHIR Patient wire model.
//!
//! The patient is the `subject` of every medication request in a prescription bundle. The
//! GP practice is carried as a natural-key `managingOrganization`: it is never emitted as a
//! resource of its own.

use crate::datatypes::{Address, HumanName, Identifier, Reference};
use crate::ResourceId;
use serde::{Deserialize, Serialize};

/// Administrative gender of a patient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdministrativeGender {
    Male,
    Female,
    Other,
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: ResourceId,
    pub identifier: Vec<Identifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<HumanName>,
    pub gender: AdministrativeGender,
    /// Date of birth, `YYYY-MM-DD`.
    pub birth_date: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub address: Vec<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managing_organization: Option<Reference>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::NameUse;
    use crate::systems;
    use eps_uuid::Uuid;

    fn sample() -> Patient {
        Patient {
            id: ResourceId::from_uuid(Uuid::from_u128(42)),
            identifier: vec![Identifier::new(systems::NHS_NUMBER, "9990548609")],
            name: vec![HumanName {
                use_type: Some(NameUse::Official),
                family: Some("XXTESTPATIENT".into()),
                given: vec!["DONOTUSE".into()],
                prefix: vec!["MR".into()],
                ..HumanName::default()
            }],
            gender: AdministrativeGender::Male,
            birth_date: "1932-01-06".into(),
            address: vec![],
            managing_organization: Some(Reference::natural_key(
                systems::ODS_ORGANIZATION_CODE,
                "B81001",
            )),
        }
    }

    #[test]
    fn serialises_in_element_order() {
        let json = serde_json::to_string(&sample()).expect("serialise");
        let id_at = json.find("\"id\"").expect("id");
        let identifier_at = json.find("\"identifier\"").expect("identifier");
        let gender_at = json.find("\"gender\"").expect("gender");
        let birth_at = json.find("\"birthDate\"").expect("birthDate");
        let managing_at = json.find("\"managingOrganization\"").expect("managing");
        assert!(id_at < identifier_at);
        assert!(identifier_at < gender_at);
        assert!(gender_at < birth_at);
        assert!(birth_at < managing_at);
    }

    #[test]
    fn omits_empty_address_list() {
        let json = serde_json::to_string(&sample()).expect("serialise");
        assert!(!json.contains("\"address\""));
        assert!(json.contains("\"gender\":\"male\""));
    }
}
