//! FHIR general-purpose data types.
//!
//! Field order in every struct follows the FHIR element order, which the XML renderer relies
//! on and which keeps JSON output stable.

use crate::ResourceId;
use serde::{Deserialize, Serialize};

/// An identifier with an optional set of extensions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    pub system: String,
    pub value: String,
}

impl Identifier {
    pub fn new(system: &str, value: impl Into<String>) -> Self {
        Self {
            extension: Vec::new(),
            system: system.to_string(),
            value: value.into(),
        }
    }

    pub fn with_extension(mut self, extension: Extension) -> Self {
        self.extension.push(extension);
        self
    }
}

/// A code from a code system.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coding {
    pub system: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Coding {
    pub fn new(system: &str, code: impl Into<String>) -> Self {
        Self {
            system: system.to_string(),
            code: code.into(),
            display: None,
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeableConcept {
    pub coding: Vec<Coding>,
}

impl From<Coding> for CodeableConcept {
    fn from(coding: Coding) -> Self {
        Self {
            coding: vec![coding],
        }
    }
}

/// A reference to another resource.
///
/// Two forms are produced:
/// - internal: `reference` holds the `urn:uuid:` of a resource in the same bundle
/// - natural-key: `identifier` holds a business code and the target is never materialised
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Identifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Reference {
    /// Reference to a resource carried in the same bundle.
    pub fn internal(id: &ResourceId) -> Self {
        Self {
            reference: Some(id.urn()),
            identifier: None,
            display: None,
        }
    }

    /// Reference to an entity known only by its business identifier.
    pub fn natural_key(system: &str, value: impl Into<String>) -> Self {
        Self {
            reference: None,
            identifier: Some(Identifier::new(system, value)),
            display: None,
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    /// The internal target, if this is an internal reference.
    pub fn target(&self) -> Option<&str> {
        self.reference.as_deref()
    }
}

/// An extension: a URL plus a single typed value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Extension {
    pub url: String,
    #[serde(flatten)]
    pub value: ExtensionValue,
}

impl Extension {
    pub fn new(url: &str, value: ExtensionValue) -> Self {
        Self {
            url: url.to_string(),
            value,
        }
    }
}

/// The `value[x]` choice of an extension.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ExtensionValue {
    #[serde(rename = "valueCoding")]
    Coding(Coding),
    #[serde(rename = "valueCodeableConcept")]
    CodeableConcept(CodeableConcept),
    #[serde(rename = "valueIdentifier")]
    Identifier(Identifier),
    #[serde(rename = "valueReference")]
    Reference(Reference),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactPointSystem {
    Phone,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactPointUse {
    Work,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPoint {
    pub system: ContactPointSystem,
    pub value: String,
    #[serde(rename = "use")]
    pub use_type: ContactPointUse,
}

impl ContactPoint {
    pub fn work_phone(value: impl Into<String>) -> Self {
        Self {
            system: ContactPointSystem::Phone,
            value: value.into(),
            use_type: ContactPointUse::Work,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressUse {
    Home,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_type: Option<AddressUse>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub line: Vec<String>,
    pub postal_code: String,
}

/// Purpose of a human name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameUse {
    Official,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanName {
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_type: Option<NameUse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub given: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prefix: Vec<String>,
}

impl HumanName {
    /// A name carried as free text only.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }
}

/// A measured amount. `value` keeps the textual precision of the source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: serde_json::Number,
    pub unit: String,
    pub system: String,
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use eps_uuid::Uuid;

    #[test]
    fn extension_serialises_value_choice_by_type() {
        let ext = Extension::new(
            "https://example.org/ext",
            ExtensionValue::Coding(Coding::new("https://example.org/cs", "0004")),
        );
        let json = serde_json::to_string(&ext).expect("serialise");
        assert_eq!(
            json,
            r#"{"url":"https://example.org/ext","valueCoding":{"system":"https://example.org/cs","code":"0004"}}"#
        );
    }

    #[test]
    fn internal_reference_uses_urn_form() {
        let id = ResourceId::from_uuid(Uuid::from_u128(1));
        let reference = Reference::internal(&id).with_display("DR SMITH");
        assert_eq!(
            reference.target(),
            Some("urn:uuid:00000000-0000-0000-0000-000000000001")
        );
        assert!(reference.identifier.is_none());
    }

    #[test]
    fn natural_key_reference_has_no_target() {
        let reference = Reference::natural_key(crate::systems::ODS_ORGANIZATION_CODE, "FHX01");
        assert!(reference.target().is_none());
        let json = serde_json::to_string(&reference).expect("serialise");
        assert_eq!(
            json,
            r#"{"identifier":{"system":"https://fhir.nhs.uk/Id/ods-organization-code","value":"FHX01"}}"#
        );
    }

    #[test]
    fn address_keeps_empty_postcode() {
        let address = Address {
            use_type: None,
            line: vec![],
            postal_code: String::new(),
        };
        let json = serde_json::to_string(&address).expect("serialise");
        assert_eq!(json, r#"{"postalCode":""}"#);
    }
}
