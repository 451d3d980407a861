//! Rendering of resources into JSON and XML documents.
//!
//! JSON is the serde representation of the wire models, pretty-printed.
//!
//! XML is derived from the same JSON tree following the FHIR XML conventions:
//! - the root element is named after the resource type and carries the FHIR namespace
//! - primitive values become empty elements with a `value` attribute
//! - arrays become repeated elements
//! - the `url` of an extension is an attribute, not a child element
//! - a resource nested in a bundle entry is wrapped as `<resource><Type>...</Type></resource>`

use crate::bundle::Resource;
use crate::systems::FHIR_XML_NS;
use crate::{FhirError, FhirResult};
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::Writer;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::str::FromStr;

/// Output document representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Json,
    Xml,
}

impl Format {
    /// File extension used for documents in this format.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Xml => "xml",
        }
    }
}

impl FromStr for Format {
    type Err = FhirError;

    /// Parses a format selector. Only the first letter is significant: `x...` selects XML
    /// and `j...` selects JSON, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('x') => Ok(Format::Xml),
            Some('j') => Ok(Format::Json),
            _ => Err(FhirError::InvalidInput(format!(
                "unrecognised output format '{s}' (expected json or xml)"
            ))),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

pub(crate) fn to_json(resource: &Resource) -> FhirResult<String> {
    Ok(serde_json::to_string_pretty(resource)?)
}

pub(crate) fn to_xml(resource: &Resource) -> FhirResult<String> {
    let tree = serde_json::to_value(resource)?;
    let mut xml = Writer::new_with_indent(Vec::new(), b' ', 2);
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_error)?;
    write_resource(&mut xml, &tree, true)?;
    String::from_utf8(xml.into_inner())
        .map_err(|e| FhirError::Xml(format!("rendered XML is not UTF-8: {e}")))
}

fn xml_error(e: impl std::fmt::Display) -> FhirError {
    FhirError::Xml(e.to_string())
}

fn write_resource(xml: &mut Writer<Vec<u8>>, tree: &Value, root: bool) -> FhirResult<()> {
    let members = tree
        .as_object()
        .ok_or_else(|| FhirError::Translation("resource is not a JSON object".into()))?;
    let resource_type = members
        .get("resourceType")
        .and_then(Value::as_str)
        .ok_or_else(|| FhirError::Translation("resource has no resourceType".into()))?;

    let mut start = BytesStart::new(resource_type);
    if root {
        start.push_attribute(("xmlns", FHIR_XML_NS));
    }
    xml.write_event(Event::Start(start)).map_err(xml_error)?;
    write_members(xml, members, &["resourceType"])?;
    xml.write_event(Event::End(BytesEnd::new(resource_type)))
        .map_err(xml_error)
}

fn write_members(
    xml: &mut Writer<Vec<u8>>,
    members: &Map<String, Value>,
    skip: &[&str],
) -> FhirResult<()> {
    for (name, value) in members {
        if !skip.contains(&name.as_str()) {
            write_element(xml, name, value)?;
        }
    }
    Ok(())
}

fn write_element(xml: &mut Writer<Vec<u8>>, name: &str, value: &Value) -> FhirResult<()> {
    match value {
        Value::Null => Ok(()),
        Value::Array(items) => {
            for item in items {
                write_element(xml, name, item)?;
            }
            Ok(())
        }
        Value::Object(_) if name == "resource" => {
            xml.write_event(Event::Start(BytesStart::new("resource")))
                .map_err(xml_error)?;
            write_resource(xml, value, false)?;
            xml.write_event(Event::End(BytesEnd::new("resource")))
                .map_err(xml_error)
        }
        Value::Object(members) => {
            let url = if name == "extension" {
                members.get("url").and_then(Value::as_str)
            } else {
                None
            };
            let mut start = BytesStart::new(name);
            if let Some(url) = url {
                start.push_attribute(value_attribute("url", url));
            }
            let skip: &[&str] = if url.is_some() { &["url"] } else { &[] };
            xml.write_event(Event::Start(start)).map_err(xml_error)?;
            write_members(xml, members, skip)?;
            xml.write_event(Event::End(BytesEnd::new(name)))
                .map_err(xml_error)
        }
        Value::String(text) => write_primitive(xml, name, text),
        Value::Number(number) => write_primitive(xml, name, &number.to_string()),
        Value::Bool(flag) => write_primitive(xml, name, if *flag { "true" } else { "false" }),
    }
}

fn write_primitive(xml: &mut Writer<Vec<u8>>, name: &str, text: &str) -> FhirResult<()> {
    let mut element = BytesStart::new(name);
    element.push_attribute(value_attribute("value", text));
    xml.write_event(Event::Empty(element)).map_err(xml_error)
}

/// Builds an attribute with markup escaped and line feeds kept as character references, so
/// attribute-value normalisation in a reader does not turn them into spaces.
fn value_attribute<'a>(key: &'a str, text: &str) -> Attribute<'a> {
    let escaped = quick_xml::escape::escape(text).replace('\n', "&#10;");
    Attribute {
        key: QName(key.as_bytes()),
        value: Cow::Owned(escaped.into_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::Bundle;
    use crate::datatypes::{Coding, Extension, ExtensionValue, HumanName, Identifier};
    use crate::message_header::{MessageHeader, MessageSource};
    use crate::participant::Practitioner;
    use crate::{systems, Reference, ResourceId};
    use eps_uuid::Uuid;

    fn id(n: u128) -> ResourceId {
        ResourceId::from_uuid(Uuid::from_u128(n))
    }

    fn practitioner() -> Resource {
        Resource::Practitioner(Practitioner {
            id: id(1),
            identifier: vec![Identifier::new(systems::SDS_USER_ID, "G8123456")],
            name: vec![HumanName::text("DR A \"AL\" SMITH & CO\nLTD")],
        })
    }

    #[test]
    fn parses_format_by_first_letter() {
        assert_eq!("json".parse::<Format>().expect("json"), Format::Json);
        assert_eq!("XML".parse::<Format>().expect("xml"), Format::Xml);
        assert_eq!("x".parse::<Format>().expect("x"), Format::Xml);
        assert!(matches!(
            "yaml".parse::<Format>(),
            Err(FhirError::InvalidInput(_))
        ));
        assert!("".parse::<Format>().is_err());
    }

    #[test]
    fn json_is_pretty_printed() {
        let json = practitioner().render(Format::Json).expect("render");
        assert!(json.starts_with("{\n  \"resourceType\": \"Practitioner\""));
    }

    #[test]
    fn xml_root_carries_namespace_and_value_attributes() {
        let xml = practitioner().render(Format::Xml).expect("render");
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<Practitioner xmlns=\"http://hl7.org/fhir\">"));
        assert!(xml.contains("<id value=\"00000000-0000-0000-0000-000000000001\"/>"));
        assert!(xml.contains("<system value=\"https://fhir.nhs.uk/Id/sds-user-id\"/>"));
        assert!(!xml.contains("resourceType"));
    }

    #[test]
    fn xml_escapes_markup_and_line_feeds() {
        let xml = practitioner().render(Format::Xml).expect("render");
        assert!(xml.contains("&quot;AL&quot;"));
        assert!(xml.contains("&amp; CO&#10;LTD"));
    }

    #[test]
    fn xml_puts_extension_url_in_attribute() {
        let header = Resource::MessageHeader(MessageHeader {
            id: id(2),
            event_coding: Coding::new(systems::MESSAGE_EVENT, "prescription-order"),
            sender: Reference::internal(&id(3)),
            source: MessageSource {
                extension: vec![Extension::new(
                    systems::EXT_SPINE_ENDPOINT,
                    ExtensionValue::Identifier(Identifier::new(systems::SPINE_ASID, "200000001")),
                )],
                name: "X26".into(),
                endpoint: "https://example.org".into(),
            },
            focus: vec![],
        });
        let xml = header.render(Format::Xml).expect("render");
        assert!(xml.contains(&format!(
            "<extension url=\"{}\">",
            systems::EXT_SPINE_ENDPOINT
        )));
        assert!(xml.contains("<valueIdentifier>"));
        assert!(!xml.contains("<url "));
    }

    #[test]
    fn xml_wraps_bundle_entries_in_resource_elements() {
        let mut bundle = Bundle::message(id(9));
        bundle.push(practitioner());
        let xml = Resource::Bundle(bundle).render(Format::Xml).expect("render");
        assert!(xml.contains("<Bundle xmlns=\"http://hl7.org/fhir\">"));
        assert!(xml.contains("<type value=\"message\"/>"));
        assert!(xml.contains("<resource>"));
        // Only the root element declares the namespace.
        assert_eq!(xml.matches("xmlns=").count(), 1);
        assert!(xml.contains("<Practitioner>"));
    }
}
