//! FHIR MessageHeader wire model.

use crate::datatypes::{Coding, Extension, Reference};
use crate::ResourceId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageHeader {
    pub id: ResourceId,
    pub event_coding: Coding,
    pub sender: Reference,
    pub source: MessageSource,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub focus: Vec<Reference>,
}

/// Description of the sending endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MessageSource {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    pub name: String,
    pub endpoint: String,
}
