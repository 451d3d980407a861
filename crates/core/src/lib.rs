//! # EPS Core
//!
//! Core conversion logic for turning EPS prescription extract files into FHIR
//! prescription-order message bundles.
//!
//! This crate contains the pure data operations and the file handling around them:
//! - decoding of the tab-delimited extract lines ([`text`], [`records`])
//! - the in-memory record store ([`store`])
//! - participant resolution and identity deduplication ([`participant`], [`identity`])
//! - per-prescription bundle assembly ([`assembler`])
//! - document emission and the batch run ([`emit`], [`service`])
//!
//! **No wire concerns**: resource models and JSON/XML rendering live in the `fhir` crate.

pub mod assembler;
pub mod config;
pub mod constants;
pub mod emit;
pub mod error;
pub mod fields;
pub mod identity;
pub mod participant;
pub mod records;
pub mod service;
pub mod store;
pub mod text;

pub use assembler::{BundleAssembler, PrescriptionGraph};
pub use config::{EndpointConfig, RunConfig};
pub use emit::{DocumentSink, FileSink};
pub use error::{ConversionError, ConversionResult};
pub use fields::FieldOutcome;
pub use identity::{EntityKind, IdentityCache, Resolution};
pub use participant::{ParticipantDrafts, ParticipantKeys};
pub use records::{
    LineItemRecord, ParticipantBlock, ParticipantRole, PrescriptionRecord, RepeatSchedule,
};
pub use service::{ConversionService, RunSummary};
pub use store::RecordStore;
