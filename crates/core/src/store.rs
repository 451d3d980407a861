//! In-memory indexes over the two extract files.
//!
//! Both files are read completely before any bundle is assembled. A failure to open or read
//! either one aborts the load: there is no partially loaded store.

use crate::constants::{LINE_ITEM_FIELD_COUNT, PRESCRIPTION_FIELD_COUNT};
use crate::error::{ConversionError, ConversionResult};
use crate::records::{LineItemRecord, PrescriptionRecord};
use crate::text::normalise_line;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Prescription records keyed by prescription id, plus their line items.
#[derive(Debug, Default)]
pub struct RecordStore {
    prescriptions: HashMap<String, PrescriptionRecord>,
    /// Ids in order of first appearance.
    order: Vec<String>,
    line_items: HashMap<String, Vec<LineItemRecord>>,
    line_item_count: usize,
}

impl RecordStore {
    /// Load the prescription file and the line-item file.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::InputRead`] naming the file that could not be opened or read.
    pub fn load(prescriptions: &Path, items: &Path) -> ConversionResult<Self> {
        let mut store = Self::default();
        store
            .read_prescriptions(open(prescriptions)?)
            .map_err(|source| ConversionError::InputRead {
                path: prescriptions.to_path_buf(),
                source,
            })?;
        store
            .read_line_items(open(items)?)
            .map_err(|source| ConversionError::InputRead {
                path: items.to_path_buf(),
                source,
            })?;
        store.report_orphans();
        tracing::info!(
            prescriptions = store.len(),
            line_items = store.line_item_count,
            "loaded extract files"
        );
        Ok(store)
    }

    /// Load from already-open readers.
    pub fn load_from_readers(prescriptions: impl BufRead, items: impl BufRead) -> io::Result<Self> {
        let mut store = Self::default();
        store.read_prescriptions(prescriptions)?;
        store.read_line_items(items)?;
        store.report_orphans();
        Ok(store)
    }

    fn read_prescriptions(&mut self, reader: impl BufRead) -> io::Result<()> {
        for (index, line) in decoded_lines(reader).enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let fields = normalise_line(&line);
            if fields.len() < PRESCRIPTION_FIELD_COUNT {
                tracing::warn!(
                    line = index + 1,
                    found = fields.len(),
                    expected = PRESCRIPTION_FIELD_COUNT,
                    "short prescription record; missing columns read as empty"
                );
            }
            let record = PrescriptionRecord::from_fields(&fields);
            let id = record.id.clone();
            match self.prescriptions.insert(id.clone(), record) {
                Some(_) => tracing::debug!(
                    prescription = %id,
                    line = index + 1,
                    "duplicate prescription id; later record replaces earlier"
                ),
                None => self.order.push(id),
            }
        }
        Ok(())
    }

    fn read_line_items(&mut self, reader: impl BufRead) -> io::Result<()> {
        for (index, line) in decoded_lines(reader).enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let fields = normalise_line(&line);
            if fields.len() < LINE_ITEM_FIELD_COUNT {
                tracing::warn!(
                    line = index + 1,
                    found = fields.len(),
                    expected = LINE_ITEM_FIELD_COUNT,
                    "short line-item record; missing columns read as empty"
                );
            }
            let item = LineItemRecord::from_fields(&fields);
            self.line_items
                .entry(item.prescription_id.clone())
                .or_default()
                .push(item);
            self.line_item_count += 1;
        }
        Ok(())
    }

    fn report_orphans(&self) {
        let orphaned = self.orphaned_line_items();
        if orphaned > 0 {
            tracing::warn!(
                orphaned,
                "line items reference prescriptions missing from the prescription file"
            );
        }
    }

    /// The record for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::MissingPrescription`] if `id` was never loaded.
    pub fn prescription(&self, id: &str) -> ConversionResult<&PrescriptionRecord> {
        self.prescriptions
            .get(id)
            .ok_or_else(|| ConversionError::MissingPrescription(id.to_string()))
    }

    /// Line items of `id` in file order; empty when there are none.
    pub fn line_items(&self, id: &str) -> &[LineItemRecord] {
        self.line_items.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every loaded prescription id, in order of first appearance.
    pub fn prescription_ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn line_item_count(&self) -> usize {
        self.line_item_count
    }

    /// Line items whose owning prescription id has no prescription record.
    pub fn orphaned_line_items(&self) -> usize {
        self.line_items
            .iter()
            .filter(|(id, _)| !self.prescriptions.contains_key(*id))
            .map(|(_, items)| items.len())
            .sum()
    }
}

/// Lines without their `\n` or `\r\n` terminator. Bytes that are not valid UTF-8 become
/// U+FFFD so one bad character cannot sink the whole file.
fn decoded_lines(reader: impl BufRead) -> impl Iterator<Item = io::Result<String>> {
    reader.split(b'\n').enumerate().map(|(index, raw)| {
        let mut raw = raw?;
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }
        Ok(match String::from_utf8(raw) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(
                    line = index + 1,
                    "record is not valid UTF-8; invalid bytes replaced"
                );
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        })
    })
}

fn open(path: &Path) -> ConversionResult<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| ConversionError::InputRead {
            path: path.to_path_buf(),
            source,
        })
}
