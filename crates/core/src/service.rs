//! Conversion service: one batch run from loaded records to emitted documents.

use crate::assembler::BundleAssembler;
use crate::config::RunConfig;
use crate::emit::{DocumentSink, FileSink};
use crate::identity::IdentityCache;
use crate::store::RecordStore;
use crate::ConversionResult;
use chrono::{NaiveDate, Utc};
use eps_uuid::{IdSource, RandomIds, SequentialIds};
use fhir::Resource;
use std::fmt;

/// Totals of one completed run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub bundles_written: usize,
    pub medication_requests: usize,
    pub shared_written: usize,
    pub cache_hits: usize,
    pub field_warnings: usize,
    pub orphaned_line_items: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bundles ({} medication requests), {} shared resources, {} cache hits, {} field warnings, {} orphaned line items",
            self.bundles_written,
            self.medication_requests,
            self.shared_written,
            self.cache_hits,
            self.field_warnings,
            self.orphaned_line_items
        )
    }
}

pub struct ConversionService {
    config: RunConfig,
    ids: Box<dyn IdSource>,
    run_date: NaiveDate,
}

impl ConversionService {
    /// Creates a service whose identifier source follows the configuration.
    pub fn new(config: RunConfig) -> Self {
        let ids: Box<dyn IdSource> = if config.deterministic_ids() {
            Box::new(SequentialIds::new())
        } else {
            Box::new(RandomIds)
        };
        Self::with_id_source(config, ids)
    }

    pub fn with_id_source(config: RunConfig, ids: Box<dyn IdSource>) -> Self {
        Self {
            config,
            ids,
            run_date: Utc::now().date_naive(),
        }
    }

    /// Override the fallback date used for unparsable birth dates.
    pub fn with_run_date(mut self, run_date: NaiveDate) -> Self {
        self.run_date = run_date;
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Validate output directories, load both extract files and write every document to disk.
    pub fn execute(&self) -> ConversionResult<RunSummary> {
        self.config.validate_output_dirs()?;
        let store = RecordStore::load(self.config.prescriptions_file(), self.config.items_file())?;
        let mut sink = FileSink::new(
            self.config.output_dir().to_path_buf(),
            self.config.shared_dir().map(|dir| dir.to_path_buf()),
            self.config.format(),
        );
        self.run(&store, &mut sink)
    }

    /// Assemble and emit one bundle per loaded prescription.
    ///
    /// Shared entities are emitted, once each, only when a shared directory is configured.
    /// The first structural failure aborts the run.
    pub fn run(
        &self,
        store: &RecordStore,
        sink: &mut dyn DocumentSink,
    ) -> ConversionResult<RunSummary> {
        let cache = IdentityCache::new();
        let assembler =
            BundleAssembler::new(self.config.endpoint(), self.ids.as_ref(), &cache, self.run_date);
        let emit_shared = self.config.shared_dir().is_some();
        let mut summary = RunSummary {
            orphaned_line_items: store.orphaned_line_items(),
            ..RunSummary::default()
        };

        tracing::info!(
            prescriptions = store.len(),
            format = %self.config.format(),
            "starting conversion"
        );

        for prescription_id in store.prescription_ids() {
            let graph = assembler.assemble(store, prescription_id)?;
            summary.medication_requests += graph.medication_requests.len();
            summary.cache_hits += graph.cache_hits;
            summary.field_warnings += graph.field_warnings;

            if emit_shared {
                for resource in graph.shared_to_emit() {
                    sink.write_shared(&resource)?;
                    summary.shared_written += 1;
                }
            }

            let bundle = Resource::Bundle(graph.into_bundle());
            sink.write_bundle(prescription_id, &bundle)?;
            summary.bundles_written += 1;
        }

        tracing::info!(%summary, "conversion complete");
        Ok(summary)
    }
}
