//! End-to-end orchestration of the reconciliation pipeline.
//!
//! Stage order: document discovery and key extraction, database loading with
//! duplicate-key merge, normalization, optional type-uniform backfill,
//! read-only consistency diagnostics, venue validation, partition by cited
//! keys, deterministic sorting, artifact rendering. Configuration is built
//! once and passed explicitly; the stages share no ambient state.

use crate::consistency;
use crate::extract;
use crate::loader;
use crate::normalize::{Normalizer, NormalizerConfig};
use crate::output::{
    self, COMBINED_FILENAME, Diagnostics, OutputLayout, UNUSED_FILENAME, USED_FILENAME,
};
use crate::partition;
use crate::schema::{self, Strictness, Venue};
use crate::{Entry, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Configuration options for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Venue profile supplying the required-field tables.
    pub venue: Venue,
    /// Whether validation removes fields outside the required list.
    pub strictness: Strictness,
    /// Whether author fields are rewritten as `"Last, First"`.
    pub normalize_authors: bool,
    /// Whether every entry is padded with placeholder fields present on
    /// some sibling of the same type.
    pub unify_fields: bool,
    /// Artifact layout.
    pub layout: OutputLayout,
    /// Filename suffix selecting bibliography database files.
    pub bib_suffix: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            venue: Venue::default(),
            strictness: Strictness::default(),
            normalize_authors: false,
            unify_fields: false,
            layout: OutputLayout::default(),
            bib_suffix: ".bib".to_string(),
        }
    }
}

/// Counts and artifact paths from a completed run.
#[derive(Debug)]
pub struct RunSummary {
    /// Paths of the written artifacts, in the order they were written.
    pub output_paths: Vec<PathBuf>,
    pub used_count: usize,
    pub unused_count: usize,
    pub duplicate_count: usize,
    pub missing_field_count: usize,
    pub discrepancy_count: usize,
}

/// The reconciliation pipeline, configured once per run.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Creates a pipeline with the given configuration.
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Runs the pipeline over a project directory: `.tex` documents are
    /// discovered recursively, database files are taken from the directory
    /// itself, and the artifacts are written next to them.
    ///
    /// # Errors
    ///
    /// Unreadable files and malformed BibTeX abort the run. Duplicate keys
    /// and missing required fields are diagnostics in the artifacts, not
    /// errors.
    pub fn run(&self, project_dir: &Path) -> Result<RunSummary> {
        let documents = loader::find_documents(project_dir)?;
        debug!("found {} documents", documents.len());
        let texts = loader::read_documents(&documents)?;
        let cited_keys = extract::citation_key_set(&texts);
        info!(
            "extracted {} distinct citation keys from {} documents",
            cited_keys.len(),
            documents.len()
        );

        let loaded = loader::load_bibliography(project_dir, &self.config.bib_suffix)?;
        info!("loaded {} unique entries", loaded.entries.len());

        let normalizer = Normalizer::with_config(NormalizerConfig {
            normalize_authors: self.config.normalize_authors,
        });
        let mut entries: Vec<Entry> = loaded
            .entries
            .into_iter()
            .map(|entry| normalizer.normalize(entry))
            .collect();

        let category_fields = consistency::category_field_index(&entries);
        if self.config.unify_fields {
            entries = consistency::unify_entry_fields(entries, &category_fields);
        }

        let discrepancies = consistency::venue_discrepancies(&entries);
        let inventory = consistency::field_inventory(&entries);

        let mut missing_fields = Vec::new();
        let entries: Vec<Entry> = entries
            .into_iter()
            .map(|entry| {
                schema::validate(
                    entry,
                    self.config.venue,
                    self.config.strictness,
                    &mut missing_fields,
                )
            })
            .collect();

        let (used, unused) = partition::split(entries, &cited_keys);
        let used = partition::sort_entries(used);
        let unused = partition::sort_entries(unused);

        let diagnostics = Diagnostics {
            discrepancies,
            missing_fields,
            duplicates: loaded.duplicates,
            inventory,
            category_fields,
        };

        let summary = RunSummary {
            used_count: used.len(),
            unused_count: unused.len(),
            duplicate_count: diagnostics.duplicates.len(),
            missing_field_count: diagnostics.missing_fields.len(),
            discrepancy_count: diagnostics.discrepancies.len(),
            output_paths: self.write_artifacts(project_dir, &used, &unused, &diagnostics)?,
        };
        Ok(summary)
    }

    fn write_artifacts(
        &self,
        project_dir: &Path,
        used: &[Entry],
        unused: &[Entry],
        diagnostics: &Diagnostics,
    ) -> Result<Vec<PathBuf>> {
        match self.config.layout {
            OutputLayout::Split => {
                let used_path = project_dir.join(USED_FILENAME);
                let unused_path = project_dir.join(UNUSED_FILENAME);
                fs::write(&used_path, output::render_report(used, diagnostics))?;
                fs::write(&unused_path, output::render_report(unused, diagnostics))?;
                Ok(vec![used_path, unused_path])
            }
            OutputLayout::Combined => {
                let path = project_dir.join(COMBINED_FILENAME);
                fs::write(&path, output::render_combined(used, unused, diagnostics))?;
                Ok(vec![path])
            }
        }
    }
}
