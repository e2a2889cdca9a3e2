//! The full run: files → extract → normalize → derive.

use std::sync::Arc;

use log::info;

use super::classify::{self, Classifier};
use super::extract::{self, EntryMap, ExtractConfig, FileInput};
use super::normalize;
use super::relations::Analysis;
use crate::error::{InstacheckError, Result};

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub extract: ExtractConfig,
    pub classifier: Classifier,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            extract: ExtractConfig::default(),
            classifier: Classifier::default(),
        }
    }
}

impl PipelineConfig {
    /// Defaults, with rules resolved from the environment
    /// (see [`classify::default_rules`]).
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            extract: ExtractConfig::default(),
            classifier: Classifier::new(&classify::default_rules())?,
        })
    }

    /// Defaults, with rules loaded from an explicit file.
    pub fn with_rules_file(path: &str) -> Result<Self> {
        Ok(Self {
            extract: ExtractConfig::default(),
            classifier: Classifier::new(&classify::load_rules(path)?)?,
        })
    }
}

/// Run the whole pipeline over an upload batch.
pub fn analyze(files: &[FileInput], config: &PipelineConfig) -> Result<Analysis> {
    let entries = extract::extract(files, &config.extract)?;
    analyze_entries(&entries, config)
}

/// Run normalization and derivation over already-parsed entries.
pub fn analyze_entries(entries: &EntryMap, config: &PipelineConfig) -> Result<Analysis> {
    let sets = normalize::normalize(entries, &config.classifier);
    if sets.is_empty() {
        return Err(InstacheckError::NoRelationshipData);
    }

    let analysis = Analysis::new(sets);
    let counts = analysis.counts();
    info!(
        "Analyzed {} entries: {} followers, {} following, {} mutuals",
        entries.len(),
        counts.followers,
        counts.following,
        counts.mutuals
    );
    Ok(analysis)
}

/// Holds the current analysis. A run either fully replaces it or leaves it
/// untouched.
#[derive(Debug, Default)]
pub struct Session {
    config: PipelineConfig,
    current: Option<Arc<Analysis>>,
}

impl Session {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            current: None,
        }
    }

    /// Analyze a new upload and publish it on success.
    pub fn ingest(&mut self, files: &[FileInput]) -> Result<Arc<Analysis>> {
        let analysis = Arc::new(analyze(files, &self.config)?);
        self.current = Some(Arc::clone(&analysis));
        Ok(analysis)
    }

    pub fn current(&self) -> Option<Arc<Analysis>> {
        self.current.clone()
    }

    pub fn reset(&mut self) {
        self.current = None;
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}
