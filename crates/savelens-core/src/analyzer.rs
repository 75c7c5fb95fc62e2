//! Analysis pipeline.
//!
//! Sniff, walk or decode, score, look for population patterns, then rank.
//! Analysis always produces a result: unreadable or empty input yields a
//! binary structure with no candidates.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::binary::{self, embedded_entries};
use crate::config::EngineConfig;
use crate::io::{FileAccess, FsAccess};
use crate::model::{Candidate, Category, DataType, DetectedStructure, Location, StructureKind};
use crate::patterns::{NumericContext, PatternDetector};
use crate::rank::rank;
use crate::scoring::Scorer;
use crate::sniff::sniff;
use crate::walker;

/// Outcome of analyzing one file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub structure: DetectedStructure,
    /// Charset the text was decoded with; `None` for binary data
    pub encoding: Option<&'static str>,
    /// Ranked, deduplicated and capped
    pub candidates: Vec<Candidate>,
}

/// Counts for host display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    pub structure: StructureKind,
    pub encoding: Option<&'static str>,
    pub total: usize,
    pub by_category: BTreeMap<Category, usize>,
    pub by_data_type: BTreeMap<DataType, usize>,
}

impl Analysis {
    fn empty() -> Self {
        Self {
            structure: DetectedStructure::Binary,
            encoding: None,
            candidates: Vec::new(),
        }
    }

    pub fn kind(&self) -> StructureKind {
        self.structure.kind()
    }

    /// Best-ranked candidate with `key`, optionally pinned to a location.
    pub fn find(&self, key: &str, location: Option<&Location>) -> Option<&Candidate> {
        self.candidates
            .iter()
            .find(|c| c.key == key && location.is_none_or(|l| *l == c.location))
    }

    pub fn summary(&self) -> AnalysisSummary {
        let mut by_category = BTreeMap::new();
        let mut by_data_type = BTreeMap::new();
        for candidate in &self.candidates {
            *by_category.entry(candidate.category).or_insert(0) += 1;
            *by_data_type.entry(candidate.data_type).or_insert(0) += 1;
        }
        AnalysisSummary {
            structure: self.kind(),
            encoding: self.encoding,
            total: self.candidates.len(),
            by_category,
            by_data_type,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: EngineConfig,
}

impl Analyzer {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read `path` through `access` and analyze it.
    pub fn analyze<A: FileAccess + ?Sized>(&self, access: &A, path: &Path) -> Analysis {
        let bytes = match access.read_bytes(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Cannot read {}: {}", path.display(), e);
                return Analysis::empty();
            }
        };

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let analysis = self.analyze_bytes(&bytes, &name);
        info!(
            "Analyzed {}: {} ({} candidates)",
            path.display(),
            analysis.kind(),
            analysis.candidates.len()
        );
        analysis
    }

    /// Analyze in-memory content; `name` (usually the file stem) is used as
    /// scoring context.
    pub fn analyze_bytes(&self, bytes: &[u8], name: &str) -> Analysis {
        if bytes.is_empty() {
            debug!("Empty input, nothing to analyze");
            return Analysis::empty();
        }

        let sniffed = sniff(bytes, self.config.printable_ratio);
        let encoding = sniffed.encoding_name();
        let scorer = Scorer::new(&self.config);

        let (entries, mut candidates) = match &sniffed.text {
            Some(decoded) if sniffed.structure.is_text() => {
                let entries =
                    walker::walk(&sniffed.structure, &decoded.text, self.config.max_depth);
                let candidates = scorer.score_entries(&entries, name);
                (entries, candidates)
            }
            _ => {
                let candidates = binary::decode(bytes, &self.config, name);
                let entries = embedded_entries(bytes, self.config.min_embedded_run);
                (entries, candidates)
            }
        };

        let contexts: Vec<NumericContext> = entries
            .iter()
            .filter_map(NumericContext::from_entry)
            .collect();
        candidates.extend(PatternDetector::new(&self.config).candidates(&contexts));

        let found = candidates.len();
        let candidates = rank(candidates, self.config.max_candidates);
        debug!(
            "{} leaves, {} candidates before ranking, {} kept",
            entries.len(),
            found,
            candidates.len()
        );

        Analysis {
            structure: sniffed.structure,
            encoding,
            candidates,
        }
    }
}

/// Analyze a file on the local filesystem with the default configuration.
pub fn analyze<P: AsRef<Path>>(path: P) -> Analysis {
    Analyzer::default().analyze(&FsAccess, path.as_ref())
}
