//! # savelens-core
//!
//! Heuristic detection and safe rewriting of game values in save files
//! whose schema is unknown.
//!
//! This crate provides:
//! - Format sniffing (JSON, XML, key-value, plain text, SQLite, binary) with charset detection
//! - Structural walking of text formats into keyed leaves
//! - Brute-force numeric and embedded-text decoding of binary data
//! - Keyword/range classification and additive confidence fusion
//! - Statistical pattern detection across all numbers of a file
//! - Deduplication and ranking of candidates
//! - Type-checked, location-based rewriting that never leaves a partial file
//!
//! Storage is reached only through the [`FileAccess`] trait, so hosts can
//! plug in their own file layer.

pub mod analyzer;
pub mod binary;
pub mod classify;
pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod patterns;
pub mod rank;
pub mod rewrite;
pub mod scoring;
pub mod sniff;
pub mod walker;

pub use analyzer::{Analysis, AnalysisSummary, Analyzer, analyze};
pub use binary::{ByteOrder, DecodedNumber, Width};
pub use classify::{Classification, Classifier, classify_key};
pub use config::{EngineConfig, FusionWeights, load_config, save_config};
pub use error::{Error, Result};
pub use io::{FileAccess, FsAccess, MemoryAccess};
pub use model::{
    Candidate, Category, DataType, DetectedStructure, Location, StructureKind, XmlNode,
};
pub use patterns::{NumericContext, PatternDetector, PatternKind, PatternMatch, detect};
pub use rank::rank;
pub use rewrite::{Rewriter, rewrite, rewrite_bytes, validate};
pub use scoring::{Scorer, fuse};
pub use sniff::{DecodedText, Sniffed, TextEncoding, classify, sniff};
pub use walker::{FieldEntry, FieldValue, Origin};
