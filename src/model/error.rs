//! Error types for gridboard.
//!
//! This module defines the error taxonomy using `thiserror`. Errors compose via
//! `?` and `From` conversions inside fallible helpers.
//!
//! # Error Hierarchy
//!
//! - [`StoreError`] - local device storage failures (I/O, (de)serialization)
//! - [`RemoteError`] - failures reported by caller-supplied remote collaborators
//! - [`LayoutError`] - catalog lookups and layout invariant violations
//!
//! # Error Recovery Strategy
//!
//! No failure in the positioning core is fatal. Store and remote errors are
//! logged through `tracing` and the session continues with optimistic local
//! state; the worst case is a temporarily unsynced visual state that heals on
//! the next successful save. These types exist so the boundary helpers can use
//! `?` and so tests can assert on what went wrong.

use std::path::PathBuf;
use thiserror::Error;

/// Local store read or write failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be read or written.
    #[error("Local store I/O failed for key {key:?} at {path:?}: {source}")]
    Io {
        /// Store key being accessed.
        key: String,
        /// Backing file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The stored value could not be (de)serialized.
    #[error("Stored value for key {key:?} is not valid JSON: {source}")]
    Serde {
        /// Store key being accessed.
        key: String,
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// The store refused the operation (e.g. quota exceeded, storage disabled).
    #[error("Local store unavailable: {0}")]
    Unavailable(String),
}

/// Failure reported by a remote collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The collaborator's future resolved to an error.
    #[error("Remote call failed: {0}")]
    Failed(String),

    /// The collaborator completed but reported `success = false`.
    #[error("Remote store rejected the update: {message}")]
    Rejected {
        /// Message returned by the server.
        message: String,
    },
}

/// Catalog lookup failure or layout invariant violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// No layout with this id exists in the catalog.
    #[error("Unknown layout id: {0}")]
    UnknownLayout(String),

    /// A split's ratios do not sum to roughly 100.
    #[error("Layout {layout}: split ratios sum to {sum}, expected 99..=101")]
    RatioSum {
        /// Offending layout.
        layout: String,
        /// Actual ratio sum.
        sum: String,
    },

    /// A split has a different number of ratios than children.
    #[error("Layout {layout}: split has {ratios} ratios for {groups} groups")]
    RatioArity {
        /// Offending layout.
        layout: String,
        /// Number of ratios.
        ratios: usize,
        /// Number of child groups.
        groups: usize,
    },

    /// An area appears in more than one place in the composition.
    #[error("Layout {layout}: area {area} appears more than once")]
    DuplicateArea {
        /// Offending layout.
        layout: String,
        /// Duplicated area id.
        area: String,
    },

    /// An area is declared but never placed, or placed but never declared.
    #[error("Layout {layout}: area {area} is not covered by the composition")]
    UncoveredArea {
        /// Offending layout.
        layout: String,
        /// Missing area id.
        area: String,
    },

    /// The declared cell count disagrees with the number of areas.
    #[error("Layout {layout}: declares {declared} cells but has {actual} areas")]
    CellCount {
        /// Offending layout.
        layout: String,
        /// Declared cell count.
        declared: usize,
        /// Number of areas.
        actual: usize,
    },
}
