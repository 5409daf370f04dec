//! Error types for archive resolution.
//!
//! `ResolveError` aborts a whole archive. Everything that only affects a
//! single fact, document or linkbase is a [`Diagnostic`]: it is logged,
//! recorded on the resolution and processing continues.

use serde::Serialize;
use thiserror::Error;

use crate::core::types::LinkKind;

/// Fatal, archive-level failure.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The ZIP container could not be opened or an entry could not be read
    #[error("invalid archive: {0}")]
    InvalidArchive(#[from] zip::result::ZipError),

    /// A required global taxonomy could not be fetched after one retry
    #[error("taxonomy unavailable for namespace {namespace}: {reason}")]
    TaxonomyUnavailable { namespace: String, reason: String },
}

/// Failure reported by a [`crate::tdnet::taxonomy::LabelSource`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Worth one more attempt (timeouts, busy storage, ...)
    #[error("transient fetch failure: {0}")]
    Transient(String),

    #[error("fetch failed: {0}")]
    Fatal(String),
}

/// Recovered error, scoped to one fact, document, linkbase or arc.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    #[error("{document}: context {context_id} referenced by {element} is not declared")]
    MissingContext {
        document: String,
        element: String,
        context_id: String,
    },

    #[error("{document}: {element} has non-decimal content {raw:?}")]
    NumericFormat {
        document: String,
        element: String,
        raw: String,
    },

    #[error("{document}: report code segment {segment:?} cannot be decoded")]
    ReportCodeFormat { document: String, segment: String },

    #[error("{document}: unknown {field} code {code:?}")]
    UnknownCategory {
        document: String,
        field: String,
        code: String,
    },

    #[error("{document}: no {link} relationships matched any fact")]
    EmptyLink { document: String, link: LinkKind },

    #[error("{path}: instance document skipped: {reason}")]
    MalformedDocument { path: String, reason: String },

    #[error("{path}: linkbase skipped: {reason}")]
    MalformedLinkbase { path: String, reason: String },

    #[error("{path}: arc {from} -> {to} dropped: {reason}")]
    DroppedArc {
        path: String,
        from: String,
        to: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, ResolveError>;
