// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EmblError>;

// Everything that can go wrong while reading an EMBL stream. None of these are recoverable for the
// record being parsed: the record is dropped and iteration stops.

#[derive(Debug, Error)]
pub enum EmblError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(
        "could not parse the ID line:
    {line}
expected
    ID   <accession>; SV <version>; <topology>; <molecule type>; <data class>; <division>; <size> BP."
    )]
    IdLine { line: String },

    #[error(
        "could not parse the SQ line:
    {line}
expected
    SQ   Sequence <n> BP; <n> A; <n> C; <n> G; <n> T; <n> other;"
    )]
    SqLine { line: String },

    #[error("malformed sequence data line ({reason}):\n    {line}")]
    SequenceLine { line: String, reason: String },

    #[error("expected {expected} {code} line(s), found {found}")]
    Cardinality {
        code: &'static str,
        expected: &'static str,
        found: usize,
    },

    #[error("unknown line code `{code}` inside a reference block:\n    {line}")]
    UnknownReferenceCode { code: String, line: String },

    #[error("reference line appears before any RN line:\n    {line}")]
    OrphanReferenceLine { line: String },

    #[error("invalid location `{descriptor}`: {reason}")]
    Location { descriptor: String, reason: String },

    #[error("invalid qualifier ({reason}):\n    {line}")]
    Qualifier { line: String, reason: String },

    #[error("invalid feature table line:\n    {line}")]
    FeatureLine { line: String },

    #[error("record has no ID line")]
    MissingId,

    #[error("feature table found before the ID line; the sequence length is unknown")]
    FeaturesBeforeId,

    #[error("sequence length {found} does not match the {declared} BP declared on the ID line")]
    LengthMismatch { declared: usize, found: usize },

    #[error("input ends inside a record (no terminating `//` line)")]
    Unterminated,

    #[error("could not read configuration {path}: {reason}")]
    Config { path: String, reason: String },

    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("record number {requested} requested, but {reason}")]
    RecordNumber { requested: usize, reason: String },
}

impl EmblError {
    pub(crate) fn location(descriptor: &str, reason: impl Into<String>) -> Self {
        EmblError::Location {
            descriptor: descriptor.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn qualifier(line: &str, reason: impl Into<String>) -> Self {
        EmblError::Qualifier {
            line: line.to_string(),
            reason: reason.into(),
        }
    }
}
