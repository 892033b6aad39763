// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

//! The feature table (FT lines).
//!
//! ```text
//! FT   CDS             14..1495
//! FT                   /product="beta-glucosidase"
//! FT                   /codon_start=1
//! ```
//!
//! Each feature becomes an [`IntervalFeature`]. Qualifier names are mapped onto the vocabulary
//! shared with GFF3 (`codon_start` becomes a zero-based `phase`, `inference` becomes `source`,
//! `db_xref` is always a list), so features from either format can be compared.

use std::fmt;

use indexmap::{map::Entry, IndexMap};
use itertools::Itertools;
use log::debug;
use serde::Serialize;

use crate::errors::{EmblError, Result};
use crate::seq::line_code::from_column;
use crate::seq::location::{parse_location, Span, Strand};

/// Key under which the verbatim location descriptor is kept.
pub const LOCATION_KEY: &str = "__location";
pub const TYPE_KEY: &str = "type";
pub const STRAND_KEY: &str = "strand";

// Column at which qualifiers start, once the two-letter FT code has been removed.
const QUALIFIER_INDENT: &str = "                   ";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QualifierValue {
    Text(String),
    List(Vec<String>),
    Int(i64),
    Float(f64),
}

impl QualifierValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            QualifierValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            QualifierValue::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            QualifierValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            QualifierValue::Float(x) => Some(*x),
            _ => None,
        }
    }

    // A qualifier seen more than once turns into a list of everything seen, in order.
    fn push(&mut self, other: QualifierValue) {
        let extra = match other {
            QualifierValue::List(v) => v,
            single => vec![single.to_string()],
        };
        match self {
            QualifierValue::List(v) => v.extend(extra),
            single => {
                let mut items = vec![single.to_string()];
                items.extend(extra);
                *single = QualifierValue::List(items);
            }
        }
    }
}

impl fmt::Display for QualifierValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualifierValue::Text(s) => write!(f, "{}", s),
            QualifierValue::List(v) => write!(f, "{}", v.join(", ")),
            QualifierValue::Int(i) => write!(f, "{}", i),
            QualifierValue::Float(x) => write!(f, "{}", x),
        }
    }
}

pub type Qualifiers = IndexMap<String, QualifierValue>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalFeature {
    pub spans: Vec<Span>,
    pub strand: Strand,
    pub qualifiers: Qualifiers,
}

impl IntervalFeature {
    /// The feature key (`source`, `CDS`, ...).
    pub fn feature_type(&self) -> &str {
        self.get_text(TYPE_KEY).unwrap_or_default()
    }

    /// The location descriptor exactly as it was written.
    pub fn location(&self) -> &str {
        self.get_text(LOCATION_KEY).unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&QualifierValue> {
        self.qualifiers.get(key)
    }

    /// A qualifier's value, if it is plain text.
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.qualifiers.get(key).and_then(QualifierValue::as_text)
    }
}

/// Parses the lines of an FT section (code included) for a sequence of `seq_len` bases.
pub fn parse_feature_table(lines: &[String], seq_len: usize) -> Result<Vec<IntervalFeature>> {
    let mut chunks: Vec<Vec<&str>> = Vec::new();
    for line in lines {
        let rest = from_column(line, 2);
        if rest.trim().is_empty() {
            continue;
        }
        if rest.starts_with(QUALIFIER_INDENT) {
            match chunks.last_mut() {
                Some(chunk) => chunk.push(rest),
                None => return Err(EmblError::FeatureLine { line: line.clone() }),
            }
        } else {
            chunks.push(vec![rest]);
        }
    }
    chunks
        .iter()
        .map(|chunk| parse_single_feature(chunk, seq_len))
        .collect()
}

fn parse_single_feature(lines: &[&str], seq_len: usize) -> Result<IntervalFeature> {
    // The key and location come first; every line starting with '/' opens a qualifier.
    let mut parts: Vec<Vec<&str>> = Vec::new();
    for line in lines.iter().map(|l| l.trim()) {
        match parts.last_mut() {
            Some(part) if !line.starts_with('/') => part.push(line),
            _ => parts.push(vec![line]),
        }
    }
    let mut parts = parts.into_iter();
    let head = parts.next().unwrap_or_default();

    let (feature_type, first_loc) = head
        .first()
        .and_then(|l| l.split_once(char::is_whitespace))
        .ok_or_else(|| EmblError::FeatureLine {
            line: head.join(" "),
        })?;
    let descriptor: String = std::iter::once(first_loc.trim())
        .chain(head.iter().skip(1).copied())
        .collect();
    let location = parse_location(&descriptor, seq_len)?;
    debug!(
        "feature {} at {} -> {} span(s)",
        feature_type,
        descriptor,
        location.spans.len()
    );

    let mut qualifiers = Qualifiers::new();
    qualifiers.insert(TYPE_KEY.into(), QualifierValue::Text(feature_type.into()));
    qualifiers.insert(LOCATION_KEY.into(), QualifierValue::Text(descriptor));
    qualifiers.insert(
        STRAND_KEY.into(),
        QualifierValue::Text(location.strand.as_str().into()),
    );

    for part in parts {
        let (key, value) = parse_qualifier(&part)?;
        match qualifiers.entry(key) {
            Entry::Vacant(e) => {
                e.insert(value);
            }
            Entry::Occupied(mut e) => e.get_mut().push(value),
        }
    }

    Ok(IntervalFeature {
        spans: location.spans,
        strand: location.strand,
        qualifiers,
    })
}

// `lines` are the trimmed lines of one qualifier, the first one starting with '/'.
fn parse_qualifier(lines: &[&str]) -> Result<(String, QualifierValue)> {
    let first = lines.first().copied().unwrap_or_default();
    let body = first.strip_prefix('/').unwrap_or(first);
    let key = body.split('=').next().unwrap_or_default();
    if key.is_empty() {
        return Err(EmblError::qualifier(first, "missing qualifier name"));
    }
    if let Some(c) = key
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '\'' | '*')))
    {
        return Err(EmblError::qualifier(
            first,
            format!("'{}' is not allowed in a qualifier name", c),
        ));
    }

    // Protein translations are wrapped without spaces; everything else is running text.
    let separator = if key == "translation" { "" } else { " " };
    let joined = std::iter::once(body).chain(lines.iter().skip(1).copied()).join(separator);
    let raw = match joined.split_once('=') {
        Some((_, v)) => unquote(v).map_err(|reason| EmblError::qualifier(first, reason))?,
        None => String::new(),
    };
    normalize(key, raw).map_err(|reason| EmblError::qualifier(first, reason))
}

fn unquote(value: &str) -> std::result::Result<String, String> {
    match value.strip_prefix('"') {
        Some(inner) => match inner.strip_suffix('"') {
            Some(inner) => Ok(inner.replace("\"\"", "\"")),
            None => Err(String::from("unterminated quoted value")),
        },
        None => Ok(value.to_string()),
    }
}

// Rename INSDC qualifiers to the shared vocabulary and type their values.
fn normalize(key: &str, raw: String) -> std::result::Result<(String, QualifierValue), String> {
    let pair = match key {
        "inference" => ("source".to_string(), QualifierValue::Text(raw)),
        "codon_start" => {
            let phase = match raw.trim().parse::<i64>() {
                Ok(n @ 1..=3) => n - 1,
                _ => return Err(format!("codon_start must be 1, 2 or 3, got '{}'", raw)),
            };
            ("phase".to_string(), QualifierValue::Int(phase))
        }
        "db_xref" => (key.to_string(), QualifierValue::List(vec![raw])),
        "transl_table" => {
            let table = raw
                .trim()
                .parse::<i64>()
                .map_err(|_| format!("transl_table must be an integer, got '{}'", raw))?;
            (key.to_string(), QualifierValue::Int(table))
        }
        "score" => {
            let score = raw
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("score must be a number, got '{}'", raw))?;
            (key.to_string(), QualifierValue::Float(score))
        }
        _ => (key.to_string(), QualifierValue::Text(raw)),
    };
    Ok(pair)
}
