// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

// A parsed EMBL entry: the raw sequence, the header sections keyed by line code, and the feature
// table. Nothing here knows about DNA vs. protein; that is left to whoever consumes the record.

use indexmap::IndexMap;
use serde::Serialize;

use crate::seq::feature::IntervalFeature;
use crate::seq::line_code::LineCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    Linear,
    Circular,
}

/// Content of the ID line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdInfo {
    pub accession: String,
    pub version: String,
    pub topology: Topology,
    pub mol_type: String,
    pub data_class: String,
    pub division: String,
    pub size: usize,
}

impl IdInfo {
    /// The unit of `size`. EMBL nucleotide entries always count base pairs.
    pub fn unit(&self) -> &'static str {
        "bp"
    }
}

/// Content of the SQ line: total length and per-base composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeqHeader {
    pub total: usize,
    pub a: usize,
    pub c: usize,
    pub g: usize,
    pub t: usize,
    pub other: usize,
}

impl SeqHeader {
    /// Sum of the per-base counts, or None if it does not fit in a `usize`.
    pub fn composition_sum(&self) -> Option<usize> {
        [self.c, self.g, self.t, self.other]
            .into_iter()
            .try_fold(self.a, usize::checked_add)
    }
}

/// One literature citation (an RN line and the RC..RL lines that follow it).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferenceBlock {
    pub number: String,
    pub comment: Vec<String>,
    pub positions: Vec<String>,
    pub cross_references: Vec<String>,
    pub group: Vec<String>,
    pub authors: Vec<String>,
    pub title: Vec<String>,
    pub location: Vec<String>,
}

impl ReferenceBlock {
    pub fn new(number: &str) -> Self {
        ReferenceBlock {
            number: number.to_string(),
            ..Default::default()
        }
    }

    /// The list that lines with the given sub-code go into, if it is a reference sub-code.
    pub(crate) fn lines_for(&mut self, code: LineCode) -> Option<&mut Vec<String>> {
        match code {
            LineCode::Rc => Some(&mut self.comment),
            LineCode::Rp => Some(&mut self.positions),
            LineCode::Rx => Some(&mut self.cross_references),
            LineCode::Rg => Some(&mut self.group),
            LineCode::Ra => Some(&mut self.authors),
            LineCode::Rt => Some(&mut self.title),
            LineCode::Rl => Some(&mut self.location),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Lines(Vec<String>),
    Tokens(Vec<Vec<String>>),
    Id(IdInfo),
    SeqHeader(SeqHeader),
    References(Vec<ReferenceBlock>),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_lines(&self) -> Option<&[String]> {
        match self {
            Value::Lines(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_tokens(&self) -> Option<&[Vec<String>]> {
        match self {
            Value::Tokens(v) => Some(v),
            _ => None,
        }
    }
}

pub type Metadata = IndexMap<LineCode, Value>;

#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub sequence: String,
    pub metadata: Metadata,
    pub features: Vec<IntervalFeature>,
}

impl Record {
    pub fn id(&self) -> Option<&IdInfo> {
        match self.metadata.get(&LineCode::Id) {
            Some(Value::Id(id)) => Some(id),
            _ => None,
        }
    }

    pub fn seq_header(&self) -> Option<&SeqHeader> {
        match self.metadata.get(&LineCode::Sq) {
            Some(Value::SeqHeader(sq)) => Some(sq),
            _ => None,
        }
    }

    pub fn references(&self) -> &[ReferenceBlock] {
        match self.metadata.get(&LineCode::Rn) {
            Some(Value::References(refs)) => refs,
            _ => &[],
        }
    }

    pub fn get(&self, code: LineCode) -> Option<&Value> {
        self.metadata.get(&code)
    }

    pub fn size_unit(&self) -> Option<&'static str> {
        self.id().map(IdInfo::unit)
    }
}
