// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

//! Splitting an EMBL stream into records, and each record into sections.
//!
//! Lines come in, `//` closes a record. Inside a record, consecutive lines with the same (logical)
//! line code form a section; each section is handed to the parser for its code, and the results
//! are merged into a [`Record`].

use indexmap::map::Entry;
use log::{debug, warn};

use crate::config::{LengthCheck, ParserConfig};
use crate::errors::{EmblError, Result};
use crate::seq::line_code::LineCode;
use crate::seq::record::{Metadata, Record, Value};
use crate::seq::sections::{parser_for, Section, SectionContext};

const TERMINATOR: &str = "//";

/// A run of consecutive lines belonging to one section.
#[derive(Debug, PartialEq)]
pub struct SectionRun<'a> {
    pub code: LineCode,
    pub lines: &'a [String],
}

// The section a line starts, or None for a continuation line (leading blank) or a line whose
// prefix is no EMBL code.
fn section_key(line: &str) -> Option<&str> {
    if line.starts_with(char::is_whitespace) {
        return None;
    }
    Some(
        LineCode::from_line(line)
            .map(|code| code.section().as_str())
            .unwrap_or_else(|| line.get(..2).unwrap_or(line)),
    )
}

/// Splits one record's lines into sections. A section starts at every non-continuation line
/// whose section differs from that of the last non-continuation line. Decoration (XX, FH, AH)
/// and unknown codes are dropped.
pub fn segment(lines: &[String]) -> Vec<SectionRun<'_>> {
    let mut bounds: Vec<usize> = Vec::new();
    let mut previous: Option<&str> = None;
    for (i, line) in lines.iter().enumerate() {
        let key = section_key(line);
        if i == 0 || (key.is_some() && key != previous) {
            bounds.push(i);
        }
        if key.is_some() {
            previous = key;
        }
    }
    bounds.push(lines.len());

    bounds
        .windows(2)
        .filter_map(|w| {
            let run = &lines[w[0]..w[1]];
            match LineCode::from_line(&run[0]) {
                Some(code) if !code.is_decoration() => Some(SectionRun {
                    code: code.section(),
                    lines: run,
                }),
                Some(_) => None,
                None => {
                    debug!("skipping {} line(s) starting with {:?}", run.len(), run[0]);
                    None
                }
            }
        })
        .collect()
}

/// Turns the lines of one record (terminator excluded) into a [`Record`].
pub fn parse_record(lines: &[String], config: &ParserConfig) -> Result<Record> {
    let mut metadata = Metadata::new();
    let mut features = Vec::new();
    let mut sequence: Option<String> = None;

    for run in segment(lines) {
        let ctx = SectionContext {
            sequence_len: match metadata.get(&LineCode::Id) {
                Some(Value::Id(id)) => Some(id.size),
                _ => None,
            },
        };
        debug!("section {} ({} line(s))", run.code, run.lines.len());
        match parser_for(run.code)(run.lines, &ctx)? {
            Section::Value(value) => {
                if run.code == LineCode::Id && metadata.contains_key(&LineCode::Id) {
                    return Err(EmblError::Cardinality {
                        code: "ID",
                        expected: "exactly 1",
                        found: 2,
                    });
                }
                metadata.insert(run.code, value);
            }
            Section::References(blocks) => match metadata.entry(LineCode::Rn) {
                Entry::Occupied(mut e) => {
                    if let Value::References(existing) = e.get_mut() {
                        existing.extend(blocks);
                    }
                }
                Entry::Vacant(e) => {
                    e.insert(Value::References(blocks));
                }
            },
            Section::Sequence(header, seq) => {
                metadata.insert(LineCode::Sq, Value::SeqHeader(header));
                sequence = Some(seq);
            }
            Section::Features(fs) => features.extend(fs),
        }
    }

    let declared = match metadata.get(&LineCode::Id) {
        Some(Value::Id(id)) => id.size,
        _ => return Err(EmblError::MissingId),
    };
    let sequence = sequence.unwrap_or_default();
    if sequence.len() != declared {
        match config.length_check {
            LengthCheck::Error => {
                return Err(EmblError::LengthMismatch {
                    declared,
                    found: sequence.len(),
                })
            }
            LengthCheck::Warn => warn!(
                "sequence has {} bases, ID line declares {}",
                sequence.len(),
                declared
            ),
        }
    }

    Ok(Record {
        sequence,
        metadata,
        features,
    })
}

/// Lazily parses records from a stream of lines. Each record is fully parsed before the next one
/// is read. Iteration ends after the first error.
pub struct Records<I> {
    lines: I,
    config: ParserConfig,
    done: bool,
    count: usize,
}

impl<I> Records<I>
where
    I: Iterator<Item = Result<String>>,
{
    pub fn new(lines: I, config: ParserConfig) -> Self {
        Records {
            lines,
            config,
            done: false,
            count: 0,
        }
    }
}

impl<I> Iterator for Records<I>
where
    I: Iterator<Item = Result<String>>,
{
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut batch: Vec<String> = Vec::new();
        loop {
            match self.lines.next() {
                None => {
                    self.done = true;
                    return if batch.is_empty() {
                        None
                    } else {
                        Some(Err(EmblError::Unterminated))
                    };
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                Some(Ok(line)) if line.starts_with(TERMINATOR) => {
                    self.count += 1;
                    let record = parse_record(&batch, &self.config);
                    match &record {
                        Ok(r) => debug!(
                            "record {}: {} bases, {} feature(s)",
                            self.count,
                            r.sequence.len(),
                            r.features.len()
                        ),
                        Err(e) => {
                            warn!("record {}: {}", self.count, e);
                            self.done = true;
                        }
                    }
                    return Some(record);
                }
                Some(Ok(line)) => batch.push(line),
            }
        }
    }
}

impl<I> std::iter::FusedIterator for Records<I> where I: Iterator<Item = Result<String>> {}

/// Parses every record in `text`.
pub fn parse_str(text: &str) -> Result<Vec<Record>> {
    parse_str_with(text, &ParserConfig::default())
}

pub fn parse_str_with(text: &str, config: &ParserConfig) -> Result<Vec<Record>> {
    let lines = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| Ok(l.to_string()));
    Records::new(lines, config.clone()).collect()
}
