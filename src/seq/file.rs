// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::info;

use crate::config::ParserConfig;
use crate::errors::{EmblError, Result};
use crate::seq::embl::Records;
use crate::seq::record::Record;

// For our purposes, an EMBL file is just a Vec of records.

pub type EmblFile = Vec<Record>;

// More leading blank lines than this and the input is not taken for EMBL.
const MAX_LEADING_BLANKS: usize = 5;

/// Reads lines without their line ending, skipping lines that contain only whitespace. Trailing
/// blanks on other lines are kept: columns matter in parts of the format.
pub struct Lines<R> {
    reader: R,
}

impl<R: BufRead> Iterator for Lines<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut buf = String::new();
            match self.reader.read_line(&mut buf) {
                Ok(0) => return None,
                Ok(_) => {
                    if buf.trim().is_empty() {
                        continue;
                    }
                    let end = buf.trim_end_matches(['\n', '\r']).len();
                    buf.truncate(end);
                    return Some(Ok(buf));
                }
                Err(e) => return Some(Err(EmblError::Io(e))),
            }
        }
    }
}

pub fn lines<R: BufRead>(reader: R) -> Lines<R> {
    Lines { reader }
}

pub fn records<R: BufRead>(reader: R, config: ParserConfig) -> Records<Lines<R>> {
    Records::new(lines(reader), config)
}

/// Whether `reader` looks like EMBL: the first non-blank line, after no more than a few blank
/// ones, is an ID line.
pub fn sniff<R: BufRead>(reader: R) -> Result<bool> {
    let mut blanks = 0;
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            blanks += 1;
            if blanks > MAX_LEADING_BLANKS {
                return Ok(false);
            }
            continue;
        }
        return Ok(line.starts_with("ID"));
    }
    Ok(false)
}

/// Picks record number `n` (counting from 1), parsing only as far as needed.
pub fn nth_record<I>(records: I, n: usize) -> Result<Record>
where
    I: IntoIterator<Item = Result<Record>>,
{
    if n == 0 {
        return Err(EmblError::RecordNumber {
            requested: n,
            reason: String::from("records are numbered from 1"),
        });
    }
    let mut seen = 0;
    for record in records {
        let record = record?;
        seen += 1;
        if seen == n {
            return Ok(record);
        }
    }
    Err(EmblError::RecordNumber {
        requested: n,
        reason: format!("the input holds only {} record(s)", seen),
    })
}

pub fn read_embl_file<P: AsRef<Path>>(path: P) -> Result<EmblFile> {
    read_embl_file_with(path, &ParserConfig::default())
}

pub fn read_embl_file_with<P: AsRef<Path>>(path: P, config: &ParserConfig) -> Result<EmblFile> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let result: EmblFile = records(BufReader::new(file), config.clone()).collect::<Result<_>>()?;
    info!("{}: {} record(s)", path.display(), result.len());
    Ok(result)
}
