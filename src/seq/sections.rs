// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

// One parser per line code. Each takes every line of one section (codes included) and returns
// what goes into the record. The table in `parser_for` is the only place that decides which
// parser handles which code.

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{EmblError, Result};
use crate::seq::feature::{parse_feature_table, IntervalFeature};
use crate::seq::line_code::{from_column, LineCode};
use crate::seq::record::{IdInfo, ReferenceBlock, SeqHeader, Topology, Value};

static ID_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^ID   ",
        r"(?P<accession>[^\s;]+); ",
        r"SV (?P<version>[^\s;]+); ",
        r"(?P<topology>linear|circular); ",
        r"(?P<mol_type>genomic DNA|genomic RNA|mRNA|tRNA|rRNA|other RNA|other DNA|",
        r"transcribed RNA|viral cRNA|unassigned DNA|unassigned RNA); ",
        r"(?P<data_class>CON|PAT|EST|GSS|HTC|HTG|MGA|WGS|TSA|STS|STD); ",
        r"(?P<division>PHG|ENV|FUN|HUM|INV|MAM|VRT|MUS|PLN|PRO|ROD|SYN|TGN|UNC|VRL); ",
        r"(?P<size>\d+) BP\.\s*$",
    ))
    .unwrap()
});

static SQ_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^SQ   Sequence (?P<total>\d+) BP; ",
        r"(?P<a>\d+) A; (?P<c>\d+) C; (?P<g>\d+) G; (?P<t>\d+) T; ",
        r"(?P<other>\d+) other;",
    ))
    .unwrap()
});

/// What the parsed lines of one section contribute to a record.
#[derive(Debug)]
pub enum Section {
    Value(Value),
    References(Vec<ReferenceBlock>),
    Sequence(SeqHeader, String),
    Features(Vec<IntervalFeature>),
}

/// What a section parser may need from sections already seen in the same record.
#[derive(Debug, Default, Clone, Copy)]
pub struct SectionContext {
    pub sequence_len: Option<usize>,
}

pub type SectionParser = fn(&[String], &SectionContext) -> Result<Section>;

pub fn parser_for(code: LineCode) -> SectionParser {
    use LineCode::*;
    match code {
        Id => parse_id,
        Ac => parse_ac,
        Pr => parse_pr,
        Dt => parse_dt,
        Kw | Oc => parse_semicolon_list,
        Og => parse_og,
        Rn | Rc | Rp | Rx | Rg | Ra | Rt | Rl => parse_references,
        Dr => parse_dr,
        As => parse_as,
        Ft => parse_ft,
        Sq => parse_sq,
        De | Os | Cc | Co | Ah | Fh | Xx => parse_default,
    }
}

// Free text starts at column 5, after the code and three blanks.
fn content(line: &str) -> &str {
    from_column(line, 5)
}

fn at_most_one(code: LineCode, lines: &[String]) -> Result<()> {
    if lines.len() > 1 {
        return Err(EmblError::Cardinality {
            code: code.as_str(),
            expected: "0 or 1",
            found: lines.len(),
        });
    }
    Ok(())
}

/// Strips the code from each line and keeps the rest as is.
pub fn parse_default(lines: &[String], _: &SectionContext) -> Result<Section> {
    Ok(Section::Value(Value::Lines(
        lines.iter().map(|l| content(l).to_string()).collect(),
    )))
}

pub fn parse_id(lines: &[String], _: &SectionContext) -> Result<Section> {
    if lines.len() != 1 {
        return Err(EmblError::Cardinality {
            code: "ID",
            expected: "exactly 1",
            found: lines.len(),
        });
    }
    let line = &lines[0];
    let bad_line = || EmblError::IdLine { line: line.clone() };
    let caps = ID_LINE.captures(line).ok_or_else(bad_line)?;
    let topology = match &caps["topology"] {
        "circular" => Topology::Circular,
        _ => Topology::Linear,
    };
    let size = caps["size"].parse().map_err(|_| bad_line())?;
    Ok(Section::Value(Value::Id(IdInfo {
        accession: caps["accession"].to_string(),
        version: caps["version"].to_string(),
        topology,
        mol_type: caps["mol_type"].to_string(),
        data_class: caps["data_class"].to_string(),
        division: caps["division"].to_string(),
        size,
    })))
}

pub fn parse_ac(lines: &[String], _: &SectionContext) -> Result<Section> {
    let accessions = lines
        .iter()
        .flat_map(|l| content(l).split_whitespace())
        .map(|ac| ac.trim_end_matches(';'))
        .filter(|ac| !ac.is_empty())
        .map(String::from)
        .collect();
    Ok(Section::Value(Value::Lines(accessions)))
}

pub fn parse_pr(lines: &[String], _: &SectionContext) -> Result<Section> {
    at_most_one(LineCode::Pr, lines)?;
    let project = lines
        .first()
        .map(|l| content(l).trim().trim_end_matches(';').to_string())
        .unwrap_or_default();
    Ok(Section::Value(Value::Text(project)))
}

pub fn parse_dt(lines: &[String], _: &SectionContext) -> Result<Section> {
    if lines.len() != 2 {
        return Err(EmblError::Cardinality {
            code: "DT",
            expected: "exactly 2",
            found: lines.len(),
        });
    }
    Ok(Section::Value(Value::Lines(
        lines.iter().map(|l| content(l).to_string()).collect(),
    )))
}

/// KW and OC: items separated by semicolons, the last one followed by a full stop. A lone `.`
/// means the list is empty.
pub fn parse_semicolon_list(lines: &[String], _: &SectionContext) -> Result<Section> {
    let items = lines
        .iter()
        .flat_map(|l| content(l).split(';'))
        .map(|item| item.trim().trim_end_matches('.'))
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect();
    Ok(Section::Value(Value::Lines(items)))
}

pub fn parse_og(lines: &[String], _: &SectionContext) -> Result<Section> {
    at_most_one(LineCode::Og, lines)?;
    let organelle = lines
        .first()
        .map(|l| content(l).trim().to_string())
        .unwrap_or_default();
    Ok(Section::Value(Value::Text(organelle)))
}

/// Reference lines. Every RN line opens a new block; the RC..RL lines after it are filed under
/// their code in that block.
pub fn parse_references(lines: &[String], _: &SectionContext) -> Result<Section> {
    let mut blocks: Vec<ReferenceBlock> = Vec::new();
    for line in lines {
        let code = LineCode::from_line(line);
        if code == Some(LineCode::Rn) {
            blocks.push(ReferenceBlock::new(content(line)));
            continue;
        }
        let unknown = || EmblError::UnknownReferenceCode {
            code: line.get(..2).unwrap_or(line).to_string(),
            line: line.clone(),
        };
        let code = code.filter(|c| c.section() == LineCode::Rn).ok_or_else(unknown)?;
        let block = blocks
            .last_mut()
            .ok_or_else(|| EmblError::OrphanReferenceLine { line: line.clone() })?;
        block
            .lines_for(code)
            .ok_or_else(unknown)?
            .push(content(line).to_string());
    }
    Ok(Section::References(blocks))
}

fn tokens(line: &str) -> impl Iterator<Item = &str> {
    content(line).split_whitespace()
}

pub fn parse_dr(lines: &[String], _: &SectionContext) -> Result<Section> {
    Ok(Section::Value(Value::Tokens(
        lines
            .iter()
            .map(|l| {
                tokens(l)
                    .map(|t| t.trim_end_matches([';', '.']).to_string())
                    .collect()
            })
            .collect(),
    )))
}

pub fn parse_as(lines: &[String], _: &SectionContext) -> Result<Section> {
    Ok(Section::Value(Value::Tokens(
        lines
            .iter()
            .map(|l| tokens(l).map(String::from).collect())
            .collect(),
    )))
}

/// The SQ line and the sequence data lines under it. Bases are lowercased; the running count at
/// the end of each data line is checked and dropped.
pub fn parse_sq(lines: &[String], _: &SectionContext) -> Result<Section> {
    let Some((header_line, data)) = lines.split_first() else {
        return Err(EmblError::Cardinality {
            code: "SQ",
            expected: "exactly 1",
            found: 0,
        });
    };
    let caps = SQ_LINE
        .captures(header_line)
        .ok_or_else(|| EmblError::SqLine {
            line: header_line.clone(),
        })?;
    let count = |name: &str| -> Result<usize> {
        caps[name].parse().map_err(|_| EmblError::SqLine {
            line: header_line.clone(),
        })
    };
    let header = SeqHeader {
        total: count("total")?,
        a: count("a")?,
        c: count("c")?,
        g: count("g")?,
        t: count("t")?,
        other: count("other")?,
    };
    let composition = header.composition_sum().ok_or_else(|| EmblError::SqLine {
        line: header_line.clone(),
    })?;
    if composition != header.total {
        warn!(
            "SQ composition counts add up to {}, not {}",
            composition, header.total
        );
    }

    let mut sequence = String::new();
    for line in data {
        let mut groups: Vec<&str> = line.split_whitespace().collect();
        let running: usize = groups
            .pop()
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| EmblError::SequenceLine {
                line: line.clone(),
                reason: String::from("no base count at end of line"),
            })?;
        for group in groups {
            sequence.push_str(&group.to_ascii_lowercase());
        }
        if running != sequence.len() {
            return Err(EmblError::SequenceLine {
                line: line.clone(),
                reason: format!("base count says {}, but {} bases read", running, sequence.len()),
            });
        }
    }
    if sequence.len() != header.total {
        warn!(
            "SQ line declares {} bases, sequence data has {}",
            header.total,
            sequence.len()
        );
    }
    Ok(Section::Sequence(header, sequence))
}

pub fn parse_ft(lines: &[String], ctx: &SectionContext) -> Result<Section> {
    let seq_len = ctx.sequence_len.ok_or(EmblError::FeaturesBeforeId)?;
    Ok(Section::Features(parse_feature_table(lines, seq_len)?))
}
