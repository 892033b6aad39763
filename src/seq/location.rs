// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

//! Feature-table location descriptors.
//!
//! A descriptor such as `complement(join(<1..206,J00194.1:100..202,5..>10))` is turned into
//! zero-based, half-open spans on the sequence being parsed. The five base forms are:
//!
//! | form          | example            | span       |
//! |---------------|--------------------|------------|
//! | single base   | `67`               | `(66, 67)` |
//! | site          | `67^68`            | `(66, 67)` |
//! | base in range | `67.89`            | `(66, 89)` |
//! | range         | `67..89`           | `(66, 89)` |
//! | remote        | `J00123.1:67..89`  | dropped    |
//!
//! `<` before a start and `>` before an end mark that boundary as open (the feature extends
//! further than shown). `complement` flips the strand, `join` and `order` list several parts.

use bitflags::bitflags;
use serde::Serialize;

use crate::errors::{EmblError, Result};

bitflags! {
    /// Which ends of a span are not exactly known.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
    pub struct Boundary: u8 {
        const EXACT      = 0b00;
        const OPEN_START = 0b01;
        const OPEN_END   = 0b10;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub boundary: Boundary,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span {
            start,
            end,
            boundary: Boundary::EXACT,
        }
    }

    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn start_is_exact(&self) -> bool {
        !self.boundary.contains(Boundary::OPEN_START)
    }

    pub fn end_is_exact(&self) -> bool {
        !self.boundary.contains(Boundary::OPEN_END)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Strand {
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
}

impl Strand {
    pub fn as_str(self) -> &'static str {
        match self {
            Strand::Plus => "+",
            Strand::Minus => "-",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub spans: Vec<Span>,
    pub strand: Strand,
}

/// Parses `descriptor` against a sequence of `seq_len` bases. Parts that refer to another entry
/// (`ACCESSION.VERSION:...`) are dropped, so a purely remote location has no spans.
pub fn parse_location(descriptor: &str, seq_len: usize) -> Result<Location> {
    let mut parser = LocationParser {
        descriptor,
        bytes: descriptor.as_bytes(),
        pos: 0,
        seq_len,
        strand: Strand::Plus,
        spans: Vec::new(),
    };
    parser.skip_ws();
    if parser.at_end() {
        return Err(EmblError::location(descriptor, "empty location"));
    }
    parser.list()?;
    parser.skip_ws();
    if let Some(c) = parser.peek() {
        return Err(parser.error(format!(
            "unexpected '{}' at position {}",
            c as char, parser.pos
        )));
    }
    Ok(Location {
        spans: parser.spans,
        strand: parser.strand,
    })
}

struct LocationParser<'a> {
    descriptor: &'a str,
    bytes: &'a [u8],
    pos: usize,
    seq_len: usize,
    strand: Strand,
    spans: Vec<Span>,
}

impl LocationParser<'_> {
    fn error(&self, reason: impl Into<String>) -> EmblError {
        EmblError::location(self.descriptor, reason)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.bytes[self.pos..].starts_with(token.as_bytes()) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: u8) -> Result<()> {
        self.skip_ws();
        match self.peek() {
            Some(found) if found == c => {
                self.pos += 1;
                Ok(())
            }
            Some(found) => Err(self.error(format!(
                "expected '{}' at position {}, found '{}'",
                c as char, self.pos, found as char
            ))),
            None => Err(self.error(format!("expected '{}' before end of location", c as char))),
        }
    }

    // element (',' element)*
    fn list(&mut self) -> Result<()> {
        self.element()?;
        loop {
            self.skip_ws();
            if self.peek() == Some(b',') {
                self.pos += 1;
                self.element()?;
            } else {
                return Ok(());
            }
        }
    }

    fn element(&mut self) -> Result<()> {
        self.skip_ws();
        let word_start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_' || c == b'.')
        {
            self.pos += 1;
        }
        let descriptor = self.descriptor;
        let word = &descriptor[word_start..self.pos];
        self.skip_ws();
        match self.peek() {
            Some(b'(') if !word.is_empty() => self.operator(word),
            Some(b':') if !word.is_empty() => {
                self.pos += 1;
                // Remote entry: check the syntax, keep nothing.
                self.range(false)?;
                Ok(())
            }
            _ => {
                self.pos = word_start;
                if let Some(span) = self.range(true)? {
                    self.spans.push(span);
                }
                Ok(())
            }
        }
    }

    fn operator(&mut self, name: &str) -> Result<()> {
        match name {
            "complement" => self.strand = Strand::Minus,
            "join" | "order" => {}
            other => return Err(self.error(format!("unknown operator '{}'", other))),
        }
        self.expect(b'(')?;
        self.skip_ws();
        if self.peek() == Some(b')') {
            return Err(self.error(format!("'{}' has no arguments", name)));
        }
        self.list()?;
        self.expect(b')')
    }

    // A position, optionally marked open with '<' or '>'.
    fn position(&mut self) -> Result<(usize, Option<u8>)> {
        self.skip_ws();
        let mark = match self.peek() {
            Some(c @ (b'<' | b'>')) => {
                self.pos += 1;
                Some(c)
            }
            _ => None,
        };
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(match self.peek() {
                Some(c) => self.error(format!(
                    "expected a base position at {}, found '{}'",
                    start, c as char
                )),
                None => self.error("expected a base position before end of location"),
            });
        }
        let n: usize = self.descriptor[start..self.pos]
            .parse()
            .map_err(|_| self.error("base position out of range"))?;
        if n == 0 {
            return Err(self.error("base positions start at 1"));
        }
        Ok((n, mark))
    }

    // One of N, N^M, N.M, N..M. With `local` set the span is checked against the sequence length;
    // remote spans are parsed but not returned.
    fn range(&mut self, local: bool) -> Result<Option<Span>> {
        let (n, start_mark) = self.position()?;
        self.skip_ws();
        let span = if self.eat("..") {
            let (m, end_mark) = self.position()?;
            if n > m {
                return Err(self.error(format!("range start {} is after its end {}", n, m)));
            }
            let mut boundary = Boundary::EXACT;
            if start_mark.is_some() {
                boundary |= Boundary::OPEN_START;
            }
            if end_mark.is_some() {
                boundary |= Boundary::OPEN_END;
            }
            Span::new(n - 1, m).with_boundary(boundary)
        } else if self.eat("^") {
            let (m, _) = self.position()?;
            // m == 1 is a site across the origin of a circular molecule.
            if n.checked_add(1) != Some(m) && m != 1 {
                return Err(self.error(format!("site {}^{} is not between adjacent bases", n, m)));
            }
            Span::new(n - 1, n)
        } else if self.eat(".") {
            let (m, _) = self.position()?;
            if n > m {
                return Err(self.error(format!("range start {} is after its end {}", n, m)));
            }
            Span::new(n - 1, m)
        } else {
            let boundary = match start_mark {
                Some(b'<') => Boundary::OPEN_START,
                Some(_) => Boundary::OPEN_END,
                None => Boundary::EXACT,
            };
            Span::new(n - 1, n).with_boundary(boundary)
        };
        if !local {
            return Ok(None);
        }
        if span.end > self.seq_len {
            return Err(self.error(format!(
                "span ends at {}, past the sequence length {}",
                span.end, self.seq_len
            )));
        }
        Ok(Some(span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(descriptor: &str) -> Vec<(usize, usize)> {
        parse_location(descriptor, 10_000)
            .unwrap()
            .spans
            .iter()
            .map(|s| (s.start, s.end))
            .collect()
    }

    #[test]
    fn test_single_base() {
        let loc = parse_location("67", 100).unwrap();
        assert_eq!(loc.spans, vec![Span::new(66, 67)]);
        assert!(loc.spans[0].start_is_exact());
        assert!(loc.spans[0].end_is_exact());
        assert_eq!(loc.strand, Strand::Plus);
    }

    #[test]
    fn test_site() {
        let loc = parse_location("67^68", 100).unwrap();
        assert_eq!(loc.spans, vec![Span::new(66, 67)]);
        assert_eq!(loc.spans[0].boundary, Boundary::EXACT);
    }

    #[test]
    fn test_site_across_origin() {
        assert_eq!(spans("100^1"), vec![(99, 100)]);
    }

    #[test]
    fn test_site_not_adjacent() {
        assert!(parse_location("67^70", 100).is_err());
    }

    #[test]
    fn test_base_in_range() {
        assert_eq!(spans("67.89"), vec![(66, 89)]);
    }

    #[test]
    fn test_range() {
        let loc = parse_location("67..89", 100).unwrap();
        assert_eq!(loc.spans, vec![Span::new(66, 89)]);
        assert_eq!(loc.spans[0].len(), 23);
    }

    #[test]
    fn test_open_boundaries() {
        let loc = parse_location("<1..>63", 63).unwrap();
        let span = loc.spans[0];
        assert_eq!((span.start, span.end), (0, 63));
        assert!(!span.start_is_exact());
        assert!(!span.end_is_exact());

        let loc = parse_location("1..>63", 63).unwrap();
        assert_eq!(loc.spans[0].boundary, Boundary::OPEN_END);

        let loc = parse_location("<5", 63).unwrap();
        assert_eq!(loc.spans[0].boundary, Boundary::OPEN_START);

        let loc = parse_location(">5", 63).unwrap();
        assert_eq!(loc.spans[0].boundary, Boundary::OPEN_END);
    }

    #[test]
    fn test_remote_only_is_dropped() {
        let loc = parse_location("J00123.1:67..89", 100).unwrap();
        assert!(loc.spans.is_empty());
    }

    #[test]
    fn test_remote_mixed_with_local() {
        assert_eq!(spans("J00123.1:67..89,200..209"), vec![(199, 209)]);
        assert_eq!(spans("join(1..5,J00123.1:67..89,200..209)"), vec![(0, 5), (199, 209)]);
    }

    #[test]
    fn test_complement() {
        let loc = parse_location("complement(<2..>8)", 9).unwrap();
        assert_eq!(loc.strand, Strand::Minus);
        assert_eq!(
            loc.spans,
            vec![Span::new(1, 8).with_boundary(Boundary::OPEN_START | Boundary::OPEN_END)]
        );
    }

    #[test]
    fn test_nested_operators() {
        let loc = parse_location("complement(join(2691..4571,4918..5163))", 10_000).unwrap();
        assert_eq!(loc.strand, Strand::Minus);
        assert_eq!(loc.spans, vec![Span::new(2690, 4571), Span::new(4917, 5163)]);
        assert_eq!(spans("order(1..3, 7..9)"), vec![(0, 3), (6, 9)]);
        assert_eq!(spans("join(complement(1..3),7..9)"), vec![(0, 3), (6, 9)]);
    }

    #[test]
    fn test_past_sequence_end() {
        let err = parse_location("1..101", 100).unwrap_err();
        assert!(matches!(err, EmblError::Location { .. }));
    }

    #[test]
    fn test_remote_not_checked_against_length() {
        assert!(parse_location("J00123.1:1..5000", 100).is_ok());
    }

    #[test]
    fn test_malformed() {
        for bad in [
            "", "..5", "5..", "join(1..5", "join()", "frob(1..5)", "1..5)", "0..5", "9..5", "1-5",
            "join(1..5,)", "x",
            "18446744073709551615^1", "18446744073709551615^18446744073709551615",
            "99999999999999999999999",
        ] {
            assert!(parse_location(bad, 100).is_err(), "accepted {:?}", bad);
        }
    }
}
