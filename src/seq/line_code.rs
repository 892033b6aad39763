// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::fmt;

use serde::Serialize;

// The two-letter line codes of the EMBL flat-file format, in the order in which they appear in an
// entry. XX, FH and AH are decoration: recognised, but their content is thrown away.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LineCode {
    Id,
    Ac,
    Pr,
    Dt,
    De,
    Kw,
    Os,
    Oc,
    Og,
    Rn,
    Rc,
    Rp,
    Rx,
    Rg,
    Ra,
    Rt,
    Rl,
    Dr,
    Cc,
    Ah,
    As,
    Fh,
    Ft,
    Xx,
    Sq,
    Co,
}

impl LineCode {
    /// Looks up the code at the start of `line`. Lines shorter than two characters, and lines
    /// whose prefix is not an EMBL code, yield `None`.
    pub fn from_line(line: &str) -> Option<LineCode> {
        line.get(..2).and_then(LineCode::from_code)
    }

    pub fn from_code(code: &str) -> Option<LineCode> {
        use LineCode::*;
        let lc = match code {
            "ID" => Id,
            "AC" => Ac,
            "PR" => Pr,
            "DT" => Dt,
            "DE" => De,
            "KW" => Kw,
            "OS" => Os,
            "OC" => Oc,
            "OG" => Og,
            "RN" => Rn,
            "RC" => Rc,
            "RP" => Rp,
            "RX" => Rx,
            "RG" => Rg,
            "RA" => Ra,
            "RT" => Rt,
            "RL" => Rl,
            "DR" => Dr,
            "CC" => Cc,
            "AH" => Ah,
            "AS" => As,
            "FH" => Fh,
            "FT" => Ft,
            "XX" => Xx,
            "SQ" => Sq,
            "CO" => Co,
            _ => return None,
        };
        Some(lc)
    }

    pub fn as_str(self) -> &'static str {
        use LineCode::*;
        match self {
            Id => "ID",
            Ac => "AC",
            Pr => "PR",
            Dt => "DT",
            De => "DE",
            Kw => "KW",
            Os => "OS",
            Oc => "OC",
            Og => "OG",
            Rn => "RN",
            Rc => "RC",
            Rp => "RP",
            Rx => "RX",
            Rg => "RG",
            Ra => "RA",
            Rt => "RT",
            Rl => "RL",
            Dr => "DR",
            Cc => "CC",
            Ah => "AH",
            As => "AS",
            Fh => "FH",
            Ft => "FT",
            Xx => "XX",
            Sq => "SQ",
            Co => "CO",
        }
    }

    /// The logical section a code belongs to. All reference sub-codes are part of the RN section;
    /// every other code is its own section.
    pub fn section(self) -> LineCode {
        use LineCode::*;
        match self {
            Rc | Rp | Rx | Rg | Ra | Rt | Rl => Rn,
            other => other,
        }
    }

    pub fn is_decoration(self) -> bool {
        matches!(self, LineCode::Xx | LineCode::Fh | LineCode::Ah)
    }
}

impl fmt::Display for LineCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The text of `line` from character column `n` on; empty if the line is shorter. Columns count
/// characters, not bytes.
pub fn from_column(line: &str, n: usize) -> &str {
    line.char_indices().nth(n).map_or("", |(i, _)| &line[i..])
}
