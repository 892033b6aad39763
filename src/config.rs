// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

// Parser settings. They can come from a `.emblconfig` JSON file (in $HOME or the current
// directory), e.g.
//
//     { "length_check": "warn", "pretty_json": true }
//
// and are overridden by command-line flags.

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;

use crate::errors::{EmblError, Result};

const CONFIG_FILE_NAME: &str = ".emblconfig";

/// What to do when the sequence length differs from the size on the ID line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LengthCheck {
    #[default]
    Error,
    Warn,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    pub length_check: LengthCheck,
    pub pretty_json: bool,
}

impl ParserConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text).map_err(|e| match e {
            EmblError::Json(e) => EmblError::Config {
                path: path.display().to_string(),
                reason: e.to_string(),
            },
            other => other,
        })
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

pub fn find_config() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        let path = PathBuf::from(home).join(CONFIG_FILE_NAME);
        if path.exists() {
            return Some(path);
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        let path = cwd.join(CONFIG_FILE_NAME);
        if path.exists() {
            return Some(path);
        }
    }
    None
}
