// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::{
    fs::File,
    io::{stdout, BufReader, Write},
    path::Path,
};

use clap::Parser;
use itertools::Itertools;
use log::{debug, info, warn};

use crate::config::{find_config, LengthCheck, ParserConfig};
use crate::errors::EmblError;
use crate::seq::file::{nth_record, records, sniff};
use crate::seq::line_code::LineCode;
use crate::seq::record::{Record, Topology};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None) ]
struct Cli {
    /// EMBL file
    embl_fname: String,

    /// Print each record as JSON (one record per line) instead of a summary
    #[arg(short, long)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(short, long, requires = "json")]
    pretty: bool,

    /// Only output record number N (counting from 1)
    #[arg(short = 'n', long = "seq-num")]
    seq_num: Option<usize>,

    /// What to do when the sequence length differs from the ID line
    #[arg(short, long = "length-check",
        help = "Sequence length mismatch handling [error|warn]; default: error",
        hide_possible_values = true,
    )]
    length_check: Option<LengthCheck>,

    /// Ignore .emblconfig files
    #[arg(long = "no-config")]
    no_config: bool,
}

fn load_config(cli: &Cli) -> Result<ParserConfig, EmblError> {
    let mut config = match find_config() {
        Some(path) if !cli.no_config => {
            debug!("reading config from {}", path.display());
            ParserConfig::from_file(&path)?
        }
        _ => ParserConfig::default(),
    };
    if let Some(length_check) = cli.length_check {
        config.length_check = length_check;
    }
    if cli.pretty {
        config.pretty_json = true;
    }
    Ok(config)
}

pub fn record_summary(record: &Record) -> String {
    let mut lines: Vec<String> = Vec::new();
    if let Some(id) = record.id() {
        let topology = match id.topology {
            Topology::Linear => "linear",
            Topology::Circular => "circular",
        };
        lines.push(format!("accession: {}.{}", id.accession, id.version));
        lines.push(format!("topology: {}", topology));
        lines.push(format!("mol_type: {}", id.mol_type));
        lines.push(format!("division: {}", id.division));
        lines.push(format!("size: {} {}", id.size, id.unit()));
    }
    if let Some(de) = record.get(LineCode::De).and_then(|v| v.as_lines()) {
        lines.push(format!(
            "description: {}",
            de.iter().map(|l| l.trim()).join(" ")
        ));
    }
    lines.push(format!("nb_references: {}", record.references().len()));
    lines.push(format!("nb_features: {}", record.features.len()));
    if !record.features.is_empty() {
        lines.push(format!(
            "features: {}",
            record.features.iter().map(|f| f.feature_type()).join(", ")
        ));
    }
    lines.push(format!("sequence_length: {}", record.sequence.len()));
    lines.iter().map(|l| format!("{}\n", l)).collect()
}

fn output_record(record: &Record, cli: &Cli, config: &ParserConfig) -> Result<(), EmblError> {
    let mut out = stdout().lock();
    if cli.json {
        if config.pretty_json {
            serde_json::to_writer_pretty(&mut out, record)?;
        } else {
            serde_json::to_writer(&mut out, record)?;
        }
        writeln!(out)?;
    } else {
        writeln!(out, "{}", record_summary(record))?;
    }
    Ok(())
}

pub fn run() -> Result<(), EmblError> {
    env_logger::init();
    info!("Starting log");

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let path = Path::new(&cli.embl_fname);

    if !sniff(BufReader::new(File::open(path)?))? {
        warn!("{} does not start with an ID line; trying anyway", path.display());
    }

    let reader = BufReader::new(File::open(path)?);
    let stream = records(reader, config.clone());
    match cli.seq_num {
        Some(n) => {
            let record = nth_record(stream, n)?;
            output_record(&record, &cli, &config)?;
        }
        None => {
            let mut count = 0;
            for record in stream {
                output_record(&record?, &cli, &config)?;
                count += 1;
            }
            info!("{} record(s) read from {}", count, path.display());
        }
    }
    Ok(())
}
