mod common;

use std::fs;

use crate::common::utils::{open_records, MULTI, X56734};

use emblparse::config::{LengthCheck, ParserConfig};
use emblparse::errors::EmblError;
use emblparse::seq::embl::{parse_str, parse_str_with};
use emblparse::seq::file::{nth_record, read_embl_file, sniff};
use emblparse::seq::line_code::LineCode;
use emblparse::seq::location::{Boundary, Span, Strand};
use emblparse::seq::record::Topology;

#[test]
fn test_x56734_header() {
    let records = read_embl_file(X56734).unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];

    let id = record.id().unwrap();
    assert_eq!(id.accession, "X56734");
    assert_eq!(id.version, "1");
    assert_eq!(id.topology, Topology::Linear);
    assert_eq!(id.mol_type, "mRNA");
    assert_eq!(id.data_class, "STD");
    assert_eq!(id.division, "PLN");
    assert_eq!(id.size, 1859);
    assert_eq!(record.size_unit(), Some("bp"));

    assert_eq!(
        record.get(LineCode::Ac).and_then(|v| v.as_lines()).unwrap(),
        ["X56734", "S46826"]
    );
    assert_eq!(
        record.get(LineCode::Kw).and_then(|v| v.as_lines()).unwrap(),
        ["beta-glucosidase"]
    );
    let oc = record.get(LineCode::Oc).and_then(|v| v.as_lines()).unwrap();
    assert_eq!(oc.len(), 17);
    assert_eq!(oc.first().map(String::as_str), Some("Eukaryota"));
    assert_eq!(oc.last().map(String::as_str), Some("Trifolium"));
    assert_eq!(
        record.get(LineCode::Dr).and_then(|v| v.as_tokens()).unwrap(),
        [vec!["MD5".to_string(), "1e51ca3a5450c43524b9185c236cc5cc".to_string()]]
    );
}

#[test]
fn test_x56734_references() {
    let records = read_embl_file(X56734).unwrap();
    let refs = records[0].references();
    assert_eq!(refs.len(), 2);

    assert_eq!(refs[0].number, "[5]");
    assert_eq!(refs[0].positions, ["1-1859"]);
    assert_eq!(
        refs[0].cross_references,
        ["DOI; 10.1007/BF00039495.", "PUBMED; 1907511."]
    );
    assert_eq!(
        refs[0].authors,
        ["Oxtoby E., Dunn M.A., Pancoro A., Hughes M.A.;"]
    );
    assert_eq!(refs[0].title.len(), 2);
    assert_eq!(refs[0].location, ["Plant Mol. Biol. 17(2):209-219(1991)."]);

    assert_eq!(refs[1].number, "[6]");
    assert_eq!(refs[1].title, [";"]);
    assert_eq!(refs[1].location.len(), 3);
    assert!(refs[1].comment.is_empty());
}

#[test]
fn test_x56734_features() {
    let records = read_embl_file(X56734).unwrap();
    let features = &records[0].features;
    let types: Vec<&str> = features.iter().map(|f| f.feature_type()).collect();
    assert_eq!(types, ["source", "mRNA", "CDS"]);

    let source = &features[0];
    assert_eq!(source.spans, vec![Span::new(0, 1859)]);
    assert_eq!(source.strand, Strand::Plus);
    assert_eq!(source.location(), "1..1859");
    assert_eq!(source.get_text("organism"), Some("Trifolium repens"));
    assert_eq!(source.get_text("clone_lib"), Some("lambda gt10"));

    let mrna = &features[1];
    assert_eq!(
        mrna.get_text("experiment"),
        Some("experimental evidence, no additional details recorded")
    );

    let cds = &features[2];
    assert_eq!(cds.spans, vec![Span::new(13, 1495)]);
    assert_eq!(cds.get_text("EC_number"), Some("3.2.1.21"));
    let xrefs = cds.get("db_xref").and_then(|v| v.as_list()).unwrap();
    assert_eq!(xrefs.len(), 6);
    assert_eq!(xrefs[0], "GOA:P26204");
    assert_eq!(xrefs[5], "UniProtKB/Swiss-Prot:P26204");
    assert!(cds.get("phase").is_none());

    let translation = cds.get_text("translation").unwrap();
    assert!(translation.starts_with("MDFIVAIFALFVISSF"));
    assert!(translation.ends_with("VKGFYAWSFLDCNEWFAGFTVRFGLNFVD"));
    assert!(!translation.contains(' '));
    assert_eq!(translation.len(), 493);
}

#[test]
fn test_x56734_sequence() {
    let records = read_embl_file(X56734).unwrap();
    let record = &records[0];
    assert_eq!(record.sequence.len(), 1859);
    assert!(record.sequence.starts_with("aaacaaaccaaatatggatt"));
    assert!(record.sequence.ends_with("aaaaaaaaaaaaaaaaaaaa"));

    let header = record.seq_header().unwrap();
    assert_eq!(header.total, 1859);
    assert_eq!((header.a, header.c, header.g, header.t), (609, 314, 355, 581));
    assert_eq!(header.other, 0);
    assert_eq!(header.composition_sum(), Some(1859));
}

#[test]
fn test_multi_stream() {
    let accessions: Vec<String> = open_records(MULTI)
        .map(|r| r.unwrap().id().unwrap().accession.clone())
        .collect();
    assert_eq!(accessions, ["X56734", "TST00002"]);
}

#[test]
fn test_multi_second_record() {
    let record = nth_record(open_records(MULTI), 2).unwrap();
    let id = record.id().unwrap();
    assert_eq!(id.version, "3");
    assert_eq!(id.topology, Topology::Circular);
    assert_eq!(id.mol_type, "genomic DNA");
    assert_eq!(id.size, 130);
    assert_eq!(record.sequence.len(), 130);
    assert!(record.sequence.starts_with("gctaaagacaattacataac"));

    assert_eq!(
        record.get(LineCode::Pr).and_then(|v| v.as_text()),
        Some("Project:PRJEB0001")
    );
    assert_eq!(
        record.get(LineCode::Og).and_then(|v| v.as_text()),
        Some("Plasmid pTST2")
    );
    assert_eq!(
        record.get(LineCode::Kw).and_then(|v| v.as_lines()).unwrap(),
        ["plasmid", "test entry"]
    );
    assert_eq!(
        record.get(LineCode::Dt).and_then(|v| v.as_lines()).unwrap().len(),
        2
    );
    assert_eq!(
        record.get(LineCode::Cc).and_then(|v| v.as_lines()).unwrap().len(),
        2
    );
    let dr = record.get(LineCode::Dr).and_then(|v| v.as_tokens()).unwrap();
    assert_eq!(dr[1], ["BioSample", "SAMEA0000001"]);

    let refs = record.references();
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].comment, ["Sequence checked by hand."]);
    assert_eq!(refs[0].group, ["Test Sequencing Consortium"]);
}

#[test]
fn test_multi_second_record_features() {
    let record = nth_record(open_records(MULTI), 2).unwrap();
    let f = &record.features;
    assert_eq!(f.len(), 6);

    let gene = &f[1];
    assert_eq!(gene.strand, Strand::Minus);
    assert_eq!(
        gene.spans,
        vec![Span::new(9, 60).with_boundary(Boundary::OPEN_START | Boundary::OPEN_END)]
    );

    let cds = &f[2];
    assert_eq!(cds.spans, vec![Span::new(9, 30), Span::new(39, 60)]);
    assert_eq!(cds.get("phase").and_then(|v| v.as_int()), Some(1));
    assert_eq!(cds.get("transl_table").and_then(|v| v.as_int()), Some(11));
    assert_eq!(
        cds.get_text("source"),
        Some("ab initio prediction:Prodigal:2.6")
    );
    assert!(cds.get("inference").is_none());
    assert_eq!(cds.get_text("translation"), Some("MKKLLPTAAAGLLL"));

    // Remote parts are dropped.
    assert_eq!(f[3].spans, vec![Span::new(99, 110)]);
    assert!(f[4].spans.is_empty());
    assert_eq!(f[4].location(), "J00123.1:1..5");

    assert_eq!(f[5].spans, vec![Span::new(129, 130)]);
}

#[test]
fn test_nth_record_past_end() {
    assert!(matches!(
        nth_record(open_records(MULTI), 3).unwrap_err(),
        EmblError::RecordNumber { requested: 3, .. }
    ));
}

#[test]
fn test_sniff_files() {
    assert!(sniff(fs::read_to_string(MULTI).unwrap().as_bytes()).unwrap());
    assert!(!sniff("> fasta header\nACGT\n".as_bytes()).unwrap());
}

#[test]
fn test_malformed_id_line() {
    let text = fs::read_to_string(X56734)
        .unwrap()
        .replace("; linear;", "; straight;");
    assert!(matches!(
        parse_str(&text).unwrap_err(),
        EmblError::IdLine { .. }
    ));
}

#[test]
fn test_truncated_sequence() {
    // Dropping the last data line leaves 1800 bases for an 1859 BP entry.
    let text = fs::read_to_string(X56734).unwrap();
    let last_data_line = text
        .lines()
        .rev()
        .find(|l| l.starts_with("     "))
        .unwrap()
        .to_string();
    let text = text.replace(&format!("{}\n", last_data_line), "");
    assert!(matches!(
        parse_str(&text).unwrap_err(),
        EmblError::LengthMismatch {
            declared: 1859,
            found: 1800
        }
    ));
    let config = ParserConfig {
        length_check: LengthCheck::Warn,
        ..Default::default()
    };
    let records = parse_str_with(&text, &config).unwrap();
    assert_eq!(records[0].sequence.len(), 1800);
}

#[test]
fn test_json_output() {
    let records = read_embl_file(X56734).unwrap();
    let json: serde_json::Value = serde_json::to_value(&records[0]).unwrap();
    assert_eq!(json["metadata"]["ID"]["accession"], "X56734");
    assert_eq!(json["metadata"]["ID"]["topology"], "linear");
    assert_eq!(json["features"][2]["strand"], "+");
    assert_eq!(json["features"][2]["qualifiers"]["type"], "CDS");
    assert_eq!(json["features"][2]["qualifiers"]["__location"], "14..1495");
}
