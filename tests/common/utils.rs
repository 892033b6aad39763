use std::fs::File;
use std::io::BufReader;

use emblparse::config::ParserConfig;
use emblparse::seq::embl::Records;
use emblparse::seq::file::{records, Lines};

pub const X56734: &str = "tests/data/x56734.embl";
pub const MULTI: &str = "tests/data/multi.embl";

pub fn open_records(path: &str) -> Records<Lines<BufReader<File>>> {
    let file = File::open(path).expect("test data file");
    records(BufReader::new(file), ParserConfig::default())
}
