pub mod config;
pub mod errors;
mod runner;
pub mod seq;

use crate::errors::EmblError;

pub use crate::seq::embl::{parse_str, Records};
pub use crate::seq::file::{read_embl_file, EmblFile};
pub use crate::seq::record::Record;

pub fn run() -> Result<(), EmblError> {
    runner::run()
}
