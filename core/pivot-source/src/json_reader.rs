//! FILENAME: core/pivot-source/src/json_reader.rs
//! JSON reader: an array of flat objects, one per record.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use pivot_engine::Record;

use crate::SourceError;

pub fn load_json(path: &Path) -> Result<Vec<Record>, SourceError> {
    let reader = BufReader::new(File::open(path)?);
    let records: Vec<Record> = serde_json::from_reader(reader)?;
    Ok(records)
}
