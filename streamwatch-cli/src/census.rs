//! Append-only CSV log of every broadcaster seen in the category.
//!
//! The file doubles as the memory of which display names were already
//! logged: column 5 is read back at startup to seed the session.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Terminator, WriterBuilder};
use tracing::{debug, warn};

use crate::record::{StreamRecord, USER_NAME_COLUMN};
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct CensusLog {
    path: PathBuf,
}

impl CensusLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Display names already present in the log. A missing file is an empty
    /// log; rows too short to hold a display name are skipped.
    pub fn load_logged_names(&self) -> Result<HashSet<String>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "census log does not exist yet");
                return Ok(HashSet::new());
            }
            Err(e) => return Err(Error::io_path("opening census log", &self.path, e)),
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut names = HashSet::new();
        for (line, row) in reader.records().enumerate() {
            let row = row.map_err(|e| Error::csv(&self.path, e))?;
            match row.get(USER_NAME_COLUMN) {
                Some(name) => {
                    names.insert(name.to_string());
                }
                None => warn!(
                    path = %self.path.display(),
                    line = line + 1,
                    columns = row.len(),
                    "skipping short census row"
                ),
            }
        }
        Ok(names)
    }

    /// Appends one CRLF-terminated row. Each call opens, writes, flushes and
    /// closes the file; no handle outlives a row.
    pub fn append(&self, record: &StreamRecord) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| Error::io_path("opening census log", &self.path, e))?;

        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .terminator(Terminator::CRLF)
            .from_writer(file);
        writer
            .serialize(record)
            .map_err(|e| Error::csv(&self.path, e))?;
        writer
            .flush()
            .map_err(|e| Error::io_path("flushing census log", &self.path, e))?;
        Ok(())
    }
}
