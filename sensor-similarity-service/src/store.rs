//! Append-only newline-delimited JSON persistence for sensor readings.
//!
//! The whole record sequence lives in memory and is mirrored to a single
//! data file, one JSON object per line. The in-memory push and the file
//! append happen under one lock so a completed append is visible in both.

use sensor_similarity_types::SensorReading;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::sync::Mutex;

#[derive(Debug)]
pub struct Store {
    inner: Mutex<StoreInner>,
}

#[derive(Debug)]
struct StoreInner {
    records: Vec<SensorReading>,
    file: File,
}

impl Store {
    /// Open the store at `path`, replaying any existing records in file
    /// order. A missing file starts an empty store.
    ///
    /// A line that fails to parse aborts the open entirely, naming the
    /// line — the file must be repaired offline (see the `convert_dataset`
    /// and `rebracket_dataset` tools) before the service will start.
    pub fn open(path: &Path) -> Result<Self, String> {
        let records = match File::open(path) {
            Ok(f) => load_records(f, path)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!(
                    "{} not found, starting with an empty store",
                    path.display()
                );
                Vec::new()
            }
            Err(e) => return Err(format!("Failed to open {}: {}", path.display(), e)),
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| format!("Failed to open {} for append: {}", path.display(), e))?;

        Ok(Self {
            inner: Mutex::new(StoreInner { records, file }),
        })
    }

    /// Append one reading to the in-memory sequence and then to the data
    /// file, as a single locked unit. Returns the new record's positional
    /// index.
    ///
    /// No flush beyond the platform's buffered-append semantics. If the
    /// file write fails the in-memory entry is kept and the error is
    /// surfaced; there is no reconciliation path.
    pub fn append(&self, reading: SensorReading) -> Result<usize, String> {
        let line = serde_json::to_string(&reading)
            .map_err(|e| format!("Failed to serialize reading: {}", e))?;

        let mut inner = self.inner.lock().unwrap();
        inner.records.push(reading);
        let id = inner.records.len() - 1;
        writeln!(inner.file, "{}", line)
            .map_err(|e| format!("Failed to append to data file: {}", e))?;
        Ok(id)
    }

    /// Copy of the current record sequence, for scoring outside the lock.
    pub fn snapshot(&self) -> Vec<SensorReading> {
        self.inner.lock().unwrap().records.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn load_records(file: File, path: &Path) -> Result<Vec<SensorReading>, String> {
    let reader = BufReader::new(file);
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        if line.trim().is_empty() {
            continue;
        }
        let reading: SensorReading = serde_json::from_str(&line).map_err(|e| {
            format!(
                "Malformed record at {} line {}: {}",
                path.display(),
                idx + 1,
                e
            )
        })?;
        records.push(reading);
    }
    Ok(records)
}
