//! Persistence collaborators behind the corpus index.
//!
//! The index only needs to load everything once, write records through and
//! delete them; anything offering that contract can back it.

use crate::index::error::StoreError;
use crate::index::types::{ImageId, ImageRecord};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Read/write contract over structured OCR records
pub trait Store: Send + Sync {
    /// Every persisted record, in no particular order
    fn load_all(&self) -> Result<Vec<ImageRecord>, StoreError>;

    /// Insert or fully replace the record with `record.id`
    fn put(&self, record: &ImageRecord) -> Result<(), StoreError>;

    /// Delete a record; `Ok(false)` if it was not present
    fn delete(&self, id: ImageId) -> Result<bool, StoreError>;
}

/// In-process store, used by tests and short-lived sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<ImageId, ImageRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl Store for MemoryStore {
    fn load_all(&self) -> Result<Vec<ImageRecord>, StoreError> {
        Ok(self.records.read().values().cloned().collect())
    }

    fn put(&self, record: &ImageRecord) -> Result<(), StoreError> {
        self.records.write().insert(record.id, record.clone());
        Ok(())
    }

    fn delete(&self, id: ImageId) -> Result<bool, StoreError> {
        Ok(self.records.write().remove(&id).is_some())
    }
}

/// Directory of `<id>.json` files, one per image
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    /// Open a store rooted at `dir`; the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, id: ImageId) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }
}

impl Store for JsonDirStore {
    fn load_all(&self) -> Result<Vec<ImageRecord>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let file = fs::File::open(&path)?;
            let record: ImageRecord = serde_json::from_reader(BufReader::new(file))?;
            records.push(record);
        }

        Ok(records)
    }

    fn put(&self, record: &ImageRecord) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;

        // Write beside the target and rename so readers never see half a record
        let final_path = self.record_path(record.id);
        let tmp_path = final_path.with_extension("json.tmp");
        let written = write_record(&tmp_path, record)
            .and_then(|()| fs::rename(&tmp_path, &final_path).map_err(StoreError::from));
        if written.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        written
    }

    fn delete(&self, id: ImageId) -> Result<bool, StoreError> {
        match fs::remove_file(self.record_path(id)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

fn write_record(path: &Path, record: &ImageRecord) -> Result<(), StoreError> {
    let mut writer = BufWriter::new(fs::File::create(path)?);
    serde_json::to_writer(&mut writer, record)?;
    writer.flush()?;
    Ok(())
}
