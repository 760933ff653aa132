//! Append-only record store over the flat CSV records file.
//!
//! The file is the source of truth for campaign history. Every append
//! writes exactly one new row; existing rows are never rewritten or
//! deleted. Appends are serialized through an in-process mutex;
//! cross-process locking is out of scope.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use crate::errors::AppError;
use crate::models::CampaignRecord;

/// Campaign record store backed by a CSV flat file.
pub struct RecordStore {
    path: PathBuf,
    append_lock: Mutex<()>,
}

impl RecordStore {
    /// Create a store over the records file, creating parent directories.
    ///
    /// The file itself is created lazily on the first append.
    pub fn open(path: &Path) -> Result<Self, AppError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            append_lock: Mutex::new(()),
        })
    }

    /// Append a single record, writing the header row first if the file is
    /// new or empty.
    pub async fn append(&self, record: &CampaignRecord) -> Result<(), AppError> {
        let _guard = self.append_lock.lock().await;

        let write_header = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;

        Ok(())
    }

    /// Read every row from the records file.
    ///
    /// A missing file is an empty store. A file that exists but cannot be
    /// read or parsed is a storage error, not an empty result.
    pub async fn list(&self) -> Result<Vec<CampaignRecord>, AppError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;

        let mut records = Vec::new();
        for row in reader.deserialize() {
            records.push(row?);
        }

        Ok(records)
    }

    /// Case-insensitive substring search against the ID and platform
    /// columns. Linear scan, no index.
    pub async fn search(&self, term: &str) -> Result<Vec<CampaignRecord>, AppError> {
        let needle = term.to_lowercase();
        let records = self.list().await?;

        Ok(records
            .into_iter()
            .filter(|record| {
                record.campaign_id.to_lowercase().contains(&needle)
                    || record.platform.to_lowercase().contains(&needle)
            })
            .collect())
    }

    /// Look up a record by its exact campaign ID.
    pub async fn find(&self, campaign_id: &str) -> Result<Option<CampaignRecord>, AppError> {
        let records = self.list().await?;
        Ok(records
            .into_iter()
            .find(|record| record.campaign_id == campaign_id))
    }
}
