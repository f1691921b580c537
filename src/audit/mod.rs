//! Append-only audit trail
//!
//! Every mutating action in the engine produces exactly one entry here.
//! Entries are kept in memory for queries and, when a data directory is
//! configured, appended to `audit.jsonl` with fsync before the enclosing
//! mutation is allowed to commit. The trail is never compacted or rewritten;
//! on startup an existing file is replayed to restore the sequence counter.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};

use crate::error::{EngineError, EngineResult};
use crate::types::{AuditAction, AuditLogEntry, EntityKind, UserId};
use crate::utils::current_timestamp;

/// File name of the JSONL sink inside the data directory.
const AUDIT_FILE: &str = "audit.jsonl";

/// The append-only trail of mutating actions.
pub struct AuditTrail {
    entries: RwLock<Vec<AuditLogEntry>>,
    /// Next sequence number to assign. Sequence numbers are monotonic but
    /// may have gaps when an append fails after reserving one.
    next_seq: AtomicU64,
    /// JSONL sink; `None` keeps the trail memory-only (tests, demos).
    file_path: Option<PathBuf>,
    /// Serializes appends so sequence ids, file lines and the in-memory
    /// vec all agree on order.
    append_lock: Mutex<()>,
}

impl AuditTrail {
    /// Create a memory-only trail.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            next_seq: AtomicU64::new(1),
            file_path: None,
            append_lock: Mutex::new(()),
        }
    }

    /// Create a trail backed by `<data_dir>/audit.jsonl`, replaying any
    /// entries already on disk.
    pub fn with_data_dir<P: AsRef<Path>>(data_dir: P) -> EngineResult<Self> {
        let dir = data_dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(AUDIT_FILE);

        let existing = Self::load_entries(&path)?;
        let next_seq = existing.iter().map(|e| e.id).max().unwrap_or(0) + 1;

        Ok(Self {
            entries: RwLock::new(existing),
            next_seq: AtomicU64::new(next_seq),
            file_path: Some(path),
            append_lock: Mutex::new(()),
        })
    }

    fn load_entries(path: &Path) -> EngineResult<Vec<AuditLogEntry>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            if line.trim().is_empty() {
                continue;
            }
            match AuditLogEntry::from_json_line(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::warn!(line = line_num + 1, error = %e, "skipping unparsable audit line");
                }
            }
        }

        Ok(entries)
    }

    /// Append one entry for a mutating action.
    ///
    /// Returns the committed entry. On any sink failure the entry is not
    /// recorded and the caller must abort its mutation.
    pub fn append(
        &self,
        actor: UserId,
        action: AuditAction,
        entity_type: EntityKind,
        entity_id: u64,
    ) -> EngineResult<AuditLogEntry> {
        // Id assignment, the file line and the in-memory push happen under
        // one lock, so `recent()` never observes them out of order.
        let _guard = self.append_lock.lock();

        let entry = AuditLogEntry {
            id: self.next_seq.fetch_add(1, Ordering::SeqCst),
            timestamp: current_timestamp(),
            actor,
            action,
            entity_type,
            entity_id,
        };

        if let Some(path) = &self.file_path {
            self.append_to_file(path, &entry)?;
        }

        self.entries.write().push(entry.clone());
        Ok(entry)
    }

    fn append_to_file(&self, path: &Path, entry: &AuditLogEntry) -> EngineResult<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let line = entry
            .to_json_line()
            .map_err(|e| EngineError::Audit(e.to_string()))?;
        writeln!(file, "{}", line)?;
        // The mutation commits only after the entry is durable.
        file.sync_all()?;
        Ok(())
    }

    /// Most recent entries, newest first.
    pub fn recent(&self, limit: usize) -> Vec<AuditLogEntry> {
        let entries = self.entries.read();
        entries.iter().rev().take(limit).cloned().collect()
    }

    /// All entries for one entity, oldest first.
    pub fn for_entity(&self, entity_type: EntityKind, entity_id: u64) -> Vec<AuditLogEntry> {
        let entries = self.entries.read();
        entries
            .iter()
            .filter(|e| e.entity_type == entity_type && e.entity_id == entity_id)
            .cloned()
            .collect()
    }

    /// Number of entries recorded so far.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for AuditTrail {
    fn default() -> Self {
        Self::new()
    }
}
