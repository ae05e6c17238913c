use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Uploading,
    Processing,
    Complete,
    Error,
}

impl UploadStatus {
    pub fn is_finished(self) -> bool {
        matches!(self, UploadStatus::Complete | UploadStatus::Error)
    }
}

/// Progress of a single file within an upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadProgress {
    pub upload_id: String,
    pub file_name: String,
    /// Percentage, `0..=100`.
    pub progress: u8,
    pub status: UploadStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Shared registry of in-flight and finished uploads, keyed by upload id.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    entries: Mutex<HashMap<String, UploadProgress>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, UploadProgress>> {
        // Entries are plain data; a panic mid-update cannot leave them torn.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn with_entry<F>(&self, upload_id: &str, mutate: F) -> Option<UploadProgress>
    where
        F: FnOnce(&mut UploadProgress),
    {
        let mut entries = self.entries();
        let entry = entries.get_mut(upload_id)?;
        mutate(entry);
        Some(entry.clone())
    }

    pub fn begin(&self, upload_id: &str, file_name: &str) -> UploadProgress {
        let entry = UploadProgress {
            upload_id: upload_id.to_string(),
            file_name: file_name.to_string(),
            progress: 0,
            status: UploadStatus::Uploading,
            error: None,
        };
        self.entries().insert(upload_id.to_string(), entry.clone());
        entry
    }

    /// Move an uploading entry forward by `step` percent, stopping at 99 so
    /// that only [`complete`](Self::complete) reports 100.
    pub fn advance(&self, upload_id: &str, step: u8) -> Option<UploadProgress> {
        self.with_entry(upload_id, |entry| {
            if entry.status == UploadStatus::Uploading {
                entry.progress = entry.progress.saturating_add(step).min(99);
            }
        })
    }

    pub fn mark_processing(&self, upload_id: &str) -> Option<UploadProgress> {
        self.with_entry(upload_id, |entry| entry.status = UploadStatus::Processing)
    }

    pub fn complete(&self, upload_id: &str) -> Option<UploadProgress> {
        self.with_entry(upload_id, |entry| {
            entry.progress = 100;
            entry.status = UploadStatus::Complete;
            entry.error = None;
        })
    }

    pub fn fail(&self, upload_id: &str, error: impl Into<String>) -> Option<UploadProgress> {
        let error = error.into();
        self.with_entry(upload_id, |entry| {
            entry.status = UploadStatus::Error;
            entry.error = Some(error);
        })
    }

    pub fn get(&self, upload_id: &str) -> Option<UploadProgress> {
        self.entries().get(upload_id).cloned()
    }

    /// Read an entry for a client, dropping it once it has finished.
    ///
    /// A `Complete` or `Error` entry is returned one last time and then
    /// forgotten; in-flight entries stay.
    pub fn poll(&self, upload_id: &str) -> Option<UploadProgress> {
        let mut entries = self.entries();
        let entry = entries.get(upload_id)?.clone();
        if entry.status.is_finished() {
            entries.remove(upload_id);
        }
        Some(entry)
    }

    pub fn remove(&self, upload_id: &str) -> Option<UploadProgress> {
        self.entries().remove(upload_id)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> Vec<UploadProgress> {
        let mut all: Vec<UploadProgress> = self.entries().values().cloned().collect();
        all.sort_by(|a, b| a.upload_id.cmp(&b.upload_id));
        all
    }
}

/// Percentage at which simulated progress stops to wait for the server.
pub const SIMULATION_CEILING: u8 = 90;
pub const SIMULATION_STEP: u8 = 10;
pub const SIMULATION_INTERVAL: Duration = Duration::from_millis(200);

/// Fixed-step progress shown while the upload request is in flight.
///
/// Yields `step, 2*step, ...` up to [`SIMULATION_CEILING`]; the caller waits
/// [`interval`](Self::interval) between items.
#[derive(Debug, Clone)]
pub struct SimulatedProgress {
    current: u8,
    step: u8,
    interval: Duration,
}

pub fn simulate(step: u8, interval: Duration) -> SimulatedProgress {
    SimulatedProgress {
        current: 0,
        step: step.max(1),
        interval,
    }
}

impl SimulatedProgress {
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Iterator for SimulatedProgress {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.current >= SIMULATION_CEILING {
            return None;
        }
        self.current = self.current.saturating_add(self.step).min(SIMULATION_CEILING);
        Some(self.current)
    }
}
