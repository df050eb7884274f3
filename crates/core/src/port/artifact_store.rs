// Artifact Store Port - persistence for result files, reports and scripts

use crate::domain::{CheckKind, CommandResult};
use crate::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// A result artifact loaded back from storage
#[derive(Debug, Clone, PartialEq)]
pub struct StoredArtifact {
    pub file_name: String,
    pub contents: serde_json::Value,
}

impl StoredArtifact {
    pub fn new(file_name: impl Into<String>, contents: serde_json::Value) -> Self {
        Self {
            file_name: file_name.into(),
            contents,
        }
    }

    /// Name prefix before the timestamp (`health_check` for
    /// `health_check_20240131_235959.json`)
    pub fn prefix(&self) -> &str {
        split_artifact_name(&self.file_name)
            .map(|(prefix, _)| prefix)
            .unwrap_or(&self.file_name)
    }

    /// `YYYYMMDD_HHMMSS` component of the file name, if present
    pub fn stamp(&self) -> Option<&str> {
        split_artifact_name(&self.file_name).map(|(_, stamp)| stamp)
    }

    /// Check kind this artifact was produced by, if it is a suite result
    pub fn kind(&self) -> Option<CheckKind> {
        CheckKind::from_slug(self.prefix())
    }

    /// Command results contained in the artifact, keyed by label
    ///
    /// Entries that do not have the result shape (e.g. monitoring
    /// snapshots) are skipped.
    pub fn check_results(&self) -> Vec<(String, CommandResult)> {
        let Some(object) = self.contents.as_object() else {
            return Vec::new();
        };

        object
            .iter()
            .filter_map(|(label, value)| {
                serde_json::from_value::<CommandResult>(value.clone())
                    .ok()
                    .map(|result| (label.clone(), result))
            })
            .collect()
    }
}

/// Serialize with 4-space indentation, the layout of every JSON file the
/// toolkit writes
pub fn to_pretty_json<T: serde::Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    serde::Serialize::serialize(value, &mut serializer)?;
    // serde_json only ever emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Split `{prefix}_{YYYYMMDD}_{HHMMSS}.json` into prefix and stamp
pub fn split_artifact_name(file_name: &str) -> Option<(&str, &str)> {
    let stem = file_name.strip_suffix(".json")?;
    // stamp is the last 15 characters: 8 digits, '_', 6 digits
    if stem.len() < 17 || !stem.is_char_boundary(stem.len() - 15) {
        return None;
    }
    let (head, stamp) = stem.split_at(stem.len() - 15);
    let prefix = head.strip_suffix('_')?;

    let bytes = stamp.as_bytes();
    let well_formed = bytes.iter().enumerate().all(|(i, b)| {
        if i == 8 {
            *b == b'_'
        } else {
            b.is_ascii_digit()
        }
    });

    if well_formed && !prefix.is_empty() {
        Some((prefix, stamp))
    } else {
        None
    }
}

/// Artifact persistence
///
/// Result artifacts live in the results directory; reports and scripts in
/// their own directories so reports never embed earlier reports.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Persist a JSON artifact as `{prefix}_{stamp}.json` in the results
    /// directory
    ///
    /// # Returns
    /// Path of the written file
    async fn save_json(
        &self,
        prefix: &str,
        stamp: &str,
        body: &serde_json::Value,
    ) -> Result<PathBuf>;

    /// Load every result artifact, oldest first
    ///
    /// Files that are not valid JSON are skipped with a warning.
    async fn load_results(&self) -> Result<Vec<StoredArtifact>>;

    /// Write a report document into the reports directory
    async fn write_report(&self, file_name: &str, contents: &str) -> Result<PathBuf>;

    /// Write a shell script into the scripts directory (executable on Unix)
    async fn write_script(&self, file_name: &str, contents: &str) -> Result<PathBuf>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    /// In-memory artifact store
    #[derive(Clone, Default)]
    pub struct InMemoryArtifactStore {
        results: Arc<Mutex<BTreeMap<String, serde_json::Value>>>,
        reports: Arc<Mutex<BTreeMap<String, String>>>,
        scripts: Arc<Mutex<BTreeMap<String, String>>>,
    }

    impl InMemoryArtifactStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Seed a result artifact directly
        pub fn insert_result(&self, file_name: impl Into<String>, body: serde_json::Value) {
            self.results
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .insert(file_name.into(), body);
        }

        pub fn result(&self, file_name: &str) -> Option<serde_json::Value> {
            self.results
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .get(file_name)
                .cloned()
        }

        pub fn result_names(&self) -> Vec<String> {
            self.results
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .keys()
                .cloned()
                .collect()
        }

        pub fn report(&self, file_name: &str) -> Option<String> {
            self.reports
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .get(file_name)
                .cloned()
        }

        pub fn report_names(&self) -> Vec<String> {
            self.reports
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .keys()
                .cloned()
                .collect()
        }

        pub fn script(&self, file_name: &str) -> Option<String> {
            self.scripts
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .get(file_name)
                .cloned()
        }
    }

    #[async_trait]
    impl ArtifactStore for InMemoryArtifactStore {
        async fn save_json(
            &self,
            prefix: &str,
            stamp: &str,
            body: &serde_json::Value,
        ) -> Result<PathBuf> {
            let name = format!("{}_{}.json", prefix, stamp);
            self.insert_result(name.clone(), body.clone());
            Ok(PathBuf::from("memory/results").join(name))
        }

        async fn load_results(&self) -> Result<Vec<StoredArtifact>> {
            let results = self.results.lock().unwrap_or_else(|e| e.into_inner());
            let mut artifacts: Vec<StoredArtifact> = results
                .iter()
                .map(|(name, body)| StoredArtifact::new(name.clone(), body.clone()))
                .collect();
            artifacts.sort_by(|a, b| {
                a.stamp()
                    .cmp(&b.stamp())
                    .then_with(|| a.file_name.cmp(&b.file_name))
            });
            Ok(artifacts)
        }

        async fn write_report(&self, file_name: &str, contents: &str) -> Result<PathBuf> {
            self.reports
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .insert(file_name.to_string(), contents.to_string());
            Ok(PathBuf::from("memory/reports").join(file_name))
        }

        async fn write_script(&self, file_name: &str, contents: &str) -> Result<PathBuf> {
            self.scripts
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .insert(file_name.to_string(), contents.to_string());
            Ok(PathBuf::from("memory/scripts").join(file_name))
        }
    }
}
