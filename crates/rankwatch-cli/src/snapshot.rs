//! Local snapshot of submitted targets.
//!
//! `submit --snapshot` records the targets it read per spreadsheet so that
//! `collect --snapshot` can match against exactly what was submitted without
//! re-reading the sheets. The file is removed once collection has written
//! every spreadsheet.

use std::path::Path;

use anyhow::Context;
use rankwatch_core::Target;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Snapshot {
    pub spreadsheets: Vec<SnapshotEntry>,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct SnapshotEntry {
    pub spreadsheet_id: String,
    #[serde(default)]
    pub name: String,
    pub targets: Vec<Target>,
}

impl Snapshot {
    pub(crate) fn push(&mut self, spreadsheet_id: &str, name: &str, targets: Vec<Target>) {
        self.spreadsheets.push(SnapshotEntry {
            spreadsheet_id: spreadsheet_id.to_owned(),
            name: name.to_owned(),
            targets,
        });
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub(crate) fn read(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading snapshot {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing snapshot {}", path.display()))
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub(crate) fn write(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self).context("serializing snapshot")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing snapshot {}", path.display()))?;
        tracing::info!(path = %path.display(), spreadsheets = self.spreadsheets.len(), "wrote target snapshot");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub(crate) fn remove(path: &Path) -> anyhow::Result<()> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("removing snapshot {}", path.display())),
        }
    }
}
