//! Contact directory: named bundles of field overrides.
//!
//! Selecting an entry bulk-fills the related contact fields through a
//! non-destructive merge into the form state. Built-in entries can be
//! extended from config; after load the table never changes. Switching
//! between entries does not clear what an earlier entry injected; only
//! fields named by the newly selected entry are rewritten.

use std::collections::BTreeMap;

use tracing::debug;

use crate::form::FormState;

/// One directory entry: a label plus the field overrides it injects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Unique label shown in the picker.
    pub label: String,
    /// Field identifier to value, applied via scalar writes.
    pub overrides: BTreeMap<String, String>,
}

impl DirectoryEntry {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            overrides: BTreeMap::new(),
        }
    }

    pub fn with_override(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.insert(field.into(), value.into());
        self
    }
}

/// Lookup table from contact label to overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryTable {
    entries: Vec<DirectoryEntry>,
}

impl DirectoryTable {
    /// Contacts shipped with the client.
    pub fn built_in() -> Self {
        Self {
            entries: vec![
                DirectoryEntry::new("Meridian Engineering Group")
                    .with_override("engineer_name", "Meridian Engineering Group")
                    .with_override("engineer_email", "projects@meridianeng.example.com")
                    .with_override("engineer_phone", "(555) 201-4400"),
                DirectoryEntry::new("Cascade Civil Works")
                    .with_override("engineer_name", "Cascade Civil Works, Inc.")
                    .with_override("engineer_email", "bids@cascadecivil.example.com")
                    .with_override("engineer_phone", "(555) 683-2190"),
                DirectoryEntry::new("Harbor Point Design")
                    .with_override("engineer_name", "Harbor Point Design Associates")
                    .with_override("engineer_email", "office@harborpoint.example.com")
                    .with_override("engineer_phone", "(555) 417-8852"),
            ],
        }
    }

    /// Built-ins plus config-supplied entries; a config entry replaces a
    /// built-in sharing its label.
    pub fn with_extra(extra: Vec<DirectoryEntry>) -> Self {
        let mut table = Self::built_in();
        for entry in extra {
            table.insert(entry);
        }
        table
    }

    fn insert(&mut self, entry: DirectoryEntry) {
        match self
            .entries
            .iter_mut()
            .find(|existing| existing.label == entry.label)
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn get(&self, label: &str) -> Option<&DirectoryEntry> {
        self.entries.iter().find(|entry| entry.label == label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &DirectoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge the labeled entry's overrides into `form`. Unknown labels
    /// are a no-op and leave previously injected values in place.
    /// Returns whether the label was known.
    pub fn apply(&self, label: &str, form: &mut FormState) -> bool {
        match self.get(label) {
            Some(entry) => {
                debug!(label, fields = entry.overrides.len(), "applying directory entry");
                form.merge_overrides(&entry.overrides);
                true
            }
            None => {
                debug!(label, "unknown directory label; form left untouched");
                false
            }
        }
    }
}
