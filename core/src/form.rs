//! Mutable form state for one editing session.
//!
//! Scalar values live in a map keyed by field identifier; a missing key
//! reads as the empty string. Scope items are an append-only list that
//! may hold blank entries until submission filters them out. Values
//! survive template switches; the submission pipeline only reads the
//! fields the selected template declares.

use std::collections::{BTreeMap, HashMap};

use crate::error::{Error, Result};

/// Bullet prefix applied to each surviving scope item at submission.
pub const SCOPE_BULLET: &str = "• ";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    values: HashMap<String, String>,
    scope_items: Vec<String>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the value for one field. No validation; any string goes.
    pub fn set_scalar(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.values.insert(field.into(), value.into());
    }

    /// Value for `field`, defaulting to the empty string.
    pub fn scalar(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or_default()
    }

    /// All scalar values currently held.
    pub fn scalars(&self) -> &HashMap<String, String> {
        &self.values
    }

    /// Replace the scope item at `index`, or append when `index` equals
    /// the current length. Anything past that is rejected; append is the
    /// only growth path.
    pub fn set_scope_item(&mut self, index: usize, value: impl Into<String>) -> Result<()> {
        let len = self.scope_items.len();
        if index < len {
            self.scope_items[index] = value.into();
            Ok(())
        } else if index == len {
            self.scope_items.push(value.into());
            Ok(())
        } else {
            Err(Error::IndexOutOfRange { index, len })
        }
    }

    /// Append one empty scope item. Unbounded; no upper limit enforced.
    pub fn append_scope_item(&mut self) {
        self.scope_items.push(String::new());
    }

    pub fn scope_items(&self) -> &[String] {
        &self.scope_items
    }

    /// Apply every override as a scalar write. Fields absent from
    /// `overrides` keep their current value; the merge never removes a
    /// key.
    pub fn merge_overrides(&mut self, overrides: &BTreeMap<String, String>) {
        for (field, value) in overrides {
            self.set_scalar(field.clone(), value.clone());
        }
    }

    /// Join the non-blank scope items into one bulleted block.
    /// Whitespace-only entries are dropped; surviving entries keep their
    /// raw text.
    pub fn joined_scope_items(&self) -> String {
        self.scope_items
            .iter()
            .filter(|item| !item.trim().is_empty())
            .map(|item| format!("{SCOPE_BULLET}{item}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
