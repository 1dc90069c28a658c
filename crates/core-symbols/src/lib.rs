//! Symbol store: the user-curated, ordered list of `(id, glyph)` records.
//!
//! Identity is positional. Ids may repeat (duplicate prevention is surfaced as
//! a warning, not enforced as an invariant), so every command addresses a
//! record by index.
//!
//! Mutation goes exclusively through `SymbolCommand` values applied with
//! `SymbolStore::apply`, keeping settings UI callbacks decoupled from both the
//! store layout and any re-rendering they trigger. Readers take a slice view
//! per evaluation (`records()`); nothing derived from the store is cached.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, trace};

/// A single symbol the user can insert.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SymbolRecord {
    /// Search identifier typed after the trigger character.
    #[serde(default)]
    pub id: String,
    /// Text inserted on commit.
    #[serde(default, alias = "symbol")]
    pub glyph: String,
}

impl SymbolRecord {
    pub fn new(id: impl Into<String>, glyph: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            glyph: glyph.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("symbol index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("id `{id}` already used by symbol #{existing}")]
    DuplicateId { id: String, existing: usize },
}

/// Store mutation issued by a configuration surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolCommand {
    Append(SymbolRecord),
    Remove(usize),
    /// Swap `i` with `i + 1`.
    SwapAdjacent(usize),
    MoveUp(usize),
    MoveDown(usize),
    SetId { index: usize, id: String },
    SetGlyph { index: usize, glyph: String },
}

impl SymbolCommand {
    /// The "new symbol" button: an empty record at the end.
    pub fn append_blank() -> Self {
        SymbolCommand::Append(SymbolRecord::default())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolStore {
    records: Vec<SymbolRecord>,
}

impl SymbolStore {
    pub fn from_records(records: Vec<SymbolRecord>) -> Self {
        Self { records }
    }

    /// Read-only view in iteration order.
    pub fn records(&self) -> &[SymbolRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&SymbolRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn check_index(&self, index: usize) -> Result<(), StoreError> {
        if index < self.records.len() {
            Ok(())
        } else {
            Err(StoreError::IndexOutOfRange {
                index,
                len: self.records.len(),
            })
        }
    }

    /// Index of another record (not `index`) whose id equals `id` exactly.
    pub fn id_in_use_elsewhere(&self, index: usize, id: &str) -> Option<usize> {
        self.records
            .iter()
            .enumerate()
            .find(|(i, r)| *i != index && r.id == id)
            .map(|(i, _)| i)
    }

    /// Non-empty ids occurring more than once, in first-occurrence order.
    pub fn duplicate_ids(&self) -> Vec<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for r in &self.records {
            if !r.id.is_empty() {
                *counts.entry(r.id.as_str()).or_default() += 1;
            }
        }
        let mut out: Vec<String> = Vec::new();
        for r in &self.records {
            if counts.get(r.id.as_str()).copied().unwrap_or(0) > 1 && !out.contains(&r.id) {
                out.push(r.id.clone());
            }
        }
        out
    }

    /// Apply a command. On error the store is left untouched.
    pub fn apply(&mut self, cmd: SymbolCommand) -> Result<(), StoreError> {
        match cmd {
            SymbolCommand::Append(record) => {
                self.records.push(record);
                debug!(target: "symbols.store", len = self.records.len(), "append");
            }
            SymbolCommand::Remove(index) => {
                self.check_index(index)?;
                self.records.remove(index);
                debug!(target: "symbols.store", index, len = self.records.len(), "remove");
            }
            SymbolCommand::SwapAdjacent(index) => {
                self.check_index(index.saturating_add(1))?;
                self.records.swap(index, index + 1);
                debug!(target: "symbols.store", a = index, b = index + 1, "swap_adjacent");
            }
            SymbolCommand::MoveUp(index) => {
                if index == 0 {
                    return Err(StoreError::IndexOutOfRange {
                        index,
                        len: self.records.len(),
                    });
                }
                return self.apply(SymbolCommand::SwapAdjacent(index - 1));
            }
            SymbolCommand::MoveDown(index) => {
                return self.apply(SymbolCommand::SwapAdjacent(index));
            }
            SymbolCommand::SetId { index, id } => {
                self.check_index(index)?;
                if !id.is_empty()
                    && let Some(existing) = self.id_in_use_elsewhere(index, &id)
                {
                    return Err(StoreError::DuplicateId { id, existing });
                }
                trace!(target: "symbols.store", index, id_len = id.chars().count(), "set_id");
                self.records[index].id = id;
            }
            SymbolCommand::SetGlyph { index, glyph } => {
                self.check_index(index)?;
                trace!(target: "symbols.store", index, "set_glyph");
                self.records[index].glyph = glyph;
            }
        }
        Ok(())
    }
}

impl From<Vec<SymbolRecord>> for SymbolStore {
    fn from(records: Vec<SymbolRecord>) -> Self {
        Self::from_records(records)
    }
}
