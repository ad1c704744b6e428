//! The Pokémon catalog: entity records loaded from CSV.
//!
//! Records carry a 1-based, contiguous integer ID; the similarity ranker
//! maps IDs to embedding-store positions through that contiguity, so the
//! catalog enforces it at load time.

pub mod csv;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{KantoError, Result};

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonRecord {
    /// 1-based entity ID.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Regional or alternate form, when present.
    pub form: Option<String>,
    /// Primary type.
    pub type1: String,
    /// Secondary type, when present.
    pub type2: Option<String>,
    /// Base stats.
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub sp_atk: u16,
    pub sp_def: u16,
    pub speed: u16,
}

impl PokemonRecord {
    /// Display name including the form suffix, e.g. `Raichu (Alolan Form)`.
    pub fn display_name(&self) -> String {
        match &self.form {
            Some(form) => format!("{} ({})", self.name, form),
            None => self.name.clone(),
        }
    }
}

/// An immutable, position-indexed collection of catalog records.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<PokemonRecord>,
}

impl Catalog {
    /// Build a catalog, enforcing the ID contiguity invariant.
    ///
    /// The record at position `i` must carry ID `i + 1`; a gap or
    /// out-of-order ID would silently mis-map IDs to embedding-store
    /// positions, so it is rejected here instead.
    pub fn new(records: Vec<PokemonRecord>) -> Result<Self> {
        for (i, record) in records.iter().enumerate() {
            let expected = i as u32 + 1;
            if record.id != expected {
                return Err(KantoError::Catalog(format!(
                    "Non-contiguous catalog IDs: position {} holds ID {}, expected {}",
                    i, record.id, expected
                )));
            }
        }
        Ok(Self { records })
    }

    /// Parse a catalog from CSV text.
    pub fn from_csv_str(text: &str) -> Result<Self> {
        Self::new(csv::parse_records(text)?)
    }

    /// Load a catalog from a CSV file.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_csv_str(&text)?;
        log::info!(
            "Loaded {} catalog records from {}",
            catalog.len(),
            path.as_ref().display()
        );
        Ok(catalog)
    }

    /// Get the record for the given 1-based entity ID.
    pub fn get(&self, id: u32) -> Option<&PokemonRecord> {
        if id == 0 {
            return None;
        }
        self.records.get(id as usize - 1)
    }

    /// The number of records in the catalog.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over all records in ID order.
    pub fn iter(&self) -> impl Iterator<Item = &PokemonRecord> {
        self.records.iter()
    }

    /// Case-insensitive substring filter over name, form and types.
    ///
    /// An empty query matches everything, which gives incremental search
    /// its "show all, then narrow" behavior.
    pub fn filter<'a>(&'a self, query: &str) -> Vec<&'a PokemonRecord> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.records.iter().collect();
        }

        self.records
            .iter()
            .filter(|record| {
                record.name.to_lowercase().contains(&needle)
                    || record
                        .form
                        .as_deref()
                        .is_some_and(|f| f.to_lowercase().contains(&needle))
                    || record.type1.to_lowercase().contains(&needle)
                    || record
                        .type2
                        .as_deref()
                        .is_some_and(|t| t.to_lowercase().contains(&needle))
            })
            .collect()
    }
}
