//! CSV parsing for the catalog data file.
//!
//! The file carries a header row naming its columns (`ID`, `Name`,
//! `Form`, `Type1`, `Type2`, `HP`, `Attack`, `Defense`, `Sp. Atk`,
//! `Sp. Def`, `Speed`). Fields may be double-quoted to hold commas, and
//! the optional columns are frequently empty.

use std::collections::HashMap;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::catalog::PokemonRecord;
use crate::error::{KantoError, Result};

/// Column positions resolved from the header row.
struct Columns {
    id: usize,
    name: usize,
    form: Option<usize>,
    type1: usize,
    type2: Option<usize>,
    hp: usize,
    attack: usize,
    defense: usize,
    sp_atk: usize,
    sp_def: usize,
    speed: usize,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let index: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h, i))
            .collect();

        let required = |name: &str| {
            index.get(name).copied().ok_or_else(|| {
                KantoError::Catalog(format!("Missing required CSV column: {name}"))
            })
        };

        Ok(Self {
            id: required("ID")?,
            name: required("Name")?,
            form: index.get("Form").copied(),
            type1: required("Type1")?,
            type2: index.get("Type2").copied(),
            hp: required("HP")?,
            attack: required("Attack")?,
            defense: required("Defense")?,
            sp_atk: required("Sp. Atk")?,
            sp_def: required("Sp. Def")?,
            speed: required("Speed")?,
        })
    }
}

fn field<'a>(record: &'a StringRecord, column: usize) -> &'a str {
    record.get(column).unwrap_or("")
}

/// Optional columns may be blank; treat blank as absent.
fn optional_field(record: &StringRecord, column: Option<usize>) -> Option<String> {
    let value = field(record, column?).trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_stat(record: &StringRecord, column: usize, name: &str, line_num: u64) -> Result<u16> {
    let raw = field(record, column);
    raw.parse().map_err(|_| {
        KantoError::Catalog(format!("Invalid {name} value {raw:?} on line {line_num}"))
    })
}

/// Parse catalog records from CSV text.
///
/// Records come back in file order; the caller ([`Catalog::new`]) checks
/// ID contiguity.
///
/// [`Catalog::new`]: crate::catalog::Catalog::new
pub fn parse_records(text: &str) -> Result<Vec<PokemonRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| KantoError::Catalog(format!("Invalid CSV header: {e}")))?
        .clone();
    let columns = Columns::resolve(&headers)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let record = row.map_err(|e| KantoError::Catalog(format!("Invalid CSV row: {e}")))?;
        // Header is line 1.
        let line_num = record.position().map(|p| p.line()).unwrap_or(0);
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }

        let id: u32 = field(&record, columns.id).parse().map_err(|_| {
            KantoError::Catalog(format!(
                "Invalid ID value {:?} on line {line_num}",
                field(&record, columns.id)
            ))
        })?;

        records.push(PokemonRecord {
            id,
            name: field(&record, columns.name).to_string(),
            form: optional_field(&record, columns.form),
            type1: field(&record, columns.type1).to_string(),
            type2: optional_field(&record, columns.type2),
            hp: parse_stat(&record, columns.hp, "HP", line_num)?,
            attack: parse_stat(&record, columns.attack, "Attack", line_num)?,
            defense: parse_stat(&record, columns.defense, "Defense", line_num)?,
            sp_atk: parse_stat(&record, columns.sp_atk, "Sp. Atk", line_num)?,
            sp_def: parse_stat(&record, columns.sp_def, "Sp. Def", line_num)?,
            speed: parse_stat(&record, columns.speed, "Speed", line_num)?,
        });
    }

    Ok(records)
}
