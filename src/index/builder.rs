//! Building the archive index from an evaluated descriptor

use mlua::{Table, Value};

use crate::descriptor::{DescriptorScript, MODEL_LIST};
use crate::error::{Error, Result};

use super::types::{ArchiveIndex, Category, FileEntry, Section};

impl ArchiveIndex {
    /// Build the index from an evaluated descriptor's `MODELLIST`.
    ///
    /// # Errors
    /// Returns [`Error::Descriptor`] if a section is missing its id or BIN
    /// path, and [`Error::IndexMalformed`] if a category's address array
    /// does not hold exactly two numbers per name. No partial index is
    /// returned on failure.
    pub fn from_descriptor(script: &DescriptorScript) -> Result<Self> {
        let tables = script.table_list(MODEL_LIST)?;
        let sections = tables
            .iter()
            .map(parse_section)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { sections })
    }
}

fn parse_section(table: &Table) -> Result<Section> {
    let id = match table.get::<Value>("SECTION_ID")? {
        Value::Integer(n) if n >= 0 => n as u32,
        Value::Number(n) if n >= 0.0 => n as u32,
        other => {
            return Err(Error::Descriptor {
                message: format!(
                    "SECTION_ID missing or not a number (found {})",
                    other.type_name()
                ),
            });
        }
    };

    let bin_path = match table.get::<Value>("BIN")? {
        Value::String(s) => s.to_string_lossy().to_string(),
        other => {
            return Err(Error::Descriptor {
                message: format!(
                    "section {id}: BIN missing or not a string (found {})",
                    other.type_name()
                ),
            });
        }
    };

    let mut entries: [Vec<FileEntry>; 10] = Default::default();
    for category in Category::ALL {
        entries[category.slot()] = parse_entries(table, id, category)?;
    }

    Ok(Section::new(id, bin_path, entries))
}

/// Read one category's paired `{TAG}_ADDR` / `{TAG}_NAME` arrays.
///
/// The address array is tightly packed `(start, length)` pairs: element
/// `2*i` is the start offset and `2*i + 1` the length for the i-th name.
fn parse_entries(table: &Table, section_id: u32, category: Category) -> Result<Vec<FileEntry>> {
    let addresses = read_number_array(table, section_id, &category.addr_key())?;
    let names = read_string_array(table, section_id, &category.name_key())?;

    if addresses.len() != names.len() * 2 {
        return Err(Error::IndexMalformed {
            section_id,
            tag: category.tag(),
            addresses: addresses.len(),
            names: names.len(),
        });
    }

    Ok(names
        .into_iter()
        .enumerate()
        .map(|(i, name)| FileEntry {
            name,
            start: addresses[2 * i],
            length: addresses[2 * i + 1],
        })
        .collect())
}

/// An absent array is an empty category, not an error.
fn read_number_array(table: &Table, section_id: u32, key: &str) -> Result<Vec<i64>> {
    let list = match table.get::<Value>(key)? {
        Value::Nil => return Ok(Vec::new()),
        Value::Table(t) => t,
        other => {
            return Err(Error::Descriptor {
                message: format!(
                    "section {section_id}: {key} is not an array (found {})",
                    other.type_name()
                ),
            });
        }
    };

    let mut values = Vec::new();
    for (i, item) in list.sequence_values::<Value>().enumerate() {
        match item? {
            Value::Integer(n) => values.push(n),
            Value::Number(n) => values.push(n as i64),
            other => {
                return Err(Error::Descriptor {
                    message: format!(
                        "section {section_id}: {key}[{}] is not a number (found {})",
                        i + 1,
                        other.type_name()
                    ),
                });
            }
        }
    }
    Ok(values)
}

fn read_string_array(table: &Table, section_id: u32, key: &str) -> Result<Vec<String>> {
    let list = match table.get::<Value>(key)? {
        Value::Nil => return Ok(Vec::new()),
        Value::Table(t) => t,
        other => {
            return Err(Error::Descriptor {
                message: format!(
                    "section {section_id}: {key} is not an array (found {})",
                    other.type_name()
                ),
            });
        }
    };

    let mut values = Vec::new();
    for (i, item) in list.sequence_values::<Value>().enumerate() {
        match item? {
            Value::String(s) => values.push(s.to_string_lossy().to_string()),
            other => {
                return Err(Error::Descriptor {
                    message: format!(
                        "section {section_id}: {key}[{}] is not a string (found {})",
                        i + 1,
                        other.type_name()
                    ),
                });
            }
        }
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn build(source: &str) -> Result<ArchiveIndex> {
        let script = DescriptorScript::evaluate(source)?;
        ArchiveIndex::from_descriptor(&script)
    }

    #[test]
    fn section_and_entry_counts_match_the_descriptor() {
        let index = build(
            r#"
            MODELLIST = {
                {
                    SECTION_ID = 1,
                    BIN = "c1a.bin",
                    LONG_ADDR = { 0, 16, 16, 32 },
                    LONG_NAME = { "mesh0", "mesh1" },
                    ROAD_ADDR = { 48, 8 },
                    ROAD_NAME = { "road0" },
                },
                {
                    SECTION_ID = 2,
                    BIN = "c1b.bin",
                },
            }
        "#,
        )
        .unwrap();

        assert_eq!(index.sections.len(), 2);
        let first = &index.sections[0];
        assert_eq!(first.id, 1);
        assert_eq!(first.bin_path, "c1a.bin");
        assert_eq!(first.entries(Category::Long).len(), 2);
        assert_eq!(first.entries(Category::Road).len(), 1);
        assert_eq!(first.entries(Category::Near).len(), 0);
        assert_eq!(first.entry_count(), 3);
        assert_eq!(index.sections[1].entry_count(), 0);
        assert_eq!(index.total_entries(), 3);
    }

    #[test]
    fn address_pairs_map_in_declared_order() {
        let index = build(
            r#"
            MODELLIST = {
                {
                    SECTION_ID = 7,
                    BIN = "x.bin",
                    LONG_ADDR = { 100, 50, 200, 25 },
                    LONG_NAME = { "a", "b" },
                },
            }
        "#,
        )
        .unwrap();

        let entries = index.sections[0].entries(Category::Long);
        assert_eq!(
            entries,
            &[
                FileEntry {
                    name: "a".to_string(),
                    start: 100,
                    length: 50
                },
                FileEntry {
                    name: "b".to_string(),
                    start: 200,
                    length: 25
                },
            ]
        );
    }

    #[test]
    fn odd_address_array_is_malformed() {
        let err = build(
            r#"
            MODELLIST = {
                {
                    SECTION_ID = 3,
                    BIN = "x.bin",
                    LONG_ADDR = { 1, 2, 3 },
                    LONG_NAME = { "a", "b" },
                },
            }
        "#,
        )
        .unwrap_err();

        match err {
            Error::IndexMalformed {
                section_id,
                tag,
                addresses,
                names,
            } => {
                assert_eq!(section_id, 3);
                assert_eq!(tag, "LONG");
                assert_eq!(addresses, 3);
                assert_eq!(names, 2);
            }
            other => panic!("expected IndexMalformed, got {other:?}"),
        }
    }

    #[test]
    fn missing_section_id_is_a_descriptor_error() {
        let err = build(r#"MODELLIST = { { BIN = "x.bin" } }"#).unwrap_err();
        assert!(matches!(err, Error::Descriptor { .. }), "got {err:?}");
    }

    #[test]
    fn missing_bin_path_is_a_descriptor_error() {
        let err = build("MODELLIST = { { SECTION_ID = 1 } }").unwrap_err();
        assert!(matches!(err, Error::Descriptor { .. }), "got {err:?}");
    }

    #[test]
    fn categories_iterate_in_fixed_order() {
        let index = build(r#"MODELLIST = { { SECTION_ID = 1, BIN = "x.bin" } }"#).unwrap();
        let tags: Vec<&str> = index.sections[0]
            .categories()
            .map(|(c, _)| c.tag())
            .collect();
        assert_eq!(
            tags,
            vec!["LONG", "NEAR", "LODM", "ROAD", "ONRD", "BACK", "CAST", "REFC", "REFR", "RFBG"]
        );
    }
}
