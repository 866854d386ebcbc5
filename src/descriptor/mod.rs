//! Lua model descriptor evaluation
//!
//! Track archives ship with a Lua descriptor enumerating texture names
//! (`TEXTURELIST`) and section tables (`MODELLIST`). The descriptor is pure
//! data expressed as table constructors; this module evaluates it in an
//! isolated Lua state and exposes the top-level arrays by name. The Lua
//! semantics themselves are treated as opaque - everything downstream works
//! on the values this module hands out.

use std::fs;
use std::path::Path;

use mlua::{Lua, LuaOptions, StdLib, Table, Value};

use crate::error::{Error, Result};

/// Name of the top-level texture name array.
pub const TEXTURE_LIST: &str = "TEXTURELIST";

/// Name of the top-level section table array.
pub const MODEL_LIST: &str = "MODELLIST";

/// An evaluated model descriptor.
///
/// Each [`evaluate`](Self::evaluate) call runs the source in a fresh Lua
/// state with no standard library loaded, so evaluating the same source
/// twice is idempotent and cannot observe state from a previous run.
pub struct DescriptorScript {
    lua: Lua,
}

impl DescriptorScript {
    /// Evaluate descriptor source text.
    ///
    /// # Errors
    /// Returns [`Error::Descriptor`] if the source fails to evaluate.
    pub fn evaluate(source: &str) -> Result<Self> {
        // Descriptors are data-only: no stdlib, no io, no os.
        let lua = Lua::new_with(StdLib::NONE, LuaOptions::default())?;
        lua.load(source).exec()?;
        Ok(Self { lua })
    }

    /// Read and evaluate a descriptor file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or fails to evaluate.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        Self::evaluate(&source)
    }

    /// Return the ordered string values of the named top-level array.
    ///
    /// # Errors
    /// Returns [`Error::Descriptor`] if the global is absent, is not a
    /// table, or contains a non-string element.
    pub fn string_list(&self, name: &str) -> Result<Vec<String>> {
        let table = self.global_table(name)?;
        let mut values = Vec::new();
        for (i, item) in table.sequence_values::<Value>().enumerate() {
            match item? {
                Value::String(s) => values.push(s.to_string_lossy().to_string()),
                other => {
                    return Err(Error::Descriptor {
                        message: format!(
                            "{name}[{}] is not a string (found {})",
                            i + 1,
                            other.type_name()
                        ),
                    });
                }
            }
        }
        Ok(values)
    }

    /// Return the ordered nested tables of the named top-level array.
    ///
    /// # Errors
    /// Returns [`Error::Descriptor`] if the global is absent, is not a
    /// table, or contains a non-table element.
    pub fn table_list(&self, name: &str) -> Result<Vec<Table>> {
        let table = self.global_table(name)?;
        let mut values = Vec::new();
        for (i, item) in table.sequence_values::<Value>().enumerate() {
            match item? {
                Value::Table(t) => values.push(t),
                other => {
                    return Err(Error::Descriptor {
                        message: format!(
                            "{name}[{}] is not a table (found {})",
                            i + 1,
                            other.type_name()
                        ),
                    });
                }
            }
        }
        Ok(values)
    }

    fn global_table(&self, name: &str) -> Result<Table> {
        match self.lua.globals().get::<Value>(name)? {
            Value::Table(t) => Ok(t),
            Value::Nil => Err(Error::Descriptor {
                message: format!("missing top-level array '{name}'"),
            }),
            other => Err(Error::Descriptor {
                message: format!("'{name}' is not a table (found {})", other.type_name()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
        TEXTURELIST = { "road.img", "wall.img" }
        MODELLIST = {
            { SECTION_ID = 1, BIN = "c1_model.bin" },
        }
    "#;

    #[test]
    fn string_list_preserves_order() {
        let script = DescriptorScript::evaluate(SAMPLE).unwrap();
        assert_eq!(
            script.string_list(TEXTURE_LIST).unwrap(),
            vec!["road.img".to_string(), "wall.img".to_string()]
        );
    }

    #[test]
    fn table_list_counts_sections() {
        let script = DescriptorScript::evaluate(SAMPLE).unwrap();
        assert_eq!(script.table_list(MODEL_LIST).unwrap().len(), 1);
    }

    #[test]
    fn missing_global_is_a_descriptor_error() {
        let script = DescriptorScript::evaluate(SAMPLE).unwrap();
        let err = script.string_list("NOSUCHLIST").unwrap_err();
        assert!(matches!(err, Error::Descriptor { .. }), "got {err:?}");
    }

    #[test]
    fn non_string_element_is_a_descriptor_error() {
        let script = DescriptorScript::evaluate("TEXTURELIST = { \"ok\", 42 }").unwrap();
        let err = script.string_list(TEXTURE_LIST).unwrap_err();
        assert!(matches!(err, Error::Descriptor { .. }), "got {err:?}");
    }

    #[test]
    fn re_evaluation_is_idempotent() {
        let a = DescriptorScript::evaluate(SAMPLE).unwrap();
        let b = DescriptorScript::evaluate(SAMPLE).unwrap();
        assert_eq!(
            a.string_list(TEXTURE_LIST).unwrap(),
            b.string_list(TEXTURE_LIST).unwrap()
        );
        // Repeat queries against the same state see identical values.
        assert_eq!(
            a.string_list(TEXTURE_LIST).unwrap(),
            a.string_list(TEXTURE_LIST).unwrap()
        );
    }
}
