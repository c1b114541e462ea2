//! Source-to-target type name mapping.
//!
//! Primitive and special DOM types map to fixed target names; `| null` and
//! `| undefined` forms collapse onto one nullable target (`T?`). Anything the
//! table does not know is a reference to another generated type and passes
//! through unchanged.

mod table;
pub mod type_text;

use ahash::AHashMap;
use tracing::trace;

use table::{BUILTIN, BUILTIN_CONTAINERS, insert_forms, nullable_target};
pub use type_text::{
    array_element, generic_arguments, is_function_type, normalize, referenced_names,
    split_nullable, union_width,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapEntry {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Default)]
pub struct TypeMapper {
    overrides: AHashMap<String, String>,
}

impl TypeMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds user-supplied entries on top of the built-in table. Bare sources also
    /// get their nullable spellings unless those are given explicitly.
    pub fn with_overrides<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let entries: Vec<(String, String)> = entries
            .into_iter()
            .map(|(k, v)| (normalize(k.as_ref()), v.as_ref().to_string()))
            .collect();
        for (source, target) in &entries {
            self.overrides.insert(source.clone(), target.clone());
        }
        for (source, target) in &entries {
            if !split_nullable(source).1 {
                insert_forms(&mut self.overrides, source, target);
            }
        }
        self
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        self.overrides
            .get(key)
            .or_else(|| BUILTIN.get(key))
            .map(String::as_str)
    }

    /// Maps declared type text to a target type name.
    pub fn map(&self, type_name: &str) -> String {
        let normalized = normalize(type_name);
        if let Some(target) = self.lookup(&normalized) {
            return target.to_string();
        }

        let (bare, nullable) = split_nullable(&normalized);
        if nullable {
            if let Some(target) = self.lookup(&bare) {
                return nullable_target(target);
            }
        }

        if let Some(element) = array_element(&bare) {
            let mapped = format!("{}[]", self.map(element));
            return if nullable {
                nullable_target(&mapped)
            } else {
                mapped
            };
        }

        if let Some((container, arguments)) = generic_arguments(&bare) {
            let arguments: Vec<String> = arguments.iter().map(|arg| self.map(arg)).collect();
            let mapped = format!("{container}<{}>", arguments.join(", "));
            return if nullable {
                nullable_target(&mapped)
            } else {
                mapped
            };
        }

        if union_width(&bare) > 1 {
            trace!(type_name, "union passed through unmapped");
        }
        type_name.trim().to_string()
    }

    /// Maps a descriptor's normalized type, applying its nullability flag.
    pub fn map_with_nullability(&self, type_name: &str, is_nullable: bool) -> String {
        let mapped = self.map(type_name);
        if is_nullable {
            nullable_target(&mapped)
        } else {
            mapped
        }
    }

    /// True when `type_name` never denotes another declaration: a mapped primitive
    /// (in any spelling) or a builtin container such as `Promise`.
    pub fn is_known(&self, type_name: &str) -> bool {
        let normalized = normalize(type_name);
        if self.lookup(&normalized).is_some() || BUILTIN_CONTAINERS.contains(&normalized.as_str())
        {
            return true;
        }
        let (bare, nullable) = split_nullable(&normalized);
        nullable && self.lookup(&bare).is_some()
    }

    /// All table entries, overrides applied, sorted by source text.
    pub fn entries(&self) -> Vec<TypeMapEntry> {
        let mut merged: AHashMap<&str, &str> = BUILTIN
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        for (k, v) in &self.overrides {
            merged.insert(k, v);
        }
        let mut entries: Vec<TypeMapEntry> = merged
            .into_iter()
            .map(|(source, target)| TypeMapEntry {
                source: source.to_string(),
                target: target.to_string(),
            })
            .collect();
        entries.sort_by(|a, b| a.source.cmp(&b.source));
        entries
    }
}
