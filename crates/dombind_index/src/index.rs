use ahash::AHashMap;
use dombind_lexer::{blank_comments, split_statements};
use dombind_parser::{DeclarationKind, parse_head};
use rayon::prelude::*;
use sha1::{Digest, Sha1};
use tracing::debug;

use crate::source::SourceKey;

/// Name-based lookup over raw declaration text.
pub trait DeclarationSource {
    /// Raw text of `interface <name> { ... }`.
    fn try_get_declaration(&self, name: &str) -> Option<&str>;

    /// Raw text of `type <name> = ...`.
    fn try_get_alias(&self, name: &str) -> Option<&str>;

    /// Every interface name, sorted.
    fn interface_names(&self) -> Vec<&str>;
}

/// Interface and alias text extracted from one corpus. Immutable once built.
#[derive(Debug, Clone)]
pub struct DeclarationIndex {
    key: SourceKey,
    fingerprint: String,
    interfaces: AHashMap<String, String>,
    aliases: AHashMap<String, String>,
}

struct Extracted<'a> {
    kind: DeclarationKind,
    name: String,
    text: &'a str,
}

impl DeclarationIndex {
    /// Scans `text` into interface and alias entries. When a name is declared
    /// more than once the first declaration is kept.
    pub fn build(key: SourceKey, text: &str) -> Self {
        let fingerprint = format!("{:x}", Sha1::digest(text.as_bytes()));
        let blanked = blank_comments(text);
        let statements = split_statements(&blanked);

        let extracted: Vec<Extracted<'_>> = statements
            .par_iter()
            .filter_map(|statement| {
                let head = parse_head(statement.text)?;
                Some(Extracted {
                    kind: head.kind,
                    name: head.name,
                    text: statement.text,
                })
            })
            .collect();

        let mut interfaces = AHashMap::new();
        let mut aliases = AHashMap::new();
        for entry in extracted {
            let map = match entry.kind {
                DeclarationKind::Interface => &mut interfaces,
                DeclarationKind::Alias => &mut aliases,
            };
            if map.contains_key(&entry.name) {
                debug!(name = %entry.name, source = %key, "duplicate declaration ignored");
                continue;
            }
            map.insert(entry.name, entry.text.to_string());
        }

        debug!(
            source = %key,
            interfaces = interfaces.len(),
            aliases = aliases.len(),
            statements = statements.len(),
            "declaration index built"
        );

        Self {
            key,
            fingerprint,
            interfaces,
            aliases,
        }
    }

    /// An index with no entries, used when a source could not be loaded.
    pub fn empty(key: SourceKey) -> Self {
        Self::build(key, "")
    }

    pub fn key(&self) -> &SourceKey {
        &self.key
    }

    /// SHA-1 of the corpus text, lowercase hex.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn interface_count(&self) -> usize {
        self.interfaces.len()
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty() && self.aliases.is_empty()
    }

    pub fn alias_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.aliases.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl DeclarationSource for DeclarationIndex {
    fn try_get_declaration(&self, name: &str) -> Option<&str> {
        self.interfaces.get(name).map(String::as_str)
    }

    fn try_get_alias(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    fn interface_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.interfaces.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
