use std::collections::{BTreeSet, HashSet, VecDeque};

use dombind_ast::{AliasDescriptor, AliasKind, InterfaceDescriptor};
use dombind_index::DeclarationSource;
use dombind_parser::{parse_alias, parse_interface};
use dombind_typemap::{TypeMapper, referenced_names};
use dombind_utils::find_best_match;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::ResolveError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Also pull in the interfaces named in `extends` clauses.
    pub follow_extends: bool,
}

/// A root interface plus everything its members reference, transitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependentTypeGraph {
    pub root: String,
    /// Root first, then dependents in discovery order.
    pub interfaces: IndexMap<String, InterfaceDescriptor>,
    pub aliases: IndexMap<String, AliasDescriptor>,
    /// Referenced names with no interface or alias in the corpus.
    pub unresolved: BTreeSet<String>,
}

impl DependentTypeGraph {
    fn new(root: InterfaceDescriptor) -> Self {
        let mut interfaces = IndexMap::new();
        let name = root.name.clone();
        interfaces.insert(name.clone(), root);
        Self {
            root: name,
            interfaces,
            aliases: IndexMap::new(),
            unresolved: BTreeSet::new(),
        }
    }

    pub fn root_descriptor(&self) -> Option<&InterfaceDescriptor> {
        self.interfaces.get(&self.root)
    }

    pub fn get(&self, name: &str) -> Option<&InterfaceDescriptor> {
        self.interfaces.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.interfaces.contains_key(name) || self.aliases.contains_key(name)
    }

    /// Adds an interface found after resolution (e.g. a callback type).
    pub fn insert(&mut self, descriptor: InterfaceDescriptor) {
        self.unresolved.remove(&descriptor.name);
        self.interfaces
            .entry(descriptor.name.clone())
            .or_insert(descriptor);
    }

    /// Interface names, root first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.interfaces.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }
}

/// Resolves `root` with the built-in type table and default options.
pub fn resolve(
    root: &str,
    source: &dyn DeclarationSource,
) -> Result<DependentTypeGraph, ResolveError> {
    resolve_with(root, source, &TypeMapper::new(), ResolveOptions::default())
}

/// Breadth-first discovery of every declaration referenced from `root`.
///
/// Names the mapper knows (primitives, builtin containers) are not looked up.
/// Each other name is visited once: an interface is parsed and its member types
/// queued, an alias is recorded and its right-hand side queued, and anything
/// else lands in `unresolved`.
pub fn resolve_with(
    root: &str,
    source: &dyn DeclarationSource,
    mapper: &TypeMapper,
    options: ResolveOptions,
) -> Result<DependentTypeGraph, ResolveError> {
    let raw = source
        .try_get_declaration(root)
        .ok_or_else(|| ResolveError::DeclarationNotFound {
            name: root.to_string(),
            suggestion: find_best_match(root, source.interface_names()),
        })?;
    let descriptor = parse_interface(raw).map_err(|source| ResolveError::Parse {
        name: root.to_string(),
        source,
    })?;

    let mut visited: HashSet<String> = HashSet::new();
    visited.insert(descriptor.name.clone());
    let mut queue: VecDeque<String> = VecDeque::new();
    enqueue_references(&descriptor, options, &mut queue);

    let mut graph = DependentTypeGraph::new(descriptor);

    while let Some(name) = queue.pop_front() {
        if mapper.is_known(&name) || !visited.insert(name.clone()) {
            continue;
        }

        if let Some(raw) = source.try_get_declaration(&name) {
            match parse_interface(raw) {
                Ok(descriptor) => {
                    trace!(interface = %name, "dependent interface discovered");
                    enqueue_references(&descriptor, options, &mut queue);
                    graph.interfaces.insert(name, descriptor);
                }
                Err(err) => {
                    warn!(interface = %name, error = %err, "dependent interface could not be parsed");
                    graph.unresolved.insert(name);
                }
            }
            continue;
        }

        if let Some(raw) = source.try_get_alias(&name) {
            match parse_alias(raw) {
                Ok(alias) => {
                    trace!(alias = %name, "alias discovered");
                    if let AliasKind::Type { type_name } = &alias.kind {
                        queue.extend(referenced_names(type_name));
                    }
                    graph.aliases.insert(name, alias);
                }
                Err(err) => {
                    warn!(alias = %name, error = %err, "alias could not be parsed");
                    graph.unresolved.insert(name);
                }
            }
            continue;
        }

        debug!(name = %name, root, "type reference not found in corpus");
        graph.unresolved.insert(name);
    }

    debug!(
        root,
        interfaces = graph.interfaces.len(),
        aliases = graph.aliases.len(),
        unresolved = graph.unresolved.len(),
        "dependent types resolved"
    );
    Ok(graph)
}

fn enqueue_references(
    descriptor: &InterfaceDescriptor,
    options: ResolveOptions,
    queue: &mut VecDeque<String>,
) {
    for type_name in descriptor.member_type_names() {
        queue.extend(referenced_names(type_name));
    }
    if options.follow_extends {
        queue.extend(descriptor.extends.iter().cloned());
    }
}
