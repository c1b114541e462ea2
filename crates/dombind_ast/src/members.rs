use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// Anything stored in a [`MemberMap`] exposes the name it is keyed by.
pub trait Named {
    fn name(&self) -> &str;
}

/// Declaration-ordered members keyed case-insensitively.
///
/// Inserting a name that is already present replaces the earlier member in place
/// (last wins) and keeps the original position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberMap<T> {
    entries: IndexMap<String, T>,
}

impl<T> Default for MemberMap<T> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<T: Named> MemberMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the member that was replaced, if any.
    pub fn insert(&mut self, member: T) -> Option<T> {
        let key = member.name().to_ascii_lowercase();
        self.entries.insert(key, member)
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(&name.to_ascii_lowercase())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.entries.get_mut(&name.to_ascii_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.entries.retain(|_, member| keep(member));
    }
}

impl<T: Serialize> Serialize for MemberMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.values())
    }
}
