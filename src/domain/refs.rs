//! Ordered sets of entity ids carried on documents (`follows`, `followers`, `likes`, `comments`).
//!
//! These sequences are only ever changed through [`RefList::add_if_absent`] and
//! [`RefList::remove_if_present`], so an id appears at most once and insertion order is kept.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefList(Vec<Uuid>);

impl RefList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends `id` unless already present. Returns whether the list changed.
    pub fn add_if_absent(&mut self, id: Uuid) -> bool {
        if self.0.contains(&id) {
            return false;
        }
        self.0.push(id);
        true
    }

    /// Removes `id` if present. Returns whether the list changed.
    pub fn remove_if_present(&mut self, id: Uuid) -> bool {
        match self.0.iter().position(|x| *x == id) {
            Some(idx) => {
                self.0.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.0.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[Uuid] {
        &self.0
    }
}

impl FromIterator<Uuid> for RefList {
    /// Collects ids, dropping repeats after the first occurrence.
    fn from_iter<I: IntoIterator<Item = Uuid>>(iter: I) -> Self {
        let mut list = RefList::new();
        for id in iter {
            list.add_if_absent(id);
        }
        list
    }
}

impl From<Vec<Uuid>> for RefList {
    fn from(ids: Vec<Uuid>) -> Self {
        ids.into_iter().collect()
    }
}
