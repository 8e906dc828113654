//! Linked/Unlinked state shared by follow and like relationships.

use serde::Serialize;

/// Result of flipping the relationship between an (actor, target) pair.
///
/// A toggle always lands in exactly one of these states; the store applies it as a
/// conditional delete-or-insert on the pair so concurrent callers each flip it once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Toggle {
    Linked,
    Unlinked,
}

impl Toggle {
    pub fn is_linked(self) -> bool {
        matches!(self, Toggle::Linked)
    }
}
