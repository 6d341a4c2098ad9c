//! Canonical fragment set
//!
//! The store owns every fragment on the canvas in insertion order and hands
//! out ids from a counter that never goes backwards, so an id is never
//! reused while the process lives. Every operation is total: addressing an
//! id that is not present is a no-op, reported through the return value.

use crate::types::{
    default_seed, Fragment, FragmentId, Position, SeedFragment, DEFAULT_CONTENT, DEFAULT_POSITION,
};

/// Prefix for generated fragment ids
const ID_PREFIX: &str = "sigil-";

/// Ordered collection of fragments
#[derive(Debug, Clone)]
pub struct FragmentStore {
    /// Fragments in insertion order
    fragments: Vec<Fragment>,
    /// Sequence number of the next id to hand out
    next_seq: u64,
}

impl FragmentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            fragments: Vec::new(),
            next_seq: 1,
        }
    }

    /// Create a store holding the given fragments in order
    pub fn with_seed(seed: impl IntoIterator<Item = SeedFragment>) -> Self {
        let mut store = Self::new();
        for item in seed {
            store.add(item.content, item.position);
        }
        store
    }

    /// Create a store holding the default starting layout
    pub fn seeded() -> Self {
        Self::with_seed(default_seed())
    }

    /// Add a fragment and return its freshly generated id
    pub fn add(&mut self, content: impl Into<String>, position: Position) -> FragmentId {
        let id = format!("{}{}", ID_PREFIX, self.next_seq);
        self.next_seq += 1;

        self.fragments.push(Fragment::new(id.clone(), content, position));
        id
    }

    /// Add a fragment with the default content and position
    pub fn add_default(&mut self) -> FragmentId {
        self.add(DEFAULT_CONTENT, DEFAULT_POSITION)
    }

    /// Remove a fragment, returning it if it was present
    pub fn remove(&mut self, id: &str) -> Option<Fragment> {
        let index = self.fragments.iter().position(|f| f.id == id)?;
        Some(self.fragments.remove(index))
    }

    /// Replace a fragment's content verbatim
    ///
    /// Returns false if the id is not present.
    pub fn update_content(&mut self, id: &str, content: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(fragment) => {
                fragment.content = content.into();
                true
            }
            None => false,
        }
    }

    /// Move a fragment by `delta`, relative to where it is now
    ///
    /// Returns the new position, or None if the id is not present.
    pub fn update_position(&mut self, id: &str, delta: Position) -> Option<Position> {
        let fragment = self.get_mut(id)?;
        fragment.position += delta;
        Some(fragment.position)
    }

    /// Snapshot of all fragments in insertion order
    pub fn list(&self) -> Vec<Fragment> {
        self.fragments.clone()
    }

    /// Borrow all fragments in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Fragment> {
        self.fragments.iter()
    }

    /// Find a fragment by id
    pub fn get(&self, id: &str) -> Option<&Fragment> {
        self.fragments.iter().find(|f| f.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Fragment> {
        self.fragments.iter_mut().find(|f| f.id == id)
    }

    /// Whether a fragment with this id exists
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Number of fragments
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Whether the store holds no fragments
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

impl Default for FragmentStore {
    fn default() -> Self {
        Self::new()
    }
}
