//! # Interest Set
//!
//! A small, bounded list of topic tags the user picks before matching.
//! Names are deduplicated (case-sensitive, after trimming) and the set never
//! grows past its cap; both kinds of rejection are silent.
//!
//! Interests only feed the "looking for someone into ..." framing text.
//! Partner selection ignores them.

use uuid::Uuid;

/// Topics offered as suggestions next to the free-text field.
pub const PRESET_INTERESTS: &[&str] = &[
    "Gaming", "Music", "Movies", "Sports", "Tech", "Art", "Books", "Travel", "Food", "Anime",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterestId(pub Uuid);

impl InterestId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interest {
    pub id: InterestId,
    pub name: String,
}

#[derive(Debug)]
pub struct InterestSet {
    items: Vec<Interest>,
    cap: usize,
}

impl InterestSet {
    pub fn new(cap: usize) -> Self {
        Self {
            items: Vec::with_capacity(cap),
            cap,
        }
    }

    /// Adds an interest and returns its id, or `None` if the name is blank,
    /// already present, or the set is full.
    pub fn add(&mut self, name: &str) -> Option<InterestId> {
        let name = name.trim();
        if name.is_empty() || self.is_full() || self.contains(name) {
            return None;
        }
        let interest = Interest {
            id: InterestId::generate(),
            name: name.to_string(),
        };
        let id = interest.id;
        self.items.push(interest);
        Some(id)
    }

    /// Removes by id. Returns whether anything was removed.
    pub fn remove(&mut self, id: InterestId) -> bool {
        let before = self.items.len();
        self.items.retain(|interest| interest.id != id);
        self.items.len() != before
    }

    /// Interests in insertion order.
    pub fn list(&self) -> &[Interest] {
        &self.items
    }

    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(|interest| interest.name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|interest| interest.name == name)
    }

    pub fn last(&self) -> Option<&Interest> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.cap
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
