// Id → challenge lookup that remembers catalog order

use super::{Challenge, ChallengeKind};
use indexmap::IndexMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("a challenge with id '{0}' is already registered")]
    DuplicateId(String),
}

/// All known exercises, in the order they were registered
#[derive(Debug, Default)]
pub struct Registry {
    items: IndexMap<String, Challenge>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, challenge: Challenge) -> Result<(), RegistryError> {
        if self.items.contains_key(&challenge.id) {
            return Err(RegistryError::DuplicateId(challenge.id));
        }
        self.items.insert(challenge.id.clone(), challenge);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Challenge> {
        self.items.get(id)
    }

    pub fn get_index(&self, index: usize) -> Option<&Challenge> {
        self.items.get_index(index).map(|(_, challenge)| challenge)
    }

    /// Position of `id` in catalog order
    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.get_index_of(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Challenge> {
        self.items.values()
    }

    pub fn of_kind(&self, kind: ChallengeKind) -> impl Iterator<Item = &Challenge> {
        self.items.values().filter(move |challenge| challenge.kind == kind)
    }

    pub fn count_of_kind(&self, kind: ChallengeKind) -> usize {
        self.of_kind(kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenges::validator::OutputContains;

    fn item(id: &str, kind: ChallengeKind) -> Challenge {
        Challenge {
            id: id.to_string(),
            kind,
            title: id.to_uppercase(),
            emoji: String::new(),
            description: String::new(),
            hint: String::new(),
            starter_source: String::new(),
            solution: String::new(),
            validator: Box::new(OutputContains::new("ok")),
        }
    }

    #[test]
    fn test_keeps_insertion_order() {
        let mut registry = Registry::new();
        registry.insert(item("b", ChallengeKind::Tutorial)).unwrap();
        registry.insert(item("a", ChallengeKind::Challenge)).unwrap();
        registry.insert(item("c", ChallengeKind::Tutorial)).unwrap();

        let ids: Vec<&str> = registry.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["b", "a", "c"]);
        assert_eq!(registry.position("c"), Some(2));
        assert_eq!(registry.get_index(1).map(|c| c.title.as_str()), Some("A"));
        assert_eq!(registry.count_of_kind(ChallengeKind::Tutorial), 2);
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let mut registry = Registry::new();
        registry.insert(item("x", ChallengeKind::Tutorial)).unwrap();
        assert_eq!(
            registry.insert(item("x", ChallengeKind::Challenge)),
            Err(RegistryError::DuplicateId("x".to_string()))
        );
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("x").map(|c| c.kind), Some(ChallengeKind::Tutorial));
    }
}
