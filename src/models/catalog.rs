//! Catalog is the ordered set of item ids a learner has collected for review
use super::schedule_record::ItemId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    items: Vec<ItemId>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `item_id` unless it is already present. Returns whether it was added.
    pub fn add(&mut self, item_id: impl Into<ItemId>) -> bool {
        let item_id = item_id.into();
        if self.contains(&item_id) {
            return false;
        }
        self.items.push(item_id);
        true
    }

    /// Adds every new id in order and returns how many were added.
    pub fn extend<I, T>(&mut self, item_ids: I) -> usize
    where
        I: IntoIterator<Item = T>,
        T: Into<ItemId>,
    {
        let mut added = 0;
        for item_id in item_ids {
            if self.add(item_id) {
                added += 1;
            }
        }
        added
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.items.iter().any(|id| id == item_id)
    }

    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemId> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Into<ItemId>> FromIterator<T> for Catalog {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        catalog.extend(iter);
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_ignores_duplicates() {
        let mut catalog = Catalog::new();
        assert!(catalog.add("q1"));
        assert!(catalog.add("q2"));
        assert!(!catalog.add("q1"));

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.items(), ["q1".to_string(), "q2".to_string()]);
    }

    #[test]
    fn test_extend_keeps_order() {
        let mut catalog: Catalog = ["b", "a"].into_iter().collect();
        let added = catalog.extend(["c", "a", "d"]);

        assert_eq!(added, 2);
        let ids: Vec<&str> = catalog.iter().map(String::as_str).collect();
        assert_eq!(ids, vec!["b", "a", "c", "d"]);
    }
}
