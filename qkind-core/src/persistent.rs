//! Persistent singly-linked list.
//!
//! `push` returns a new list that shares its tail with the original, so search branches extend a common prefix
//! without copying it.

use std::sync::Arc;

struct Link<T> {
    value: T,
    next: Option<Arc<Link<T>>>,
}

/// Immutable list with structural sharing. Iteration runs from the most recent push to the oldest.
pub struct PersistentList<T> {
    head: Option<Arc<Link<T>>>,
    len: usize,
}

impl<T> Clone for PersistentList<T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
            len: self.len,
        }
    }
}

impl<T> Default for PersistentList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PersistentList<T> {
    pub fn new() -> Self {
        Self { head: None, len: 0 }
    }

    #[must_use]
    pub fn push(&self, value: T) -> Self {
        Self {
            head: Some(Arc::new(Link {
                value,
                next: self.head.clone(),
            })),
            len: self.len + 1,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.head.as_deref(),
        }
    }
}

impl<T: PartialEq> PersistentList<T> {
    pub fn contains(&self, value: &T) -> bool {
        self.iter().any(|item| item == value)
    }
}

impl<T: Clone> PersistentList<T> {
    /// Elements in push order (oldest first).
    pub fn to_vec(&self) -> Vec<T> {
        let mut items: Vec<T> = self.iter().cloned().collect();
        items.reverse();
        items
    }
}

pub struct Iter<'a, T> {
    next: Option<&'a Link<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let link = self.next?;
        self.next = link.next.as_deref();
        Some(&link.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branches_share_prefix() {
        let root = PersistentList::new().push(1).push(2);
        let left = root.push(3);
        let right = root.push(4);
        assert_eq!(root.to_vec(), vec![1, 2]);
        assert_eq!(left.to_vec(), vec![1, 2, 3]);
        assert_eq!(right.to_vec(), vec![1, 2, 4]);
        assert!(left.contains(&3));
        assert!(!right.contains(&3));
        assert_eq!(left.len(), 3);
    }

    #[test]
    fn empty_list() {
        let list: PersistentList<u8> = PersistentList::default();
        assert!(list.is_empty());
        assert_eq!(list.iter().next(), None);
    }
}
