//! Selection diffing.

use std::collections::HashSet;
use std::hash::Hash;

/// Items to link and unlink to move from a prior selection to a desired one.
///
/// Both lists keep the order of first occurrence in their source and contain
/// no duplicates. They never share an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionDiff<T> {
    pub to_add: Vec<T>,
    pub to_remove: Vec<T>,
}

impl<T: Clone + Eq + Hash> SelectionDiff<T> {
    /// Computes the diff between `desired` and `prior`.
    ///
    /// With an empty `prior` every desired item is an add; with an empty
    /// `desired` every prior item is a remove.
    pub fn compute(desired: &[T], prior: &[T]) -> Self {
        let prior_set: HashSet<&T> = prior.iter().collect();
        let desired_set: HashSet<&T> = desired.iter().collect();

        Self {
            to_add: unique_missing(desired, &prior_set),
            to_remove: unique_missing(prior, &desired_set),
        }
    }
}

impl<T> SelectionDiff<T> {
    /// True when nothing needs to change.
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// Total number of operations the diff implies.
    pub fn len(&self) -> usize {
        self.to_add.len() + self.to_remove.len()
    }
}

fn unique_missing<T: Clone + Eq + Hash>(items: &[T], exclude: &HashSet<&T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| !exclude.contains(item) && seen.insert(*item))
        .cloned()
        .collect()
}
