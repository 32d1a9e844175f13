//! Memoization of parsed argument lists

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::value::ArgValue;

/// Cache from exact command text to its parsed argument list.
///
/// Entries are insert-if-absent. When a capacity is set and reached, new
/// entries are simply not stored; parsing is pure, so a miss only costs a
/// recomputation.
#[derive(Debug, Default)]
pub struct ParseCache {
    entries: RwLock<HashMap<String, Arc<[ArgValue]>>>,
    capacity: Option<usize>,
}

impl ParseCache {
    /// Unbounded cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache that stops accepting entries after `capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity: Some(capacity),
        }
    }

    pub fn get(&self, command: &str) -> Option<Arc<[ArgValue]>> {
        self.entries.read().get(command).cloned()
    }

    /// Store `args` for `command` unless an entry already exists or the
    /// cache is full. Returns the stored (or already present) value.
    pub fn insert(&self, command: &str, args: Vec<ArgValue>) -> Arc<[ArgValue]> {
        let args: Arc<[ArgValue]> = args.into();
        let mut entries = self.entries.write();

        if let Some(existing) = entries.get(command) {
            return existing.clone();
        }
        if self.capacity.is_some_and(|cap| entries.len() >= cap) {
            return args;
        }

        entries.insert(command.to_string(), args.clone());
        args
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
