//! Tracks at most one outstanding request per key.
//!
//! Beginning a request for a key that already has one supersedes it; the
//! older ticket can no longer complete. Generations increase monotonically
//! across all keys so a ticket never matches a later request by accident.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestTicket<K> {
    pub key: K,
    pub generation: u64,
}

#[derive(Debug)]
pub struct PendingRequests<K> {
    next_generation: u64,
    outstanding: HashMap<K, u64>,
}

impl<K> Default for PendingRequests<K> {
    fn default() -> Self {
        Self {
            next_generation: 0,
            outstanding: HashMap::new(),
        }
    }
}

impl<K: Clone + Eq + Hash> PendingRequests<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.outstanding.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outstanding.is_empty()
    }

    pub fn begin(&mut self, key: K) -> RequestTicket<K> {
        let generation = self.next_generation;
        self.next_generation = self.next_generation.wrapping_add(1);
        self.outstanding.insert(key.clone(), generation);
        RequestTicket { key, generation }
    }

    pub fn is_outstanding(&self, ticket: &RequestTicket<K>) -> bool {
        self.outstanding.get(&ticket.key) == Some(&ticket.generation)
    }

    /// Retires `ticket`. Returns false when it was superseded or cancelled,
    /// in which case the caller drops the result.
    pub fn complete(&mut self, ticket: &RequestTicket<K>) -> bool {
        if !self.is_outstanding(ticket) {
            return false;
        }
        self.outstanding.remove(&ticket.key);
        true
    }

    pub fn cancel(&mut self, key: &K) -> bool {
        self.outstanding.remove(key).is_some()
    }

    /// Cancels every key matching `pred`. Returns how many were cancelled.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&K) -> bool) -> usize {
        let before = self.outstanding.len();
        self.outstanding.retain(|k, _| !pred(k));
        before - self.outstanding.len()
    }
}
