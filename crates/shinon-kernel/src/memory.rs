//! Short-term kernel memory: the most recent executed actions.

use std::collections::VecDeque;

use serde::Serialize;
use shinon_types::{EventId, GoodId, PolicyId};

/// Default number of remembered actions.
pub const DEFAULT_MEMORY_LIMIT: usize = 12;

/// Summary of one executed action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemoryEntry {
    /// Turn reached by the action.
    pub turn: u64,
    /// Policy that was enacted.
    pub action: PolicyId,
    /// Goods short after the turn.
    pub shortages: Vec<GoodId>,
    /// Events that fired during the turn.
    pub events: Vec<EventId>,
    /// Treasury after the turn.
    pub treasury: i64,
}

/// Ring buffer of [`MemoryEntry`] values. The oldest entry is dropped once
/// the limit is reached.
#[derive(Debug, Clone)]
pub struct KernelMemory {
    limit: usize,
    entries: VecDeque<MemoryEntry>,
}

impl Default for KernelMemory {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_LIMIT)
    }
}

impl KernelMemory {
    /// Empty memory holding at most `limit` entries (at least one).
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            limit,
            entries: VecDeque::with_capacity(limit),
        }
    }

    /// Remember an entry, evicting the oldest when full.
    pub fn record(&mut self, entry: MemoryEntry) {
        while self.entries.len() >= self.limit {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Up to `count` most recent entries, oldest first.
    pub fn latest(&self, count: usize) -> Vec<&MemoryEntry> {
        let skip = self.entries.len().saturating_sub(count);
        self.entries.iter().skip(skip).collect()
    }

    /// Maximum number of entries.
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn entry(turn: u64) -> MemoryEntry {
        MemoryEntry {
            turn,
            action: PolicyId::new("TAX_ADJUST"),
            shortages: Vec::new(),
            events: Vec::new(),
            treasury: 1000,
        }
    }

    #[test]
    fn evicts_oldest_beyond_limit() {
        let mut memory = KernelMemory::default();
        for turn in 1..=15 {
            memory.record(entry(turn));
        }
        assert_eq!(memory.len(), DEFAULT_MEMORY_LIMIT);
        let all = memory.latest(100);
        assert_eq!(all[0].turn, 4);
        assert_eq!(all[all.len() - 1].turn, 15);
    }

    #[test]
    fn latest_returns_tail_in_order() {
        let mut memory = KernelMemory::new(5);
        for turn in 1..=4 {
            memory.record(entry(turn));
        }
        let turns: Vec<u64> = memory.latest(2).iter().map(|e| e.turn).collect();
        assert_eq!(turns, vec![3, 4]);
        assert!(memory.latest(0).is_empty());
    }

    #[test]
    fn zero_limit_still_keeps_one() {
        let mut memory = KernelMemory::new(0);
        memory.record(entry(1));
        memory.record(entry(2));
        assert_eq!(memory.limit(), 1);
        assert_eq!(memory.latest(5)[0].turn, 2);
    }
}
