use std::collections::HashMap;

/// Bound classification for transposition table entries.
///
/// Stored with the MTD(f) search's naming: a node whose value did not rise
/// above the window's lower edge is recorded as `LowerBound`, one that reached
/// the upper edge as `UpperBound`. Only `Exact` entries are ever used to cut
/// a search short, so the naming never affects a returned value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Value lies strictly inside the window it was searched with.
    Exact,
    LowerBound,
    UpperBound,
}

impl Bound {
    /// Classify a fail-soft result against the window the node was entered with.
    pub fn classify(value: i32, alpha: i32, beta: i32) -> Self {
        if value <= alpha {
            Bound::LowerBound
        } else if value >= beta {
            Bound::UpperBound
        } else {
            Bound::Exact
        }
    }
}

/// Entry in the transposition table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranspositionEntry {
    /// Zobrist key of the position
    pub key: u64,
    /// Remaining depth the value was computed to
    pub depth: u32,
    /// Value from the perspective of the side to move at that node
    pub value: i32,
    pub bound: Bound,
}

/// Position cache keyed by Zobrist value.
///
/// Single-owner: one table per decision, touched only by the searching thread.
/// Entries are overwritten, never merged.
pub struct TranspositionTable {
    table: HashMap<u64, TranspositionEntry>,
    max_size: usize,
    /// Statistics: probes that found an entry deep enough
    pub hits: u64,
    /// Statistics: probes that found nothing usable
    pub misses: u64,
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TranspositionTable {
    /// Create a transposition table with default size (1 million entries)
    pub fn new() -> Self {
        Self::with_capacity(1_000_000)
    }

    pub fn with_capacity(max_size: usize) -> Self {
        Self {
            table: HashMap::with_capacity(max_size.min(100_000)),
            max_size,
            hits: 0,
            misses: 0,
        }
    }

    /// Look up `key`, trusting the entry only if it was searched at least
    /// `depth` plies deep.
    pub fn probe(&mut self, key: u64, depth: u32) -> Option<TranspositionEntry> {
        match self.table.get(&key) {
            Some(entry) if entry.key == key && entry.depth >= depth => {
                self.hits += 1;
                Some(*entry)
            }
            _ => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store an entry, replacing an existing one only if it is no deeper.
    ///
    /// A full table keeps what it has: new keys are dropped, existing keys
    /// are still refreshed.
    pub fn store(&mut self, entry: TranspositionEntry) {
        if let Some(existing) = self.table.get(&entry.key) {
            if existing.depth > entry.depth {
                return;
            }
        } else if self.table.len() >= self.max_size {
            return;
        }
        self.table.insert(entry.key, entry);
    }

    pub fn clear(&mut self) {
        self.table.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_size
    }

    /// Get hit rate (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Rough memory footprint in bytes.
    pub fn memory_usage(&self) -> usize {
        self.table.capacity() * (std::mem::size_of::<u64>() + std::mem::size_of::<TranspositionEntry>())
    }

    /// Every stored entry, in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = &TranspositionEntry> {
        self.table.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: u64, depth: u32, value: i32, bound: Bound) -> TranspositionEntry {
        TranspositionEntry {
            key,
            depth,
            value,
            bound,
        }
    }

    #[test]
    fn test_store_and_probe() {
        let mut tt = TranspositionTable::with_capacity(16);
        tt.store(entry(42, 5, 17, Bound::Exact));

        let hit = tt.probe(42, 5).unwrap();
        assert_eq!(hit.value, 17);
        assert_eq!(hit.bound, Bound::Exact);
        assert_eq!(tt.probe(42, 3).unwrap().value, 17);
        assert_eq!(tt.hits, 2);
    }

    #[test]
    fn test_probe_rejects_shallow_entries() {
        let mut tt = TranspositionTable::with_capacity(16);
        tt.store(entry(7, 2, 100, Bound::Exact));
        assert!(tt.probe(7, 3).is_none());
        assert!(tt.probe(8, 0).is_none());
        assert_eq!(tt.misses, 2);
        assert_eq!(tt.hits, 0);
    }

    #[test]
    fn test_replacement_keeps_deeper_entry() {
        let mut tt = TranspositionTable::with_capacity(16);
        tt.store(entry(1, 6, 10, Bound::Exact));
        tt.store(entry(1, 4, 99, Bound::Exact));
        assert_eq!(tt.probe(1, 0).unwrap().value, 10);

        // Equal depth overwrites.
        tt.store(entry(1, 6, -3, Bound::UpperBound));
        let hit = tt.probe(1, 6).unwrap();
        assert_eq!(hit.value, -3);
        assert_eq!(hit.bound, Bound::UpperBound);
    }

    #[test]
    fn test_full_table_drops_new_keys() {
        let mut tt = TranspositionTable::with_capacity(2);
        tt.store(entry(1, 1, 1, Bound::Exact));
        tt.store(entry(2, 1, 2, Bound::Exact));
        tt.store(entry(3, 1, 3, Bound::Exact));
        assert_eq!(tt.len(), 2);
        assert!(tt.probe(3, 0).is_none());
        assert!(tt.memory_usage() >= 2 * std::mem::size_of::<TranspositionEntry>());

        tt.store(entry(2, 2, 20, Bound::Exact));
        assert_eq!(tt.probe(2, 2).unwrap().value, 20);
    }

    #[test]
    fn test_classify_reversed_naming() {
        assert_eq!(Bound::classify(5, 5, 10), Bound::LowerBound);
        assert_eq!(Bound::classify(-1, 5, 10), Bound::LowerBound);
        assert_eq!(Bound::classify(10, 5, 10), Bound::UpperBound);
        assert_eq!(Bound::classify(7, 5, 10), Bound::Exact);
    }

    #[test]
    fn test_clear_resets_stats() {
        let mut tt = TranspositionTable::new();
        tt.store(entry(9, 1, 0, Bound::Exact));
        tt.probe(9, 1);
        tt.probe(10, 1);
        assert!((tt.hit_rate() - 0.5).abs() < f64::EPSILON);
        tt.clear();
        assert!(tt.is_empty());
        assert_eq!(tt.hits + tt.misses, 0);
        assert_eq!(tt.hit_rate(), 0.0);
    }
}
