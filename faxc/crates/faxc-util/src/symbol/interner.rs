//! Thread-safe string interner backed by `DashMap`, so lexing and scan-pass
//! symbol lookups never contend on a single global lock.

use ahash::AHasher;
use dashmap::DashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::LazyLock;

use super::{InternerStats, Symbol, KNOWN_SYMBOLS};

pub static STRING_TABLE: LazyLock<StringTable> = LazyLock::new(|| {
    let table = StringTable::new();
    table.initialize_known_symbols();
    table
});

pub struct StringTable {
    /// hash(string) -> (string, symbol index)
    map: DashMap<u64, (&'static str, u32)>,
    next_index: AtomicU32,
    collisions: AtomicUsize,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl StringTable {
    fn new() -> Self {
        Self {
            map: DashMap::with_capacity(256),
            next_index: AtomicU32::new(KNOWN_SYMBOLS.len() as u32),
            collisions: AtomicUsize::new(0),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    fn initialize_known_symbols(&self) {
        for (idx, text) in KNOWN_SYMBOLS.iter().enumerate() {
            let interned: &'static str = Box::leak(text.to_string().into_boxed_str());
            let hash = Self::hash_string(text);
            self.map.insert(hash, (interned, idx as u32));
        }
    }

    pub fn intern(&self, string: &str) -> Symbol {
        let hash = Self::hash_string(string);

        if let Some(entry) = self.map.get(&hash) {
            if entry.value().0 == string {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Symbol { index: entry.value().1 };
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);

        match self.map.entry(hash) {
            dashmap::mapref::entry::Entry::Occupied(entry) => {
                if entry.get().0 == string {
                    Symbol { index: entry.get().1 }
                } else {
                    self.handle_collision(string, hash)
                }
            }
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                let interned: &'static str = Box::leak(string.to_string().into_boxed_str());
                let idx = self.next_index.fetch_add(1, Ordering::Relaxed);
                entry.insert((interned, idx));
                Symbol { index: idx }
            }
        }
    }

    /// Linear probing with a golden-ratio stride; collisions are rare enough
    /// in practice (identifier text, not adversarial input) that this is fine.
    fn handle_collision(&self, string: &str, original_hash: u64) -> Symbol {
        const MAX_PROBES: u64 = 32;
        const PROBE_PRIME: u64 = 0x9e3779b97f4a7c15;

        for i in 1u64..=MAX_PROBES {
            let probe_hash = original_hash.wrapping_add(i.wrapping_mul(PROBE_PRIME));
            if let Some(entry) = self.map.get(&probe_hash) {
                if entry.value().0 == string {
                    return Symbol { index: entry.value().1 };
                }
            } else {
                self.collisions.fetch_add(1, Ordering::Relaxed);
                let interned: &'static str = Box::leak(string.to_string().into_boxed_str());
                let idx = self.next_index.fetch_add(1, Ordering::Relaxed);
                self.map.insert(probe_hash, (interned, idx));
                return Symbol { index: idx };
            }
        }

        self.collisions.fetch_add(1, Ordering::Relaxed);
        let interned: &'static str = Box::leak(string.to_string().into_boxed_str());
        let idx = self.next_index.fetch_add(1, Ordering::Relaxed);
        self.map.insert(original_hash, (interned, idx));
        Symbol { index: idx }
    }

    pub fn get(&self, symbol: Symbol) -> Option<&'static str> {
        self.map.iter().find(|entry| entry.value().1 == symbol.index).map(|entry| entry.value().0)
    }

    #[inline]
    fn hash_string(string: &str) -> u64 {
        let mut hasher = AHasher::default();
        string.hash(&mut hasher);
        hasher.finish()
    }

    pub fn stats(&self) -> InternerStats {
        InternerStats::new(
            self.map.len(),
            self.map.capacity(),
            self.collisions.load(Ordering::Relaxed),
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn known_symbols_preinterned() {
        let sym = STRING_TABLE.intern("fn");
        assert_eq!(sym.as_u32(), 0);
    }

    #[test]
    fn concurrent_intern_is_consistent() {
        let handles: Vec<_> = (0..20)
            .map(|i| thread::spawn(move || STRING_TABLE.intern(&format!("thread_{i}"))))
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for i in 0..results.len() {
            for j in (i + 1)..results.len() {
                assert_ne!(results[i], results[j]);
            }
        }
    }

    #[test]
    fn unicode_round_trips() {
        for s in ["你好", "🦀", "Привет"] {
            let sym = STRING_TABLE.intern(s);
            assert_eq!(STRING_TABLE.get(sym), Some(s));
        }
    }
}
