/*!
 * Signal Sets
 *
 * Fixed-size bitsets indexed by signal number. `AtomicSigSet` is the shared
 * form touched by producers and is built only from atomic load/CAS, so it is
 * safe to use inside a signal handler. `LocalSigSet` is the consumer's
 * private buffer.
 */

use std::sync::atomic::{AtomicU32, Ordering};

/// Exclusive upper bound on signal numbers; numbers `>= NSIG` are ignored
pub const NSIG: u32 = 65;

const WORD_BITS: u32 = u32::BITS;

/// Number of 32-bit words needed to hold `NSIG` bits
pub(crate) const SIG_WORDS: usize = NSIG.div_ceil(WORD_BITS) as usize;

/// Check whether a signal number fits in a set
#[inline(always)]
pub const fn in_range(signal: u32) -> bool {
    signal < NSIG
}

#[inline(always)]
const fn locate(signal: u32) -> (usize, u32) {
    ((signal / WORD_BITS) as usize, 1 << (signal % WORD_BITS))
}

/// Lock-free shared bitset
///
/// Callers must range-check with [`in_range`] first; out-of-range numbers
/// panic on the word index.
#[repr(C, align(64))]
pub struct AtomicSigSet {
    words: [AtomicU32; SIG_WORDS],
}

impl AtomicSigSet {
    /// Create an empty set
    pub const fn new() -> Self {
        Self {
            words: [const { AtomicU32::new(0) }; SIG_WORDS],
        }
    }

    /// Set the bit for `signal`
    ///
    /// Returns `true` only for the call that flipped the bit from clear to
    /// set; a bit that was already set reports `false`.
    #[inline]
    pub fn insert(&self, signal: u32) -> bool {
        let (idx, bit) = locate(signal);
        let word = &self.words[idx];
        let mut current = word.load(Ordering::Acquire);

        loop {
            if current & bit != 0 {
                return false;
            }
            match word.compare_exchange_weak(
                current,
                current | bit,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    /// Clear the bit for `signal`
    #[inline]
    pub fn remove(&self, signal: u32) {
        let (idx, bit) = locate(signal);
        let word = &self.words[idx];
        let mut current = word.load(Ordering::Acquire);

        while current & bit != 0 {
            match word.compare_exchange_weak(
                current,
                current & !bit,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }

    /// Check whether the bit for `signal` is set
    #[inline]
    pub fn contains(&self, signal: u32) -> bool {
        let (idx, bit) = locate(signal);
        self.words[idx].load(Ordering::Acquire) & bit != 0
    }

    /// Check whether every bit is clear
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| w.load(Ordering::Acquire) == 0)
    }

    /// Atomically read and clear one word
    #[inline]
    fn take_word(&self, idx: usize) -> u32 {
        let word = &self.words[idx];
        let mut current = word.load(Ordering::Acquire);

        loop {
            match word.compare_exchange_weak(current, 0, Ordering::AcqRel, Ordering::Acquire) {
                Ok(taken) => return taken,
                Err(actual) => current = actual,
            }
        }
    }

    /// Move every set bit into `local`, leaving this set empty word by word
    ///
    /// Each word is taken with a single successful CAS, so every bit set
    /// before that CAS is observed exactly once.
    pub fn drain_into(&self, local: &mut LocalSigSet) {
        for idx in 0..SIG_WORDS {
            local.words[idx] |= self.take_word(idx);
        }
    }
}

impl Default for AtomicSigSet {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AtomicSigSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set()
            .entries((0..NSIG).filter(|&sig| self.contains(sig)))
            .finish()
    }
}

/// Consumer-private bitset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalSigSet {
    words: [u32; SIG_WORDS],
}

impl LocalSigSet {
    /// Create an empty set
    pub const fn new() -> Self {
        Self {
            words: [0; SIG_WORDS],
        }
    }

    /// Set the bit for `signal`; out-of-range numbers are ignored
    pub fn insert(&mut self, signal: u32) {
        if in_range(signal) {
            let (idx, bit) = locate(signal);
            self.words[idx] |= bit;
        }
    }

    /// Check whether the bit for `signal` is set
    pub fn contains(&self, signal: u32) -> bool {
        if !in_range(signal) {
            return false;
        }
        let (idx, bit) = locate(signal);
        self.words[idx] & bit != 0
    }

    /// Remove and return the lowest-numbered set signal
    #[inline]
    pub fn pop_lowest(&mut self) -> Option<u32> {
        for (idx, word) in self.words.iter_mut().enumerate() {
            if *word != 0 {
                let bit = word.trailing_zeros();
                *word &= !(1 << bit);
                return Some(idx as u32 * WORD_BITS + bit);
            }
        }
        None
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Number of buffered signals
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Iterate buffered signals in ascending order without removing them
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        (0..NSIG).filter(move |&sig| self.contains(sig))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_word_count_covers_nsig() {
        assert_eq!(SIG_WORDS, 3);
        assert!(in_range(NSIG - 1));
        assert!(!in_range(NSIG));
    }

    #[test]
    fn test_insert_reports_transition_only_once() {
        let set = AtomicSigSet::new();
        assert!(set.insert(5));
        assert!(!set.insert(5));
        assert!(set.contains(5));

        set.remove(5);
        assert!(!set.contains(5));
        assert!(set.insert(5));
    }

    #[test]
    fn test_remove_missing_bit_is_noop() {
        let set = AtomicSigSet::new();
        set.insert(40);
        set.remove(41);
        assert!(set.contains(40));
    }

    #[test]
    fn test_drain_empties_shared_set() {
        let set = AtomicSigSet::new();
        set.insert(1);
        set.insert(33);
        set.insert(64);

        let mut local = LocalSigSet::new();
        set.drain_into(&mut local);

        assert!(set.is_empty());
        assert_eq!(local.len(), 3);
        assert_eq!(local.iter().collect::<Vec<_>>(), vec![1, 33, 64]);
    }

    #[test]
    fn test_drain_merges_with_buffered_bits() {
        let set = AtomicSigSet::new();
        set.insert(7);

        let mut local = LocalSigSet::new();
        local.insert(3);
        set.drain_into(&mut local);

        assert_eq!(local.pop_lowest(), Some(3));
        assert_eq!(local.pop_lowest(), Some(7));
        assert_eq!(local.pop_lowest(), None);
    }

    #[test]
    fn test_local_ignores_out_of_range() {
        let mut local = LocalSigSet::new();
        local.insert(NSIG);
        local.insert(1000);
        assert!(local.is_empty());
        assert!(!local.contains(NSIG));
    }

    #[test]
    fn test_debug_lists_members() {
        let set = AtomicSigSet::new();
        set.insert(2);
        set.insert(10);
        assert_eq!(format!("{:?}", set), "{2, 10}");
    }

    proptest! {
        #[test]
        fn prop_pop_lowest_yields_sorted_unique(signals in proptest::collection::vec(0..NSIG, 0..200)) {
            let shared = AtomicSigSet::new();
            for &sig in &signals {
                shared.insert(sig);
            }

            let mut local = LocalSigSet::new();
            shared.drain_into(&mut local);

            let mut popped = Vec::new();
            while let Some(sig) = local.pop_lowest() {
                popped.push(sig);
            }

            let mut expected = signals.clone();
            expected.sort_unstable();
            expected.dedup();
            prop_assert_eq!(popped, expected);
        }
    }
}
