/// Layout of the word vector the quoter returns. Every reply is a sequence
/// of 256-bit signed words: a fixed leading block, then one fixed-size tuple
/// per sampled sub-step. The exact-point reply is the same shape with a
/// single tuple, and its word positions carry the addresses and amounts the
/// execution payload is assembled from.
use alloy::primitives::{Address, B256, I256};

/// Words in the leading block preceding the first sub-step tuple.
pub const LEADING_WORDS: usize = 6;

/// Words per sub-step tuple; the first word of a tuple is that sub-step's
/// representative profit.
pub const TUPLE_WORDS: usize = 8;

/// Minimum length of an exact-point reply carrying a full detail record.
const DETAIL_WORDS: usize = LEADING_WORDS + TUPLE_WORDS;

/// Word index of the confirmed profit in an exact-point reply.
const PROFIT_WORD: usize = 12;

/// Word indices hashed into the payload selector byte.
const DIGEST_WORDS: [usize; 3] = [3, 4, 5];

/// A decoded quoter reply.
///
/// Wraps the raw words and exposes the two views the resolver needs: the
/// per-sub-step scan of a ranged reply, and the named fields of an
/// exact-point reply.
#[derive(Clone, Debug)]
pub struct RoiVector {
    /// Raw reply words in oracle order
    words: Vec<I256>,
}

impl RoiVector {
    /// Wraps a decoded reply.
    #[must_use]
    pub const fn new(words: Vec<I256>) -> Self {
        Self { words }
    }

    /// Number of complete sub-step tuples in the reply.
    #[must_use]
    pub fn tuple_count(&self) -> usize {
        self.words.len().saturating_sub(LEADING_WORDS) / TUPLE_WORDS
    }

    /// Index of the first sub-step whose representative profit is zero.
    ///
    /// The profit function is monotonically non-increasing across the
    /// window, so the first zero tuple brackets the breakeven. When no tuple
    /// is zero this returns the tuple count; the caller's window clamp turns
    /// that into the last sub-step.
    #[must_use]
    pub fn breakeven_index(&self) -> u64 {
        let tuples = self.tuple_count();
        for i in 0..tuples {
            if self.words[LEADING_WORDS + i * TUPLE_WORDS].is_zero() {
                return i as u64;
            }
        }
        tuples as u64
    }

    /// The confirmed profit of an exact-point reply, if present.
    ///
    /// A reply too short to carry the profit word yields `None`; the
    /// candidate is then treated as having no opportunity rather than
    /// guessed at.
    #[must_use]
    pub fn profit(&self) -> Option<I256> {
        if self.words.len() < DETAIL_WORDS {
            return None;
        }
        Some(self.words[PROFIT_WORD])
    }

    /// The three snapshot words hashed into the payload selector byte.
    #[must_use]
    pub fn digest_words(&self) -> Option<[I256; 3]> {
        if self.words.len() < DETAIL_WORDS {
            return None;
        }
        Some(DIGEST_WORDS.map(|i| self.words[i]))
    }

    /// Word `index` reinterpreted as an address (low 20 bytes).
    #[must_use]
    pub fn address_at(&self, index: usize) -> Option<Address> {
        let word = *self.words.get(index)?;
        Some(Address::from_word(B256::from(word.to_be_bytes::<32>())))
    }

    /// Raw word at `index`.
    #[must_use]
    pub fn word_at(&self, index: usize) -> Option<I256> {
        self.words.get(index).copied()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::arb::test_helpers::*;

    #[test]
    fn test_breakeven_index_first_zero_tuple() {
        // 6 leading words, then tuples whose first words read 5, 3, 0, 0...
        let mut words = vec![I256::ZERO; LEADING_WORDS];
        for profit in [5i64, 3, 0, 0, 0, 0, 0, 0, 0, 0] {
            words.extend(tuple_with_profit(profit));
        }
        assert_eq!(RoiVector::new(words).breakeven_index(), 2);
    }

    #[test]
    fn test_breakeven_index_no_zero_returns_tuple_count() {
        let mut words = vec![I256::ZERO; LEADING_WORDS];
        for _ in 0..10 {
            words.extend(tuple_with_profit(1));
        }
        assert_eq!(RoiVector::new(words).breakeven_index(), 10);
    }

    #[test]
    fn test_breakeven_index_short_reply() {
        assert_eq!(RoiVector::new(Vec::new()).breakeven_index(), 0);
        assert_eq!(
            RoiVector::new(vec![I256::ZERO; LEADING_WORDS]).breakeven_index(),
            0
        );
    }

    #[test]
    fn test_profit_word_position() {
        let words = detail_words(addr("A"), addr("B"), addr("C"), 5_000_000);
        let frame = RoiVector::new(words);
        assert_eq!(frame.profit().unwrap(), I256::try_from(5_000_000).unwrap());
    }

    #[test]
    fn test_profit_absent_on_short_reply() {
        let frame = RoiVector::new(vec![I256::ZERO; DETAIL_WORDS - 1]);
        assert!(frame.profit().is_none());
        assert!(frame.digest_words().is_none());
    }

    #[test]
    fn test_address_at_reads_low_bytes() {
        let words = detail_words(addr("A"), addr("B"), addr("C"), 1);
        let frame = RoiVector::new(words);
        assert_eq!(frame.address_at(0).unwrap(), addr("A"));
        assert_eq!(frame.address_at(1).unwrap(), addr("B"));
        assert_eq!(frame.address_at(2).unwrap(), addr("C"));
    }
}
