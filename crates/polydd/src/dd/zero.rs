//! Fixed-width bitsets over input row indices (ray zero sets).

const WORD_BITS: usize = u64::BITS as usize;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ZeroSet {
    words: Vec<u64>,
}

impl ZeroSet {
    /// Empty set able to hold indices `< domain` without reallocating.
    pub(crate) fn with_domain(domain: usize) -> Self {
        Self {
            words: vec![0; domain.div_ceil(WORD_BITS)],
        }
    }

    #[inline]
    pub(crate) fn insert(&mut self, idx: usize) {
        let word = idx / WORD_BITS;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1u64 << (idx % WORD_BITS);
    }

    #[inline]
    pub(crate) fn contains(&self, idx: usize) -> bool {
        self.words
            .get(idx / WORD_BITS)
            .is_some_and(|w| w & (1u64 << (idx % WORD_BITS)) != 0)
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub(crate) fn intersection(&self, other: &Self) -> Self {
        Self {
            words: self
                .words
                .iter()
                .zip(&other.words)
                .map(|(a, b)| a & b)
                .collect(),
        }
    }

    /// `self ⊆ other`.
    pub(crate) fn is_subset(&self, other: &Self) -> bool {
        self.words.iter().enumerate().all(|(i, w)| {
            let o = other.words.get(i).copied().unwrap_or(0);
            w & !o == 0
        })
    }
}
