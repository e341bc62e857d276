use std::collections::BTreeMap;

/// Process-lifetime best scores, keyed by session length.
///
/// The high-water mark is monotonically non-decreasing and never resets;
/// keying by length keeps scores comparable when the bank is edited between
/// runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighScores {
    by_len: BTreeMap<usize, u32>,
}

impl HighScores {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished session. Returns true if this raised the mark.
    pub fn record(&mut self, len: usize, score: u32) -> bool {
        let best = self.by_len.entry(len).or_insert(0);
        if score > *best {
            *best = score;
            true
        } else {
            false
        }
    }

    /// Best score observed for sessions of the given length, 0 if none.
    #[must_use]
    pub fn best(&self, len: usize) -> u32 {
        self.by_len.get(&len).copied().unwrap_or(0)
    }
}
