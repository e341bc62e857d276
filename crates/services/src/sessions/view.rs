//! Presentation-agnostic session views.
//!
//! These carry no pre-formatted strings beyond the `MM:SS` clock readout and
//! make no layout assumptions; the presentation layer decides how to render
//! them.

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    /// Zero-based index of the question currently shown.
    pub current: usize,
    pub total: usize,
    /// Questions with a recorded answer, full or partial.
    pub answered: usize,
    pub is_complete: bool,
}

/// Per-question correctness in snapshot order, for the results breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionOutcome {
    /// One-based position in the session snapshot.
    pub ordinal: usize,
    pub question_id: quiz_core::model::QuestionId,
    pub correct: bool,
}

/// Final score of a completed session next to the high-water mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreSummary {
    pub score: u32,
    pub total: u32,
    pub highest: u32,
}

impl ScoreSummary {
    /// Score as a rounded percentage, 0 for an empty session.
    #[must_use]
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.score * 100 + self.total / 2) / self.total
    }
}

/// Formats remaining seconds as zero-padded `MM:SS`.
#[must_use]
pub fn format_remaining(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_time_is_zero_padded() {
        assert_eq!(format_remaining(0), "00:00");
        assert_eq!(format_remaining(59), "00:59");
        assert_eq!(format_remaining(60), "01:00");
        assert_eq!(format_remaining(90), "01:30");
        assert_eq!(format_remaining(3600), "60:00");
    }

    #[test]
    fn percent_rounds_and_handles_empty_sessions() {
        let summary = ScoreSummary {
            score: 2,
            total: 3,
            highest: 3,
        };
        assert_eq!(summary.percent(), 67);

        let empty = ScoreSummary {
            score: 0,
            total: 0,
            highest: 0,
        };
        assert_eq!(empty.percent(), 0);
    }
}
