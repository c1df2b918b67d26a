use std::fmt;

/// Why a review session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    /// The operator pressed quit or closed the window.
    Quit,
    /// Every sample was rejected, or there was nothing to review.
    Exhausted,
}

/// Outcome of a review session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub frames_shown: usize,
    /// Rejected basenames in rejection order.
    pub rejected: Vec<String>,
    /// Samples still in the working set when the session ended.
    pub remaining: usize,
    pub end_reason: EndReason,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ended = match self.end_reason {
            EndReason::Quit => "stopped by operator",
            EndReason::Exhausted => "no samples left",
        };
        writeln!(
            f,
            "Review {}: {} frame(s) shown, {} rejected, {} remaining",
            ended,
            self.frames_shown,
            self.rejected.len(),
            self.remaining
        )?;

        for basename in &self.rejected {
            writeln!(f, "  - {}", basename)?;
        }

        Ok(())
    }
}
