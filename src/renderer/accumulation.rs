//! Temporal accumulation bookkeeping.
//!
//! The pathtrace shader blends each new sample with the history texture
//! weighted by the frame index; this controller owns that index and the
//! reset triggers. `frame_index == -1` means no history exists yet.

/// Frame index and reset-trigger state for temporal accumulation.
#[derive(Debug, Clone, Copy)]
pub struct AccumulationController {
    frame_index: i32,
    reset_requested: bool,
    enabled: bool,
}

impl AccumulationController {
    /// New controller with no history.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            frame_index: -1,
            reset_requested: false,
            enabled,
        }
    }

    /// Current frame index; -1 before the first frame.
    #[must_use]
    pub fn frame_index(&self) -> i32 {
        self.frame_index
    }

    /// Whether accumulation is currently enabled.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Toggle accumulation. A false-to-true transition requests a reset
    /// so stale history never bleeds into a fresh accumulation run.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled && !self.enabled {
            self.reset_requested = true;
        }
        self.enabled = enabled;
    }

    /// Explicitly request a history reset (camera moved, scene edited).
    pub fn request_reset(&mut self) {
        self.reset_requested = true;
    }

    /// A reset is pending and accumulation is enabled.
    #[must_use]
    pub fn should_reset(&self) -> bool {
        self.reset_requested && self.enabled
    }

    /// Per-frame advance: applies a pending reset, then increments.
    /// Reset applies before the increment, so the first frame after a
    /// reset is frame 0.
    pub fn advance(&mut self) {
        if self.should_reset() {
            self.frame_index = -1;
        }
        self.reset_requested = false;
        self.frame_index += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_without_history() {
        let acc = AccumulationController::new(true);
        assert_eq!(acc.frame_index(), -1);
        assert!(!acc.should_reset());
    }

    #[test]
    fn advance_increments() {
        let mut acc = AccumulationController::new(true);
        acc.advance();
        assert_eq!(acc.frame_index(), 0);
        acc.advance();
        acc.advance();
        assert_eq!(acc.frame_index(), 2);
    }

    #[test]
    fn reset_applies_before_increment() {
        let mut acc = AccumulationController::new(true);
        for _ in 0..10 {
            acc.advance();
        }
        assert_eq!(acc.frame_index(), 9);
        acc.request_reset();
        acc.advance();
        assert_eq!(acc.frame_index(), 0);
    }

    #[test]
    fn enable_edge_triggers_single_reset() {
        let mut acc = AccumulationController::new(false);
        acc.advance();
        acc.advance();
        assert!(!acc.should_reset());

        acc.set_enabled(true);
        assert!(acc.should_reset());
        acc.advance();
        assert_eq!(acc.frame_index(), 0);
        assert!(!acc.should_reset());

        // Re-enabling while already enabled is not an edge.
        acc.set_enabled(true);
        assert!(!acc.should_reset());
    }

    #[test]
    fn reset_while_disabled_does_not_apply() {
        let mut acc = AccumulationController::new(false);
        acc.advance();
        acc.advance();
        acc.request_reset();
        assert!(!acc.should_reset());
        acc.advance();
        assert_eq!(acc.frame_index(), 2);
    }

    #[test]
    fn disabling_keeps_counting() {
        let mut acc = AccumulationController::new(true);
        acc.advance();
        acc.set_enabled(false);
        acc.advance();
        assert_eq!(acc.frame_index(), 1);
    }
}
