//! Per-session frame state.

use crate::action::Action;

/// Server-side state of one connected client.
///
/// Owned by exactly one session task; callers get `&mut` access, so
/// two processing cycles for the same session can never overlap.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionState {
    frame_counter: u64,
    processing: bool,
}

impl SessionState {
    /// Fresh state: counter at zero, idle.
    pub fn new() -> Self {
        SessionState::default()
    }

    /// Number of effective actions accepted so far.
    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    /// True while a generation cycle is in flight.
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Start a processing cycle for `action`.
    ///
    /// Returns the new frame index, or `None` for the neutral action
    /// (in which case nothing changes).
    pub fn begin(&mut self, action: Action) -> Option<u64> {
        if !action.is_effective() {
            return None;
        }
        debug_assert!(!self.processing, "overlapping processing cycle");
        self.processing = true;
        self.frame_counter = self.frame_counter.saturating_add(1);
        Some(self.frame_counter)
    }

    /// End the current processing cycle, successful or not.
    pub fn finish(&mut self) {
        self.processing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_action_is_a_no_op() {
        let mut state = SessionState::new();
        assert_eq!(state.begin(Action::None), None);
        assert_eq!(state.frame_counter(), 0);
        assert!(!state.is_processing());
    }

    #[test]
    fn effective_actions_count_up_by_one() {
        let mut state = SessionState::new();
        for (expected, action) in [Action::Forward, Action::Left, Action::Brake, Action::Right]
            .into_iter()
            .enumerate()
        {
            let frame = state.begin(action);
            assert!(state.is_processing());
            state.finish();
            assert_eq!(frame, Some(expected as u64 + 1));
        }
        assert_eq!(state.frame_counter(), 4);
        assert!(!state.is_processing());
    }
}
