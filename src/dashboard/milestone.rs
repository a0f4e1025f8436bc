use serde::{Deserialize, Serialize};

pub const MILESTONES: [u8; 10] = [10, 20, 30, 40, 50, 60, 70, 80, 90, 100];

/// Tracks the voting-done percentage across refreshes and decides when a
/// decile has just been crossed.
///
/// Transitions are pure: every method consumes the state and returns the next
/// one, so the detector can be driven and tested without timers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneState {
    pub previous_percentage: u8,
    pub last_fired_milestone: Option<u8>,
    pub celebrating: Option<u8>,
    pub seeded: bool,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MilestoneEvent {
    /// A celebration started. The runtime clears it with `expire(generation)`.
    Reached { milestone: u8, generation: u64 },
}

impl MilestoneState {
    pub fn is_celebrating(&self) -> bool {
        self.celebrating.is_some()
    }

    pub fn celebrating_value(&self) -> Option<u8> {
        self.celebrating
    }

    pub fn observe(mut self, percentage: u8) -> (Self, Option<MilestoneEvent>) {
        let percentage = percentage.min(100);

        // Thresholds already passed before we started watching are not news.
        if !self.seeded {
            self.seeded = true;
            self.previous_percentage = percentage;
            self.last_fired_milestone = highest_decile_at_or_below(percentage);
            return (self, None);
        }

        let mut event = None;
        if !self.is_celebrating() && percentage > self.previous_percentage {
            let previous = self.previous_percentage;
            let crossed = MILESTONES
                .iter()
                .copied()
                .find(|&m| previous < m && m <= percentage && Some(m) != self.last_fired_milestone);

            if let Some(milestone) = crossed {
                self.last_fired_milestone = Some(milestone);
                self.celebrating = Some(milestone);
                self.generation += 1;
                event = Some(MilestoneEvent::Reached {
                    milestone,
                    generation: self.generation,
                });
            }
        }

        self.previous_percentage = percentage;
        (self, event)
    }

    /// Auto-clear. A timer left over from an earlier celebration is ignored.
    pub fn expire(mut self, generation: u64) -> Self {
        if generation == self.generation {
            self.celebrating = None;
        }
        self
    }

    pub fn dismiss(mut self) -> Self {
        self.celebrating = None;
        self
    }
}

fn highest_decile_at_or_below(percentage: u8) -> Option<u8> {
    MILESTONES.iter().copied().filter(|&m| m <= percentage).last()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fired(state: &mut MilestoneState, percentage: u8) -> Option<u8> {
        let (next, event) = state.observe(percentage);
        *state = next;
        event.map(|MilestoneEvent::Reached { milestone, .. }| milestone)
    }

    #[test]
    fn seed_suppresses_thresholds_already_passed() {
        let (state, event) = MilestoneState::default().observe(47);
        assert_eq!(event, None);
        assert!(!state.is_celebrating());
        assert_eq!(state.last_fired_milestone, Some(40));
        assert_eq!(state.previous_percentage, 47);
    }

    #[test]
    fn seed_below_first_decile_has_nothing_fired() {
        let (state, _) = MilestoneState::default().observe(7);
        assert_eq!(state.last_fired_milestone, None);
    }

    #[test]
    fn fires_on_crossing_and_ignores_repeats() {
        let mut state = MilestoneState::default();
        assert_eq!(fired(&mut state, 0), None);
        assert_eq!(fired(&mut state, 15), Some(10));
        assert_eq!(state.celebrating_value(), Some(10));
        state = state.dismiss();
        assert_eq!(fired(&mut state, 15), None);
        assert_eq!(fired(&mut state, 25), Some(20));
        state = state.dismiss();
        assert_eq!(fired(&mut state, 100), Some(30));
        state = state.dismiss();
        assert_eq!(fired(&mut state, 100), None);
    }

    #[test]
    fn upward_run_fires_each_decile_once_in_order() {
        let mut state = MilestoneState::default();
        let mut seen = Vec::new();
        for pct in [0u8, 15, 15, 25, 100, 100] {
            if let Some(m) = fired(&mut state, pct) {
                seen.push(m);
            }
            state = state.dismiss();
        }
        assert_eq!(seen, vec![10, 20, 30]);

        let mut sorted = seen.clone();
        sorted.dedup();
        assert_eq!(sorted, seen);
    }

    #[test]
    fn one_step_at_a_time_reaches_every_decile() {
        let mut state = MilestoneState::default();
        let mut seen = Vec::new();
        for pct in 0..=100u8 {
            if let Some(m) = fired(&mut state, pct) {
                seen.push(m);
            }
            state = state.dismiss();
        }
        assert_eq!(seen, MILESTONES.to_vec());
    }

    #[test]
    fn no_new_celebration_while_celebrating() {
        let mut state = MilestoneState::default();
        fired(&mut state, 5);
        assert_eq!(fired(&mut state, 12), Some(10));
        assert_eq!(fired(&mut state, 35), None);
        assert_eq!(state.celebrating_value(), Some(10));
        assert_eq!(state.previous_percentage, 35);

        state = state.dismiss();
        assert_eq!(fired(&mut state, 41), Some(40));
    }

    #[test]
    fn downward_moves_never_fire() {
        let mut state = MilestoneState::default();
        fired(&mut state, 60);
        assert_eq!(fired(&mut state, 30), None);
        assert_eq!(state.previous_percentage, 30);
    }

    #[test]
    fn stale_expiry_does_not_clear_newer_celebration() {
        let mut state = MilestoneState::default();
        fired(&mut state, 5);

        let (next, first) = state.observe(11);
        let MilestoneEvent::Reached { generation: old, .. } = first.unwrap();
        state = next.dismiss();

        let (next, second) = state.observe(21);
        let MilestoneEvent::Reached { generation: new, .. } = second.unwrap();
        state = next;
        assert_ne!(old, new);

        state = state.expire(old);
        assert_eq!(state.celebrating_value(), Some(20));
        state = state.expire(new);
        assert!(!state.is_celebrating());
    }
}
