//! Wager ("build") sizing with boost, gim caps and a runaway guard.
use serde::{Deserialize, Serialize};

use crate::constants::{
    BUILD_BOOST_AMOUNT, BUILD_BOOST_ROUNDS, BUILD_GIM_DOUBLE_CAP, BUILD_GIM_TRIPLE_FIXED,
    BUILD_HIGH_THRESHOLD, BUILD_HISTORY_CAP, BUILD_MAX, BUILD_MIN, BUILD_RESTRAINT_WINDOW,
    BUILD_RUNAWAY_FALLBACK, BUILD_SAFETY_DIVISOR, BUILD_STEP,
};
use crate::numbers::round_even_f64_to_i64;
use crate::room::RoomId;
use crate::trends::GimLevel;

/// Rolling wager memory carried across rounds.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WagerState {
    history: Vec<i64>,
    boost_remaining: u32,
}

/// Everything that shaped one round's wager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildDecision {
    pub base: i64,
    pub boosted: bool,
    pub gim: GimLevel,
    pub runaway_guard: bool,
    pub build: i64,
}

/// Quantize a safety percentage into a multiple of 100.
#[must_use]
pub fn base_build(safety: f64) -> i64 {
    round_even_f64_to_i64(safety / BUILD_SAFETY_DIVISOR).saturating_mul(BUILD_STEP)
}

impl WagerState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn history(&self) -> &[i64] {
        &self.history
    }

    #[must_use]
    pub const fn boost_remaining(&self) -> u32 {
        self.boost_remaining
    }

    /// True unless each of the last five wagers stayed below 700.
    fn lacks_recent_restraint(&self) -> bool {
        let recent = &self.history[self.history.len().saturating_sub(BUILD_RESTRAINT_WINDOW)..];
        recent
            .iter()
            .filter(|build| **build < BUILD_HIGH_THRESHOLD)
            .count()
            < BUILD_RESTRAINT_WINDOW
    }

    /// Size this round's wager and fold it into the history.
    pub fn next_build(
        &mut self,
        safety: f64,
        observed: RoomId,
        suggestion: RoomId,
        gim: GimLevel,
    ) -> BuildDecision {
        let base = base_build(safety);
        let mut build = base;

        if observed == suggestion {
            self.boost_remaining = BUILD_BOOST_ROUNDS;
        }
        let boosted = self.boost_remaining > 0;
        if boosted {
            build = build.saturating_add(BUILD_BOOST_AMOUNT);
            self.boost_remaining -= 1;
        }

        match gim {
            GimLevel::Double => build = build.min(BUILD_GIM_DOUBLE_CAP),
            GimLevel::Triple => build = BUILD_GIM_TRIPLE_FIXED,
            GimLevel::None => {}
        }

        let runaway_guard = build >= BUILD_HIGH_THRESHOLD && self.lacks_recent_restraint();
        if runaway_guard {
            log::debug!("wager {build} held to {BUILD_RUNAWAY_FALLBACK} without recent restraint");
            build = BUILD_RUNAWAY_FALLBACK;
        }

        let build = build.clamp(BUILD_MIN, BUILD_MAX);
        self.history.push(build);
        if self.history.len() > BUILD_HISTORY_CAP {
            let excess = self.history.len() - BUILD_HISTORY_CAP;
            self.history.drain(..excess);
        }

        BuildDecision {
            base,
            boosted,
            gim,
            runaway_guard,
            build,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(value: u8) -> RoomId {
        RoomId::new(value).unwrap()
    }

    fn warmed(builds: &[i64]) -> WagerState {
        WagerState {
            history: builds.to_vec(),
            boost_remaining: 0,
        }
    }

    #[test]
    fn base_quantizes_safety_to_hundreds() {
        assert_eq!(base_build(99.69), 1_000);
        assert_eq!(base_build(54.0), 500);
        assert_eq!(base_build(25.0), 200);
        assert_eq!(base_build(35.0), 400);
        assert_eq!(base_build(0.0), 0);
    }

    #[test]
    fn high_wagers_need_five_restrained_rounds() {
        let mut fresh = WagerState::new();
        let decision = fresh.next_build(90.0, room(1), room(2), GimLevel::None);
        assert!(decision.runaway_guard);
        assert_eq!(decision.build, 300);

        let mut calm = warmed(&[900, 300, 300, 300, 300, 300]);
        let decision = calm.next_build(90.0, room(1), room(2), GimLevel::None);
        assert!(!decision.runaway_guard);
        assert_eq!(decision.build, 900);
        assert_eq!(calm.history().last(), Some(&900));
    }

    #[test]
    fn matching_observation_arms_two_boosted_rounds() {
        let mut state = warmed(&[100; 5]);
        let first = state.next_build(30.0, room(4), room(4), GimLevel::None);
        assert!(first.boosted);
        assert_eq!(first.build, 500);
        assert_eq!(state.boost_remaining(), 1);

        let second = state.next_build(30.0, room(4), room(5), GimLevel::None);
        assert!(second.boosted);
        assert_eq!(second.build, 500);

        let third = state.next_build(30.0, room(4), room(5), GimLevel::None);
        assert!(!third.boosted);
        assert_eq!(third.build, 300);
    }

    #[test]
    fn gim_levels_cap_or_pin_the_wager() {
        let mut state = warmed(&[100; 5]);
        let double = state.next_build(60.0, room(1), room(2), GimLevel::Double);
        assert_eq!(double.build, 300);

        let mut state = warmed(&[100; 5]);
        let triple = state.next_build(60.0, room(2), room(2), GimLevel::Triple);
        assert!(triple.boosted);
        assert_eq!(triple.build, 100);
    }

    #[test]
    fn builds_always_land_in_range() {
        let mut state = WagerState::new();
        for (idx, safety) in [-40.0, 0.0, 3.0, 49.0, 76.0, 125.0, 250.0].iter().enumerate() {
            let observed = RoomId::ALL[idx % 8];
            let decision = state.next_build(*safety, observed, room(1), GimLevel::None);
            assert!((BUILD_MIN..=BUILD_MAX).contains(&decision.build));
        }
        let mut calm = warmed(&[100; 5]);
        assert_eq!(calm.next_build(250.0, room(1), room(2), GimLevel::None).build, 1_000);
        let mut low = warmed(&[100; 5]);
        assert_eq!(low.next_build(2.0, room(1), room(2), GimLevel::None).build, 100);
    }

    #[test]
    fn history_is_capped() {
        let mut state = WagerState::new();
        for _ in 0..(BUILD_HISTORY_CAP + 20) {
            state.next_build(10.0, room(1), room(2), GimLevel::None);
        }
        assert_eq!(state.history().len(), BUILD_HISTORY_CAP);
    }
}
