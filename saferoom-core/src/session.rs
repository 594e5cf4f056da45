//! Round-by-round advisor session: the suggestion and wager state machine.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::room::{RoomCatalog, RoomId};
use crate::scorer::{Analysis, analyze};
use crate::stats::RecentStats;
use crate::transition::TransitionTable;
use crate::trends::{GimLevel, gim_trend, too_repeated_default};
use crate::wager::{BuildDecision, WagerState};
use crate::window::{RecentRooms, SuggestionHistory};

/// All mutable per-session memory. One value per session, owned by the caller.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub recent: RecentRooms,
    pub stats: RecentStats,
    pub transitions: TransitionTable,
    pub suggestions: SuggestionHistory,
    pub wager: WagerState,
}

impl SessionState {
    /// Start from an already observed window and long-horizon stats.
    #[must_use]
    pub fn seeded(recent: &[RoomId], stats: RecentStats) -> Self {
        Self {
            recent: recent.iter().copied().collect(),
            stats: stats.normalized(),
            ..Self::default()
        }
    }
}

/// What the advisor recommends after one observed room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundAdvice {
    pub observed: RoomId,
    /// Safest room straight from the scorer, before anti-repetition.
    pub candidate: RoomId,
    pub suggestion: RoomId,
    pub safety: f64,
    pub substituted: bool,
    pub gim: GimLevel,
    pub deception: bool,
    pub wager: BuildDecision,
    pub analysis: Analysis,
}

impl RoundAdvice {
    #[must_use]
    pub const fn build(&self) -> i64 {
        self.wager.build
    }

    #[must_use]
    pub const fn danger(&self) -> &BTreeMap<RoomId, f64> {
        &self.analysis.danger
    }
}

/// Binds a room catalog to one session's state.
#[derive(Debug, Clone)]
pub struct AdvisorSession {
    catalog: RoomCatalog,
    state: SessionState,
}

impl AdvisorSession {
    #[must_use]
    pub fn new(catalog: RoomCatalog) -> Self {
        Self::from_state(catalog, SessionState::default())
    }

    #[must_use]
    pub const fn from_state(catalog: RoomCatalog, state: SessionState) -> Self {
        Self { catalog, state }
    }

    #[must_use]
    pub fn seeded(catalog: RoomCatalog, recent: &[RoomId], stats: RecentStats) -> Self {
        Self::from_state(catalog, SessionState::seeded(recent, stats))
    }

    /// Fold one observed room into the session and produce the next advice.
    pub fn observe(&mut self, room: RoomId) -> RoundAdvice {
        let state = &mut self.state;
        let gim = gim_trend(state.recent.as_slice(), room);

        state.recent.push(room);
        state.stats.record(room);

        let analysis = analyze(
            &self.catalog,
            state.recent.as_slice(),
            &state.stats,
            &mut state.transitions,
        );
        let candidate = analysis.safest;

        state.suggestions.push(candidate);
        let (suggestion, safety, substituted) =
            if too_repeated_default(candidate, state.suggestions.as_slice()) {
                match analysis
                    .ranked()
                    .into_iter()
                    .find(|(alt, _)| !too_repeated_default(*alt, state.suggestions.as_slice()))
                {
                    Some((alt, _)) => {
                        log::debug!("suggestion {candidate} repeated too often; switching to {alt}");
                        (alt, analysis.safety_of(alt), true)
                    }
                    None => (candidate, analysis.safety, false),
                }
            } else {
                (candidate, analysis.safety, false)
            };

        let wager = state.wager.next_build(safety, room, suggestion, gim);
        log::debug!(
            "round observed {room}: suggest {suggestion} ({safety:.2}% safe) build {} gim {}",
            wager.build,
            gim.severity()
        );

        RoundAdvice {
            observed: room,
            candidate,
            suggestion,
            safety,
            substituted,
            gim,
            deception: analysis.deception,
            wager,
            analysis,
        }
    }

    /// Drop every piece of session memory, starting a new session.
    pub fn reset(&mut self) {
        self.state = SessionState::default();
    }

    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub const fn catalog(&self) -> &RoomCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn into_state(self) -> SessionState {
        self.state
    }
}
