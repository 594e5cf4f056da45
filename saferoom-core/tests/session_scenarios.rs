use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use saferoom_core::constants::{BUILD_HISTORY_CAP, BUILD_MAX, BUILD_MIN, RECENT_WINDOW};
use saferoom_core::{
    AdvisorSession, GimLevel, RecentStats, RoomCatalog, RoomId, SessionState, parse_room_list,
    too_repeated_default,
};

fn room(value: u8) -> RoomId {
    RoomId::new(value).unwrap()
}

fn alternating_session() -> AdvisorSession {
    let recent = parse_room_list("1 2 1 2 1 2 1 2 1 2").unwrap();
    AdvisorSession::seeded(RoomCatalog::numbered(), &recent, RecentStats::default())
}

#[test]
fn repeated_candidate_is_swapped_for_next_safest_room() {
    let mut session = alternating_session();
    let first = session.observe(room(1));
    let second = session.observe(room(2));
    let third = session.observe(room(1));

    assert_eq!(first.suggestion, room(3));
    assert!(!first.substituted);
    assert_eq!(second.suggestion, room(3));
    assert!(!second.substituted);

    assert_eq!(third.candidate, room(3));
    assert!(third.substituted);
    assert_eq!(third.suggestion, room(5));
    assert!((third.safety - 92.0).abs() < 1e-6);
    assert_eq!(
        session.state().suggestions.as_slice(),
        &[room(3), room(3), room(3)]
    );
}

#[test]
fn first_high_wager_is_held_back() {
    let mut session = alternating_session();
    let advice = session.observe(room(1));
    assert!((advice.safety - 95.0).abs() < 1e-6);
    assert_eq!(advice.wager.base, 1_000);
    assert!(advice.wager.runaway_guard);
    assert_eq!(advice.build(), 300);
}

#[test]
fn camping_adversary_pins_the_wager() {
    let mut session = AdvisorSession::new(RoomCatalog::numbered());
    let mut levels = Vec::new();
    for _ in 0..5 {
        let advice = session.observe(room(4));
        levels.push(advice.gim);
        if advice.gim == GimLevel::Triple {
            assert_eq!(advice.build(), 100);
        }
    }
    assert_eq!(
        levels,
        vec![
            GimLevel::None,
            GimLevel::None,
            GimLevel::None,
            GimLevel::Triple,
            GimLevel::Triple
        ]
    );

    let mut broken = AdvisorSession::new(RoomCatalog::numbered());
    for value in [7, 7, 2, 2] {
        broken.observe(room(value));
    }
    let advice = broken.observe(room(2));
    assert_eq!(advice.gim, GimLevel::Double);
    assert!(advice.build() <= 300);
}

#[test]
fn seeded_sessions_hold_every_invariant() {
    for seed in [1_u64, 7, 42, 1337, 0xC0FFEE] {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut session = AdvisorSession::new(RoomCatalog::default_catalog().clone());
        let mut substitutions = 0;

        for _ in 0..400 {
            let observed = RoomId::ALL[rng.gen_range(0..RoomId::ALL.len())];
            let before: Vec<RoomId> = session.state().suggestions.as_slice().to_vec();
            let advice = session.observe(observed);

            assert!((BUILD_MIN..=BUILD_MAX).contains(&advice.build()));
            assert_eq!(advice.build() % 100, 0);
            assert!(advice.danger().values().all(|d| *d <= 100.0));

            let mut history = before;
            history.push(advice.candidate);
            if too_repeated_default(advice.candidate, &history[history.len().saturating_sub(10)..])
            {
                assert!(advice.substituted);
                substitutions += 1;
            }
            if advice.substituted {
                assert_ne!(advice.suggestion, advice.candidate);
            }

            let state = session.state();
            assert!(state.recent.len() <= RECENT_WINDOW);
            assert!(state.suggestions.len() <= 10);
            assert!(state.wager.history().len() <= BUILD_HISTORY_CAP);
            assert!(state.stats.total() <= 100.0 + 8.0);
        }
        assert!(substitutions > 0, "seed {seed} never exercised substitution");
    }
}

#[test]
fn reset_clears_a_populated_session() {
    let mut session = alternating_session();
    for value in [1, 2, 3, 4, 4, 4, 8] {
        session.observe(room(value));
    }
    assert!(!session.state().wager.history().is_empty());
    session.reset();
    assert_eq!(session.state(), &SessionState::default());

    let advice = session.observe(room(5));
    assert_eq!(session.state().recent.as_slice(), &[room(5)]);
    assert_eq!(advice.gim, GimLevel::None);
}

#[test]
fn session_state_survives_serialization() {
    let mut session = alternating_session();
    for value in [3, 3, 6, 8] {
        session.observe(room(value));
    }
    let snapshot = serde_json::to_string(session.state()).unwrap();
    let restored: SessionState = serde_json::from_str(&snapshot).unwrap();
    assert_eq!(&restored, session.state());

    let mut resumed = AdvisorSession::from_state(RoomCatalog::numbered(), restored);
    let mut original = session;
    assert_eq!(resumed.observe(room(2)), original.observe(room(2)));
}
