use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;

use saferoom_core::constants::ROOM_COUNT;
use saferoom_core::numbers::usize_to_f64;
use saferoom_core::{AdvisorSession, GimLevel, RoomCatalog, RoomId, RoundAdvice};

const CAMP_CHANCE: f64 = 0.20;
const HABIT_CHANCE: f64 = 0.45;
const CHASE_CHANCE: f64 = 0.10;

/// Configuration for one seeded replay.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub seed: u64,
    pub rounds: usize,
}

impl SimulationConfig {
    #[must_use]
    pub const fn new(seed: u64, rounds: usize) -> Self {
        Self { seed, rounds }
    }
}

/// Synthetic killer: camps, follows per-room habits, sometimes guesses the
/// player's hideout, and otherwise wanders uniformly.
pub struct Adversary {
    rng: ChaCha20Rng,
    habits: [RoomId; ROOM_COUNT],
    last: Option<RoomId>,
}

impl Adversary {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let habits = std::array::from_fn(|_| RoomId::ALL[rng.gen_range(0..ROOM_COUNT)]);
        Self {
            rng,
            habits,
            last: None,
        }
    }

    pub fn next_room(&mut self, hideout: Option<RoomId>) -> RoomId {
        let roll: f64 = self.rng.r#gen();
        let room = match (self.last, hideout) {
            (Some(last), _) if roll < CAMP_CHANCE => last,
            (Some(last), _) if roll < CAMP_CHANCE + HABIT_CHANCE => self.habits[last.index()],
            (_, Some(target)) if roll < CAMP_CHANCE + HABIT_CHANCE + CHASE_CHANCE => target,
            _ => RoomId::ALL[self.rng.gen_range(0..ROOM_COUNT)],
        };
        self.last = Some(room);
        room
    }
}

/// Per-seed outcome of replaying the adversary against the advisor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimulationResult {
    pub seed: u64,
    pub rounds: usize,
    pub catches: usize,
    pub escapes: usize,
    pub longest_escape_streak: usize,
    pub substitutions: usize,
    pub gim_rounds: usize,
    pub wagered: i64,
    pub won: i64,
    pub lost: i64,
}

impl SimulationResult {
    #[must_use]
    pub const fn net(&self) -> i64 {
        self.won - self.lost
    }

    #[must_use]
    pub fn escape_rate(&self) -> f64 {
        let judged = self.catches + self.escapes;
        if judged == 0 {
            return 0.0;
        }
        usize_to_f64(self.escapes) / usize_to_f64(judged) * 100.0
    }
}

/// Replay `config.rounds` adversary moves. The player hides in the previous
/// round's suggestion and stakes its build; the first move is unjudged.
#[must_use]
pub fn run_simulation(catalog: &RoomCatalog, config: SimulationConfig) -> SimulationResult {
    let mut session = AdvisorSession::new(catalog.clone());
    let mut adversary = Adversary::new(config.seed);
    let mut result = SimulationResult {
        seed: config.seed,
        rounds: config.rounds,
        ..SimulationResult::default()
    };
    let mut previous: Option<RoundAdvice> = None;
    let mut streak = 0;

    for _ in 0..config.rounds {
        let entered = adversary.next_room(previous.as_ref().map(|advice| advice.suggestion));
        if let Some(advice) = &previous {
            let stake = advice.build();
            result.wagered += stake;
            if advice.suggestion == entered {
                result.catches += 1;
                result.lost += stake;
                streak = 0;
            } else {
                result.escapes += 1;
                result.won += stake;
                streak += 1;
                result.longest_escape_streak = result.longest_escape_streak.max(streak);
            }
        }

        let advice = session.observe(entered);
        if advice.substituted {
            result.substitutions += 1;
        }
        if advice.gim != GimLevel::None {
            result.gim_rounds += 1;
        }
        previous = Some(advice);
    }

    log::debug!(
        "seed {} finished: {} catches, {} escapes, net {}",
        result.seed,
        result.catches,
        result.escapes,
        result.net()
    );
    result
}

#[must_use]
pub fn run_simulations(catalog: &RoomCatalog, seeds: &[u64], rounds: usize) -> Vec<SimulationResult> {
    seeds
        .iter()
        .map(|seed| run_simulation(catalog, SimulationConfig::new(*seed, rounds)))
        .collect()
}
