//! Single-writer statistics recorder
//!
//! ```text
//! worker 0: Recorder ──record──▶ …  ┐
//! worker 1: Recorder ──record──▶ …  ├─ join ─▶ Recorder::merge ─▶ done() ─▶ StatReport
//! worker n: Recorder ──record──▶ …  ┘
//! ```

use rf_reel_engine::SpinResult;
use serde::{Deserialize, Serialize};

use crate::bucket::WinBucket;
use crate::error::StatsError;
use crate::report::StatReport;

/// Identity every merged recorder must share
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameIdentity {
    pub name: String,
    pub id: u32,
    pub bet_units: Vec<f64>,
    pub bet_mode: usize,
    pub init_bets: i64,
}

impl std::fmt::Display for GameIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}#{} units={:?} mode={} init_bets={}",
            self.name, self.id, self.bet_units, self.bet_mode, self.init_bets
        )
    }
}

/// Running sums and squared sums
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Basic {
    pub rounds: u64,
    pub triggers: u64,
    pub bet: f64,
    pub bet_sq: f64,
    pub win: f64,
    pub win_sq: f64,
    pub base_win: f64,
    pub base_win_sq: f64,
    pub free_win: f64,
    pub free_win_sq: f64,
}

impl Basic {
    fn add(&mut self, other: &Basic) {
        self.rounds += other.rounds;
        self.triggers += other.triggers;
        self.bet += other.bet;
        self.bet_sq += other.bet_sq;
        self.win += other.win;
        self.win_sq += other.win_sq;
        self.base_win += other.base_win;
        self.base_win_sq += other.base_win_sq;
        self.free_win += other.free_win;
        self.free_win_sq += other.free_win_sq;
    }
}

/// Per-bucket counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub total: Vec<u64>,
    pub base: Vec<u64>,
    pub free: Vec<u64>,
}

impl Distribution {
    fn new(buckets: usize) -> Self {
        Self {
            total: vec![0; buckets],
            base: vec![0; buckets],
            free: vec![0; buckets],
        }
    }

    fn add(&mut self, other: &Distribution) {
        for (dst, src) in [
            (&mut self.total, &other.total),
            (&mut self.base, &other.base),
            (&mut self.free, &other.free),
        ] {
            for (d, s) in dst.iter_mut().zip(src) {
                *d += s;
            }
        }
    }
}

/// Bankroll simulation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub initial: f64,
    pub balance: f64,
    pub max: f64,
    pub min: f64,
    /// Cashout threshold, 3× the initial balance
    pub leave_line: f64,
    pub bust: bool,
    pub cashout: bool,
}

impl Player {
    fn new(initial: f64) -> Self {
        Self {
            initial,
            balance: initial,
            max: initial,
            min: initial,
            leave_line: initial * 3.0,
            bust: false,
            cashout: false,
        }
    }

    pub fn alive(&self) -> bool {
        !self.bust && !self.cashout
    }
}

/// Per-worker statistics accumulator
#[derive(Debug, Clone, PartialEq)]
pub struct Recorder {
    identity: GameIdentity,
    bet_unit: f64,
    buckets: WinBucket,
    basic: Basic,
    distribution: Distribution,
    player: Player,
}

impl Recorder {
    /// Recorder with the standard win buckets
    pub fn new(
        name: impl Into<String>,
        id: u32,
        bet_units: Vec<f64>,
        bet_mode: usize,
        init_bets: i64,
    ) -> Result<Self, StatsError> {
        Self::with_buckets(
            GameIdentity {
                name: name.into(),
                id,
                bet_units,
                bet_mode,
                init_bets,
            },
            WinBucket::standard(),
        )
    }

    pub fn with_buckets(identity: GameIdentity, buckets: WinBucket) -> Result<Self, StatsError> {
        if identity.bet_units.is_empty() {
            return Err(StatsError::EmptyBetUnits);
        }
        if let Some((index, &value)) = identity
            .bet_units
            .iter()
            .enumerate()
            .find(|(_, u)| !(**u > 0.0) || !u.is_finite())
        {
            return Err(StatsError::NonPositiveBetUnit { index, value });
        }
        let Some(&bet_unit) = identity.bet_units.get(identity.bet_mode) else {
            return Err(StatsError::BetModeOutOfRange {
                mode: identity.bet_mode,
                count: identity.bet_units.len(),
            });
        };
        if identity.init_bets < 0 {
            return Err(StatsError::NegativeInitBets(identity.init_bets));
        }

        let player = Player::new(bet_unit * identity.init_bets as f64);
        Ok(Self {
            distribution: Distribution::new(buckets.len()),
            identity,
            bet_unit,
            buckets,
            basic: Basic::default(),
            player,
        })
    }

    pub fn identity(&self) -> &GameIdentity {
        &self.identity
    }

    /// Selected bet unit, also the bet multiplier
    pub fn bet_unit(&self) -> f64 {
        self.bet_unit
    }

    pub fn buckets(&self) -> &WinBucket {
        &self.buckets
    }

    pub fn basic(&self) -> &Basic {
        &self.basic
    }

    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Update Basic and Distribution
    pub fn record(&mut self, spin: &SpinResult) {
        let (bet, win, base, free) = (spin.bet(), spin.win(), spin.base_win(), spin.free_win());

        let b = &mut self.basic;
        b.rounds += 1;
        if spin.mode_count() > 1 {
            b.triggers += 1;
        }
        b.bet += bet;
        b.bet_sq += bet * bet;
        b.win += win;
        b.win_sq += win * win;
        b.base_win += base;
        b.base_win_sq += base * base;
        b.free_win += free;
        b.free_win_sq += free * free;

        let d = &mut self.distribution;
        d.total[self.buckets.index(win / self.bet_unit)] += 1;
        d.base[self.buckets.index(base / self.bet_unit)] += 1;
        d.free[self.buckets.index(free / self.bet_unit)] += 1;
    }

    /// Record and play the spin against the bankroll.
    ///
    /// Returns `true` when the player must stop: the balance could not cover
    /// one bet unit (nothing is recorded), or this spin busted or cashed out.
    pub fn record_with_player(&mut self, spin: &SpinResult) -> bool {
        if self.player.balance < self.bet_unit {
            return true;
        }
        self.record(spin);

        let p = &mut self.player;
        p.balance = p.balance - self.bet_unit + spin.win();
        p.max = p.max.max(p.balance);
        p.min = p.min.min(p.balance);
        if p.balance < self.bet_unit {
            p.bust = true;
        }
        if p.balance >= p.leave_line {
            p.cashout = true;
        }
        p.bust || p.cashout
    }

    /// Elementwise sum of Basic and Distribution into a fresh recorder.
    ///
    /// Inputs must have stopped mutating. Player state is not merged; the
    /// result carries a fresh bankroll.
    pub fn merge(recorders: &[Recorder]) -> Result<Recorder, StatsError> {
        let (first, rest) = recorders.split_first().ok_or(StatsError::NothingToMerge)?;
        for other in rest {
            if other.identity != first.identity {
                log::error!(
                    "Merge identity mismatch: {} vs {}",
                    first.identity,
                    other.identity
                );
                return Err(StatsError::IdentityMismatch {
                    expected: first.identity.to_string(),
                    found: other.identity.to_string(),
                });
            }
            if other.buckets != first.buckets {
                return Err(StatsError::BucketMismatch);
            }
        }

        let mut merged = Recorder::with_buckets(first.identity.clone(), first.buckets.clone())?;
        for r in recorders {
            merged.basic.add(&r.basic);
            merged.distribution.add(&r.distribution);
        }
        Ok(merged)
    }

    /// Immutable report projection
    pub fn done(&self) -> StatReport {
        StatReport::project(self)
    }
}
