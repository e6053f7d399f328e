//! Stat report — immutable projection of a recorder

use serde::Serialize;

use crate::recorder::Recorder;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub game_name: String,
    pub game_id: u32,
    pub bet_units: Vec<f64>,
    pub bet_unit: f64,
    pub bet_mode: usize,
    pub bet_multiplier: f64,
    pub total_bet: f64,
    pub total_win: f64,
    pub base_win: f64,
    pub free_win: f64,
    pub rtp: f64,
    pub base_rtp: f64,
    pub free_rtp: f64,
    pub trigger: u64,
    pub trigger_rate: f64,
    pub no_win_rounds: u64,
    pub hit_rate: f64,
    pub rounds: u64,
}

/// Mean and uncentered second moment of a win expressed in bet units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Moments {
    pub mean: f64,
    pub second: f64,
}

impl Moments {
    /// Variance derived from the two moments
    pub fn variance(&self) -> f64 {
        (self.second - self.mean * self.mean).max(0.0)
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MultiplierMoments {
    pub total: Moments,
    pub base: Moments,
    pub free: Moments,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketStats {
    pub counts: Vec<u64>,
    /// Count per round
    pub frequency: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionReport {
    pub labels: Vec<String>,
    pub total: BucketStats,
    pub base: BucketStats,
    pub free: BucketStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerReport {
    pub initial: f64,
    pub balance: f64,
    pub max: f64,
    pub min: f64,
    pub bust: bool,
    pub cashout: bool,
    pub alive: bool,
}

/// Final statistics report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatReport {
    pub summary: Summary,
    pub multiplier: MultiplierMoments,
    pub distribution: DistributionReport,
    pub player: PlayerReport,
}

#[inline]
fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 { 0.0 } else { num / den }
}

impl StatReport {
    pub(crate) fn project(recorder: &Recorder) -> Self {
        let identity = recorder.identity();
        let b = recorder.basic();
        let d = recorder.distribution();
        let p = recorder.player();
        let unit = recorder.bet_unit();
        let rounds = b.rounds as f64;
        let no_win_rounds = d.total.first().copied().unwrap_or(0);

        let rtp = |win: f64| if b.rounds == 0 { 0.0 } else { ratio(win, b.bet) };
        let moments = |sum: f64, sq: f64| Moments {
            mean: ratio(sum, rounds) / unit,
            second: ratio(sq, rounds) / (unit * unit),
        };
        let buckets = |counts: &Vec<u64>| BucketStats {
            counts: counts.clone(),
            frequency: counts.iter().map(|&c| ratio(c as f64, rounds)).collect(),
        };

        Self {
            summary: Summary {
                game_name: identity.name.clone(),
                game_id: identity.id,
                bet_units: identity.bet_units.clone(),
                bet_unit: unit,
                bet_mode: identity.bet_mode,
                bet_multiplier: unit,
                total_bet: b.bet,
                total_win: b.win,
                base_win: b.base_win,
                free_win: b.free_win,
                rtp: rtp(b.win),
                base_rtp: rtp(b.base_win),
                free_rtp: rtp(b.free_win),
                trigger: b.triggers,
                trigger_rate: ratio(b.triggers as f64, rounds),
                no_win_rounds,
                hit_rate: if b.rounds == 0 {
                    0.0
                } else {
                    1.0 - no_win_rounds as f64 / rounds
                },
                rounds: b.rounds,
            },
            multiplier: MultiplierMoments {
                total: moments(b.win, b.win_sq),
                base: moments(b.base_win, b.base_win_sq),
                free: moments(b.free_win, b.free_win_sq),
            },
            distribution: DistributionReport {
                labels: recorder.buckets().labels(),
                total: buckets(&d.total),
                base: buckets(&d.base),
                free: buckets(&d.free),
            },
            player: PlayerReport {
                initial: p.initial,
                balance: p.balance,
                max: p.max,
                min: p.min,
                bust: p.bust,
                cashout: p.cashout,
                alive: p.alive(),
            },
        }
    }
}

impl std::fmt::Display for StatReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = &self.summary;
        writeln!(f, "═══ {} (#{}) ═══", s.game_name, s.game_id)?;
        writeln!(
            f,
            "bet unit {} (mode {} of {:?})",
            s.bet_unit, s.bet_mode, s.bet_units
        )?;
        writeln!(f, "rounds        {:>14}", s.rounds)?;
        writeln!(f, "total bet     {:>14.2}", s.total_bet)?;
        writeln!(f, "total win     {:>14.2}", s.total_win)?;
        writeln!(
            f,
            "RTP           {:>13.4}%  (base {:.4}%, free {:.4}%)",
            s.rtp * 100.0,
            s.base_rtp * 100.0,
            s.free_rtp * 100.0
        )?;
        writeln!(f, "hit rate      {:>13.4}%", s.hit_rate * 100.0)?;
        writeln!(
            f,
            "triggers      {:>14}  (1 in {:.1})",
            s.trigger,
            ratio(1.0, s.trigger_rate)
        )?;
        writeln!(
            f,
            "std dev       {:>14.4}x",
            self.multiplier.total.std_dev()
        )?;

        writeln!(f, "─── distribution (per round) ───")?;
        writeln!(f, "{:<12} {:>10} {:>10} {:>10}", "bucket", "total", "base", "free")?;
        let dist = &self.distribution;
        for (i, label) in dist.labels.iter().enumerate() {
            writeln!(
                f,
                "{:<12} {:>10.6} {:>10.6} {:>10.6}",
                label, dist.total.frequency[i], dist.base.frequency[i], dist.free.frequency[i]
            )?;
        }

        let p = &self.player;
        writeln!(f, "─── player ───")?;
        write!(
            f,
            "balance {:.2} (initial {:.2}, max {:.2}, min {:.2}) bust={} cashout={} alive={}",
            p.balance, p.initial, p.max, p.min, p.bust, p.cashout, p.alive
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::recorder::Recorder;
    use approx::assert_relative_eq;
    use rf_reel_engine::{ModeKind, ModeResult, SpinResult};

    fn single(bet: f64, win: f64) -> SpinResult {
        SpinResult::from_modes(vec![ModeResult::summary(ModeKind::Base, bet, win, 0)])
    }

    #[test]
    fn test_single_spin_rtp() {
        let mut r = Recorder::new("g", 1, vec![1.0, 2.0, 5.0], 1, 100).unwrap();
        r.record(&single(2.0, 6.0));
        let report = r.done();
        assert_relative_eq!(report.summary.rtp, 3.0);
        assert_eq!(report.summary.rounds, 1);
        assert_eq!(report.summary.trigger, 0);
        assert_relative_eq!(report.summary.hit_rate, 1.0);
        assert_relative_eq!(report.multiplier.total.mean, 3.0);
        assert_relative_eq!(report.multiplier.total.second, 9.0);
    }

    #[test]
    fn test_empty_report_is_zero() {
        let r = Recorder::new("g", 1, vec![1.0], 0, 10).unwrap();
        let report = r.done();
        assert_eq!(report.summary.rtp, 0.0);
        assert_eq!(report.summary.hit_rate, 0.0);
        assert_eq!(report.summary.trigger_rate, 0.0);
        assert!(report.distribution.total.frequency.iter().all(|&f| f == 0.0));
        assert_eq!(report.multiplier.total.mean, 0.0);
    }

    #[test]
    fn test_done_is_idempotent() {
        let mut r = Recorder::new("g", 1, vec![1.0], 0, 10).unwrap();
        r.record(&single(1.0, 0.0));
        r.record(&single(1.0, 4.0));
        assert_eq!(r.done(), r.done());
    }

    #[test]
    fn test_frequencies_and_hit_rate() {
        let mut r = Recorder::new("g", 1, vec![1.0], 0, 10).unwrap();
        for win in [0.0, 0.0, 0.5, 3.0] {
            r.record(&single(1.0, win));
        }
        let report = r.done();
        assert_eq!(report.summary.no_win_rounds, 2);
        assert_relative_eq!(report.summary.hit_rate, 0.5);
        let freq = &report.distribution.total.frequency;
        assert_relative_eq!(freq[0], 0.5);
        assert_relative_eq!(freq[1], 0.25);
        assert_relative_eq!(freq[3], 0.25);
        assert_relative_eq!(freq.iter().sum::<f64>(), 1.0);
        // free never played: every round in the 0x bucket
        assert_relative_eq!(report.distribution.free.frequency[0], 1.0);
    }

    #[test]
    fn test_report_serializes() {
        let mut r = Recorder::new("g", 3, vec![1.0], 0, 10).unwrap();
        r.record(&single(1.0, 2.0));
        let json = serde_json::to_value(r.done()).unwrap();
        assert_eq!(json["summary"]["game_id"], 3);
        assert_eq!(json["distribution"]["labels"][0], "0x");
        assert!(r.done().to_string().contains("RTP"));
    }
}
