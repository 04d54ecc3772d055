//! Fantasy-points scoring table.
//!
//! All arithmetic is integer. Milestone bonuses stack: a century earns the
//! 30-, 50- and 100-run bonuses together, and a five-wicket haul earns the
//! 3-, 4- and 5-wicket bonuses together. Totals are never clamped.

use crate::domain::{InvalidStatistics, PerformanceInput, PerformanceStats};
use serde::{Deserialize, Serialize};

pub const POINTS_PER_RUN: i64 = 1;
pub const POINTS_PER_FOUR: i64 = 1;
pub const POINTS_PER_SIX: i64 = 2;
/// `(runs threshold, bonus)`, each applied independently.
pub const RUN_MILESTONES: [(u32, i64); 3] = [(30, 4), (50, 8), (100, 16)];
pub const DUCK_PENALTY: i64 = -2;

pub const POINTS_PER_WICKET: i64 = 25;
/// Flat bonus when any dismissal was LBW or bowled.
pub const LBW_OR_BOWLED_BONUS: i64 = 8;
/// `(wickets threshold, bonus)`, each applied independently.
pub const WICKET_MILESTONES: [(u32, i64); 3] = [(3, 4), (4, 8), (5, 16)];
pub const POINTS_PER_MAIDEN: i64 = 12;
pub const NO_BALL_PENALTY: i64 = -2;
pub const WIDE_PENALTY: i64 = -1;

pub const POINTS_PER_CATCH: i64 = 8;
pub const POINTS_PER_STUMPING: i64 = 12;
pub const POINTS_PER_RUN_OUT: i64 = 6;

/// Per-category subtotals behind a score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsBreakdown {
    pub batting: i64,
    pub bowling: i64,
    pub fielding: i64,
    pub total: i64,
}

fn milestone_bonus(value: u32, milestones: &[(u32, i64)]) -> i64 {
    milestones
        .iter()
        .filter(|(threshold, _)| value >= *threshold)
        .map(|(_, bonus)| bonus)
        .sum()
}

pub fn batting_points(runs: u32, fours: u32, sixes: u32) -> i64 {
    let mut points = i64::from(runs) * POINTS_PER_RUN
        + i64::from(fours) * POINTS_PER_FOUR
        + i64::from(sixes) * POINTS_PER_SIX;
    points += milestone_bonus(runs, &RUN_MILESTONES);
    if runs == 0 {
        points += DUCK_PENALTY;
    }
    points
}

pub fn bowling_points(
    wickets: u32,
    lbw_or_bowled: bool,
    maidens: u32,
    no_balls: u32,
    wides: u32,
) -> i64 {
    let mut points = i64::from(wickets) * POINTS_PER_WICKET;
    if lbw_or_bowled {
        points += LBW_OR_BOWLED_BONUS;
    }
    points += milestone_bonus(wickets, &WICKET_MILESTONES);
    points += i64::from(maidens) * POINTS_PER_MAIDEN;
    points += i64::from(no_balls) * NO_BALL_PENALTY;
    points += i64::from(wides) * WIDE_PENALTY;
    points
}

pub fn fielding_points(catches: u32, stumpings: u32, run_outs: u32) -> i64 {
    i64::from(catches) * POINTS_PER_CATCH
        + i64::from(stumpings) * POINTS_PER_STUMPING
        + i64::from(run_outs) * POINTS_PER_RUN_OUT
}

pub fn breakdown(stats: &PerformanceStats) -> PointsBreakdown {
    let batting = batting_points(stats.runs, stats.fours, stats.sixes);
    let bowling = bowling_points(
        stats.wickets,
        stats.lbw_or_bowled,
        stats.maidens,
        stats.no_balls,
        stats.wides,
    );
    let fielding = fielding_points(stats.catches, stats.stumpings, stats.run_outs);
    PointsBreakdown {
        batting,
        bowling,
        fielding,
        total: batting + bowling + fielding,
    }
}

/// Points for checked statistics.
pub fn score_stats(stats: &PerformanceStats) -> i64 {
    breakdown(stats).total
}

/// Check `input` and compute its fantasy points.
pub fn score(input: &PerformanceInput) -> Result<i64, InvalidStatistics> {
    let stats = PerformanceStats::try_from(input)?;
    Ok(score_stats(&stats))
}
