//! Per-player, per-match statistics: the raw record an admin submits, the
//! checked statistics the scoring engine consumes, and the stored result.

use crate::domain::MatchPlayerId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Statistics that fail the input contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidStatistics {
    #[error("invalid statistics: `{0}` is required")]
    Missing(&'static str),
    #[error("invalid statistics: `{field}` must be a non-negative integer, got {value}")]
    Negative { field: &'static str, value: i64 },
    #[error("invalid statistics: `{field}` is out of range ({value})")]
    OutOfRange { field: &'static str, value: i64 },
    #[error("invalid statistics: {0}")]
    Malformed(String),
}

/// Raw statistics as submitted. Every count is optional here so that missing
/// and negative values can be reported rather than rejected by the parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceInput {
    // Batting
    pub runs: Option<i64>,
    pub fours: Option<i64>,
    pub sixes: Option<i64>,
    pub balls_faced: Option<i64>,
    // Bowling
    pub wickets: Option<i64>,
    pub lbw_or_bowled: Option<bool>,
    pub maidens: Option<i64>,
    pub no_balls: Option<i64>,
    pub wides: Option<i64>,
    pub byes: Option<i64>,
    pub leg_byes: Option<i64>,
    // Fielding
    pub catches: Option<i64>,
    pub stumpings: Option<i64>,
    pub run_outs: Option<i64>,
}

impl PerformanceInput {
    /// Batting-and-bowling core every record must carry.
    pub fn new(runs: i64, fours: i64, sixes: i64, wickets: i64) -> Self {
        Self {
            runs: Some(runs),
            fours: Some(fours),
            sixes: Some(sixes),
            wickets: Some(wickets),
            ..Self::default()
        }
    }
}

/// One submitted record: the participation it belongs to plus its statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceRecord {
    pub match_player_id: MatchPlayerId,
    #[serde(flatten)]
    pub input: PerformanceInput,
}

impl PerformanceRecord {
    /// Parse a record from an untyped JSON value.
    ///
    /// Parser failures (wrong types, fractional counts, a missing
    /// `matchPlayerId`) surface as `InvalidStatistics::Malformed`.
    pub fn from_json(value: serde_json::Value) -> Result<Self, InvalidStatistics> {
        serde_json::from_value(value).map_err(|e| InvalidStatistics::Malformed(e.to_string()))
    }
}

/// Statistics that have passed the input contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceStats {
    pub runs: u32,
    pub fours: u32,
    pub sixes: u32,
    pub balls_faced: u32,
    pub wickets: u32,
    pub lbw_or_bowled: bool,
    pub maidens: u32,
    pub no_balls: u32,
    pub wides: u32,
    pub byes: u32,
    pub leg_byes: u32,
    pub catches: u32,
    pub stumpings: u32,
    pub run_outs: u32,
}

fn required(field: &'static str, value: Option<i64>) -> Result<u32, InvalidStatistics> {
    match value {
        Some(v) => count(field, v),
        None => Err(InvalidStatistics::Missing(field)),
    }
}

fn optional(field: &'static str, value: Option<i64>) -> Result<u32, InvalidStatistics> {
    value.map_or(Ok(0), |v| count(field, v))
}

fn count(field: &'static str, value: i64) -> Result<u32, InvalidStatistics> {
    if value < 0 {
        return Err(InvalidStatistics::Negative { field, value });
    }
    u32::try_from(value).map_err(|_| InvalidStatistics::OutOfRange { field, value })
}

impl TryFrom<&PerformanceInput> for PerformanceStats {
    type Error = InvalidStatistics;

    fn try_from(input: &PerformanceInput) -> Result<Self, Self::Error> {
        Ok(PerformanceStats {
            runs: required("runs", input.runs)?,
            fours: required("fours", input.fours)?,
            sixes: required("sixes", input.sixes)?,
            balls_faced: optional("ballsFaced", input.balls_faced)?,
            wickets: required("wickets", input.wickets)?,
            lbw_or_bowled: input.lbw_or_bowled.unwrap_or(false),
            maidens: optional("maidens", input.maidens)?,
            no_balls: optional("noBalls", input.no_balls)?,
            wides: optional("wides", input.wides)?,
            byes: optional("byes", input.byes)?,
            leg_byes: optional("legByes", input.leg_byes)?,
            catches: optional("catches", input.catches)?,
            stumpings: optional("stumpings", input.stumpings)?,
            run_outs: optional("runOuts", input.run_outs)?,
        })
    }
}

/// Stored statistics with their derived points.
///
/// `points` is a cache: it is always recomputed from `stats` on write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredPerformance {
    pub match_player_id: MatchPlayerId,
    #[serde(flatten)]
    pub stats: PerformanceStats,
    pub points: i64,
}
