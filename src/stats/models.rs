//! Stats payloads.
//!
//! The bundle keeps each payload verbatim. The typed views below describe
//! the shapes the backend is known to return and are only used for
//! rendering.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// One of the four stats endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatsResource {
    Game,
    Win,
    Loss,
    Draw,
}

impl StatsResource {
    pub fn path(&self) -> &'static str {
        match self {
            StatsResource::Game => "/gamestats",
            StatsResource::Win => "/winstats",
            StatsResource::Loss => "/lossstats",
            StatsResource::Draw => "/drawstats",
        }
    }
}

impl fmt::Display for StatsResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatsResource::Game => write!(f, "game stats"),
            StatsResource::Win => write!(f, "win stats"),
            StatsResource::Loss => write!(f, "loss stats"),
            StatsResource::Draw => write!(f, "draw stats"),
        }
    }
}

/// The four stats payloads for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsBundle {
    pub game_stats: Value,
    pub win_stats: Value,
    pub loss_stats: Value,
    pub draw_stats: Value,
}

/// Stats keyed by time class (`blitz`, `rapid`, ...).
pub type ByTimeClass<T> = BTreeMap<String, T>;

/// Result counts for one time class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub wins: u64,
    pub losses: u64,
    pub draws: u64,
    pub total: u64,
}

impl GameRecord {
    /// Share of games won, in percent.
    pub fn win_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.wins as f64 * 100.0 / self.total as f64
        }
    }
}

/// How decisive games ended, used for both wins and losses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishBreakdown {
    pub resigns: u64,
    pub checkmates: u64,
    pub abandons: u64,
    pub timeouts: u64,
    pub total: u64,
}

/// How drawn games ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawBreakdown {
    pub repetitions: u64,
    pub insufficients: u64,
    pub timeout_vs_insufficients: u64,
    pub stalemates: u64,
    pub agrees: u64,
    pub fifty_move_rules: u64,
    pub total: u64,
}
